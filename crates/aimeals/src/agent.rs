mod step;

use serde::Serialize;

pub use step::AgentStep;

use crate::errors::{AgentError, AgentResult};
use crate::models::content::Content;
use crate::models::message::{Message, ToolRequest};
use crate::models::tool::{Tool, ToolCall};
use crate::providers::base::Provider;
use crate::systems::System;
use crate::transcript::Transcript;

pub const DEFAULT_MAX_ITERATIONS: usize = 20;
pub const BUDGET_EXCEEDED: &str = "iteration budget exceeded";

/// Terminal result of one agent invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AgentOutcome {
    Success { text: String },
    Failure { reason: String },
}

impl AgentOutcome {
    fn failure<S: Into<String>>(reason: S) -> Self {
        AgentOutcome::Failure {
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AgentOutcome::Success { .. })
    }
}

enum LoopState {
    AwaitingModel,
    AwaitingTool(Vec<ToolRequest>),
    Done(AgentOutcome),
}

/// Agent drives a language model through tool calls until it produces a final answer.
///
/// The agent holds no per-invocation state: every [`Agent::run`] builds its own
/// transcript, so one instance can serve concurrent requests.
pub struct Agent {
    provider: Box<dyn Provider>,
    systems: Vec<Box<dyn System>>,
    system_prompt: String,
    max_iterations: usize,
}

impl Agent {
    pub fn new<S: Into<String>>(provider: Box<dyn Provider>, system_prompt: S) -> Self {
        Self {
            provider,
            systems: Vec::new(),
            system_prompt: system_prompt.into(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Cap on model calls per invocation
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn add_system(&mut self, system: Box<dyn System>) {
        self.systems.push(system);
    }

    /// The tool catalog offered to the model
    pub fn tools(&self) -> Vec<Tool> {
        self.systems
            .iter()
            .flat_map(|system| system.tools().iter().cloned())
            .collect()
    }

    /// Dispatch a single tool call to the system that owns the tool
    async fn dispatch_tool_call(&self, tool_call: AgentResult<ToolCall>) -> AgentResult<Vec<Content>> {
        let call = tool_call?;
        let system = self
            .systems
            .iter()
            .find(|system| system.has_tool(&call.name))
            .ok_or_else(|| AgentError::ToolNotFound(call.name.clone()))?;

        system.call(call).await
    }

    /// Run one invocation and return its outcome
    pub async fn run(&self, instruction: &str) -> AgentOutcome {
        self.run_with_transcript(instruction).await.0
    }

    /// Run one invocation, also handing back the transcript it produced
    pub async fn run_with_transcript(&self, instruction: &str) -> (AgentOutcome, Transcript) {
        let tools = self.tools();
        let mut transcript = Transcript::new(self.system_prompt.as_str(), instruction);
        let mut model_calls = 0;
        let mut state = LoopState::AwaitingModel;

        loop {
            state = match state {
                LoopState::AwaitingModel if model_calls >= self.max_iterations => {
                    tracing::warn!(model_calls, "agent stopped without a final answer");
                    LoopState::Done(AgentOutcome::failure(BUDGET_EXCEEDED))
                }
                LoopState::AwaitingModel => {
                    model_calls += 1;
                    tracing::debug!(iteration = model_calls, "calling model");

                    match self
                        .provider
                        .complete(transcript.system(), transcript.messages(), &tools)
                        .await
                    {
                        Ok((response, _usage)) => {
                            let (step, recorded) = AgentStep::interpret(response);
                            transcript.push(recorded);
                            match step {
                                AgentStep::ToolCalls(requests) => LoopState::AwaitingTool(requests),
                                AgentStep::FinalAnswer(text) => {
                                    LoopState::Done(AgentOutcome::Success { text })
                                }
                                AgentStep::Empty => LoopState::Done(AgentOutcome::failure(
                                    "model returned an empty response",
                                )),
                            }
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "model call failed");
                            LoopState::Done(AgentOutcome::failure(e.to_string()))
                        }
                    }
                }
                LoopState::AwaitingTool(requests) => {
                    // One at a time, in the order the model listed them
                    let mut tool_response = Message::user();
                    for request in requests {
                        let output = self.dispatch_tool_call(request.tool_call).await;
                        if let Err(e) = &output {
                            tracing::debug!(id = %request.id, error = %e, "tool call rejected");
                        }
                        tool_response = tool_response.with_tool_response(request.id, output);
                    }
                    transcript.push(tool_response);
                    LoopState::AwaitingModel
                }
                LoopState::Done(outcome) => {
                    tracing::debug!(
                        model_calls,
                        turns = transcript.turn_count(),
                        success = outcome.is_success(),
                        "agent finished"
                    );
                    return (outcome, transcript);
                }
            };
        }
    }
}
