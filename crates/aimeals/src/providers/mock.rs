use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::models::message::Message;
use crate::models::tool::Tool;
use crate::providers::base::{Provider, Usage};

/// A mock provider that returns pre-configured responses for testing
pub struct MockProvider {
    responses: Arc<Mutex<Vec<Message>>>,
    repeat: Option<Message>,
    calls: Arc<AtomicUsize>,
}

impl MockProvider {
    /// Create a new mock provider with a sequence of responses
    pub fn new(responses: Vec<Message>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            repeat: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A provider that answers every call with the same message
    pub fn repeating(response: Message) -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            repeat: Some(response),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared handle to the number of completed calls
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn complete(
        &self,
        _system_prompt: &str,
        _messages: &[Message],
        _tools: &[Tool],
    ) -> Result<(Message, Usage)> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(response) = &self.repeat {
            return Ok((response.clone(), Usage::default()));
        }
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Err(anyhow!("mock provider has no more responses"))
        } else {
            Ok((responses.remove(0), Usage::default()))
        }
    }
}
