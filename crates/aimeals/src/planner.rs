use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::agent::{Agent, AgentOutcome, DEFAULT_MAX_ITERATIONS};
use crate::formatter::{format_meal_plan, MealPlan};
use crate::prompt_template::load_prompt_file;
use crate::providers::configs::ProviderConfig;
use crate::providers::factory::get_provider;
use crate::systems::{System, SystemInfo, UsdaSystem};
use crate::usda::{UsdaClient, UsdaConfig};

const PLAN_SUFFIX: &str = "Suggest me breakfast, lunch, dinner and snacks now. For each meal: \
list items, portion guidance, and macro breakdown (calories, protein g, carbs g, fat g; \
include sugar and fiber when available), don't reason way too much.";

pub const SUCCESS_MESSAGE: &str = "Meal plan generated successfully";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MealPlanRequest {
    pub user_profile: String,
    #[serde(default)]
    pub dietary_preferences: Option<String>,
    #[serde(default)]
    pub additional_requirements: Option<String>,
}

impl MealPlanRequest {
    pub fn new<S: Into<String>>(user_profile: S) -> Self {
        Self {
            user_profile: user_profile.into(),
            ..Default::default()
        }
    }

    /// Collapse the request into the single instruction handed to the agent
    pub fn build_instruction(&self) -> String {
        let mut parts = vec![self.user_profile.trim()];
        for extra in [&self.dietary_preferences, &self.additional_requirements]
            .into_iter()
            .flatten()
        {
            let extra = extra.trim();
            if !extra.is_empty() {
                parts.push(extra);
            }
        }
        parts.retain(|part| !part.is_empty());
        parts.push(PLAN_SUFFIX);
        parts.join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealPlanResponse {
    pub success: bool,
    pub meal_plan: Option<MealPlan>,
    pub message: String,
}

impl MealPlanResponse {
    fn failure<S: AsRef<str>>(reason: S) -> Self {
        Self {
            success: false,
            meal_plan: None,
            message: format!("Error generating meal plan: {}", reason.as_ref()),
        }
    }
}

/// Builds a fresh agent per request from shared, immutable configuration.
#[derive(Debug, Clone)]
pub struct MealPlanner {
    provider_config: ProviderConfig,
    usda_config: UsdaConfig,
    max_iterations: usize,
}

impl MealPlanner {
    pub fn new(provider_config: ProviderConfig, usda_config: UsdaConfig) -> Self {
        Self {
            provider_config,
            usda_config,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn provider_config(&self) -> &ProviderConfig {
        &self.provider_config
    }

    pub fn usda_config(&self) -> &UsdaConfig {
        &self.usda_config
    }

    fn build_agent(&self) -> Result<Agent> {
        let usda = UsdaSystem::new(UsdaClient::new(self.usda_config.clone())?);
        let system_prompt = render_system_prompt(&[&usda])?;
        let provider = get_provider(self.provider_config.clone())?;

        let mut agent = Agent::new(provider, system_prompt).with_max_iterations(self.max_iterations);
        agent.add_system(Box::new(usda));
        Ok(agent)
    }

    /// Run the agent on one instruction and shape its answer for callers
    pub async fn generate_meal_plan(&self, instruction: &str) -> MealPlanResponse {
        let agent = match self.build_agent() {
            Ok(agent) => agent,
            Err(e) => {
                tracing::error!(error = %e, "failed to build meal planning agent");
                return MealPlanResponse::failure(e.to_string());
            }
        };

        match agent.run(instruction).await {
            AgentOutcome::Success { text } => MealPlanResponse {
                success: true,
                meal_plan: Some(format_meal_plan(&text)),
                message: SUCCESS_MESSAGE.to_string(),
            },
            AgentOutcome::Failure { reason } => {
                tracing::warn!(%reason, "meal plan generation failed");
                MealPlanResponse::failure(reason)
            }
        }
    }

    pub async fn generate(&self, request: &MealPlanRequest) -> MealPlanResponse {
        self.generate_meal_plan(&request.build_instruction()).await
    }
}

fn render_system_prompt(systems: &[&dyn System]) -> Result<String> {
    let systems_info: Vec<SystemInfo> = systems.iter().map(|system| SystemInfo::of(*system)).collect();
    let tools: Vec<_> = systems.iter().flat_map(|system| system.tools()).collect();
    let context = json!({ "systems": systems_info, "tools": tools });
    Ok(load_prompt_file("meal_planner.md", &context)?)
}
