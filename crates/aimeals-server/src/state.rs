use aimeals::planner::MealPlanner;
use aimeals::providers::configs::ProviderConfig;
use aimeals::usda::UsdaClient;
use anyhow::Result;
use std::sync::Arc;

/// Shared application state. Holds configuration only; every request builds
/// its own agent from the planner.
#[derive(Clone)]
pub struct AppState {
    pub planner: MealPlanner,
    pub usda: Arc<UsdaClient>,
}

impl AppState {
    pub fn new(planner: MealPlanner) -> Result<Self> {
        let usda = UsdaClient::new(planner.usda_config().clone())?;
        Ok(Self {
            planner,
            usda: Arc::new(usda),
        })
    }

    pub fn provider_config(&self) -> &ProviderConfig {
        self.planner.provider_config()
    }
}
