pub mod agent;
pub mod errors;
pub mod formatter;
pub mod models;
pub mod planner;
pub mod prompt_template;
pub mod providers;
pub mod recipe;
pub mod shopping;
pub mod systems;
pub mod transcript;
pub mod usda;
