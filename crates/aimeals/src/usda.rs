//! Client for the USDA FoodData Central API.
//!
//! Every call resolves to a JSON value: either the projected result or an error
//! marker `{"error": "..."}`. Nothing here returns `Err` to the caller once the
//! client is built, so the agent always has something to put in the transcript.
pub mod client;
pub mod projection;

pub use client::{UsdaClient, UsdaConfig};
pub use projection::{FoodDetail, FoodMatch, Nutrient};
