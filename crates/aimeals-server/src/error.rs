use thiserror::Error;

pub const ENV_PREFIX: &str = "AIMEALS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {env_var}")]
    MissingEnvVar { env_var: String },
    #[error("Invalid configuration: {0}")]
    Invalid(String),
    #[error("Configuration error: {0}")]
    Other(#[from] config::ConfigError),
}

/// Map a dotted settings path to the environment variable that sets it,
/// e.g. `provider.api_key` -> `AIMEALS_PROVIDER__API_KEY`
pub fn to_env_var(field_path: &str) -> String {
    let path = field_path
        .split('.')
        .map(str::to_uppercase)
        .collect::<Vec<_>>()
        .join("__");
    format!("{}_{}", ENV_PREFIX, path)
}
