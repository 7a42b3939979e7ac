use crate::error::{to_env_var, ConfigError, ENV_PREFIX};
use aimeals::agent::DEFAULT_MAX_ITERATIONS;
use aimeals::providers::{
    configs::{OpenAiProviderConfig, ProviderConfig, OPENAI_HOST, OPENAI_MODEL},
    factory::ProviderType,
};
use aimeals::usda::{client::USDA_HOST, UsdaConfig};
use config::{Config, Environment};
use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("server address: {}", e)))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase", tag = "type")]
pub enum ProviderSettings {
    OpenAi {
        #[serde(default = "default_openai_host")]
        host: String,
        #[serde(default)]
        api_key: String,
        #[serde(default = "default_model")]
        model: String,
        #[serde(default = "default_temperature")]
        temperature: Option<f32>,
        #[serde(default)]
        max_tokens: Option<i32>,
        #[serde(default = "default_provider_timeout")]
        timeout_secs: u64,
    },
}

impl ProviderSettings {
    pub fn provider_type(&self) -> ProviderType {
        match self {
            ProviderSettings::OpenAi { .. } => ProviderType::OpenAi,
        }
    }

    fn api_key(&self) -> &str {
        match self {
            ProviderSettings::OpenAi { api_key, .. } => api_key,
        }
    }

    pub fn into_config(self) -> ProviderConfig {
        match self {
            ProviderSettings::OpenAi {
                host,
                api_key,
                model,
                temperature,
                max_tokens,
                timeout_secs,
            } => ProviderConfig::OpenAi(OpenAiProviderConfig {
                host,
                api_key,
                model,
                temperature,
                max_tokens,
                timeout_secs,
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UsdaSettings {
    #[serde(default = "default_usda_host")]
    pub host: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_usda_timeout")]
    pub timeout_secs: u64,
}

impl Default for UsdaSettings {
    fn default() -> Self {
        Self {
            host: default_usda_host(),
            api_key: String::new(),
            timeout_secs: default_usda_timeout(),
        }
    }
}

impl UsdaSettings {
    pub fn into_config(self) -> UsdaConfig {
        UsdaConfig {
            host: self.host,
            api_key: self.api_key,
            timeout_secs: self.timeout_secs,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AgentSettings {
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    pub provider: ProviderSettings,
    #[serde(default)]
    pub usda: UsdaSettings,
    #[serde(default)]
    pub agent: AgentSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Self::load()?;
        settings.validate()?;
        Ok(settings)
    }

    fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port())?
            .set_default("provider.type", ProviderType::OpenAi.to_string())?
            .set_default("provider.host", default_openai_host())?
            .set_default("provider.model", default_model())?
            .set_default("usda.host", default_usda_host())?
            .set_default("agent.max_iterations", default_max_iterations() as i64)?
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize().map_err(|err| {
            tracing::debug!("Configuration error: {:?}", &err);
            match &err {
                config::ConfigError::NotFound(field) => ConfigError::MissingEnvVar {
                    env_var: to_env_var(field),
                },
                _ => match missing_field_path(&err.to_string()) {
                    Some(path) => ConfigError::MissingEnvVar {
                        env_var: to_env_var(&path),
                    },
                    None => ConfigError::Other(err),
                },
            }
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.provider.api_key().trim().is_empty() {
            return Err(ConfigError::MissingEnvVar {
                env_var: to_env_var("provider.api_key"),
            });
        }
        if self.usda.api_key.trim().is_empty() {
            return Err(ConfigError::MissingEnvVar {
                env_var: to_env_var("usda.api_key"),
            });
        }
        if self.agent.max_iterations == 0 {
            return Err(ConfigError::Invalid(
                "agent.max_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Dotted path of the field named in a "missing field `x` for key `y`" message
fn missing_field_path(message: &str) -> Option<String> {
    let rest = message.strip_prefix("missing field `")?;
    let (field, rest) = rest.split_once('`')?;
    let key = rest
        .strip_prefix(" for key `")
        .and_then(|rest| rest.split_once('`'))
        .map(|(key, _)| key);
    Some(match key {
        Some(key) => format!("{}.{}", key, field),
        None => field.to_string(),
    })
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_model() -> String {
    OPENAI_MODEL.to_string()
}

fn default_openai_host() -> String {
    OPENAI_HOST.to_string()
}

fn default_temperature() -> Option<f32> {
    Some(0.0)
}

fn default_provider_timeout() -> u64 {
    600
}

fn default_usda_host() -> String {
    USDA_HOST.to_string()
}

fn default_usda_timeout() -> u64 {
    30
}

fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}
