pub const OPENAI_HOST: &str = "https://api.openai.com";
pub const OPENAI_MODEL: &str = "gpt-4o";

// Unified enum to wrap different provider configurations
#[derive(Debug, Clone)]
pub enum ProviderConfig {
    OpenAi(OpenAiProviderConfig),
}

impl ProviderConfig {
    /// Copy of this configuration with different sampling parameters, used by the
    /// single-shot generators which run cooler and shorter than the agent.
    pub fn with_sampling(&self, temperature: Option<f32>, max_tokens: Option<i32>) -> Self {
        match self {
            ProviderConfig::OpenAi(config) => ProviderConfig::OpenAi(OpenAiProviderConfig {
                temperature,
                max_tokens,
                ..config.clone()
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OpenAiProviderConfig {
    pub host: String,
    pub api_key: String,
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<i32>,
    pub timeout_secs: u64,
}

impl OpenAiProviderConfig {
    pub fn new<S: Into<String>>(api_key: S) -> Self {
        Self {
            host: OPENAI_HOST.to_string(),
            api_key: api_key.into(),
            model: OPENAI_MODEL.to_string(),
            temperature: Some(0.0),
            max_tokens: None,
            timeout_secs: 600,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_sampling_keeps_connection_settings() {
        let base = ProviderConfig::OpenAi(OpenAiProviderConfig {
            host: "http://localhost:9999".to_string(),
            ..OpenAiProviderConfig::new("sk-test")
        });

        let ProviderConfig::OpenAi(config) = base.with_sampling(Some(0.3), Some(1000));
        assert_eq!(config.host, "http://localhost:9999");
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.model, OPENAI_MODEL);
        assert_eq!(config.temperature, Some(0.3));
        assert_eq!(config.max_tokens, Some(1000));
    }
}
