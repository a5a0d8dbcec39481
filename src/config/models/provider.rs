//! Completion provider configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upstream completion provider settings
///
/// The API key is optional here: a missing key only fails the first request
/// that needs it.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Bearer credential
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// Base URL, e.g. `https://api.openai.com/v1`
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Model used when a request names none
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Temperature used when a request names none
    #[serde(default = "default_temperature")]
    pub default_temperature: f32,
    /// Timeout applied to every individual attempt
    #[serde(default = "default_request_timeout")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: default_api_base(),
            default_model: default_model(),
            default_temperature: default_temperature(),
            timeout_secs: default_request_timeout(),
        }
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("api_base", &self.api_base)
            .field("default_model", &self.default_model)
            .field("default_temperature", &self.default_temperature)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_api_key() {
        let config = ProviderConfig {
            api_key: Some("sk-secret".to_string()),
            ..Default::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn test_api_key_not_serialized() {
        let config = ProviderConfig {
            api_key: Some("sk-secret".to_string()),
            ..Default::default()
        };
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(!yaml.contains("sk-secret"));
    }

    #[test]
    fn test_defaults() {
        let config: ProviderConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.api_base, "https://api.openai.com/v1");
        assert_eq!(config.default_model, "gpt-4");
        assert_eq!(config.timeout_secs, 60);
        assert!(config.api_key.is_none());
    }
}
