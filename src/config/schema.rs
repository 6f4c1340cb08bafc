use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_INSIGHT_TIMEOUT: &str = "20s";
pub const DEFAULT_INSIGHT_LANGUAGE: &str = "English";
pub const DEFAULT_TOKEN_ENV: &str = "WP_RANK_INSIGHT_TOKEN";

/// Top-level configuration.
///
/// Example YAML:
/// ```yaml
/// state_file: /srv/evaluations/state.json
/// insight:
///   endpoint: https://insights.example.com/v1/summarize
///   timeout: 30s
///   language: Indonesian
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Where employees and weights are stored (default: ~/.config/wp-rank/state.json)
    #[serde(default)]
    pub state_file: Option<PathBuf>,

    #[serde(default)]
    pub insight: InsightConfig,
}

/// Settings for the external summary service
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct InsightConfig {
    /// HTTP(S) endpoint accepting the insight request as JSON
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Request timeout, humantime format ("20s", "1m")
    #[serde(default = "default_timeout")]
    pub timeout: String,

    /// Language the summary should be written in
    #[serde(default = "default_language")]
    pub language: String,

    /// Environment variable holding an optional bearer token
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

fn default_timeout() -> String {
    DEFAULT_INSIGHT_TIMEOUT.to_string()
}

fn default_language() -> String {
    DEFAULT_INSIGHT_LANGUAGE.to_string()
}

fn default_token_env() -> String {
    DEFAULT_TOKEN_ENV.to_string()
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout: default_timeout(),
            language: default_language(),
            token_env: default_token_env(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_parse() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.insight.timeout, "20s");
        assert_eq!(config.insight.token_env, "WP_RANK_INSIGHT_TOKEN");
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
state_file: /tmp/wp/state.json
insight:
  endpoint: "https://insights.example.com/v1"
  timeout: 45s
  language: Indonesian
  token_env: MY_TOKEN
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.state_file, Some(PathBuf::from("/tmp/wp/state.json")));
        assert_eq!(
            config.insight.endpoint.as_deref(),
            Some("https://insights.example.com/v1")
        );
        assert_eq!(config.insight.timeout, "45s");
        assert_eq!(config.insight.language, "Indonesian");
        assert_eq!(config.insight.token_env, "MY_TOKEN");
    }

    #[test]
    fn test_partial_insight_section_keeps_defaults() {
        let yaml = r#"
insight:
  endpoint: "http://localhost:8080"
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.insight.language, "English");
        assert_eq!(config.insight.timeout, "20s");
        assert!(config.state_file.is_none());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "criteria: [speed]\n";
        assert!(serde_saphyr::from_str::<Config>(yaml).is_err());
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let mut config = Config::default();
        config.insight.endpoint = Some("https://example.com".to_string());
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: Config = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }
}
