mod schema;

pub use schema::{Config, InsightConfig};

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Get the config directory path (~/.config/wp-rank/)
pub fn get_config_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".config").join("wp-rank"))
        .unwrap_or_else(|| PathBuf::from(".wp-rank"))
}

/// Get the default config file path (~/.config/wp-rank/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses default path (~/.config/wp-rank/config.yaml)
///
/// A missing default file yields the default configuration. An explicitly
/// requested file that does not exist is an error.
///
/// # Errors
///
/// Returns an error if:
/// - An explicit config path does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let explicit = path.is_some();
    let config_path = path.unwrap_or_else(get_config_path);

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    Ok(config)
}

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref endpoint) = config.insight.endpoint {
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            errors.push(format!(
                "insight.endpoint: must start with http:// or https://, got '{}'",
                endpoint
            ));
        }
    }

    if let Err(e) = humantime::parse_duration(config.insight.timeout.trim()) {
        errors.push(format!(
            "insight.timeout: invalid duration '{}' - {}",
            config.insight.timeout, e
        ));
    }

    if config.insight.language.trim().is_empty() {
        errors.push("insight.language: must not be empty".to_string());
    }

    if config.insight.token_env.trim().is_empty() {
        errors.push("insight.token_env: must not be empty".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

impl Config {
    /// State file from config, falling back to ~/.config/wp-rank/state.json
    pub fn state_path(&self) -> PathBuf {
        self.state_file
            .clone()
            .unwrap_or_else(crate::store::get_state_path)
    }
}

impl InsightConfig {
    /// Parsed request timeout; only meaningful after `validate_config`
    pub fn timeout_duration(&self) -> Result<Duration> {
        humantime::parse_duration(self.timeout.trim())
            .with_context(|| format!("Invalid insight timeout '{}'", self.timeout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_explicit_config_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(dir.path().join("nope.yaml"))).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "insight:\n  language: Indonesian\n").unwrap();

        let config = load_config(Some(path)).unwrap();
        assert_eq!(config.insight.language, "Indonesian");
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "insight: [unclosed\n").unwrap();
        assert!(load_config(Some(path)).is_err());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = Config::default();
        config.insight.endpoint = Some("ftp://example.com".to_string());
        config.insight.timeout = "soon".to_string();
        config.insight.language = " ".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].contains("insight.endpoint"));
        assert!(errors[1].contains("insight.timeout"));
        assert!(errors[2].contains("insight.language"));
    }

    #[test]
    fn test_timeout_duration() {
        let mut config = InsightConfig::default();
        assert_eq!(config.timeout_duration().unwrap(), Duration::from_secs(20));
        config.timeout = "1m".to_string();
        assert_eq!(config.timeout_duration().unwrap(), Duration::from_secs(60));
    }

    #[test]
    fn test_state_path_override() {
        let config = Config {
            state_file: Some(PathBuf::from("/data/state.json")),
            ..Config::default()
        };
        assert_eq!(config.state_path(), PathBuf::from("/data/state.json"));
    }
}
