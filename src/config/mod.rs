use config::{Config, ConfigError, Environment};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_comments_table")]
    pub comments_table: String,
    #[serde(default = "default_sessions_table")]
    pub sessions_table: String,
    /// Points the client at DynamoDB Local or another compatible endpoint.
    #[serde(default)]
    pub dynamodb_endpoint: Option<String>,
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// Comma separated; the first entry is echoed when the caller's origin is not allowed.
    #[serde(default = "default_cors_allowed_origins")]
    pub cors_allowed_origins: String,
    #[serde(default)]
    pub telemetry_enabled: bool,
    #[serde(default = "default_telemetry_service_name")]
    pub telemetry_service_name: String,
    #[serde(default = "default_telemetry_service_version")]
    pub telemetry_service_version: String,
    #[serde(default = "default_telemetry_environment")]
    pub telemetry_environment: String,
    #[serde(default = "default_telemetry_otlp_endpoint")]
    pub telemetry_otlp_endpoint: String,
}

fn default_comments_table() -> String {
    "ArthritEase_Comments".to_string()
}

fn default_sessions_table() -> String {
    "ArthritEase_Sessions".to_string()
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_cors_allowed_origins() -> String {
    "https://arthritisease.org".to_string()
}

fn default_telemetry_service_name() -> String {
    "topic-comments".to_string()
}

fn default_telemetry_service_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_telemetry_environment() -> String {
    "production".to_string()
}

fn default_telemetry_otlp_endpoint() -> String {
    "http://localhost:4317".to_string()
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(Environment::default())
    }

    fn from_source(source: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()
    }

    pub fn allowed_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> AppConfig {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_source(Environment::default().source(Some(source))).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]);

        assert_eq!(config.comments_table, "ArthritEase_Comments");
        assert_eq!(config.sessions_table, "ArthritEase_Sessions");
        assert_eq!(config.listen_addr, "0.0.0.0:8080");
        assert!(config.dynamodb_endpoint.is_none());
        assert!(!config.telemetry_enabled);
        assert_eq!(config.allowed_origins(), vec!["https://arthritisease.org"]);
    }

    #[test]
    fn test_overrides_from_environment() {
        let config = load(&[
            ("COMMENTS_TABLE", "comments-dev"),
            ("DYNAMODB_ENDPOINT", "http://localhost:8000"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example, https://b.example,"),
            ("TELEMETRY_ENABLED", "true"),
        ]);

        assert_eq!(config.comments_table, "comments-dev");
        assert_eq!(config.dynamodb_endpoint.as_deref(), Some("http://localhost:8000"));
        assert_eq!(
            config.allowed_origins(),
            vec!["https://a.example", "https://b.example"]
        );
        assert!(config.telemetry_enabled);
    }
}
