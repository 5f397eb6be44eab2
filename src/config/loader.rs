//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::RouterConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<RouterConfig, ConfigError> {
    let config: RouterConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<RouterConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config = parse_config(&content)?;

    tracing::debug!(path = ?path, routes = config.routes.len(), "Configuration loaded");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROUTES: &str = r#"
        [[routes]]
        name = "root"
        path = "/"

          [[routes.children]]
          name = "user"
          path = "/users/:id"

        [[routes]]
        name = "settings"
        path = "/settings"
        parent = "root"

        [queue]
        capacity = 8

        [observability]
        log_level = "debug"
        log_format = "json"
    "#;

    #[test]
    fn test_parse_config() {
        let config = parse_config(ROUTES).unwrap();
        assert_eq!(config.routes.len(), 2);
        assert_eq!(config.routes[0].children[0].name, "user");
        assert_eq!(config.routes[1].parent.as_deref(), Some("root"));
        assert_eq!(config.queue.capacity, 8);
        assert_eq!(
            config.observability.log_format,
            crate::config::schema::LogFormat::Json
        );
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert!(config.routes.is_empty());
        assert_eq!(config.queue.capacity, 64);
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_validation_errors_are_reported() {
        let err = parse_config(
            r#"
            [[routes]]
            name = "a"
            parent = "missing"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref errors) if errors.len() == 1));
        assert_eq!(
            err.to_string(),
            "Validation failed: route a references unknown parent missing"
        );
    }

    #[test]
    fn test_parse_error() {
        let err = parse_config("[[routes]]\npath = \"/\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join("goodrouter_loader_test.toml");
        fs::write(&path, ROUTES).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.routes[0].name, "root");

        fs::remove_file(&path).unwrap_or_default();

        assert!(matches!(load_config(&path), Err(ConfigError::Io(_))));
    }
}
