//! Configuration structures for deserialisation.
//!
//! These structures map directly to the JSON configuration file format.

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::ConfigError;

/// Root configuration structure.
///
/// This is the top-level structure that matches the JSON config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Optional JSON schema reference (ignored during parsing).
    #[serde(rename = "$schema", default)]
    _schema: Option<String>,

    /// Optional comment field (ignored during parsing).
    #[serde(rename = "_comment", default)]
    _comment: Option<String>,

    /// Project root directory. Defaults to the process working directory.
    #[serde(default)]
    pub project_root: Option<PathBuf>,

    /// Schema resource settings.
    #[serde(default)]
    pub schema: SchemaConfig,

    /// Routes resource settings.
    #[serde(default)]
    pub routes: RoutesConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                    self.logging.level
                ),
            });
        }
        Ok(())
    }
}

/// Schema resource configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaConfig {
    /// Schema file location, relative to the project root.
    #[serde(default = "default_schema_path")]
    pub path: PathBuf,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            path: default_schema_path(),
        }
    }
}

fn default_schema_path() -> PathBuf {
    PathBuf::from("db/schema.sql")
}

/// Routes resource configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoutesConfig {
    /// Route manifest location, relative to the project root.
    ///
    /// The manifest is a JSON array of `{verb, path, action}` objects,
    /// typically emitted by the host application's build step.
    #[serde(default = "default_routes_manifest")]
    pub manifest: PathBuf,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            manifest: default_routes_manifest(),
        }
    }
}

fn default_routes_manifest() -> PathBuf {
    PathBuf::from("config/routes.json")
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let json = r#"{
            "project_root": "/srv/app",
            "schema": { "path": "db/structure.sql" },
            "routes": { "manifest": "tmp/routes.json" },
            "logging": { "level": "debug" }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.project_root, Some(PathBuf::from("/srv/app")));
        assert_eq!(config.schema.path, PathBuf::from("db/structure.sql"));
        assert_eq!(config.routes.manifest, PathBuf::from("tmp/routes.json"));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.project_root, None);
        assert_eq!(config.schema.path, PathBuf::from("db/schema.sql"));
        assert_eq!(config.routes.manifest, PathBuf::from("config/routes.json"));
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn logging_config_defaults() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "warn");
    }

    #[test]
    fn reject_invalid_log_level() {
        let json = r#"{
            "logging": { "level": "loud" }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn reject_unknown_fields() {
        let json = r#"{
            "unknown_field": "value"
        }"#;

        let result: Result<Config, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
