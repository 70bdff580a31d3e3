//! Error types for webapp-mcp.
//!
//! Only two failure classes exist outside the tool/resource handlers (which
//! absorb their own failures into response text): configuration problems at
//! startup, and per-request dispatch failures that the message loop logs to
//! stderr without answering.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed.
    #[error("failed to parse configuration file: {path}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {path}")]
    NotFound {
        /// Path where the configuration file was expected.
        path: PathBuf,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation failure.
        message: String,
    },
}

/// Errors raised while dispatching a single request.
///
/// These are the "hard failure" tier: the loop logs them to stderr and emits
/// no response line for the offending request.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// A tool was called without a required argument.
    #[error("missing required argument: {name}")]
    MissingArgument {
        /// Name of the missing argument.
        name: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let error = ConfigError::NotFound {
            path: PathBuf::from("/path/to/config.json"),
        };
        let msg = error.to_string();
        assert!(msg.contains("not found"));
        assert!(msg.contains("config.json"));
    }

    #[test]
    fn validation_error_display() {
        let error = ConfigError::ValidationError {
            message: "invalid setting".to_string(),
        };
        let msg = error.to_string();
        assert!(msg.contains("invalid setting"));
    }

    #[test]
    fn missing_argument_display() {
        let error = DispatchError::MissingArgument { name: "path" };
        assert_eq!(error.to_string(), "missing required argument: path");
    }
}
