//! Error types for state backends

use atp_engine::SourceError;
use thiserror::Error;

/// Backend operation errors
#[derive(Debug, Error)]
pub enum BackendError {
    // ============ Lookup Errors ============
    #[error("object not found: {path}")]
    ObjectNotFound { path: String },

    #[error("path: {path}, key: {key}, version: {version} not found")]
    KeyNotFound {
        path: String,
        key: String,
        version: String,
    },

    #[error("failed to decode state from json: {message}")]
    StateDecode { message: String },

    #[error("invalid object path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    // ============ Network Errors ============
    #[error("HTTP error: {status} - {message}")]
    Http { status: u16, message: String },

    #[error("Network error: {message}")]
    Network { message: String },

    // ============ Configuration Errors ============
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    // ============ IO Errors ============
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for backend operations
pub type Result<T> = std::result::Result<T, BackendError>;

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            BackendError::Network {
                message: format!("Request timed out: {}", e),
            }
        } else if e.is_connect() {
            BackendError::Network {
                message: format!("Connection failed: {}", e),
            }
        } else if let Some(status) = e.status() {
            BackendError::Http {
                status: status.as_u16(),
                message: e.to_string(),
            }
        } else {
            BackendError::Network {
                message: e.to_string(),
            }
        }
    }
}

impl From<url::ParseError> for BackendError {
    fn from(e: url::ParseError) -> Self {
        BackendError::InvalidConfig {
            message: format!("invalid address: {}", e),
        }
    }
}

impl From<BackendError> for SourceError {
    fn from(e: BackendError) -> Self {
        match e {
            BackendError::ObjectNotFound { path } => SourceError::ObjectNotFound { path },
            BackendError::KeyNotFound { path, key, version } => {
                SourceError::KeyNotFound { path, key, version }
            }
            other => SourceError::Backend {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_errors_keep_their_shape() {
        let err: SourceError = BackendError::KeyNotFound {
            path: "state".to_string(),
            key: "token".to_string(),
            version: String::new(),
        }
        .into();
        assert_eq!(err.to_string(), "path: state, key: token, version:  not found");

        let err: SourceError = BackendError::ObjectNotFound {
            path: "missing".to_string(),
        }
        .into();
        assert!(matches!(err, SourceError::ObjectNotFound { .. }));
    }

    #[test]
    fn test_other_errors_become_messages() {
        let err: SourceError = BackendError::StateDecode {
            message: "expected value at line 1 column 1".to_string(),
        }
        .into();
        assert_eq!(
            err,
            SourceError::Backend {
                message: "failed to decode state from json: expected value at line 1 column 1"
                    .to_string()
            }
        );
    }
}
