//! CLI error types with exit code handling

use atp_backend::BackendError;
use atp_kube::KubeError;
use miette::Diagnostic;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// Backend configuration is missing or invalid
    #[error("Configuration error: {message}")]
    #[diagnostic(code(atp::cli::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Some placeholders could not be replaced
    #[error("{message}")]
    #[diagnostic(code(atp::cli::replace))]
    Replace {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Input could not be parsed as manifests
    #[error("Manifest error: {message}")]
    #[diagnostic(code(atp::cli::manifest))]
    Manifest { message: String },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(atp::cli::io))]
    Io { message: String },

    /// Anything else
    #[error("{message}")]
    #[diagnostic(code(atp::cli::error))]
    Other { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config { .. } => exit_codes::CONFIG_ERROR,
            CliError::Replace { .. } => exit_codes::REPLACE_ERROR,
            CliError::Manifest { .. } => exit_codes::MANIFEST_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Other { .. } => exit_codes::ERROR,
        }
    }

    /// Create a configuration error with help text
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: Some(
                "set ATP_BACKEND and its settings, or pass --config-path".to_string(),
            ),
        }
    }

    /// Create a manifest error
    pub fn manifest(message: impl Into<String>) -> Self {
        Self::Manifest {
            message: message.into(),
        }
    }

    /// Create an IO error with context
    pub fn io(context: impl std::fmt::Display, err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{}: {}", context, err),
        }
    }
}

impl From<BackendError> for CliError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::InvalidConfig { .. } | BackendError::Yaml(_) => {
                CliError::config(err.to_string())
            }
            BackendError::Io(e) => CliError::Io {
                message: e.to_string(),
            },
            other => CliError::Other {
                message: other.to_string(),
            },
        }
    }
}

impl From<KubeError> for CliError {
    fn from(err: KubeError) -> Self {
        match err {
            KubeError::Replace { .. } | KubeError::PolicyViolation { .. } => CliError::Replace {
                message: err.to_string(),
                help: Some(
                    "check the outputs of the referenced Terraform state, or annotate the manifest with atp.kubernetes.io/ignore: \"true\"".to_string(),
                ),
            },
            KubeError::SourceRequired { .. } => CliError::config(err.to_string()),
            KubeError::InvalidManifest { .. } | KubeError::Yaml(_) => {
                CliError::manifest(err.to_string())
            }
            other => CliError::Other {
                message: other.to_string(),
            },
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
