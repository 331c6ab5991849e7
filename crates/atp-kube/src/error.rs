//! Error types for atp-kube

use atp_engine::{PlaceholderError, SourceError};
use thiserror::Error;

/// Result type for atp-kube operations
pub type Result<T> = std::result::Result<T, KubeError>;

/// Errors raised while building or replacing a manifest
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum KubeError {
    /// One or more placeholders could not be replaced
    #[error("Replace: could not replace all placeholders in Template:\n{}", join_messages(.errors))]
    Replace { errors: Vec<PlaceholderError> },

    /// Removal policy requested on a kind without payload maps
    #[error("Replace: could not replace all placeholders in Template:\n{annotation} annotation can only be used on Secret or ConfigMap resources")]
    PolicyViolation { annotation: &'static str },

    /// Bulk prefetch of document values failed
    #[error("failed to fetch values for path '{path}': {source}")]
    Source {
        path: String,
        #[source]
        source: SourceError,
    },

    /// A path annotation is present but no value source was given
    #[error("manifest references path '{path}' but no value source is configured")]
    SourceRequired { path: String },

    /// Manifest is not a mapping
    #[error("invalid manifest: {message}")]
    InvalidManifest { message: String },

    /// YAML (de)serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

fn join_messages(errors: &[PlaceholderError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
