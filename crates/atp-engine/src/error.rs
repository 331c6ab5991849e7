//! Engine error types

use thiserror::Error;

use crate::token::Token;
use crate::walker::PathSegment;

/// Cause prefix used when a placeholder value cannot be found
pub const MISSING_VALUE_CAUSE: &str = "replaceString: missing output value";

/// Category of a failed placeholder occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum PlaceholderErrorKind {
    /// Key absent from the local value table
    MissingValue,
    /// Explicit-path lookup against the value source failed
    SourceLookupFailure,
    /// Unknown modifier, or a modifier failed on the resolved value
    ModifierFailure,
}

/// A single placeholder occurrence that could not be replaced
///
/// These are recorded during a walk, never raised. The display form is the
/// line that ends up in the aggregate replacement error.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{cause} for placeholder {placeholder} in string {field}: {token}")]
pub struct PlaceholderError {
    pub kind: PlaceholderErrorKind,

    /// Human readable cause, e.g. `invalid modifier: foo`
    pub cause: String,

    /// `key` or `path#key` as written in the token
    pub placeholder: String,

    /// Name of the field containing the token
    pub field: String,

    /// Original token text
    pub token: String,

    /// Location of the leaf in the manifest tree, filled in by the walker
    pub location: Vec<PathSegment>,
}

impl PlaceholderError {
    /// Create an error for a token occurring in `field`
    pub fn new(
        kind: PlaceholderErrorKind,
        cause: impl Into<String>,
        token: &Token,
        field: &str,
    ) -> Self {
        Self {
            kind,
            cause: cause.into(),
            placeholder: token.placeholder(),
            field: field.to_string(),
            token: token.raw.clone(),
            location: Vec::new(),
        }
    }

    /// Attach the tree location of the leaf
    pub fn at(mut self, location: Vec<PathSegment>) -> Self {
        self.location = location;
        self
    }
}

/// Failure of a single modifier in the pipeline
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModifierError {
    #[error("invalid modifier: {0}")]
    Unknown(String),

    #[error("{modifier}: missing argument")]
    MissingArgument { modifier: &'static str },

    #[error("jsonPath: {segment} is not found")]
    PathNotFound { segment: String },

    #[error("jsonPath: invalid expression {expression}: {reason}")]
    InvalidPath { expression: String, reason: String },

    #[error("jsonPath: unsupported expression {expression}: only keys and indices are supported")]
    UnsupportedPath { expression: String },

    #[error("jsonParse: {0}")]
    Parse(String),
}

/// Errors returned by a [`crate::ValueSource`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("path: {path}, key: {key}, version: {version} not found")]
    KeyNotFound {
        path: String,
        key: String,
        version: String,
    },

    #[error("object not found: {path}")]
    ObjectNotFound { path: String },

    #[error("no value source configured for path {path}")]
    NotConfigured { path: String },

    #[error("{message}")]
    Backend { message: String },
}
