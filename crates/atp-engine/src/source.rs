//! Value source capability
//!
//! The engine never talks to a state backend directly. Everything goes
//! through [`ValueSource`], which a Terraform state reader implements in
//! production and [`MockValueSource`] implements in tests.

use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::error::SourceError;

/// Manifest annotations, keyed by annotation name
pub type Annotations = BTreeMap<String, String>;

/// Resolved outputs, keyed by output name
pub type JsonMap = serde_json::Map<String, JsonValue>;

/// Source of placeholder values
///
/// Implementations must be Send + Sync so independent documents can be
/// processed from several threads against one shared source.
pub trait ValueSource: Send + Sync {
    /// Fetch every value stored at `path`
    fn get_values(
        &self,
        path: &str,
        version: Option<&str>,
        annotations: &Annotations,
    ) -> Result<JsonMap, SourceError>;

    /// Fetch a single value stored at `path` under `key`
    fn get_value(
        &self,
        path: &str,
        key: &str,
        version: Option<&str>,
        annotations: &Annotations,
    ) -> Result<JsonValue, SourceError>;
}

/// Counts of calls made against a [`MockValueSource`]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SourceCallCounts {
    pub bulk_fetches: usize,
    pub single_fetches: usize,
}

/// In-memory value source for testing
///
/// Every path resolves to the same loaded data set.
#[derive(Clone, Default)]
pub struct MockValueSource {
    data: Arc<RwLock<JsonMap>>,
    calls: Arc<RwLock<SourceCallCounts>>,
    requested_paths: Arc<RwLock<Vec<String>>>,
    failure: Option<String>,
}

impl MockValueSource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source returning `data` for every path
    pub fn with_data(data: JsonMap) -> Self {
        let source = Self::new();
        source.load_data(data);
        source
    }

    /// Create a source whose every call fails with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Replace the stored data set
    pub fn load_data(&self, data: JsonMap) {
        *self.data.write().unwrap() = data;
    }

    /// Get call counts for assertions
    pub fn call_counts(&self) -> SourceCallCounts {
        self.calls.read().unwrap().clone()
    }

    /// Paths requested so far, in call order
    pub fn requested_paths(&self) -> Vec<String> {
        self.requested_paths.read().unwrap().clone()
    }

    fn check_failure(&self, path: &str) -> Result<(), SourceError> {
        self.requested_paths.write().unwrap().push(path.to_string());
        match &self.failure {
            Some(message) => Err(SourceError::Backend {
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl ValueSource for MockValueSource {
    fn get_values(
        &self,
        path: &str,
        _version: Option<&str>,
        _annotations: &Annotations,
    ) -> Result<JsonMap, SourceError> {
        self.calls.write().unwrap().bulk_fetches += 1;
        self.check_failure(path)?;
        Ok(self.data.read().unwrap().clone())
    }

    fn get_value(
        &self,
        path: &str,
        key: &str,
        version: Option<&str>,
        _annotations: &Annotations,
    ) -> Result<JsonValue, SourceError> {
        self.calls.write().unwrap().single_fetches += 1;
        self.check_failure(path)?;
        self.data
            .read()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| SourceError::KeyNotFound {
                path: path.to_string(),
                key: key.to_string(),
                version: version.unwrap_or_default().to_string(),
            })
    }
}
