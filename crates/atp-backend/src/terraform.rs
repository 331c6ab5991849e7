//! Terraform state as a value source

use atp_engine::{Annotations, JsonMap, SourceError, ValueSource};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::error::{BackendError, Result};
use crate::store::ObjectStore;

#[derive(Debug, Deserialize)]
struct StateFile {
    #[serde(default)]
    outputs: JsonMap,
}

/// Values are the `outputs` of a Terraform state object
///
/// Every lookup reads and decodes the state object again; nothing is cached.
#[derive(Debug, Clone)]
pub struct TerraformState<S> {
    store: S,
}

impl<S: ObjectStore> TerraformState<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Read the state object at `path` and return `output name -> value`
    pub fn outputs(&self, path: &str, version: Option<&str>) -> Result<JsonMap> {
        debug!(path = %path, version = ?version, "reading terraform state");
        let data = self.store.get_object(path, version)?;
        let state: StateFile =
            serde_json::from_slice(&data).map_err(|e| BackendError::StateDecode {
                message: e.to_string(),
            })?;

        Ok(state
            .outputs
            .into_iter()
            .map(|(name, output)| {
                let value = match output {
                    JsonValue::Object(mut fields) => {
                        fields.remove("value").unwrap_or(JsonValue::Null)
                    }
                    _ => JsonValue::Null,
                };
                (name, value)
            })
            .collect())
    }

    /// Read a single output
    pub fn output(&self, path: &str, key: &str, version: Option<&str>) -> Result<JsonValue> {
        let mut outputs = self.outputs(path, version)?;
        outputs.remove(key).ok_or_else(|| {
            debug!(path = %path, available = ?outputs.keys().collect::<Vec<_>>(), "output not in state");
            BackendError::KeyNotFound {
                path: path.to_string(),
                key: key.to_string(),
                version: version.unwrap_or_default().to_string(),
            }
        })
    }
}

impl<S: ObjectStore> ValueSource for TerraformState<S> {
    fn get_values(
        &self,
        path: &str,
        version: Option<&str>,
        _annotations: &Annotations,
    ) -> std::result::Result<JsonMap, SourceError> {
        Ok(self.outputs(path, version)?)
    }

    fn get_value(
        &self,
        path: &str,
        key: &str,
        version: Option<&str>,
        _annotations: &Annotations,
    ) -> std::result::Result<JsonValue, SourceError> {
        Ok(self.output(path, key, version)?)
    }
}
