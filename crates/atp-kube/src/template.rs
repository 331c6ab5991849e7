//! Template entry points

use atp_engine::ValueSource;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::debug;

use crate::error::Result;
use crate::resource::Resource;

/// A manifest ready for placeholder replacement
#[derive(Debug, Clone)]
pub struct Template {
    pub resource: Resource,
}

impl Template {
    /// Build a template from a raw manifest, prefetching document values
    pub fn new(manifest: JsonValue, source: Option<Arc<dyn ValueSource>>) -> Result<Self> {
        Ok(Self {
            resource: Resource::from_manifest(manifest, source)?,
        })
    }

    /// Whether the manifest opted out of substitution
    pub fn is_ignored(&self) -> bool {
        self.resource.is_ignored()
    }

    /// Replace every placeholder in the manifest
    ///
    /// Ignored manifests are left untouched.
    pub fn replace(&mut self) -> Result<()> {
        if self.is_ignored() {
            debug!(kind = %self.resource.kind, "skipping ignored manifest");
            return Ok(());
        }
        self.resource.replace()
    }

    /// Serialize the current tree to YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.resource.template)?)
    }

    pub fn into_value(self) -> JsonValue {
        self.resource.template
    }
}
