//! A single manifest document and its substitution state

use atp_engine::{
    Annotations, GenericStrategy, JsonMap, PathSegment, PlaceholderError, Resolver,
    SecretStrategy, ValueSource, Walker,
};
use serde_json::Value as JsonValue;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::annotations;
use crate::error::{KubeError, Result};
use crate::kind::ResourceKind;

/// One manifest document
///
/// Owns the document tree (mutated in place by [`Resource::replace`]), the
/// values fetched for the document-level path, the shared value source and
/// the placeholder failures of the last [`Resource::replace`].
#[derive(Clone, Default)]
pub struct Resource {
    /// Manifest kind, e.g. `Secret`
    pub kind: String,

    pub annotations: Annotations,

    /// Document tree
    pub template: JsonValue,

    /// Outputs fetched ahead of time for path-less placeholders
    pub local_values: JsonMap,

    pub source: Option<Arc<dyn ValueSource>>,

    errors: Vec<PlaceholderError>,
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("kind", &self.kind)
            .field("annotations", &self.annotations)
            .field("template", &self.template)
            .field("local_values", &self.local_values.keys().collect::<Vec<_>>())
            .field("source", &self.source.is_some())
            .field("errors", &self.errors)
            .finish()
    }
}

impl Resource {
    /// Create a resource around an already-built tree, without any lookups
    pub fn new(kind: impl Into<String>, template: JsonValue) -> Self {
        Self {
            kind: kind.into(),
            template,
            ..Self::default()
        }
    }

    /// Set the annotations
    pub fn with_annotations(mut self, annotations: Annotations) -> Self {
        self.annotations = annotations;
        self
    }

    /// Set the document-level values
    pub fn with_values(mut self, values: JsonMap) -> Self {
        self.local_values = values;
        self
    }

    /// Set the value source
    pub fn with_source(mut self, source: Arc<dyn ValueSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Build a resource from a raw manifest
    ///
    /// Ignored manifests never touch the source. Otherwise, when a path
    /// annotation is present (even empty), the source is queried once for
    /// every value at that path.
    pub fn from_manifest(
        manifest: JsonValue,
        source: Option<Arc<dyn ValueSource>>,
    ) -> Result<Self> {
        if !manifest.is_object() {
            return Err(KubeError::InvalidManifest {
                message: "document is not a mapping".to_string(),
            });
        }

        let kind = manifest
            .get("kind")
            .and_then(JsonValue::as_str)
            .unwrap_or_default()
            .to_string();
        let annotations = annotations::from_manifest(&manifest);

        let mut resource = Self {
            kind,
            annotations,
            template: manifest,
            local_values: JsonMap::new(),
            source,
            errors: Vec::new(),
        };

        if resource.is_ignored() {
            debug!(kind = %resource.kind, "manifest is ignored, skipping value lookup");
            return Ok(resource);
        }

        if let Some(path) = annotations::path(&resource.annotations) {
            let source = resource
                .source
                .as_ref()
                .ok_or_else(|| KubeError::SourceRequired {
                    path: path.to_string(),
                })?;
            debug!(kind = %resource.kind, path = %path, "fetching document values");
            resource.local_values = source
                .get_values(path, None, &resource.annotations)
                .map_err(|source| KubeError::Source {
                    path: path.to_string(),
                    source,
                })?;
        }

        Ok(resource)
    }

    /// Whether the ignore annotation is set
    pub fn is_ignored(&self) -> bool {
        annotations::is_ignored(&self.annotations)
    }

    /// Failures recorded by the last walk
    pub fn errors(&self) -> &[PlaceholderError] {
        &self.errors
    }

    /// Replace every placeholder in the tree
    ///
    /// Ordinary fields use the generic strategy; the kind's base64 payload
    /// field uses the secret strategy. Fails with every recorded failure
    /// once the whole tree has been walked.
    pub fn replace(&mut self) -> Result<()> {
        let kind = ResourceKind::parse(&self.kind);
        let remove_missing = annotations::remove_missing(&self.annotations);
        self.errors.clear();

        if remove_missing && !kind.supports_removal() {
            return Err(KubeError::PolicyViolation {
                annotation: annotations::REMOVE_MISSING,
            });
        }

        let mut errors = Vec::new();
        {
            let resolver = Resolver::new(
                &self.local_values,
                self.source.as_deref(),
                &self.annotations,
            );
            let encoded_field = kind.encoded_payload_field();

            match &mut self.template {
                JsonValue::Object(root) => {
                    let generic = Walker::new(&GenericStrategy, &resolver);
                    for (key, child) in root.iter_mut() {
                        if Some(key.as_str()) != encoded_field {
                            generic.walk_field(
                                child,
                                key,
                                vec![PathSegment::Key(key.clone())],
                                &mut errors,
                            );
                        }
                    }

                    if let Some(field) = encoded_field {
                        if let Some(payload) = root.get_mut(field) {
                            let secret = Walker::new(&SecretStrategy, &resolver);
                            secret.walk_field(
                                payload,
                                field,
                                vec![PathSegment::Key(field.to_string())],
                                &mut errors,
                            );
                        }
                    }
                }
                other => Walker::new(&GenericStrategy, &resolver).walk(other, &mut errors),
            }
        }

        if remove_missing {
            errors = self.remove_unresolved(&kind, errors);
        }

        self.errors = errors;
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(KubeError::Replace {
                errors: self.errors.clone(),
            })
        }
    }

    /// Delete payload keys that recorded a failure, returning the other failures
    fn remove_unresolved(
        &mut self,
        kind: &ResourceKind,
        errors: Vec<PlaceholderError>,
    ) -> Vec<PlaceholderError> {
        let payload_fields = kind.payload_fields();
        let mut doomed = BTreeSet::new();
        let mut kept = Vec::new();

        for error in errors {
            match error.location.as_slice() {
                [PathSegment::Key(field), PathSegment::Key(key), ..]
                    if payload_fields.contains(&field.as_str()) =>
                {
                    doomed.insert((field.clone(), key.clone()));
                }
                _ => kept.push(error),
            }
        }

        for (field, key) in doomed {
            if let Some(JsonValue::Object(payload)) = self.template.get_mut(&field) {
                debug!(field = %field, key = %key, "removing unresolved payload key");
                payload.remove(&key);
            }
        }

        kept
    }
}
