//! Placeholder value resolution

use serde_json::Value as JsonValue;
use tracing::debug;

use crate::error::{MISSING_VALUE_CAUSE, PlaceholderError, PlaceholderErrorKind, SourceError};
use crate::modifiers;
use crate::source::{Annotations, JsonMap, ValueSource};
use crate::token::Token;

/// Resolves tokens against a document's local values or its value source
///
/// Tokens without a path read the document-level values fetched ahead of
/// time. Tokens with an explicit path trigger one live lookup per
/// occurrence; nothing is cached between occurrences.
pub struct Resolver<'a> {
    local_values: &'a JsonMap,
    source: Option<&'a dyn ValueSource>,
    annotations: &'a Annotations,
}

impl<'a> Resolver<'a> {
    pub fn new(
        local_values: &'a JsonMap,
        source: Option<&'a dyn ValueSource>,
        annotations: &'a Annotations,
    ) -> Self {
        Self {
            local_values,
            source,
            annotations,
        }
    }

    /// Resolve a token found in `field`, running its modifier chain
    pub fn resolve(&self, token: &Token, field: &str) -> Result<JsonValue, PlaceholderError> {
        let value = match &token.path {
            None => self.local_values.get(&token.key).cloned().ok_or_else(|| {
                PlaceholderError::new(
                    PlaceholderErrorKind::MissingValue,
                    MISSING_VALUE_CAUSE,
                    token,
                    field,
                )
            })?,
            Some(path) => self.lookup(path, token).map_err(|e| {
                debug!(path = %path, key = %token.key, error = %e, "value source lookup failed");
                PlaceholderError::new(
                    PlaceholderErrorKind::SourceLookupFailure,
                    MISSING_VALUE_CAUSE,
                    token,
                    field,
                )
            })?,
        };

        modifiers::apply_chain(value, &token.modifiers).map_err(|e| {
            PlaceholderError::new(
                PlaceholderErrorKind::ModifierFailure,
                e.to_string(),
                token,
                field,
            )
        })
    }

    fn lookup(&self, path: &str, token: &Token) -> Result<JsonValue, SourceError> {
        let source = self.source.ok_or_else(|| SourceError::NotConfigured {
            path: path.to_string(),
        })?;
        debug!(path = %path, key = %token.key, "looking up placeholder value");
        source.get_value(path, &token.key, token.version.as_deref(), self.annotations)
    }
}
