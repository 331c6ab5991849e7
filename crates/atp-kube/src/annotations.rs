//! Annotation parsing
//!
//! Annotations are read from `metadata.annotations` of the manifest itself.

use atp_engine::Annotations;
use serde_json::Value as JsonValue;

/// State path whose outputs back path-less placeholders
pub const PATH: &str = "atp.kubernetes.io/path";
/// Skip the document entirely when set to `true`
pub const IGNORE: &str = "atp.kubernetes.io/ignore";
/// Delete payload keys whose placeholders cannot be resolved
pub const REMOVE_MISSING: &str = "atp.kubernetes.io/remove-missing";

/// Extract string annotations from a manifest
///
/// Non-string annotation values are ignored.
pub fn from_manifest(manifest: &JsonValue) -> Annotations {
    manifest
        .pointer("/metadata/annotations")
        .and_then(JsonValue::as_object)
        .map(|map| {
            map.iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                .collect()
        })
        .unwrap_or_default()
}

fn is_true(annotations: &Annotations, key: &str) -> bool {
    annotations
        .get(key)
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}

/// Check the ignore annotation (case-insensitive `true`)
pub fn is_ignored(annotations: &Annotations) -> bool {
    is_true(annotations, IGNORE)
}

/// Check the removal-policy annotation (case-insensitive `true`)
pub fn remove_missing(annotations: &Annotations) -> bool {
    is_true(annotations, REMOVE_MISSING)
}

/// Document-level state path, present even when empty
pub fn path(annotations: &Annotations) -> Option<&str> {
    annotations.get(PATH).map(|s| s.as_str())
}
