//! Multi-document YAML streams

use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::error::Result;

/// Parse a YAML stream into one tree per document
///
/// Empty documents (e.g. a trailing `---`) are skipped.
pub fn parse_manifests(input: &str) -> Result<Vec<JsonValue>> {
    let mut documents = Vec::new();
    for document in serde_yaml::Deserializer::from_str(input) {
        let value = JsonValue::deserialize(document)?;
        if !value.is_null() {
            documents.push(value);
        }
    }
    Ok(documents)
}

/// Render trees back into a single YAML stream
pub fn render_manifests(documents: &[JsonValue]) -> Result<String> {
    let rendered = documents
        .iter()
        .map(serde_yaml::to_string)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rendered.join("---\n"))
}
