//! Canonical text form of resolved values

use serde_json::Value as JsonValue;

/// Render a value as the text spliced into surrounding literal text
///
/// Strings are used raw, null becomes the empty string and everything else
/// is rendered as JSON (`123`, `true`, `{"a":1}`).
pub fn stringify(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        JsonValue::Bool(_) | JsonValue::Number(_) | JsonValue::Array(_) | JsonValue::Object(_) => {
            value.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stringify() {
        assert_eq!(stringify(&json!("thing")), "thing");
        assert_eq!(stringify(&json!(123)), "123");
        assert_eq!(stringify(&json!(1.5)), "1.5");
        assert_eq!(stringify(&json!(true)), "true");
        assert_eq!(stringify(&JsonValue::Null), "");
        assert_eq!(stringify(&json!({"a": 1})), r#"{"a":1}"#);
        assert_eq!(stringify(&json!(["x", 2])), r#"["x",2]"#);
    }
}
