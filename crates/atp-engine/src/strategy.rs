//! Replacement strategies for string leaves
//!
//! - [`GenericStrategy`]: ordinary fields. A field that is exactly one token
//!   takes the resolved value as-is, so `replicas: <terraform:replicas>`
//!   becomes an integer. Anything else is spliced as text.
//! - [`SecretStrategy`]: base64 payload fields. The payload is decoded,
//!   substituted and encoded again.

use base64::Engine as _;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::error::PlaceholderError;
use crate::resolver::Resolver;
use crate::token::{self, Token};
use crate::value::stringify;

/// Outcome of replacing a single string leaf
#[derive(Debug, Clone, PartialEq)]
pub struct Replacement {
    /// New leaf value, possibly of a different type
    pub value: JsonValue,

    /// One entry per token that could not be replaced
    pub errors: Vec<PlaceholderError>,
}

impl Replacement {
    fn unchanged(text: &str) -> Self {
        Self {
            value: JsonValue::String(text.to_string()),
            errors: Vec::new(),
        }
    }
}

/// Strategy used by the walker for every string leaf
pub trait ReplaceStrategy {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Replace the tokens in `text`, found in the field named `field`
    fn replace(&self, field: &str, text: &str, resolver: &Resolver<'_>) -> Replacement;
}

/// Type-preserving replacement for ordinary fields
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericStrategy;

impl ReplaceStrategy for GenericStrategy {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn replace(&self, field: &str, text: &str, resolver: &Resolver<'_>) -> Replacement {
        let tokens = token::find_tokens(text);

        match tokens.as_slice() {
            [] => Replacement::unchanged(text),
            [single] if single.is_whole(text) => match resolver.resolve(single, field) {
                Ok(value) => Replacement {
                    value,
                    errors: Vec::new(),
                },
                Err(error) => Replacement {
                    value: JsonValue::String(text.to_string()),
                    errors: vec![error],
                },
            },
            _ => {
                let (spliced, errors) = splice(field, text, &tokens, resolver);
                Replacement {
                    value: JsonValue::String(spliced),
                    errors,
                }
            }
        }
    }
}

/// Base64-aware replacement for encoded payload fields
#[derive(Debug, Clone, Copy, Default)]
pub struct SecretStrategy;

impl ReplaceStrategy for SecretStrategy {
    fn name(&self) -> &'static str {
        "secret"
    }

    fn replace(&self, field: &str, text: &str, resolver: &Resolver<'_>) -> Replacement {
        if let Some(decoded) = decode(text).filter(|decoded| token::contains_token(decoded)) {
            let tokens = token::find_tokens(&decoded);
            let (spliced, errors) = splice(field, &decoded, &tokens, resolver);
            let encoded = base64::engine::general_purpose::STANDARD.encode(spliced.as_bytes());
            return Replacement {
                value: JsonValue::String(encoded),
                errors,
            };
        }

        // Payload is not base64 (or carries no token once decoded): treat it as plain text
        let tokens = token::find_tokens(text);
        if tokens.is_empty() {
            return Replacement::unchanged(text);
        }
        debug!(field = %field, "payload is not base64 encoded, substituting raw text");
        let (spliced, errors) = splice(field, text, &tokens, resolver);
        Replacement {
            value: JsonValue::String(spliced),
            errors,
        }
    }
}

fn decode(text: &str) -> Option<String> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(text.as_bytes())
        .ok()?;
    String::from_utf8(bytes).ok()
}

/// Replace every token in `text` with the text form of its value
///
/// Unresolved tokens stay in place verbatim and produce one error each.
fn splice(
    field: &str,
    text: &str,
    tokens: &[Token],
    resolver: &Resolver<'_>,
) -> (String, Vec<PlaceholderError>) {
    let mut out = String::with_capacity(text.len());
    let mut errors = Vec::new();
    let mut last = 0;

    for token in tokens {
        out.push_str(&text[last..token.span.start]);
        match resolver.resolve(token, field) {
            Ok(value) => out.push_str(&stringify(&value)),
            Err(error) => {
                out.push_str(&token.raw);
                errors.push(error);
            }
        }
        last = token.span.end;
    }
    out.push_str(&text[last..]);

    (out, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlaceholderErrorKind;
    use crate::source::{Annotations, JsonMap};
    use serde_json::json;

    fn values() -> JsonMap {
        json!({
            "namespace": "default",
            "name": "app",
            "tag": "latest",
            "replicas": 1,
            "access_key_id": "testkey",
            "secret_access_key_id": "testsecret"
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    fn run(strategy: &dyn ReplaceStrategy, text: &str) -> Replacement {
        let values = values();
        let annotations = Annotations::new();
        let resolver = Resolver::new(&values, None, &annotations);
        strategy.replace("field", text, &resolver)
    }

    fn b64(text: &str) -> String {
        base64::engine::general_purpose::STANDARD.encode(text)
    }

    #[test]
    fn test_generic_single_token_keeps_type() {
        let out = run(&GenericStrategy, "<terraform:replicas>");
        assert_eq!(out.value, json!(1));
        assert!(out.errors.is_empty());
    }

    #[test]
    fn test_generic_mixed_text_yields_string() {
        let out = run(&GenericStrategy, "foo.io/<terraform:name>:<terraform:tag>");
        assert_eq!(out.value, json!("foo.io/app:latest"));

        let out = run(&GenericStrategy, "<terraform:replicas><terraform:replicas>");
        assert_eq!(out.value, json!("11"));

        let out = run(&GenericStrategy, "replicas=<terraform:replicas>");
        assert_eq!(out.value, json!("replicas=1"));
    }

    #[test]
    fn test_generic_token_free_is_identity() {
        for text in ["", "plain", "for example, write <key>", "cGFzc3dvcmQ="] {
            let out = run(&GenericStrategy, text);
            assert_eq!(out.value, json!(text));
            assert!(out.errors.is_empty());
        }
    }

    #[test]
    fn test_generic_unresolved_tokens_stay_verbatim() {
        let out = run(&GenericStrategy, "<terraform:name>-<terraform:nope>-<terraform:gone>");
        assert_eq!(out.value, json!("app-<terraform:nope>-<terraform:gone>"));
        assert_eq!(out.errors.len(), 2);
        assert!(out.errors.iter().all(|e| e.kind == PlaceholderErrorKind::MissingValue));
    }

    #[test]
    fn test_secret_token_free_is_identity() {
        for text in ["cGFzc3dvcmQ=", "not base64 at all", ""] {
            let out = run(&SecretStrategy, text);
            assert_eq!(out.value, json!(text));
            assert!(out.errors.is_empty());
        }
    }

    #[test]
    fn test_secret_encoded_token_is_reencoded() {
        let out = run(&SecretStrategy, &b64("<terraform:namespace | base64encode>"));
        assert_eq!(out.value, json!("WkdWbVlYVnNkQT09"));
        assert!(out.errors.is_empty());
    }

    #[test]
    fn test_secret_multiple_tokens_in_blob() {
        let blob = "[default]\naws_access_key_id=<terraform:access_key_id>\naws_secret_access_key=<terraform:secret_access_key_id>\n";
        let out = run(&SecretStrategy, &b64(blob));

        assert_eq!(
            out.value,
            json!("W2RlZmF1bHRdCmF3c19hY2Nlc3Nfa2V5X2lkPXRlc3RrZXkKYXdzX3NlY3JldF9hY2Nlc3Nfa2V5PXRlc3RzZWNyZXQK")
        );
        let decoded = decode(out.value.as_str().unwrap()).unwrap();
        assert_eq!(
            decoded,
            "[default]\naws_access_key_id=testkey\naws_secret_access_key=testsecret\n"
        );
    }

    #[test]
    fn test_secret_raw_text_is_substituted_without_encoding() {
        let out = run(&SecretStrategy, "foo.io/<terraform:name>:<terraform:tag>");
        assert_eq!(out.value, json!("foo.io/app:latest"));

        let out = run(&SecretStrategy, "<terraform:namespace | base64encode>");
        assert_eq!(out.value, json!("ZGVmYXVsdA=="));
    }

    #[test]
    fn test_secret_never_preserves_type() {
        let out = run(&SecretStrategy, "<terraform:replicas>");
        assert_eq!(out.value, json!("1"));
    }

    #[test]
    fn test_secret_missing_value_keeps_token_in_encoded_blob() {
        let out = run(&SecretStrategy, &b64("user=<terraform:missing>"));
        assert_eq!(out.errors.len(), 1);
        let decoded = decode(out.value.as_str().unwrap()).unwrap();
        assert_eq!(decoded, "user=<terraform:missing>");
    }
}
