//! Modifier pipeline
//!
//! Modifiers are applied left to right to a resolved value:
//!
//! | Modifier             | Effect                                              |
//! |----------------------|-----------------------------------------------------|
//! | `base64encode`       | base64 of the value's text form                     |
//! | `jsonPath {.a.b[0]}` | query a mapping/sequence, yields the result as text |
//! | `jsonParse`          | parse a JSON string into structured data            |
//!
//! `jsonPath` understands the key/index subset of JSONPath: `$`, `.key`,
//! `[n]` and `['key']`, optionally wrapped in `{}`. Wildcards, recursive
//! descent, filters and slices are rejected as unsupported.

use base64::Engine as _;
use phf::phf_map;
use serde_json::Value as JsonValue;

use crate::error::ModifierError;
use crate::token::Modifier;
use crate::value::stringify;

/// Signature shared by every modifier
pub type ModifierFn = fn(&JsonValue, Option<&str>) -> Result<JsonValue, ModifierError>;

static MODIFIERS: phf::Map<&'static str, ModifierFn> = phf_map! {
    "base64encode" => base64_encode as ModifierFn,
    "jsonPath" => json_path as ModifierFn,
    "jsonParse" => json_parse as ModifierFn,
};

/// Look up a modifier by name
pub fn lookup(name: &str) -> Option<ModifierFn> {
    MODIFIERS.get(name).copied()
}

/// Apply a modifier chain in order, each consuming the previous result
pub fn apply_chain(value: JsonValue, modifiers: &[Modifier]) -> Result<JsonValue, ModifierError> {
    modifiers.iter().try_fold(value, |current, modifier| {
        let apply =
            lookup(&modifier.name).ok_or_else(|| ModifierError::Unknown(modifier.name.clone()))?;
        apply(&current, modifier.argument.as_deref())
    })
}

fn base64_encode(value: &JsonValue, _argument: Option<&str>) -> Result<JsonValue, ModifierError> {
    let encoded = base64::engine::general_purpose::STANDARD.encode(stringify(value).as_bytes());
    Ok(JsonValue::String(encoded))
}

fn json_parse(value: &JsonValue, _argument: Option<&str>) -> Result<JsonValue, ModifierError> {
    match value {
        JsonValue::String(text) => {
            serde_json::from_str(text).map_err(|e| ModifierError::Parse(e.to_string()))
        }
        other => Ok(other.clone()),
    }
}

fn json_path(value: &JsonValue, argument: Option<&str>) -> Result<JsonValue, ModifierError> {
    let expression = argument.ok_or(ModifierError::MissingArgument {
        modifier: "jsonPath",
    })?;
    let segments = parse_path(expression)?;

    let mut current = value;
    for segment in &segments {
        let next = match (segment, current) {
            (PathPart::Key(key), JsonValue::Object(map)) => map.get(key),
            (PathPart::Key(key), JsonValue::Array(items)) => {
                key.parse::<usize>().ok().and_then(|i| items.get(i))
            }
            (PathPart::Index(index), JsonValue::Array(items)) => items.get(*index),
            _ => None,
        };
        current = next.ok_or_else(|| ModifierError::PathNotFound {
            segment: segment.to_string(),
        })?;
    }

    Ok(JsonValue::String(stringify(current)))
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PathPart {
    Key(String),
    Index(usize),
}

impl std::fmt::Display for PathPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathPart::Key(key) => write!(f, "{}", key),
            PathPart::Index(index) => write!(f, "[{}]", index),
        }
    }
}

/// Parse `{.a.b[0]}`, `.a.b`, `$.a['b']` into path parts
fn parse_path(expression: &str) -> Result<Vec<PathPart>, ModifierError> {
    let invalid = |reason: &str| ModifierError::InvalidPath {
        expression: expression.to_string(),
        reason: reason.to_string(),
    };
    let unsupported = || ModifierError::UnsupportedPath {
        expression: expression.to_string(),
    };

    let mut body = expression.trim();
    if let Some(inner) = body.strip_prefix('{') {
        body = inner
            .strip_suffix('}')
            .ok_or_else(|| invalid("unbalanced braces"))?
            .trim();
    }
    let body = body.strip_prefix('$').unwrap_or(body);

    let mut parts = Vec::new();
    let mut chars = body.chars().peekable();
    let mut key = String::new();

    while let Some(c) = chars.next() {
        match c {
            '.' if chars.peek() == Some(&'.') => return Err(unsupported()),
            '*' => return Err(unsupported()),
            '.' => {
                if !key.is_empty() {
                    parts.push(PathPart::Key(std::mem::take(&mut key)));
                }
            }
            '[' => {
                if !key.is_empty() {
                    parts.push(PathPart::Key(std::mem::take(&mut key)));
                }
                let mut inner = String::new();
                loop {
                    match chars.next() {
                        Some(']') => break,
                        Some(c) => inner.push(c),
                        None => return Err(invalid("unterminated '['")),
                    }
                }
                let inner = inner.trim();
                let quoted = inner
                    .strip_prefix('\'')
                    .and_then(|s| s.strip_suffix('\''))
                    .or_else(|| inner.strip_prefix('"').and_then(|s| s.strip_suffix('"')));
                match quoted {
                    Some(name) => parts.push(PathPart::Key(name.to_string())),
                    None if inner.contains(['*', '?', '@', ':', '(']) => return Err(unsupported()),
                    None => {
                        let index = inner
                            .parse::<usize>()
                            .map_err(|_| invalid("index must be a non-negative integer"))?;
                        parts.push(PathPart::Index(index));
                    }
                }
            }
            c => key.push(c),
        }
    }
    if !key.is_empty() {
        parts.push(PathPart::Key(key));
    }

    Ok(parts)
}
