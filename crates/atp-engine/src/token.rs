//! Placeholder token grammar
//!
//! A token looks like `<terraform:[path#]key[#version][ | modifier[ args]]*>`.
//! Anything else between angle brackets is literal text.

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"<terraform:([^\s<>|#]+)(?:#([^\s<>|#]+))?(?:#([^\s<>|#]+))?((?:\s*\|[^<>|]*)*)\s*>",
    )
    .expect("valid token pattern")
});

/// A modifier invocation inside a token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modifier {
    pub name: String,
    pub argument: Option<String>,
}

impl Modifier {
    fn parse(segment: &str) -> Self {
        let segment = segment.trim();
        match segment.split_once(char::is_whitespace) {
            Some((name, rest)) => {
                let rest = rest.trim();
                Self {
                    name: name.to_string(),
                    argument: (!rest.is_empty()).then(|| rest.to_string()),
                }
            }
            None => Self {
                name: segment.to_string(),
                argument: None,
            },
        }
    }
}

/// A parsed placeholder token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Exact token text, including the angle brackets
    pub raw: String,

    /// State path; absent means the document-level values are used
    pub path: Option<String>,

    pub key: String,

    pub version: Option<String>,

    pub modifiers: Vec<Modifier>,

    /// Byte range of the token in the scanned text
    pub span: Range<usize>,
}

impl Token {
    /// `path#key` when a path is given, otherwise just `key`
    pub fn placeholder(&self) -> String {
        match &self.path {
            Some(path) => format!("{}#{}", path, self.key),
            None => self.key.clone(),
        }
    }

    /// Whether this token spans the whole of `text`
    pub fn is_whole(&self, text: &str) -> bool {
        self.span.start == 0 && self.span.end == text.len()
    }

    fn from_captures(caps: &regex::Captures<'_>) -> Option<Self> {
        let whole = caps.get(0)?;
        let first = caps.get(1)?.as_str().to_string();
        let second = caps.get(2).map(|m| m.as_str().to_string());
        let third = caps.get(3).map(|m| m.as_str().to_string());

        let (path, key, version) = match (second, third) {
            (Some(key), version) => (Some(first), key, version),
            (None, _) => (None, first, None),
        };

        let modifiers = caps
            .get(4)
            .map(|m| {
                m.as_str()
                    .split('|')
                    .skip(1)
                    .map(Modifier::parse)
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            raw: whole.as_str().to_string(),
            path,
            key,
            version,
            modifiers,
            span: whole.range(),
        })
    }
}

/// Find every token in `text`, in order of appearance
pub fn find_tokens(text: &str) -> Vec<Token> {
    TOKEN_PATTERN
        .captures_iter(text)
        .filter_map(|caps| Token::from_captures(&caps))
        .collect()
}

/// Check whether `text` contains at least one token
pub fn contains_token(text: &str) -> bool {
    TOKEN_PATTERN.is_match(text)
}
