//! ATP Engine - placeholder substitution for Kubernetes manifests
//!
//! This crate replaces `<terraform:...>` placeholders embedded in a manifest
//! tree with values resolved from Terraform outputs:
//! - `token`: placeholder grammar (`<terraform:[path#]key[#version] | modifier args>`)
//! - `modifiers`: the static modifier table (`base64encode`, `jsonPath`, `jsonParse`)
//! - `resolver`: local value table or live lookup against a [`ValueSource`]
//! - `strategy`: generic (type-preserving) and secret (base64-aware) replacement
//! - `walker`: best-effort recursive traversal collecting every failure

pub mod error;
pub mod modifiers;
pub mod resolver;
pub mod source;
pub mod strategy;
pub mod token;
pub mod value;
pub mod walker;

pub use error::{ModifierError, PlaceholderError, PlaceholderErrorKind, SourceError};
pub use resolver::Resolver;
pub use source::{Annotations, JsonMap, MockValueSource, SourceCallCounts, ValueSource};
pub use strategy::{GenericStrategy, ReplaceStrategy, Replacement, SecretStrategy};
pub use token::{Modifier, Token, contains_token, find_tokens};
pub use value::stringify;
pub use walker::{PathSegment, Walker};
