//! ATP Kube - Kubernetes manifest handling for placeholder substitution
//!
//! This crate provides:
//! - **Annotations**: `atp.kubernetes.io/*` annotation parsing
//! - **Kinds**: which manifest kinds carry base64 and key/value payloads
//! - **Resources**: one document's tree, values, source handle and errors
//! - **Templates**: the `replace()` / `to_yaml()` entry points
//! - **Manifests**: multi-document YAML streams

pub mod annotations;
pub mod error;
pub mod kind;
pub mod manifest;
pub mod resource;
pub mod template;

pub use error::{KubeError, Result};
pub use kind::ResourceKind;
pub use manifest::{parse_manifests, render_manifests};
pub use resource::Resource;
pub use template::Template;
