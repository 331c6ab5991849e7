//! ATP Backend - where placeholder values come from
//!
//! This crate provides:
//! - **Terraform state**: a [`atp_engine::ValueSource`] reading state outputs
//! - **Object stores**: S3 buckets, local directories and HTTP state storage
//! - **Configuration**: file and environment layering, source construction

pub mod config;
pub mod error;
pub mod store;
pub mod terraform;

pub use config::{AtpConfig, BackendKind, HttpSettings, S3Settings};
pub use error::{BackendError, Result};
pub use store::{FileStore, HttpStore, ObjectStore, S3Store};
pub use terraform::TerraformState;
