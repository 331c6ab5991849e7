//! Standard exit codes for CLI operations
//!
//! These exit codes follow Unix conventions and sysexits.h where applicable.

/// General error - unspecified failure
pub const ERROR: i32 = 1;

/// Configuration error - backend settings missing or invalid
pub const CONFIG_ERROR: i32 = 2;

/// Replacement error - placeholders could not be replaced
pub const REPLACE_ERROR: i32 = 3;

/// Manifest error - input is not valid YAML or not a manifest
pub const MANIFEST_ERROR: i32 = 4;

/// IO error - file not found, permission denied, etc.
pub const IO_ERROR: i32 = 5;
