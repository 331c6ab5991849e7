//! Object stores holding Terraform state files

mod file;
mod http;
mod s3;

pub use file::FileStore;
pub use http::HttpStore;
pub use s3::S3Store;

use crate::error::Result;

/// Raw object storage keyed by path
pub trait ObjectStore: Send + Sync {
    /// Read the object at `path`, optionally at a specific `version`
    fn get_object(&self, path: &str, version: Option<&str>) -> Result<Vec<u8>>;
}
