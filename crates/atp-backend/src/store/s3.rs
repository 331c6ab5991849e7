//! S3 state store
//!
//! Terraform's `s3` backend keeps one state object per key in a bucket, and
//! non-default workspaces under `env:/<workspace>/<key>`. Any S3-compatible
//! endpoint (MinIO, Ceph, AWS) is addressed path-style.

use aws_sdk_s3::Client;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use tokio::runtime::Runtime;
use tracing::debug;

use super::ObjectStore;
use crate::config::{ENV_S3_ACCESS_KEY, ENV_S3_BUCKET, ENV_S3_ENDPOINT, ENV_S3_SECRET_KEY, S3Settings};
use crate::error::{BackendError, Result};

/// S3 object store client
///
/// The SDK is async; each lookup is driven to completion on a private
/// current-thread runtime so the store can serve the synchronous
/// [`atp_engine::ValueSource`] API.
#[derive(Debug)]
pub struct S3Store {
    client: Client,
    bucket: String,
    runtime: Runtime,
}

impl S3Store {
    /// Create a store from S3 settings
    pub fn new(settings: &S3Settings) -> Result<Self> {
        let (Some(bucket), Some(endpoint), Some(access_key), Some(secret_key)) = (
            settings.bucket.as_deref(),
            settings.endpoint.as_deref(),
            settings.access_key.as_deref(),
            settings.secret_key.as_deref(),
        ) else {
            return Err(BackendError::InvalidConfig {
                message: format!(
                    "{}, {}, {} and {} are required for terraform state backend",
                    ENV_S3_ACCESS_KEY, ENV_S3_BUCKET, ENV_S3_ENDPOINT, ENV_S3_SECRET_KEY
                ),
            });
        };

        let credentials = Credentials::new(access_key, secret_key, None, None, "atp");
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()))
            .endpoint_url(endpoint_url(endpoint, settings.use_ssl))
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        Ok(Self {
            client: Client::from_conf(config),
            bucket: bucket.to_string(),
            runtime,
        })
    }
}

/// Endpoints may be given as `host:port`; the scheme then follows `use_ssl`
fn endpoint_url(endpoint: &str, use_ssl: bool) -> String {
    if endpoint.contains("://") {
        endpoint.trim_end_matches('/').to_string()
    } else if use_ssl {
        format!("https://{}", endpoint.trim_end_matches('/'))
    } else {
        format!("http://{}", endpoint.trim_end_matches('/'))
    }
}

impl ObjectStore for S3Store {
    fn get_object(&self, path: &str, version: Option<&str>) -> Result<Vec<u8>> {
        debug!(bucket = %self.bucket, path = %path, version = ?version, "getting state object");

        self.runtime.block_on(async {
            let output = self
                .client
                .get_object()
                .bucket(&self.bucket)
                .key(path)
                .set_version_id(version.map(str::to_string))
                .send()
                .await
                .map_err(|e| {
                    let not_found = e
                        .as_service_error()
                        .is_some_and(|service| service.is_no_such_key())
                        || e.raw_response().is_some_and(|r| r.status().as_u16() == 404);
                    if not_found {
                        BackendError::ObjectNotFound {
                            path: path.to_string(),
                        }
                    } else {
                        let status = e.raw_response().map(|r| r.status().as_u16());
                        let message = format!(
                            "mc get object: {}",
                            aws_sdk_s3::error::DisplayErrorContext(&e)
                        );
                        match status {
                            Some(status) => BackendError::Http { status, message },
                            None => BackendError::Network { message },
                        }
                    }
                })?;

            let body = output
                .body
                .collect()
                .await
                .map_err(|e| BackendError::Network {
                    message: format!("failed to read: {}", e),
                })?;
            Ok(body.into_bytes().to_vec())
        })
    }
}
