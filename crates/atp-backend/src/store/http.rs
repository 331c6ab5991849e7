//! HTTP state store
//!
//! Reads objects the way the Terraform `http` backend serves them: a plain
//! GET of `<address>/<path>`, with optional basic auth and a `versionId`
//! query parameter.

use reqwest::StatusCode;
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::ObjectStore;
use crate::config::HttpSettings;
use crate::error::{BackendError, Result};

/// HTTP object store client
#[derive(Debug, Clone)]
pub struct HttpStore {
    base: Url,
    client: Client,
    username: Option<String>,
    password: Option<String>,
}

impl HttpStore {
    /// Create a store from HTTP settings
    pub fn new(settings: &HttpSettings) -> Result<Self> {
        let address = settings
            .address
            .as_deref()
            .ok_or_else(|| BackendError::InvalidConfig {
                message: "ATP_HTTP_ADDRESS is required for the http backend".to_string(),
            })?;

        let base = Url::parse(address)?;
        if base.cannot_be_a_base() {
            return Err(BackendError::InvalidConfig {
                message: format!("{} cannot be used as a base address", address),
            });
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| BackendError::Network {
                message: e.to_string(),
            })?;

        Ok(Self {
            base,
            client,
            username: settings.username.clone(),
            password: settings.password.clone(),
        })
    }

    /// URL of the object at `path`
    ///
    /// The path is appended segment by segment below the base address, so
    /// workspace keys such as `env:/prod/app.tfstate` never parse as a scheme.
    pub fn object_url(&self, path: &str, version: Option<&str>) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| BackendError::InvalidConfig {
                message: format!("{} cannot be used as a base address", self.base),
            })?
            .pop_if_empty()
            .extend(path.trim_start_matches('/').split('/'));
        if let Some(version) = version {
            url.query_pairs_mut().append_pair("versionId", version);
        }
        Ok(url)
    }
}

impl ObjectStore for HttpStore {
    fn get_object(&self, path: &str, version: Option<&str>) -> Result<Vec<u8>> {
        let url = self.object_url(path, version)?;
        debug!(url = %url, "fetching state object");

        let mut request = self.client.get(url);
        if let Some(username) = &self.username {
            request = request.basic_auth(username, self.password.as_deref());
        }

        let response = request.send()?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(BackendError::ObjectNotFound {
                path: path.to_string(),
            });
        }
        if !status.is_success() {
            return Err(BackendError::Http {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string(),
            });
        }

        Ok(response.bytes()?.to_vec())
    }
}
