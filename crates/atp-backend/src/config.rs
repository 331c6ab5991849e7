//! ATP configuration
//!
//! Settings are layered, lowest priority first: defaults, the YAML config
//! file, `ATP_*` environment variables, then `ARGOCD_ENV_ATP_*` variables
//! (as set by Argo CD for plugin environments, prefix stripped).

use atp_engine::ValueSource;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

use crate::error::{BackendError, Result};
use crate::store::{FileStore, HttpStore, S3Store};
use crate::terraform::TerraformState;

pub const ENV_BACKEND: &str = "ATP_BACKEND";
pub const ENV_S3_BUCKET: &str = "ATP_S3_BUCKET";
pub const ENV_S3_ENDPOINT: &str = "ATP_S3_ENDPOINT";
pub const ENV_S3_ACCESS_KEY: &str = "ATP_S3_ACCESS_KEY";
pub const ENV_S3_SECRET_KEY: &str = "ATP_S3_SECRET_KEY";
pub const ENV_S3_USE_SSL: &str = "ATP_S3_USE_SSL";
pub const ENV_S3_REGION: &str = "ATP_S3_REGION";
pub const ENV_STATE_DIR: &str = "ATP_STATE_DIR";
pub const ENV_HTTP_ADDRESS: &str = "ATP_HTTP_ADDRESS";
pub const ENV_HTTP_USERNAME: &str = "ATP_HTTP_USERNAME";
pub const ENV_HTTP_PASSWORD: &str = "ATP_HTTP_PASSWORD";
pub const ENV_HTTP_TIMEOUT: &str = "ATP_HTTP_TIMEOUT";

/// Prefix Argo CD puts in front of plugin environment variables
pub const ARGOCD_ENV_PREFIX: &str = "ARGOCD_ENV_";

const ENV_PREFIX: &str = "ATP_";

/// Where Terraform state objects are read from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// S3-compatible bucket, as written by Terraform's `s3` backend
    #[default]
    S3,
    /// Local directory
    File,
    /// Terraform HTTP backend
    Http,
}

impl FromStr for BackendKind {
    type Err = BackendError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s3" => Ok(Self::S3),
            "file" => Ok(Self::File),
            "http" => Ok(Self::Http),
            other => Err(BackendError::InvalidConfig {
                message: format!("Must provide a supported backend, received {}", other),
            }),
        }
    }
}

/// Settings for the S3 store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3Settings {
    #[serde(default)]
    pub bucket: Option<String>,

    /// `host[:port]` or a full URL
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default)]
    pub access_key: Option<String>,

    #[serde(default)]
    pub secret_key: Option<String>,

    /// Use https when the endpoint has no scheme
    #[serde(default)]
    pub use_ssl: bool,

    #[serde(default = "default_region")]
    pub region: String,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

impl Default for S3Settings {
    fn default() -> Self {
        Self {
            bucket: None,
            endpoint: None,
            access_key: None,
            secret_key: None,
            use_ssl: false,
            region: default_region(),
        }
    }
}

/// Settings for the HTTP store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpSettings {
    #[serde(default)]
    pub address: Option<String>,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_timeout() -> u64 {
    30
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            address: None,
            username: None,
            password: None,
            timeout_secs: default_timeout(),
        }
    }
}

/// Backend configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtpConfig {
    #[serde(default)]
    pub backend: BackendKind,

    #[serde(default)]
    pub s3: S3Settings,

    /// Root directory of the file backend
    #[serde(default)]
    pub state_dir: Option<PathBuf>,

    #[serde(default)]
    pub http: HttpSettings,
}

impl AtpConfig {
    /// Load configuration from `path` (or the default location) and the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_from(&path)?,
                _ => Self::default(),
            },
        };
        config.apply_env(std::env::vars())?;
        Ok(config)
    }

    /// Load configuration from a YAML file
    pub fn load_from(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "reading configuration file");
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Default configuration path, e.g. `~/.config/atp/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("atp").join("config.yaml"))
    }

    /// Override settings from environment variables
    ///
    /// `ARGOCD_ENV_`-prefixed variables win over plain ones.
    pub fn apply_env<I>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let (argocd, plain): (Vec<_>, Vec<_>) = vars
            .into_iter()
            .partition(|(key, _)| key.starts_with(ARGOCD_ENV_PREFIX));

        for (key, value) in plain {
            self.set(&key, value)?;
        }
        for (key, value) in argocd {
            self.set(&key[ARGOCD_ENV_PREFIX.len()..], value)?;
        }
        Ok(())
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        if !key.starts_with(ENV_PREFIX) {
            return Ok(());
        }

        match key {
            ENV_BACKEND => self.backend = value.parse()?,
            ENV_S3_BUCKET => self.s3.bucket = Some(value),
            ENV_S3_ENDPOINT => self.s3.endpoint = Some(value),
            ENV_S3_ACCESS_KEY => self.s3.access_key = Some(value),
            ENV_S3_SECRET_KEY => self.s3.secret_key = Some(value),
            ENV_S3_REGION => self.s3.region = value,
            ENV_S3_USE_SSL => {
                self.s3.use_ssl =
                    value.trim().parse().map_err(|_| BackendError::InvalidConfig {
                        message: format!("{} must be true or false, got {}", key, value),
                    })?
            }
            ENV_STATE_DIR => self.state_dir = Some(PathBuf::from(value)),
            ENV_HTTP_ADDRESS => self.http.address = Some(value),
            ENV_HTTP_USERNAME => self.http.username = Some(value),
            ENV_HTTP_PASSWORD => self.http.password = Some(value),
            ENV_HTTP_TIMEOUT => {
                self.http.timeout_secs =
                    value.trim().parse().map_err(|_| BackendError::InvalidConfig {
                        message: format!("{} must be a number of seconds, got {}", key, value),
                    })?
            }
            _ => {
                debug!(key = %key, "ignoring unknown setting");
                return Ok(());
            }
        }
        debug!(key = %key, "setting applied from environment");
        Ok(())
    }

    /// Build the value source selected by this configuration
    pub fn build_source(&self) -> Result<Arc<dyn ValueSource>> {
        debug!(backend = ?self.backend, "building value source");
        match self.backend {
            BackendKind::S3 => Ok(Arc::new(TerraformState::new(S3Store::new(&self.s3)?))),
            BackendKind::File => {
                let dir = self
                    .state_dir
                    .as_ref()
                    .ok_or_else(|| BackendError::InvalidConfig {
                        message: format!("{} is required for the file backend", ENV_STATE_DIR),
                    })?;
                Ok(Arc::new(TerraformState::new(FileStore::new(dir))))
            }
            BackendKind::Http => Ok(Arc::new(TerraformState::new(HttpStore::new(&self.http)?))),
        }
    }
}
