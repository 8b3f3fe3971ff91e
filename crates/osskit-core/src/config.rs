//! Configuration for Osskit
//!
//! Example config:
//! ```toml
//! [oss]
//! endpoint = "http://localhost:9000"
//! region = "us-east-1"
//! access_key = "minioadmin"
//! secret_key = "minioadmin"
//! bucket_name = "uploads"
//! path_style_access = true
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Connection and addressing settings for an S3-compatible backend
#[derive(Clone, Serialize, Deserialize)]
pub struct OssConfig {
    /// Skip building the client entirely when false
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Object storage service URL
    #[serde(default)]
    pub endpoint: String,

    /// Backend region
    #[serde(default = "default_region")]
    pub region: String,

    /// Access key ID
    #[serde(default)]
    pub access_key: String,

    /// Secret access key
    #[serde(default)]
    pub secret_key: String,

    /// Bucket used when callers omit one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket_name: Option<String>,

    /// Overrides the host of computed public URLs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_domain: Option<String>,

    /// true: `{endpoint}/{bucket}`, false: `{scheme}://{bucket}.{host}`
    #[serde(default = "default_true")]
    pub path_style_access: bool,
}

fn default_region() -> String {
    crate::DEFAULT_REGION.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for OssConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: String::new(),
            region: default_region(),
            access_key: String::new(),
            secret_key: String::new(),
            bucket_name: None,
            custom_domain: None,
            path_style_access: true,
        }
    }
}

impl fmt::Debug for OssConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OssConfig")
            .field("enabled", &self.enabled)
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .field("access_key", &self.access_key)
            .field("secret_key", &"***")
            .field("bucket_name", &self.bucket_name)
            .field("custom_domain", &self.custom_domain)
            .field("path_style_access", &self.path_style_access)
            .finish()
    }
}

impl OssConfig {
    pub fn new(
        endpoint: impl Into<String>,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            ..Self::default()
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_bucket_name(mut self, bucket: impl Into<String>) -> Self {
        self.bucket_name = Some(bucket.into());
        self
    }

    pub fn with_custom_domain(mut self, domain: impl Into<String>) -> Self {
        self.custom_domain = Some(domain.into());
        self
    }

    pub fn with_path_style_access(mut self, path_style: bool) -> Self {
        self.path_style_access = path_style;
        self
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::InvalidConfig(format!("Failed to read config {:?}: {}", path, e))
        })?;

        debug!("Loaded storage config from {:?}", path);
        Self::from_toml(&content)
    }

    /// Parse either a bare settings table or a file with an `[oss]` section
    pub fn from_toml(content: &str) -> Result<Self> {
        let parse_error = |e: toml::de::Error| {
            Error::InvalidConfig(format!("Failed to parse config: {}", e))
        };

        let mut table: toml::Table = toml::from_str(content).map_err(parse_error)?;
        let config = match table.remove("oss") {
            Some(section) => section.try_into(),
            None => toml::Value::Table(table).try_into(),
        };
        config.map_err(parse_error)
    }

    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Overlay `OSS_*` environment variables onto this config
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(enabled) = std::env::var("OSS_ENABLED") {
            self.enabled = parse_bool("OSS_ENABLED", &enabled)?;
        }
        if let Ok(endpoint) = std::env::var("OSS_ENDPOINT") {
            self.endpoint = endpoint;
        }
        if let Ok(region) = std::env::var("OSS_REGION") {
            self.region = region;
        }
        if let Ok(access_key) = std::env::var("OSS_ACCESS_KEY") {
            self.access_key = access_key;
        }
        if let Ok(secret_key) = std::env::var("OSS_SECRET_KEY") {
            self.secret_key = secret_key;
        }
        if let Ok(bucket) = std::env::var("OSS_BUCKET_NAME") {
            self.bucket_name = Some(bucket);
        }
        if let Ok(domain) = std::env::var("OSS_CUSTOM_DOMAIN") {
            self.custom_domain = Some(domain);
        }
        if let Ok(path_style) = std::env::var("OSS_PATH_STYLE_ACCESS") {
            self.path_style_access = parse_bool("OSS_PATH_STYLE_ACCESS", &path_style)?;
        }
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        if self.endpoint.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "Endpoint not configured. Set OSS_ENDPOINT or 'endpoint'".into(),
            ));
        }
        if self.access_key.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "Access key not configured. Set OSS_ACCESS_KEY or 'access_key'".into(),
            ));
        }
        if self.secret_key.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "Secret key not configured. Set OSS_SECRET_KEY or 'secret_key'".into(),
            ));
        }
        if self.region.trim().is_empty() {
            return Err(Error::InvalidConfig("Region must not be empty".into()));
        }

        Ok(())
    }

    /// The configured default bucket, or [`Error::MissingDefaultBucket`]
    pub fn default_bucket(&self) -> Result<&str> {
        non_blank(self.bucket_name.as_deref()).ok_or(Error::MissingDefaultBucket)
    }

    /// Pick the caller's bucket, falling back to the default bucket
    pub fn resolve_bucket<'a>(&'a self, bucket: Option<&'a str>) -> Result<&'a str> {
        match non_blank(bucket) {
            Some(bucket) => Ok(bucket),
            None => self.default_bucket(),
        }
    }

    pub fn custom_domain(&self) -> Option<&str> {
        non_blank(self.custom_domain.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(Error::InvalidConfig(format!(
            "{} must be a boolean, got '{}'",
            name, value
        ))),
    }
}
