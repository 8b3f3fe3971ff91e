//! Pre-signed URL types
//!
//! A pre-signed URL embeds a signed request for one operation on one object,
//! so the holder can perform it without credentials until it expires.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Expiry applied when callers do not pick one (10 minutes)
pub const DEFAULT_PRESIGN_EXPIRY: Duration = Duration::from_secs(10 * 60);

/// HTTP methods supported for pre-signed URLs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PresignMethod {
    /// GET - Download object
    Get,
    /// PUT - Upload object
    Put,
}

impl std::fmt::Display for PresignMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Put => write!(f, "PUT"),
        }
    }
}

impl std::str::FromStr for PresignMethod {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "PUT" => Ok(Self::Put),
            _ => Err(crate::Error::InvalidArgument(format!(
                "Unsupported method: {}. Use GET or PUT.",
                s
            ))),
        }
    }
}

/// Pre-signed URL request parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignRequest {
    pub bucket: String,
    pub key: String,
    pub expires_in: Duration,
    pub method: PresignMethod,
}

impl PresignRequest {
    pub fn builder() -> PresignRequestBuilder {
        PresignRequestBuilder::default()
    }

    /// Instant the URL stops being valid, counted from `now`
    pub fn expires_at(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        chrono::Duration::from_std(self.expires_in)
            .ok()
            .and_then(|d| now.checked_add_signed(d))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

/// Pre-signed URL response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresignedUrl {
    /// The complete pre-signed URL
    pub url: String,
    pub method: PresignMethod,
    pub expires_at: DateTime<Utc>,
}

/// Builder for pre-signed URL requests
#[derive(Debug, Clone)]
pub struct PresignRequestBuilder {
    bucket: String,
    key: String,
    expires_in: Duration,
    method: PresignMethod,
}

impl Default for PresignRequestBuilder {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            key: String::new(),
            expires_in: DEFAULT_PRESIGN_EXPIRY,
            method: PresignMethod::Get,
        }
    }
}

impl PresignRequestBuilder {
    pub fn bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn expires_in(mut self, expires_in: Duration) -> Self {
        self.expires_in = expires_in;
        self
    }

    pub fn method(mut self, method: PresignMethod) -> Self {
        self.method = method;
        self
    }

    /// Build the request. The expiry upper bound is left to the backend.
    pub fn build(self) -> crate::Result<PresignRequest> {
        if self.bucket.is_empty() {
            return Err(crate::Error::InvalidArgument(
                "Bucket name is required".to_string(),
            ));
        }
        if self.key.is_empty() {
            return Err(crate::Error::InvalidArgument(
                "Object key is required".to_string(),
            ));
        }

        Ok(PresignRequest {
            bucket: self.bucket,
            key: self.key,
            expires_in: self.expires_in,
            method: self.method,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presign_request_builder() {
        let request = PresignRequest::builder()
            .bucket("my-bucket")
            .key("my-object.txt")
            .method(PresignMethod::Put)
            .expires_in(Duration::from_secs(300))
            .build()
            .unwrap();

        assert_eq!(request.bucket, "my-bucket");
        assert_eq!(request.key, "my-object.txt");
        assert_eq!(request.method, PresignMethod::Put);
        assert_eq!(request.expires_in, Duration::from_secs(300));
    }

    #[test]
    fn test_builder_defaults_to_ten_minute_get() {
        let request = PresignRequest::builder()
            .bucket("b")
            .key("k")
            .build()
            .unwrap();
        assert_eq!(request.method, PresignMethod::Get);
        assert_eq!(request.expires_in, Duration::from_secs(600));
    }

    #[test]
    fn test_builder_requires_bucket_and_key() {
        assert!(PresignRequest::builder().key("k").build().is_err());
        assert!(PresignRequest::builder().bucket("b").build().is_err());
    }

    #[test]
    fn test_long_expiry_is_not_rejected_locally() {
        let request = PresignRequest::builder()
            .bucket("b")
            .key("k")
            .expires_in(Duration::from_secs(30 * 24 * 3600))
            .build();
        assert!(request.is_ok());
    }

    #[test]
    fn test_expires_at() {
        let now = Utc::now();
        let request = PresignRequest::builder()
            .bucket("b")
            .key("k")
            .expires_in(Duration::from_secs(60))
            .build()
            .unwrap();
        assert_eq!(request.expires_at(now), now + chrono::Duration::seconds(60));
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!("GET".parse::<PresignMethod>().unwrap(), PresignMethod::Get);
        assert_eq!("put".parse::<PresignMethod>().unwrap(), PresignMethod::Put);
        assert!("DELETE".parse::<PresignMethod>().is_err());
    }
}
