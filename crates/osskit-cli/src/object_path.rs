//! Object addressing on the command line
//!
//! Accepts `s3://bucket/key`, `s3://bucket`, or a bare `key` that lives in
//! the configured default bucket.

use anyhow::{Context, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectPath {
    /// `None` means the default bucket
    pub bucket: Option<String>,
    pub key: Option<String>,
}

impl ObjectPath {
    /// Parse an S3 URI or bare key
    pub fn parse(path: &str) -> Result<Self> {
        let Some(rest) = path.strip_prefix("s3://") else {
            let key = path.trim_start_matches('/');
            return Ok(Self {
                bucket: None,
                key: (!key.is_empty()).then(|| key.to_string()),
            });
        };

        if rest.is_empty() {
            anyhow::bail!("Invalid S3 URI: bucket name cannot be empty");
        }

        // Split into bucket and key
        let (bucket, key) = match rest.split_once('/') {
            Some((b, k)) => (b, (!k.is_empty()).then(|| k.to_string())),
            None => (rest, None),
        };

        if bucket.is_empty() {
            anyhow::bail!("Invalid S3 URI: bucket name cannot be empty");
        }

        Ok(Self {
            bucket: Some(bucket.to_string()),
            key,
        })
    }

    pub fn bucket(&self) -> Option<&str> {
        self.bucket.as_deref()
    }

    /// The key, or an error naming `path`
    pub fn require_key(&self, path: &str) -> Result<&str> {
        self.key
            .as_deref()
            .with_context(|| format!("Object key required in '{}'", path))
    }

    /// Get the key or empty string
    pub fn key_or_empty(&self) -> &str {
        self.key.as_deref().unwrap_or("")
    }

    /// Display form, using `default_bucket` when no bucket was given
    pub fn display(&self, default_bucket: &str) -> String {
        let bucket = self.bucket.as_deref().unwrap_or(default_bucket);
        match &self.key {
            Some(k) => format!("s3://{}/{}", bucket, k),
            None => format!("s3://{}", bucket),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_s3_uri() {
        // Bucket only
        let path = ObjectPath::parse("s3://mybucket").unwrap();
        assert_eq!(path.bucket(), Some("mybucket"));
        assert!(path.key.is_none());

        // Bucket with trailing slash
        let path = ObjectPath::parse("s3://mybucket/").unwrap();
        assert_eq!(path.bucket(), Some("mybucket"));
        assert!(path.key.is_none());

        // Bucket with prefix key
        let path = ObjectPath::parse("s3://mybucket/path/to/key").unwrap();
        assert_eq!(path.bucket(), Some("mybucket"));
        assert_eq!(path.key.as_deref(), Some("path/to/key"));
    }

    #[test]
    fn test_parse_bare_key() {
        let path = ObjectPath::parse("docs/readme.md").unwrap();
        assert!(path.bucket.is_none());
        assert_eq!(path.key_or_empty(), "docs/readme.md");

        let path = ObjectPath::parse("").unwrap();
        assert!(path.bucket.is_none());
        assert!(path.key.is_none());
    }

    #[test]
    fn test_invalid_s3_uri() {
        assert!(ObjectPath::parse("s3://").is_err());
        assert!(ObjectPath::parse("s3:///key").is_err());
    }

    #[test]
    fn test_require_key() {
        let path = ObjectPath::parse("s3://b").unwrap();
        assert!(path.require_key("s3://b").is_err());
        let path = ObjectPath::parse("s3://b/k").unwrap();
        assert_eq!(path.require_key("s3://b/k").unwrap(), "k");
    }

    #[test]
    fn test_display() {
        assert_eq!(ObjectPath::parse("k").unwrap().display("dflt"), "s3://dflt/k");
        assert_eq!(ObjectPath::parse("s3://b/k").unwrap().display("dflt"), "s3://b/k");
    }
}
