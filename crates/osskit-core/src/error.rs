//! Error types for Osskit

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error reported by a storage backend
pub type BackendSource = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum Error {
    // Configuration Errors
    #[error("No default bucket name configured")]
    MissingDefaultBucket,

    #[error("Invalid endpoint for bucket {bucket}: {reason}")]
    InvalidEndpoint { bucket: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Caller Errors
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // Backend Errors
    #[error("The specified bucket does not exist: {bucket}")]
    NoSuchBucket {
        bucket: String,
        #[source]
        source: BackendSource,
    },

    #[error("The specified key does not exist: {bucket}/{key}")]
    NoSuchKey {
        bucket: String,
        key: String,
        #[source]
        source: BackendSource,
    },

    #[error("The bucket you tried to delete is not empty: {bucket}")]
    BucketNotEmpty {
        bucket: String,
        #[source]
        source: BackendSource,
    },

    #[error("Storage backend error during {operation}: {message}")]
    Backend {
        operation: &'static str,
        message: String,
        #[source]
        source: BackendSource,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or malformed configuration. Fatal, never retried.
    Configuration,
    /// Anything the storage backend reported, forwarded as-is.
    Backend,
    /// The caller passed something unusable.
    Misuse,
}

impl Error {
    /// Wrap an error reported by the storage backend
    pub fn backend(operation: &'static str, source: impl Into<BackendSource>) -> Self {
        let source = source.into();
        Error::Backend {
            operation,
            message: source.to_string(),
            source,
        }
    }

    pub fn no_such_bucket(bucket: impl Into<String>, source: impl Into<BackendSource>) -> Self {
        Error::NoSuchBucket {
            bucket: bucket.into(),
            source: source.into(),
        }
    }

    pub fn no_such_key(
        bucket: impl Into<String>,
        key: impl Into<String>,
        source: impl Into<BackendSource>,
    ) -> Self {
        Error::NoSuchKey {
            bucket: bucket.into(),
            key: key.into(),
            source: source.into(),
        }
    }

    pub fn bucket_not_empty(bucket: impl Into<String>, source: impl Into<BackendSource>) -> Self {
        Error::BucketNotEmpty {
            bucket: bucket.into(),
            source: source.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingDefaultBucket
            | Error::InvalidEndpoint { .. }
            | Error::InvalidConfig(_) => ErrorKind::Configuration,

            // Local I/O fails before any request is sent
            Error::InvalidArgument(_) | Error::Io(_) => ErrorKind::Misuse,

            Error::NoSuchBucket { .. }
            | Error::NoSuchKey { .. }
            | Error::BucketNotEmpty { .. }
            | Error::Backend { .. }
            | Error::Other(_) => ErrorKind::Backend,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Error::MissingDefaultBucket => "MissingDefaultBucket",
            Error::InvalidEndpoint { .. } => "InvalidEndpoint",
            Error::InvalidConfig(_) => "InvalidConfiguration",
            Error::InvalidArgument(_) => "InvalidArgument",
            Error::NoSuchBucket { .. } => "NoSuchBucket",
            Error::NoSuchKey { .. } => "NoSuchKey",
            Error::BucketNotEmpty { .. } => "BucketNotEmpty",
            Error::Backend { .. } => "BackendError",
            Error::Io(_) => "IoError",
            Error::Other(_) => "InternalError",
        }
    }

    /// Whether this error was raised locally because of configuration
    pub fn is_configuration(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(Error::MissingDefaultBucket.kind(), ErrorKind::Configuration);
        assert!(Error::InvalidEndpoint {
            bucket: "b".into(),
            reason: "no host".into()
        }
        .is_configuration());
        assert_eq!(
            Error::InvalidArgument("size".into()).kind(),
            ErrorKind::Misuse
        );
        assert_eq!(
            Error::no_such_bucket("b", "missing").kind(),
            ErrorKind::Backend
        );

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        assert_eq!(Error::from(io).kind(), ErrorKind::Misuse);
    }

    #[test]
    fn test_not_found_errors_keep_source() {
        let err = Error::no_such_key("b", "k", "request id 4442587FB7D0A2F9");
        assert_eq!(err.code(), "NoSuchKey");
        assert!(err.to_string().contains("b/k"));

        let source = std::error::Error::source(&err).unwrap();
        assert!(source.to_string().contains("4442587FB7D0A2F9"));

        let err = Error::bucket_not_empty("b", "still has objects");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_backend_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = Error::backend("PutObject", io);

        assert_eq!(err.code(), "BackendError");
        assert!(err.to_string().contains("PutObject"));

        let source = std::error::Error::source(&err).unwrap();
        assert!(source.downcast_ref::<std::io::Error>().is_some());
    }

    #[test]
    fn test_invalid_endpoint_names_bucket() {
        let err = Error::InvalidEndpoint {
            bucket: "photos".into(),
            reason: "relative URL without a base".into(),
        };
        assert!(err.to_string().contains("photos"));
    }
}
