//! Osskit Core Library
//!
//! Configuration, error taxonomy and value types shared by the osskit
//! object storage facade and its command-line client.

pub mod addressing;
pub mod config;
pub mod error;
pub mod types;

pub use config::OssConfig;
pub use error::{Error, ErrorKind, Result};

/// Osskit version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default S3 region
pub const DEFAULT_REGION: &str = "us-east-1";

/// Content type used when a caller does not supply one
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";
