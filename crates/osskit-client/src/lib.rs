//! Osskit Client
//!
//! [`OssTemplate`] wraps an [`ObjectStore`] with the settings from an
//! [`OssConfig`]: callers configure endpoint, credentials and a default
//! bucket once and then call plain bucket and object methods.
//!
//! ```no_run
//! # async fn demo() -> osskit_core::Result<()> {
//! use osskit_client::{ObjectBody, OssTemplate};
//! use osskit_core::OssConfig;
//!
//! let config = OssConfig::from_env()?;
//! if let Some(oss) = OssTemplate::from_config(config)? {
//!     oss.create_bucket(None).await?;
//!     oss.put_object(None, "hello.txt", ObjectBody::from("Hello, S3!"), Some("text/plain"))
//!         .await?;
//!     let url = oss.presigned_get_url(None, "hello.txt", None).await?;
//!     println!("{}", url);
//! }
//! # Ok(())
//! # }
//! ```

pub mod memory;
pub mod object;
pub mod s3;
pub mod store;
pub mod template;

pub use memory::MemoryStore;
pub use object::{ObjectBody, ObjectHandle, ObjectStream, PutObjectRequest};
pub use s3::S3Store;
pub use store::ObjectStore;
pub use template::OssTemplate;

pub use osskit_core::types::*;
pub use osskit_core::{Error, ErrorKind, OssConfig, Result};
