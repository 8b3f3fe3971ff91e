//! Object payloads going in and out of a store

use bytes::Bytes;
use osskit_core::types::ObjectInfo;
use osskit_core::{Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncReadExt, ReadBuf};

/// Content for a single-call upload.
///
/// Both variants know their exact length up front, so the upload never has
/// to guess it from a partially buffered stream.
#[derive(Debug, Clone)]
pub enum ObjectBody {
    /// Fully buffered in memory
    Bytes(Bytes),
    /// Read from a local file
    File(PathBuf),
}

impl ObjectBody {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        ObjectBody::File(path.as_ref().to_path_buf())
    }

    /// Exact number of bytes this body will send
    pub async fn content_length(&self) -> Result<u64> {
        match self {
            ObjectBody::Bytes(bytes) => Ok(bytes.len() as u64),
            ObjectBody::File(path) => {
                let metadata = tokio::fs::metadata(path).await?;
                if !metadata.is_file() {
                    return Err(Error::InvalidArgument(format!(
                        "Not a regular file: {:?}",
                        path
                    )));
                }
                Ok(metadata.len())
            }
        }
    }

    /// Load the whole body into memory
    pub async fn into_bytes(self) -> Result<Bytes> {
        match self {
            ObjectBody::Bytes(bytes) => Ok(bytes),
            ObjectBody::File(path) => Ok(Bytes::from(tokio::fs::read(&path).await?)),
        }
    }
}

impl From<Bytes> for ObjectBody {
    fn from(bytes: Bytes) -> Self {
        ObjectBody::Bytes(bytes)
    }
}

impl From<Vec<u8>> for ObjectBody {
    fn from(data: Vec<u8>) -> Self {
        ObjectBody::Bytes(Bytes::from(data))
    }
}

impl From<&'static [u8]> for ObjectBody {
    fn from(data: &'static [u8]) -> Self {
        ObjectBody::Bytes(Bytes::from_static(data))
    }
}

impl From<&'static str> for ObjectBody {
    fn from(text: &'static str) -> Self {
        ObjectBody::Bytes(Bytes::from_static(text.as_bytes()))
    }
}

impl From<String> for ObjectBody {
    fn from(text: String) -> Self {
        ObjectBody::Bytes(Bytes::from(text))
    }
}

/// Explicit form of an upload
#[derive(Debug, Clone)]
pub struct PutObjectRequest {
    /// Falls back to the configured default bucket when `None`
    pub bucket: Option<String>,
    pub key: String,
    pub body: ObjectBody,
    /// Must match the body's real length when given
    pub content_length: Option<u64>,
    /// Defaults to `application/octet-stream`
    pub content_type: Option<String>,
}

impl PutObjectRequest {
    pub fn new(key: impl Into<String>, body: impl Into<ObjectBody>) -> Self {
        Self {
            bucket: None,
            key: key.into(),
            body: body.into(),
            content_length: None,
            content_type: None,
        }
    }

    pub fn bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = Some(bucket.into());
        self
    }

    pub fn content_length(mut self, length: u64) -> Self {
        self.content_length = Some(length);
        self
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Streaming object content.
///
/// Owns the underlying connection; dropping the stream releases it.
pub struct ObjectStream {
    inner: Pin<Box<dyn AsyncRead + Send>>,
}

impl ObjectStream {
    pub fn new(reader: impl AsyncRead + Send + 'static) -> Self {
        Self {
            inner: Box::pin(reader),
        }
    }

    pub fn from_bytes(bytes: Bytes) -> Self {
        Self::new(std::io::Cursor::new(bytes))
    }

    /// Read the remaining content into memory
    pub async fn read_to_bytes(mut self) -> Result<Bytes> {
        let mut buf = Vec::new();
        self.inner.read_to_end(&mut buf).await?;
        Ok(Bytes::from(buf))
    }

    pub fn into_async_read(self) -> Pin<Box<dyn AsyncRead + Send>> {
        self.inner
    }
}

impl AsyncRead for ObjectStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        self.inner.as_mut().poll_read(cx, buf)
    }
}

impl fmt::Debug for ObjectStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectStream").finish_non_exhaustive()
    }
}

/// A fetched object: metadata plus its content stream
#[derive(Debug)]
pub struct ObjectHandle {
    pub info: ObjectInfo,
    pub body: ObjectStream,
}

impl ObjectHandle {
    pub fn bucket(&self) -> &str {
        &self.info.bucket
    }

    pub fn key(&self) -> &str {
        &self.info.key
    }

    /// Consume the handle and buffer the content
    pub async fn into_bytes(self) -> Result<Bytes> {
        self.body.read_to_bytes().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_bytes_body_length() {
        let body = ObjectBody::from("Hello, S3!");
        assert_eq!(body.content_length().await.unwrap(), 10);
        assert_eq!(body.into_bytes().await.unwrap(), Bytes::from_static(b"Hello, S3!"));
    }

    #[tokio::test]
    async fn test_file_body_length() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[7u8; 4096]).unwrap();
        file.flush().unwrap();

        let body = ObjectBody::from_path(file.path());
        assert_eq!(body.content_length().await.unwrap(), 4096);
        assert_eq!(body.into_bytes().await.unwrap().len(), 4096);
    }

    #[tokio::test]
    async fn test_missing_file_body() {
        let body = ObjectBody::from_path("/nonexistent/osskit-body.bin");
        let err = body.content_length().await.unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.kind(), osskit_core::ErrorKind::Misuse);
    }

    #[tokio::test]
    async fn test_directory_body_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let body = ObjectBody::from_path(dir.path());
        assert!(matches!(
            body.content_length().await,
            Err(Error::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn test_object_stream_reads_all() {
        let stream = ObjectStream::from_bytes(Bytes::from_static(b"streamed content"));
        let mut reader = stream.into_async_read();
        let mut out = String::new();
        reader.read_to_string(&mut out).await.unwrap();
        assert_eq!(out, "streamed content");
    }

    #[test]
    fn test_put_request_builder() {
        let req = PutObjectRequest::new("a/b.txt", "data")
            .bucket("media")
            .content_length(4)
            .content_type("text/plain");
        assert_eq!(req.bucket.as_deref(), Some("media"));
        assert_eq!(req.content_length, Some(4));
        assert_eq!(req.content_type.as_deref(), Some("text/plain"));
    }
}
