//! In-memory backend for tests and local development

use crate::object::{ObjectBody, ObjectHandle, ObjectStream};
use crate::store::ObjectStore;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use md5::{Digest, Md5};
use osskit_core::addressing;
use osskit_core::types::{
    BucketInfo, ObjectInfo, ObjectSummary, PresignRequest, PresignedUrl, PutObjectOutput,
};
use osskit_core::{Error, Result};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// Endpoint used for URLs handed out by [`MemoryStore`]
pub const MEMORY_ENDPOINT: &str = "memory://localhost";

/// Maximum keys returned by one listing, as S3 does
const MAX_KEYS: usize = 1000;

#[derive(Debug, Clone)]
struct StoredObject {
    data: Bytes,
    content_type: String,
    e_tag: String,
    last_modified: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct MemoryBucket {
    created_at: DateTime<Utc>,
    policy: Option<String>,
    objects: BTreeMap<String, StoredObject>,
}

/// [`ObjectStore`] keeping buckets and objects in process memory.
///
/// Mirrors the S3 behaviours the facade relies on: missing buckets and keys
/// are errors, non-empty buckets cannot be deleted, ETags are the quoted MD5
/// of the content and listings are capped at 1000 keys.
#[derive(Debug)]
pub struct MemoryStore {
    endpoint: String,
    path_style: bool,
    buckets: RwLock<BTreeMap<String, MemoryBucket>>,
    requests: AtomicUsize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_endpoint(MEMORY_ENDPOINT, true)
    }

    /// Address objects as if served from `endpoint`
    pub fn with_endpoint(endpoint: impl Into<String>, path_style: bool) -> Self {
        Self {
            endpoint: endpoint.into(),
            path_style,
            buckets: RwLock::new(BTreeMap::new()),
            requests: AtomicUsize::new(0),
        }
    }

    /// Number of backend requests served so far
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Policy document currently attached to `bucket`
    pub fn bucket_policy(&self, bucket: &str) -> Option<String> {
        self.buckets
            .read()
            .get(bucket)
            .and_then(|b| b.policy.clone())
    }

    fn record(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }

    fn no_such_key(bucket: &str, key: &str) -> Error {
        Error::no_such_key(bucket, key, "NoSuchKey: The specified key does not exist.")
    }

    fn no_such_bucket(bucket: &str) -> Error {
        Error::no_such_bucket(bucket, "NoSuchBucket: The specified bucket does not exist")
    }

    fn lookup(&self, bucket: &str, key: &str) -> Result<StoredObject> {
        let buckets = self.buckets.read();
        let stored = buckets
            .get(bucket)
            .ok_or_else(|| Self::no_such_bucket(bucket))?;
        stored
            .objects
            .get(key)
            .cloned()
            .ok_or_else(|| Self::no_such_key(bucket, key))
    }
}

fn object_info(bucket: &str, key: &str, object: &StoredObject) -> ObjectInfo {
    ObjectInfo {
        bucket: bucket.to_string(),
        key: key.to_string(),
        content_type: Some(object.content_type.clone()),
        content_length: Some(object.data.len() as u64),
        e_tag: Some(object.e_tag.clone()),
        last_modified: Some(object.last_modified),
        metadata: HashMap::new(),
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn bucket_exists(&self, bucket: &str) -> Result<bool> {
        self.record();
        Ok(self.buckets.read().contains_key(bucket))
    }

    async fn create_bucket(&self, bucket: &str) -> Result<()> {
        self.record();
        let mut buckets = self.buckets.write();
        if buckets.contains_key(bucket) {
            return Err(Error::backend(
                "CreateBucket",
                format!("BucketAlreadyOwnedByYou: {}", bucket),
            ));
        }
        buckets.insert(
            bucket.to_string(),
            MemoryBucket {
                created_at: Utc::now(),
                ..MemoryBucket::default()
            },
        );
        debug!("Created in-memory bucket {}", bucket);
        Ok(())
    }

    async fn put_bucket_policy(&self, bucket: &str, policy: &str) -> Result<()> {
        self.record();
        let mut buckets = self.buckets.write();
        let stored = buckets
            .get_mut(bucket)
            .ok_or_else(|| Self::no_such_bucket(bucket))?;
        stored.policy = Some(policy.to_string());
        Ok(())
    }

    async fn list_buckets(&self) -> Result<Vec<BucketInfo>> {
        self.record();
        Ok(self
            .buckets
            .read()
            .iter()
            .map(|(name, b)| BucketInfo::new(name.clone()).with_creation_date(b.created_at))
            .collect())
    }

    async fn delete_bucket(&self, bucket: &str) -> Result<()> {
        self.record();
        let mut buckets = self.buckets.write();
        match buckets.get(bucket) {
            None => Err(Self::no_such_bucket(bucket)),
            Some(stored) if !stored.objects.is_empty() => {
                Err(Error::bucket_not_empty(
                    bucket,
                    "BucketNotEmpty: The bucket you tried to delete is not empty",
                ))
            }
            Some(_) => {
                buckets.remove(bucket);
                Ok(())
            }
        }
    }

    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectSummary>> {
        self.record();
        let buckets = self.buckets.read();
        let stored = buckets
            .get(bucket)
            .ok_or_else(|| Self::no_such_bucket(bucket))?;

        Ok(stored
            .objects
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .take(MAX_KEYS)
            .map(|(key, object)| ObjectSummary {
                bucket: bucket.to_string(),
                key: key.clone(),
                size: object.data.len() as u64,
                e_tag: Some(object.e_tag.clone()),
                last_modified: Some(object.last_modified),
                storage_class: Some("STANDARD".to_string()),
            })
            .collect())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: ObjectBody,
        content_length: u64,
        content_type: &str,
    ) -> Result<PutObjectOutput> {
        self.record();
        let data = body.into_bytes().await?;
        if data.len() as u64 != content_length {
            return Err(Error::backend(
                "PutObject",
                format!(
                    "IncompleteBody: declared {} bytes, received {}",
                    content_length,
                    data.len()
                ),
            ));
        }

        let e_tag = format!("\"{}\"", hex::encode(Md5::digest(&data)));
        let mut buckets = self.buckets.write();
        let stored = buckets
            .get_mut(bucket)
            .ok_or_else(|| Self::no_such_bucket(bucket))?;

        stored.objects.insert(
            key.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
                e_tag: e_tag.clone(),
                last_modified: Utc::now(),
            },
        );
        debug!("Stored in-memory object {}/{} ({} bytes)", bucket, key, content_length);

        Ok(PutObjectOutput {
            bucket: bucket.to_string(),
            key: key.to_string(),
            e_tag: Some(e_tag),
            version_id: None,
            content_length,
        })
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectHandle> {
        self.record();
        let object = self.lookup(bucket, key)?;
        Ok(ObjectHandle {
            info: object_info(bucket, key, &object),
            body: ObjectStream::from_bytes(object.data),
        })
    }

    async fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectInfo> {
        self.record();
        let object = self.lookup(bucket, key)?;
        Ok(object_info(bucket, key, &object))
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        self.record();
        let mut buckets = self.buckets.write();
        let stored = buckets
            .get_mut(bucket)
            .ok_or_else(|| Self::no_such_bucket(bucket))?;
        // Deleting a missing key succeeds, as in S3
        stored.objects.remove(key);
        Ok(())
    }

    fn object_url(&self, bucket: &str, key: &str) -> Result<String> {
        addressing::object_url(&self.endpoint, self.path_style, bucket, key)
    }

    async fn presign(&self, request: &PresignRequest) -> Result<PresignedUrl> {
        self.record();
        let now = Utc::now();
        let url = format!(
            "{}?X-Amz-Algorithm=UNSIGNED&X-Amz-Date={}&X-Amz-Expires={}&X-Amz-Method={}",
            self.object_url(&request.bucket, &request.key)?,
            now.format("%Y%m%dT%H%M%SZ"),
            request.expires_in.as_secs(),
            request.method
        );

        Ok(PresignedUrl {
            url,
            method: request.method,
            expires_at: request.expires_at(now),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bucket_lifecycle() {
        let store = MemoryStore::new();
        assert!(!store.bucket_exists("b").await.unwrap());

        store.create_bucket("b").await.unwrap();
        assert!(store.bucket_exists("b").await.unwrap());
        assert!(store.create_bucket("b").await.is_err());

        store.delete_bucket("b").await.unwrap();
        assert!(!store.bucket_exists("b").await.unwrap());
        assert!(matches!(
            store.delete_bucket("b").await,
            Err(Error::NoSuchBucket { .. })
        ));
        assert_eq!(store.request_count(), 7);
    }

    #[tokio::test]
    async fn test_delete_non_empty_bucket() {
        let store = MemoryStore::new();
        store.create_bucket("b").await.unwrap();
        store
            .put_object("b", "k", ObjectBody::from("x"), 1, "text/plain")
            .await
            .unwrap();

        assert!(matches!(
            store.delete_bucket("b").await,
            Err(Error::BucketNotEmpty { .. })
        ));
    }

    #[tokio::test]
    async fn test_put_get_head() {
        let store = MemoryStore::new();
        store.create_bucket("b").await.unwrap();

        let out = store
            .put_object("b", "hello.txt", ObjectBody::from("hello"), 5, "text/plain")
            .await
            .unwrap();
        assert_eq!(
            out.e_tag.as_deref(),
            Some("\"5d41402abc4b2a76b9719d911017c592\"")
        );

        let info = store.head_object("b", "hello.txt").await.unwrap();
        assert_eq!(info.content_length, Some(5));
        assert_eq!(info.content_type.as_deref(), Some("text/plain"));

        let handle = store.get_object("b", "hello.txt").await.unwrap();
        assert_eq!(handle.into_bytes().await.unwrap(), Bytes::from_static(b"hello"));

        assert!(matches!(
            store.get_object("b", "missing").await,
            Err(Error::NoSuchKey { .. })
        ));
        assert!(matches!(
            store.head_object("nope", "hello.txt").await,
            Err(Error::NoSuchBucket { .. })
        ));
    }

    #[tokio::test]
    async fn test_put_length_mismatch() {
        let store = MemoryStore::new();
        store.create_bucket("b").await.unwrap();
        let err = store
            .put_object("b", "k", ObjectBody::from("abc"), 10, "text/plain")
            .await
            .unwrap_err();
        assert_eq!(err.code(), "BackendError");
    }

    #[tokio::test]
    async fn test_list_by_prefix() {
        let store = MemoryStore::new();
        store.create_bucket("b").await.unwrap();
        for key in ["a/1", "a/2", "ab", "b/1"] {
            store
                .put_object("b", key, ObjectBody::from("x"), 1, "text/plain")
                .await
                .unwrap();
        }

        let keys: Vec<String> = store
            .list_objects("b", "a/")
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.key)
            .collect();
        assert_eq!(keys, vec!["a/1", "a/2"]);

        assert_eq!(store.list_objects("b", "").await.unwrap().len(), 4);
        assert!(store.list_objects("missing", "").await.is_err());
    }

    #[tokio::test]
    async fn test_delete_missing_key_succeeds() {
        let store = MemoryStore::new();
        store.create_bucket("b").await.unwrap();
        store.delete_object("b", "never-written").await.unwrap();
        assert!(store.delete_object("nope", "k").await.is_err());
    }

    #[tokio::test]
    async fn test_presign_url_shape() {
        let store = MemoryStore::new();
        let request = PresignRequest::builder()
            .bucket("b")
            .key("dir/file name.txt")
            .build()
            .unwrap();

        let presigned = store.presign(&request).await.unwrap();
        assert!(presigned
            .url
            .starts_with("memory://localhost/b/dir/file%20name.txt?"));
        assert!(presigned.url.contains("X-Amz-Expires=600"));
        assert!(presigned.url.contains("X-Amz-Method=GET"));
    }
}
