//! Storage client abstraction the facade delegates to

use crate::object::{ObjectBody, ObjectHandle};
use async_trait::async_trait;
use osskit_core::types::{
    BucketInfo, ObjectInfo, ObjectSummary, PresignRequest, PresignedUrl, PutObjectOutput,
};
use osskit_core::Result;

/// One-to-one view of the S3 operations the facade needs.
///
/// Implementations perform no retries of their own and report every backend
/// failure to the caller.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Check if bucket exists
    async fn bucket_exists(&self, bucket: &str) -> Result<bool>;

    /// Create a bucket. Fails if it already exists.
    async fn create_bucket(&self, bucket: &str) -> Result<()>;

    /// Replace the bucket policy with a JSON policy document
    async fn put_bucket_policy(&self, bucket: &str, policy: &str) -> Result<()>;

    /// List every bucket visible to the credentials
    async fn list_buckets(&self) -> Result<Vec<BucketInfo>>;

    /// Delete an empty bucket
    async fn delete_bucket(&self, bucket: &str) -> Result<()>;

    /// First page of objects whose key starts with `prefix`
    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectSummary>>;

    /// Store an object in one request
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: ObjectBody,
        content_length: u64,
        content_type: &str,
    ) -> Result<PutObjectOutput>;

    /// Fetch an object with its content stream
    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectHandle>;

    /// Fetch object metadata only
    async fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectInfo>;

    /// Delete an object
    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()>;

    /// Unsigned URL of an object
    fn object_url(&self, bucket: &str, key: &str) -> Result<String>;

    /// Sign a time-limited URL for one GET or PUT
    async fn presign(&self, request: &PresignRequest) -> Result<PresignedUrl>;
}
