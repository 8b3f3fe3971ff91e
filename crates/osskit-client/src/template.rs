//! Configuration-driven facade over an [`ObjectStore`]

use crate::object::{ObjectBody, ObjectHandle, PutObjectRequest};
use crate::s3::S3Store;
use crate::store::ObjectStore;
use osskit_core::addressing;
use osskit_core::types::{
    find_bucket, BucketInfo, ObjectInfo, ObjectSummary, PolicyType, PresignMethod,
    PresignRequest, PutObjectOutput, DEFAULT_PRESIGN_EXPIRY,
};
use osskit_core::{Error, OssConfig, Result, DEFAULT_CONTENT_TYPE};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Bucket and object operations with configured defaults applied.
///
/// Every method taking `bucket: Option<&str>` falls back to the configured
/// default bucket and fails with [`Error::MissingDefaultBucket`] before
/// contacting the backend when neither is available.
#[derive(Clone)]
pub struct OssTemplate {
    config: Arc<OssConfig>,
    store: Arc<dyn ObjectStore>,
}

impl std::fmt::Debug for OssTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OssTemplate")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl OssTemplate {
    pub fn new(config: OssConfig, store: Arc<dyn ObjectStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    /// Build the facade and its S3 client from configuration.
    ///
    /// Returns `Ok(None)` when the config is disabled; nothing is constructed
    /// in that case.
    pub fn from_config(config: OssConfig) -> Result<Option<Self>> {
        if !config.enabled {
            info!("Object storage disabled by configuration");
            return Ok(None);
        }

        let store = S3Store::new(&config)?;
        Ok(Some(Self::new(config, Arc::new(store))))
    }

    pub fn config(&self) -> &OssConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    /// The configured default bucket
    pub fn default_bucket(&self) -> Result<&str> {
        self.config.default_bucket()
    }

    fn bucket<'a>(&'a self, bucket: Option<&'a str>) -> Result<&'a str> {
        self.config.resolve_bucket(bucket)
    }

    // Buckets

    pub async fn bucket_exists(&self, bucket: Option<&str>) -> Result<bool> {
        let bucket = self.bucket(bucket)?;
        self.store.bucket_exists(bucket).await
    }

    /// Create the bucket unless it already exists.
    ///
    /// Returns `true` once the bucket exists, whether or not this call
    /// created it.
    pub async fn create_bucket(&self, bucket: Option<&str>) -> Result<bool> {
        let bucket = self.bucket(bucket)?;
        if self.store.bucket_exists(bucket).await? {
            debug!("Bucket {} already exists", bucket);
            return Ok(true);
        }

        self.store.create_bucket(bucket).await?;
        info!("Created bucket {}", bucket);
        Ok(true)
    }

    /// Create the bucket, then attach the canned policy for `policy`
    pub async fn create_bucket_with_policy(
        &self,
        bucket: Option<&str>,
        policy: PolicyType,
    ) -> Result<bool> {
        let bucket = self.bucket(bucket)?;
        let created = self.create_bucket(Some(bucket)).await?;

        if created {
            if let Some(document) = policy.policy_document(bucket) {
                self.store.put_bucket_policy(bucket, &document).await?;
                info!("Applied {} policy to bucket {}", policy, bucket);
            }
        }
        Ok(created)
    }

    pub async fn list_buckets(&self) -> Result<Vec<BucketInfo>> {
        self.store.list_buckets().await
    }

    /// Find a bucket by exact name in the full bucket listing
    pub async fn get_bucket(&self, bucket: Option<&str>) -> Result<Option<BucketInfo>> {
        let bucket = self.bucket(bucket)?;
        let buckets = self.store.list_buckets().await?;
        Ok(find_bucket(buckets, bucket))
    }

    pub async fn delete_bucket(&self, bucket: Option<&str>) -> Result<()> {
        let bucket = self.bucket(bucket)?;
        self.store.delete_bucket(bucket).await
    }

    // Objects

    /// Objects whose key starts with `prefix`.
    ///
    /// Only the first page of results is returned; large buckets may be cut
    /// off at the backend's page size.
    pub async fn list_objects_by_prefix(
        &self,
        bucket: Option<&str>,
        prefix: &str,
    ) -> Result<Vec<ObjectSummary>> {
        let bucket = self.bucket(bucket)?;
        self.store.list_objects(bucket, prefix).await
    }

    /// Upload `body` under `key`. The content length comes from the body.
    pub async fn put_object(
        &self,
        bucket: Option<&str>,
        key: &str,
        body: ObjectBody,
        content_type: Option<&str>,
    ) -> Result<PutObjectOutput> {
        let mut request = PutObjectRequest::new(key, body);
        request.bucket = bucket.map(str::to_string);
        request.content_type = content_type.map(str::to_string);
        self.put_object_with(request).await
    }

    /// Upload with an explicit request.
    ///
    /// A declared `content_length` must equal the body's real length.
    pub async fn put_object_with(&self, request: PutObjectRequest) -> Result<PutObjectOutput> {
        let bucket = self.bucket(request.bucket.as_deref())?;
        if request.key.is_empty() {
            return Err(Error::InvalidArgument("Object key is required".into()));
        }

        let actual = request.body.content_length().await?;
        if let Some(declared) = request.content_length {
            if declared != actual {
                return Err(Error::InvalidArgument(format!(
                    "Declared content length {} does not match body length {}",
                    declared, actual
                )));
            }
        }

        let content_type = request
            .content_type
            .as_deref()
            .filter(|ct| !ct.trim().is_empty())
            .unwrap_or(DEFAULT_CONTENT_TYPE);

        self.store
            .put_object(bucket, &request.key, request.body, actual, content_type)
            .await
    }

    /// Fetch an object. The caller owns the returned content stream.
    pub async fn get_object(&self, bucket: Option<&str>, key: &str) -> Result<ObjectHandle> {
        let bucket = self.bucket(bucket)?;
        self.store.get_object(bucket, key).await
    }

    /// Object metadata without the content
    pub async fn object_info(&self, bucket: Option<&str>, key: &str) -> Result<ObjectInfo> {
        let bucket = self.bucket(bucket)?;
        self.store.head_object(bucket, key).await
    }

    pub async fn delete_object(&self, bucket: Option<&str>, key: &str) -> Result<()> {
        let bucket = self.bucket(bucket)?;
        self.store.delete_object(bucket, key).await
    }

    // URLs

    /// Unsigned object URL; only usable when the object is publicly readable
    pub fn object_url(&self, bucket: Option<&str>, key: &str) -> Result<String> {
        let bucket = self.bucket(bucket)?;
        self.store.object_url(bucket, key)
    }

    /// Pre-signed URL for one `method` request, valid for `expires_in`.
    ///
    /// Expiries beyond the backend maximum (7 days on S3) are rejected by the
    /// storage client, not here.
    pub async fn presigned_url(
        &self,
        bucket: Option<&str>,
        key: &str,
        expires_in: Duration,
        method: PresignMethod,
    ) -> Result<String> {
        let bucket = self.bucket(bucket)?;
        let request = PresignRequest::builder()
            .bucket(bucket)
            .key(key)
            .expires_in(expires_in)
            .method(method)
            .build()?;

        let presigned = self.store.presign(&request).await?;
        Ok(presigned.url)
    }

    /// Download URL, valid for 10 minutes unless `expires_in` is given
    pub async fn presigned_get_url(
        &self,
        bucket: Option<&str>,
        key: &str,
        expires_in: Option<Duration>,
    ) -> Result<String> {
        self.presigned_url(
            bucket,
            key,
            expires_in.unwrap_or(DEFAULT_PRESIGN_EXPIRY),
            PresignMethod::Get,
        )
        .await
    }

    /// Upload URL, valid for 10 minutes unless `expires_in` is given
    pub async fn presigned_put_url(
        &self,
        bucket: Option<&str>,
        key: &str,
        expires_in: Option<Duration>,
    ) -> Result<String> {
        self.presigned_url(
            bucket,
            key,
            expires_in.unwrap_or(DEFAULT_PRESIGN_EXPIRY),
            PresignMethod::Put,
        )
        .await
    }

    /// Public URL honouring the custom domain and addressing style settings
    pub fn gateway_url(&self, bucket: Option<&str>, key: &str) -> Result<String> {
        let bucket = self.bucket(bucket)?;
        addressing::gateway_url(&self.config, bucket, key)
    }
}
