//! S3-compatible backend on top of the AWS SDK

use crate::object::{ObjectBody, ObjectHandle, ObjectStream};
use crate::store::ObjectStore;
use async_trait::async_trait;
use aws_config::Region;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::config::{BehaviorVersion, Builder as S3ConfigBuilder};
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::{ByteStream, DateTime as SdkDateTime};
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use aws_sdk_s3::Client;
use chrono::{DateTime, Utc};
use osskit_core::addressing;
use osskit_core::types::{
    BucketInfo, ObjectInfo, ObjectSummary, PresignMethod, PresignRequest, PresignedUrl,
    PutObjectOutput,
};
use osskit_core::{Error, OssConfig, Result, DEFAULT_REGION};
use std::collections::HashMap;
use tracing::{debug, info};

/// [`ObjectStore`] backed by an `aws_sdk_s3::Client`
#[derive(Debug, Clone)]
pub struct S3Store {
    client: Client,
    endpoint: String,
    region: String,
    path_style: bool,
}

impl S3Store {
    /// Build an S3 client from configuration
    pub fn new(config: &OssConfig) -> Result<Self> {
        config.validate()?;

        let credentials = Credentials::new(
            &config.access_key,
            &config.secret_key,
            None,
            None,
            "osskit",
        );

        let s3_config = S3ConfigBuilder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .endpoint_url(&config.endpoint)
            .force_path_style(config.path_style_access)
            .build();

        info!(
            endpoint = %config.endpoint,
            region = %config.region,
            path_style = config.path_style_access,
            "S3 client configured"
        );

        Ok(Self::from_client(
            Client::from_conf(s3_config),
            &config.endpoint,
            &config.region,
            config.path_style_access,
        ))
    }

    /// Wrap an already configured client
    pub fn from_client(
        client: Client,
        endpoint: impl Into<String>,
        region: impl Into<String>,
        path_style: bool,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            region: region.into(),
            path_style,
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn bucket_exists(&self, bucket: &str) -> Result<bool> {
        debug!("HeadBucket {}", bucket);

        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(true),
            Err(err) => {
                if err.as_service_error().is_some_and(|e| e.is_not_found()) {
                    return Ok(false);
                }
                match err.raw_response().map(|r| r.status().as_u16()) {
                    Some(404) => Ok(false),
                    // The bucket exists but belongs to another account
                    Some(403) => Ok(true),
                    _ => Err(sdk_error("HeadBucket", bucket, None, err)),
                }
            }
        }
    }

    async fn create_bucket(&self, bucket: &str) -> Result<()> {
        debug!("CreateBucket {}", bucket);

        let mut req = self.client.create_bucket().bucket(bucket);

        // us-east-1 rejects an explicit location constraint
        if self.region != DEFAULT_REGION {
            let constraint = BucketLocationConstraint::from(self.region.as_str());
            let config = CreateBucketConfiguration::builder()
                .location_constraint(constraint)
                .build();
            req = req.create_bucket_configuration(config);
        }

        req.send()
            .await
            .map_err(|e| sdk_error("CreateBucket", bucket, None, e))?;
        Ok(())
    }

    async fn put_bucket_policy(&self, bucket: &str, policy: &str) -> Result<()> {
        debug!("PutBucketPolicy {}", bucket);

        self.client
            .put_bucket_policy()
            .bucket(bucket)
            .policy(policy)
            .send()
            .await
            .map_err(|e| sdk_error("PutBucketPolicy", bucket, None, e))?;
        Ok(())
    }

    async fn list_buckets(&self) -> Result<Vec<BucketInfo>> {
        debug!("ListBuckets");

        let resp = self
            .client
            .list_buckets()
            .send()
            .await
            .map_err(|e| sdk_error("ListBuckets", "", None, e))?;

        Ok(resp
            .buckets()
            .iter()
            .map(|b| BucketInfo {
                name: b.name().unwrap_or("").to_string(),
                creation_date: b.creation_date().and_then(to_chrono),
            })
            .collect())
    }

    async fn delete_bucket(&self, bucket: &str) -> Result<()> {
        debug!("DeleteBucket {}", bucket);

        self.client
            .delete_bucket()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| sdk_error("DeleteBucket", bucket, None, e))?;
        Ok(())
    }

    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectSummary>> {
        debug!("ListObjectsV2 {} prefix={:?}", bucket, prefix);

        let mut req = self.client.list_objects_v2().bucket(bucket);
        if !prefix.is_empty() {
            req = req.prefix(prefix);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| sdk_error("ListObjectsV2", bucket, None, e))?;

        if resp.is_truncated().unwrap_or(false) {
            debug!(
                "Listing of {} prefix={:?} truncated after {} keys",
                bucket,
                prefix,
                resp.contents().len()
            );
        }

        Ok(resp
            .contents()
            .iter()
            .map(|obj| ObjectSummary {
                bucket: bucket.to_string(),
                key: obj.key().unwrap_or("").to_string(),
                size: obj.size().unwrap_or(0).max(0) as u64,
                e_tag: obj.e_tag().map(|s| s.to_string()),
                last_modified: obj.last_modified().and_then(to_chrono),
                storage_class: obj.storage_class().map(|s| s.as_str().to_string()),
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
        debug!(
            "PutObject {}/{} ({} bytes, {})",
            bucket, key, content_length, content_type
        );

        let stream = match body {
            ObjectBody::Bytes(bytes) => ByteStream::from(bytes),
            ObjectBody::File(path) => ByteStream::from_path(&path).await.map_err(|e| {
                Error::InvalidArgument(format!("Cannot read {}: {}", path.display(), e))
            })?,
        };

        let resp = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_length(content_length as i64)
            .content_type(content_type)
            .body(stream)
            .send()
            .await
            .map_err(|e| sdk_error("PutObject", bucket, Some(key), e))?;

        Ok(PutObjectOutput {
            bucket: bucket.to_string(),
            key: key.to_string(),
            e_tag: resp.e_tag().map(|s| s.to_string()),
            version_id: resp.version_id().map(|s| s.to_string()),
            content_length,
        })
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectHandle> {
        debug!("GetObject {}/{}", bucket, key);

        let resp = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| sdk_error("GetObject", bucket, Some(key), e))?;

        let info = ObjectInfo {
            bucket: bucket.to_string(),
            key: key.to_string(),
            content_type: resp.content_type().map(|s| s.to_string()),
            content_length: resp.content_length().map(|l| l.max(0) as u64),
            e_tag: resp.e_tag().map(|s| s.to_string()),
            last_modified: resp.last_modified().and_then(to_chrono),
            metadata: copy_metadata(resp.metadata()),
        };

        Ok(ObjectHandle {
            info,
            body: ObjectStream::new(resp.body.into_async_read()),
        })
    }

    async fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectInfo> {
        debug!("HeadObject {}/{}", bucket, key);

        let resp = self
            .client
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| sdk_error("HeadObject", bucket, Some(key), e))?;

        Ok(ObjectInfo {
            bucket: bucket.to_string(),
            key: key.to_string(),
            content_type: resp.content_type().map(|s| s.to_string()),
            content_length: resp.content_length().map(|l| l.max(0) as u64),
            e_tag: resp.e_tag().map(|s| s.to_string()),
            last_modified: resp.last_modified().and_then(to_chrono),
            metadata: copy_metadata(resp.metadata()),
        })
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        debug!("DeleteObject {}/{}", bucket, key);

        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| sdk_error("DeleteObject", bucket, Some(key), e))?;
        Ok(())
    }

    fn object_url(&self, bucket: &str, key: &str) -> Result<String> {
        addressing::object_url(&self.endpoint, self.path_style, bucket, key)
    }

    async fn presign(&self, request: &PresignRequest) -> Result<PresignedUrl> {
        debug!(
            "Presign {} {}/{} for {:?}",
            request.method, request.bucket, request.key, request.expires_in
        );

        // The SDK enforces the backend's maximum expiry here
        let presign_config = PresigningConfig::expires_in(request.expires_in)
            .map_err(|e| Error::backend("Presign", e))?;
        let now = Utc::now();

        let url = match request.method {
            PresignMethod::Get => self
                .client
                .get_object()
                .bucket(&request.bucket)
                .key(&request.key)
                .presigned(presign_config)
                .await
                .map_err(|e| sdk_error("Presign", &request.bucket, Some(&request.key), e))?
                .uri()
                .to_string(),
            PresignMethod::Put => self
                .client
                .put_object()
                .bucket(&request.bucket)
                .key(&request.key)
                .presigned(presign_config)
                .await
                .map_err(|e| sdk_error("Presign", &request.bucket, Some(&request.key), e))?
                .uri()
                .to_string(),
        };

        Ok(PresignedUrl {
            url,
            method: request.method,
            expires_at: request.expires_at(now),
        })
    }
}

/// Map an SDK failure onto the crate error.
///
/// Well-known S3 codes get their own variant; everything else is forwarded
/// with the SDK error as the source.
fn sdk_error<E>(
    operation: &'static str,
    bucket: &str,
    key: Option<&str>,
    err: SdkError<E, HttpResponse>,
) -> Error
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    let status = err.raw_response().map(|r| r.status().as_u16());
    let code = err.code().map(str::to_string);

    // The SDK error stays attached as the source in every case
    match (code.as_deref(), key) {
        (Some("NoSuchBucket"), _) => Error::no_such_bucket(bucket, err),
        (Some("NoSuchKey") | Some("NotFound"), Some(key)) => Error::no_such_key(bucket, key, err),
        (Some("BucketNotEmpty"), None) => Error::bucket_not_empty(bucket, err),
        // HEAD responses carry no error body, only the status
        (None, Some(key)) if status == Some(404) => Error::no_such_key(bucket, key, err),
        _ => Error::Backend {
            operation,
            message: DisplayErrorContext(&err).to_string(),
            source: Box::new(err),
        },
    }
}

fn to_chrono(dt: &SdkDateTime) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(dt.secs(), dt.subsec_nanos())
}

fn copy_metadata(metadata: Option<&HashMap<String, String>>) -> HashMap<String, String> {
    metadata.cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> OssConfig {
        OssConfig::new("http://localhost:9000", "minioadmin", "minioadmin")
    }

    #[tokio::test]
    async fn test_new_rejects_incomplete_config() {
        let err = S3Store::new(&OssConfig::new("", "ak", "sk")).unwrap_err();
        assert!(err.is_configuration());
    }

    #[tokio::test]
    async fn test_object_url_path_style() {
        let store = S3Store::new(&config()).unwrap();
        assert_eq!(
            store.object_url("media", "a b.txt").unwrap(),
            "http://localhost:9000/media/a%20b.txt"
        );
    }

    #[tokio::test]
    async fn test_object_url_virtual_host() {
        let store = S3Store::new(
            &OssConfig::new("https://s3.example.com", "ak", "sk").with_path_style_access(false),
        )
        .unwrap();
        assert_eq!(
            store.object_url("media", "docs/readme.md").unwrap(),
            "https://media.s3.example.com/docs/readme.md"
        );
    }

    #[tokio::test]
    async fn test_presign_is_local() {
        let store = S3Store::new(&config()).unwrap();
        let request = PresignRequest::builder()
            .bucket("media")
            .key("upload.txt")
            .method(PresignMethod::Put)
            .expires_in(std::time::Duration::from_secs(300))
            .build()
            .unwrap();

        let presigned = store.presign(&request).await.unwrap();
        assert!(presigned.url.starts_with("http://localhost:9000/media/upload.txt?"));
        assert!(presigned.url.contains("X-Amz-Expires=300"));
        assert_eq!(presigned.method, PresignMethod::Put);
    }

    #[tokio::test]
    async fn test_presign_expiry_over_backend_maximum() {
        let store = S3Store::new(&config()).unwrap();
        let request = PresignRequest::builder()
            .bucket("media")
            .key("k")
            .expires_in(std::time::Duration::from_secs(8 * 24 * 3600))
            .build()
            .unwrap();

        let err = store.presign(&request).await.unwrap_err();
        assert_eq!(err.kind(), osskit_core::ErrorKind::Backend);
    }

    #[tokio::test]
    async fn test_unreadable_file_body_is_local() {
        let store = S3Store::new(&config()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.bin");

        let err = store
            .put_object("media", "k", ObjectBody::from_path(&missing), 0, "text/plain")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), osskit_core::ErrorKind::Misuse);
    }

    fn not_found_response() -> HttpResponse {
        HttpResponse::new(
            404u16.try_into().unwrap(),
            aws_sdk_s3::primitives::SdkBody::empty(),
        )
    }

    #[test]
    fn test_sdk_not_found_keeps_source() {
        use aws_sdk_s3::error::ErrorMetadata;
        use aws_sdk_s3::operation::get_object::GetObjectError;
        use aws_sdk_s3::types::error::NoSuchKey;

        let service_error = GetObjectError::NoSuchKey(
            NoSuchKey::builder()
                .message("The specified key does not exist.")
                .meta(
                    ErrorMetadata::builder()
                        .code("NoSuchKey")
                        .message("The specified key does not exist.")
                        .build(),
                )
                .build(),
        );
        let err = sdk_error(
            "GetObject",
            "media",
            Some("k"),
            SdkError::service_error(service_error, not_found_response()),
        );

        assert!(matches!(&err, Error::NoSuchKey { bucket, key, .. } if bucket == "media" && key == "k"));
        let source = std::error::Error::source(&err).unwrap();
        assert!(source
            .downcast_ref::<SdkError<GetObjectError, HttpResponse>>()
            .is_some());
    }

    #[test]
    fn test_to_chrono() {
        let dt = SdkDateTime::from_secs(1_700_000_000);
        assert_eq!(to_chrono(&dt).unwrap().timestamp(), 1_700_000_000);
    }

    /// Round trip against a real endpoint configured through `OSS_*`
    /// variables. Against a local MinIO:
    ///
    /// ```text
    /// docker run -d -p 9000:9000 minio/minio server /data
    /// OSS_ENDPOINT=http://localhost:9000 OSS_ACCESS_KEY=minioadmin \
    ///     OSS_SECRET_KEY=minioadmin cargo test -p osskit-client -- --ignored
    /// ```
    #[tokio::test]
    #[ignore]
    async fn test_live_presigned_put_round_trip() {
        use crate::OssTemplate;

        let config = OssConfig::from_env()
            .unwrap()
            .with_bucket_name("s3-oss");
        let oss = OssTemplate::from_config(config).unwrap().unwrap();
        assert!(oss.create_bucket(None).await.unwrap());

        let key = format!("upload-{}.txt", Utc::now().timestamp_millis());
        let content = "it is a new content(for upload url)";
        let url = oss
            .presigned_put_url(None, &key, Some(std::time::Duration::from_secs(300)))
            .await
            .unwrap();
        assert!(url.contains("X-Amz-Expires"));

        assert!(oss.get_object(None, &key).await.is_err());

        let resp = reqwest::Client::new()
            .put(&url)
            .body(content)
            .send()
            .await
            .unwrap();
        assert!(resp.status().is_success());

        let handle = oss.get_object(None, &key).await.unwrap();
        let body = handle.into_bytes().await.unwrap();
        assert_eq!(body.as_ref(), content.as_bytes());

        oss.delete_object(None, &key).await.unwrap();
    }
}
