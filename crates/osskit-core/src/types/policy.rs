//! Canned bucket access policies

use serde::{Deserialize, Serialize};
use serde_json::json;

/// Policy document version understood by S3-compatible backends
pub const POLICY_VERSION: &str = "2012-10-17";

const BUCKET_READ_ACTIONS: &[&str] = &["s3:GetBucketLocation", "s3:ListBucket"];
const BUCKET_WRITE_ACTIONS: &[&str] = &["s3:GetBucketLocation", "s3:ListBucketMultipartUploads"];
const BUCKET_READ_WRITE_ACTIONS: &[&str] = &[
    "s3:GetBucketLocation",
    "s3:ListBucket",
    "s3:ListBucketMultipartUploads",
];

const OBJECT_READ_ACTIONS: &[&str] = &["s3:GetObject"];
const OBJECT_WRITE_ACTIONS: &[&str] = &[
    "s3:AbortMultipartUpload",
    "s3:DeleteObject",
    "s3:ListMultipartUploadParts",
    "s3:PutObject",
];
const OBJECT_READ_WRITE_ACTIONS: &[&str] = &[
    "s3:AbortMultipartUpload",
    "s3:DeleteObject",
    "s3:GetObject",
    "s3:ListMultipartUploadParts",
    "s3:PutObject",
];

/// Anonymous access preset applied to a bucket after creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyType {
    /// No anonymous access
    #[default]
    Private,
    /// Anyone may list the bucket and download objects
    PublicRead,
    /// Anyone may list, download, upload and delete
    PublicReadWrite,
    /// Anyone may upload but not read
    WriteOnly,
}

impl PolicyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::PublicRead => "public-read",
            Self::PublicReadWrite => "public-read-write",
            Self::WriteOnly => "write-only",
        }
    }

    /// Bucket policy JSON granting this preset on `bucket`.
    ///
    /// `Private` has no document; the backend default already denies
    /// anonymous access.
    pub fn policy_document(&self, bucket: &str) -> Option<String> {
        let (bucket_actions, object_actions) = match self {
            Self::Private => return None,
            Self::PublicRead => (BUCKET_READ_ACTIONS, OBJECT_READ_ACTIONS),
            Self::PublicReadWrite => (BUCKET_READ_WRITE_ACTIONS, OBJECT_READ_WRITE_ACTIONS),
            Self::WriteOnly => (BUCKET_WRITE_ACTIONS, OBJECT_WRITE_ACTIONS),
        };

        let document = json!({
            "Version": POLICY_VERSION,
            "Statement": [
                {
                    "Effect": "Allow",
                    "Principal": { "AWS": ["*"] },
                    "Action": bucket_actions,
                    "Resource": [format!("arn:aws:s3:::{}", bucket)],
                },
                {
                    "Effect": "Allow",
                    "Principal": { "AWS": ["*"] },
                    "Action": object_actions,
                    "Resource": [format!("arn:aws:s3:::{}/*", bucket)],
                },
            ],
        });

        Some(document.to_string())
    }
}

impl std::fmt::Display for PolicyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PolicyType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "private" => Ok(Self::Private),
            "public-read" | "read-only" => Ok(Self::PublicRead),
            "public-read-write" | "read-write" => Ok(Self::PublicReadWrite),
            "write-only" => Ok(Self::WriteOnly),
            _ => Err(crate::Error::InvalidArgument(format!(
                "Unknown policy type: {}",
                s
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn statements(policy: PolicyType, bucket: &str) -> Vec<Value> {
        let doc: Value = serde_json::from_str(&policy.policy_document(bucket).unwrap()).unwrap();
        assert_eq!(doc["Version"], POLICY_VERSION);
        doc["Statement"].as_array().unwrap().clone()
    }

    fn actions(statement: &Value) -> Vec<&str> {
        statement["Action"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a.as_str().unwrap())
            .collect()
    }

    #[test]
    fn test_private_has_no_document() {
        assert!(PolicyType::Private.policy_document("b").is_none());
    }

    #[test]
    fn test_public_read_document() {
        let stmts = statements(PolicyType::PublicRead, "media");
        assert_eq!(stmts.len(), 2);
        assert_eq!(stmts[0]["Resource"][0], "arn:aws:s3:::media");
        assert_eq!(stmts[1]["Resource"][0], "arn:aws:s3:::media/*");
        assert_eq!(actions(&stmts[1]), vec!["s3:GetObject"]);
    }

    #[test]
    fn test_write_only_cannot_read() {
        let stmts = statements(PolicyType::WriteOnly, "drop");
        let object_actions = actions(&stmts[1]);
        assert!(object_actions.contains(&"s3:PutObject"));
        assert!(!object_actions.contains(&"s3:GetObject"));
        assert!(!actions(&stmts[0]).contains(&"s3:ListBucket"));
    }

    #[test]
    fn test_public_read_write_document() {
        let stmts = statements(PolicyType::PublicReadWrite, "shared");
        let object_actions = actions(&stmts[1]);
        assert!(object_actions.contains(&"s3:GetObject"));
        assert!(object_actions.contains(&"s3:PutObject"));
    }

    #[test]
    fn test_parse_policy_type() {
        assert_eq!("public-read".parse::<PolicyType>().unwrap(), PolicyType::PublicRead);
        assert_eq!(
            "PUBLIC_READ_WRITE".parse::<PolicyType>().unwrap(),
            PolicyType::PublicReadWrite
        );
        assert!("open".parse::<PolicyType>().is_err());
        assert_eq!(PolicyType::WriteOnly.to_string(), "write-only");
    }
}
