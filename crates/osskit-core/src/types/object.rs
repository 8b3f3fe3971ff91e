//! Object types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One entry of an object listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectSummary {
    pub bucket: String,
    pub key: String,
    pub size: u64,
    pub e_tag: Option<String>,
    pub last_modified: Option<DateTime<Utc>>,
    pub storage_class: Option<String>,
}

/// Object metadata as returned by a HEAD or GET
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectInfo {
    pub bucket: String,
    pub key: String,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub e_tag: Option<String>,
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl ObjectInfo {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            ..Self::default()
        }
    }
}

/// Result of a single-call object upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PutObjectOutput {
    pub bucket: String,
    pub key: String,
    pub e_tag: Option<String>,
    pub version_id: Option<String>,
    pub content_length: u64,
}
