//! Bucket types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A bucket as reported by the backend's bucket listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketInfo {
    pub name: String,
    pub creation_date: Option<DateTime<Utc>>,
}

impl BucketInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            creation_date: None,
        }
    }

    pub fn with_creation_date(mut self, date: DateTime<Utc>) -> Self {
        self.creation_date = Some(date);
        self
    }
}

/// Exact-name lookup in a bucket listing
pub fn find_bucket(buckets: Vec<BucketInfo>, name: &str) -> Option<BucketInfo> {
    buckets.into_iter().find(|b| b.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_bucket_exact_match_only() {
        let buckets = vec![
            BucketInfo::new("photos"),
            BucketInfo::new("photos-archive"),
            BucketInfo::new("logs"),
        ];

        assert_eq!(
            find_bucket(buckets.clone(), "photos").map(|b| b.name),
            Some("photos".to_string())
        );
        assert!(find_bucket(buckets.clone(), "photo").is_none());
        assert!(find_bucket(buckets.clone(), "PHOTOS").is_none());
        assert!(find_bucket(buckets, "archive").is_none());
    }
}
