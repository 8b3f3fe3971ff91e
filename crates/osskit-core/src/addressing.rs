//! URL construction for objects under path-style, virtual-host-style and
//! custom-domain addressing

use crate::{Error, OssConfig, Result};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::Url;

/// Characters escaped inside a single key segment (RFC 3986 unreserved stay)
const KEY_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Public URL of an object, assuming the bucket grants public read.
///
/// A configured custom domain wins and the bucket is not part of the URL.
/// Otherwise the bucket is placed in the path or in the host depending on
/// `path_style_access`. Keys are joined verbatim.
pub fn gateway_url(config: &OssConfig, bucket: &str, key: &str) -> Result<String> {
    if let Some(domain) = config.custom_domain() {
        return Ok(format!("{}/{}", trim_trailing_slash(domain), key));
    }

    let base = bucket_base_url(&config.endpoint, config.path_style_access, bucket)?;
    Ok(format!("{}/{}", base, key))
}

/// Root URL of a bucket on `endpoint`
pub fn bucket_base_url(endpoint: &str, path_style: bool, bucket: &str) -> Result<String> {
    if path_style {
        Ok(format!("{}/{}", trim_trailing_slash(endpoint), bucket))
    } else {
        virtual_host_endpoint(endpoint, bucket)
    }
}

/// Rewrite `scheme://authority` into `scheme://bucket.authority`
pub fn virtual_host_endpoint(endpoint: &str, bucket: &str) -> Result<String> {
    let invalid = |reason: String| Error::InvalidEndpoint {
        bucket: bucket.to_string(),
        reason,
    };

    if bucket.is_empty()
        || bucket.starts_with('.')
        || bucket.ends_with('.')
        || bucket
            .chars()
            .any(|c| matches!(c, '/' | ':' | '@' | '?' | '#') || c.is_whitespace())
    {
        return Err(invalid("bucket name is not a valid host label".into()));
    }

    let raw = endpoint.trim();
    let url = Url::parse(raw).map_err(|e| invalid(format!("{}: {}", endpoint, e)))?;
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid(format!("{}: endpoint has no host", endpoint)));
    }

    // Scheme and authority are reused as written, so explicit ports and
    // user-info survive
    let (scheme, rest) = raw
        .split_once("://")
        .ok_or_else(|| invalid(format!("{}: endpoint has no authority", endpoint)))?;
    let authority = rest.split(['/', '?', '#']).next().unwrap_or(rest);

    Ok(format!("{}://{}.{}", scheme, bucket, authority))
}

/// Unsigned URL the S3 client would address for `bucket`/`key`, with each
/// key segment percent-encoded
pub fn object_url(endpoint: &str, path_style: bool, bucket: &str, key: &str) -> Result<String> {
    let base = bucket_base_url(endpoint, path_style, bucket)?;
    Ok(format!("{}/{}", base, encode_key(key)))
}

/// Percent-encode an object key, keeping `/` separators
pub fn encode_key(key: &str) -> String {
    key.split('/')
        .map(|segment| utf8_percent_encode(segment, KEY_SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

fn trim_trailing_slash(url: &str) -> &str {
    url.trim().strip_suffix('/').unwrap_or(url.trim())
}
