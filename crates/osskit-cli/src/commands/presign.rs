//! presign command - generate presigned URLs

use super::CommandContext;
use crate::object_path::ObjectPath;
use anyhow::{Context, Result};
use osskit_core::types::PresignMethod;
use std::time::Duration;

pub async fn execute(
    ctx: &CommandContext,
    path: &str,
    expires: u64,
    method: PresignMethod,
) -> Result<()> {
    let template = ctx.template()?;
    let uri = ObjectPath::parse(path)?;
    let key = uri.require_key(path)?;

    ctx.debug(&format!(
        "Generating presigned URL for {} ({} method, {} seconds)",
        ctx.display_path(&uri),
        method,
        expires
    ));

    let url = template
        .presigned_url(uri.bucket(), key, Duration::from_secs(expires), method)
        .await
        .context("Failed to presign request")?;

    if ctx.is_json() {
        let result = serde_json::json!({
            "url": url,
            "method": method.to_string(),
            "expires_in": expires,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", url);
    }

    Ok(())
}
