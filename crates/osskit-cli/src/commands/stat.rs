//! stat command - show object metadata

use super::CommandContext;
use crate::object_path::ObjectPath;
use crate::utils::{format_datetime, format_size};
use anyhow::{Context, Result};
use colored::Colorize;

pub async fn execute(ctx: &CommandContext, path: &str) -> Result<()> {
    let template = ctx.template()?;
    let uri = ObjectPath::parse(path)?;
    let key = uri.require_key(path)?;

    ctx.debug(&format!("Getting metadata for {}", ctx.display_path(&uri)));

    let info = template
        .object_info(uri.bucket(), key)
        .await
        .context("Failed to get object metadata")?;

    if ctx.is_json() {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{}", format!("s3://{}/{}", info.bucket, info.key).blue().bold());
    println!();

    if let Some(ct) = &info.content_type {
        println!("  {}: {}", "Content-Type".cyan(), ct);
    }
    if let Some(len) = info.content_length {
        println!(
            "  {}: {} ({})",
            "Content-Length".cyan(),
            len,
            format_size(len, true)
        );
    }
    if let Some(lm) = &info.last_modified {
        println!("  {}: {} UTC", "Last-Modified".cyan(), format_datetime(lm));
    }
    if let Some(etag) = &info.e_tag {
        println!("  {}: {}", "ETag".cyan(), etag);
    }

    if !info.metadata.is_empty() {
        println!();
        println!("  {}:", "Metadata".cyan());
        let mut entries: Vec<_> = info.metadata.iter().collect();
        entries.sort();
        for (k, v) in entries {
            println!("    {}: {}", k, v);
        }
    }

    Ok(())
}
