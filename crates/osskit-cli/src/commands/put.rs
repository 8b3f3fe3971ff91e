//! put command - upload a local file

use super::CommandContext;
use crate::object_path::ObjectPath;
use crate::utils::{determine_dest_key, format_size, guess_content_type};
use anyhow::{Context, Result};
use colored::Colorize;
use osskit_client::ObjectBody;
use std::path::Path;

pub async fn execute(
    ctx: &CommandContext,
    file: &Path,
    dest: Option<&str>,
    content_type: Option<String>,
) -> Result<()> {
    let template = ctx.template()?;

    if !file.is_file() {
        anyhow::bail!("Not a file: {}", file.display());
    }

    let source = file.to_string_lossy();
    let dest = ObjectPath::parse(dest.unwrap_or(""))?;
    let key = determine_dest_key(&source, dest.key.as_deref());
    let target = ObjectPath {
        bucket: dest.bucket.clone(),
        key: Some(key.clone()),
    };
    let content_type = content_type.unwrap_or_else(|| guess_content_type(&source));

    ctx.debug(&format!(
        "Uploading {} to {} ({})",
        file.display(),
        ctx.display_path(&target),
        content_type
    ));

    let output = template
        .put_object(
            dest.bucket(),
            &key,
            ObjectBody::from_path(file),
            Some(&content_type),
        )
        .await
        .with_context(|| format!("Failed to upload {}", file.display()))?;

    if ctx.is_json() {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!(
            "{}: {} -> s3://{}/{} ({})",
            "upload".green(),
            file.display(),
            output.bucket,
            output.key,
            format_size(output.content_length, true)
        );
    }

    Ok(())
}
