//! get command - download an object to a local file

use super::CommandContext;
use crate::object_path::ObjectPath;
use crate::utils::{extract_filename, format_size};
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

pub async fn execute(ctx: &CommandContext, path: &str, dest: Option<PathBuf>) -> Result<()> {
    let template = ctx.template()?;
    let uri = ObjectPath::parse(path)?;
    let key = uri.require_key(path)?;

    // A directory destination keeps the key's file name
    let dest = match dest {
        Some(dir) if dir.is_dir() => dir.join(extract_filename(key)),
        Some(file) => file,
        None => PathBuf::from(extract_filename(key)),
    };

    ctx.debug(&format!(
        "Downloading {} to {}",
        ctx.display_path(&uri),
        dest.display()
    ));

    let handle = template
        .get_object(uri.bucket(), key)
        .await
        .context("Failed to get object")?;

    let mut reader = handle.body.into_async_read();
    let mut file = File::create(&dest)
        .await
        .with_context(|| format!("Failed to create {}", dest.display()))?;
    let written = tokio::io::copy(&mut reader, &mut file).await?;
    file.flush().await?;

    if !ctx.quiet {
        println!(
            "{}: {} -> {} ({})",
            "download".green(),
            ctx.display_path(&uri),
            dest.display(),
            format_size(written, true)
        );
    }

    Ok(())
}
