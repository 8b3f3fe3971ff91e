//! cat command - stream object content to stdout

use super::CommandContext;
use crate::object_path::ObjectPath;
use anyhow::{Context, Result};
use tokio::io::{stdout, AsyncWriteExt};

pub async fn execute(ctx: &CommandContext, path: &str) -> Result<()> {
    let template = ctx.template()?;
    let uri = ObjectPath::parse(path)?;
    let key = uri.require_key(path)?;

    ctx.debug(&format!("Streaming {}", ctx.display_path(&uri)));

    let handle = template
        .get_object(uri.bucket(), key)
        .await
        .context("Failed to get object")?;

    let mut stream = handle.body.into_async_read();
    let mut stdout = stdout();
    tokio::io::copy(&mut stream, &mut stdout).await?;
    stdout.flush().await?;

    Ok(())
}
