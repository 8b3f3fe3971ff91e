//! rm command - delete an object

use super::CommandContext;
use crate::object_path::ObjectPath;
use anyhow::{Context, Result};
use colored::Colorize;

pub async fn execute(ctx: &CommandContext, path: &str) -> Result<()> {
    let template = ctx.template()?;
    let uri = ObjectPath::parse(path)?;
    let key = uri.require_key(path)?;

    ctx.debug(&format!("Deleting {}", ctx.display_path(&uri)));

    template
        .delete_object(uri.bucket(), key)
        .await
        .context("Failed to delete object")?;

    if !ctx.quiet {
        println!("{}: {}", "delete".red(), ctx.display_path(&uri));
    }

    Ok(())
}
