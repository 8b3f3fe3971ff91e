//! rb command - remove bucket

use super::{bucket_arg, CommandContext};
use crate::utils::confirm;
use anyhow::{Context, Result};
use colored::Colorize;

pub async fn execute(ctx: &CommandContext, bucket: Option<&str>, force: bool) -> Result<()> {
    let template = ctx.template()?;
    let bucket_name = template.config().resolve_bucket(bucket_arg(bucket))?.to_string();
    let bucket = Some(bucket_name.as_str());

    // If force, delete all objects first
    if force {
        if !ctx.quiet {
            let msg = format!(
                "Delete all objects in bucket '{}' and remove bucket?",
                bucket_name
            );
            if !confirm(&msg)? {
                ctx.info("Cancelled");
                return Ok(());
            }
        }

        ctx.debug(&format!("Deleting all objects in bucket: {}", bucket_name));

        // Listing is one page at a time, so keep going until it comes back empty
        loop {
            let objects = template.list_objects_by_prefix(bucket, "").await?;
            if objects.is_empty() {
                break;
            }
            for object in &objects {
                template.delete_object(bucket, &object.key).await?;
                ctx.debug(&format!("delete: s3://{}/{}", bucket_name, object.key));
            }
        }
    }

    ctx.debug(&format!("Removing bucket: {}", bucket_name));

    template
        .delete_bucket(bucket)
        .await
        .context("Failed to delete bucket. Bucket may not be empty (use --force).")?;

    if !ctx.quiet {
        println!("{}: s3://{}", "remove_bucket".red(), bucket_name);
    }

    Ok(())
}
