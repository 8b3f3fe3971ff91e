//! mb command - make bucket

use super::{bucket_arg, CommandContext};
use anyhow::{Context, Result};
use colored::Colorize;
use osskit_core::types::PolicyType;

pub async fn execute(ctx: &CommandContext, bucket: Option<&str>, policy: PolicyType) -> Result<()> {
    let template = ctx.template()?;
    let bucket_name = template.config().resolve_bucket(bucket_arg(bucket))?.to_string();

    ctx.debug(&format!("Creating bucket: {} (policy {})", bucket_name, policy));

    template
        .create_bucket_with_policy(Some(&bucket_name), policy)
        .await
        .context("Failed to create bucket")?;

    if ctx.is_json() {
        let result = serde_json::json!({
            "bucket": bucket_name,
            "policy": policy,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if !ctx.quiet {
        println!("{}: s3://{}", "make_bucket".green(), bucket_name);
    }

    Ok(())
}
