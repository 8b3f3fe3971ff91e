//! buckets command - list buckets

use super::CommandContext;
use crate::utils::format_datetime;
use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;

#[derive(Serialize)]
struct BucketRow {
    name: String,
    creation_date: Option<String>,
}

pub async fn execute(ctx: &CommandContext, long: bool) -> Result<()> {
    let template = ctx.template()?;

    ctx.debug("Listing buckets...");

    let buckets = template
        .list_buckets()
        .await
        .context("Failed to list buckets")?;

    if ctx.is_json() {
        let rows: Vec<BucketRow> = buckets
            .iter()
            .map(|b| BucketRow {
                name: b.name.clone(),
                creation_date: b.creation_date.as_ref().map(format_datetime),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    for bucket in &buckets {
        if long {
            let date = bucket
                .creation_date
                .as_ref()
                .map(format_datetime)
                .unwrap_or_else(|| " ".repeat(19));
            println!("{} {}", date, bucket.name.blue().bold());
        } else {
            println!("{}", bucket.name.blue().bold());
        }
    }

    if !ctx.quiet {
        println!("\nTotal: {} bucket(s)", buckets.len());
    }

    Ok(())
}
