//! ls command - list objects under a prefix

use super::CommandContext;
use crate::object_path::ObjectPath;
use crate::utils::{format_datetime, format_size};
use anyhow::{Context, Result};
use colored::Colorize;
use osskit_core::types::ObjectSummary;
use serde::Serialize;

#[derive(Serialize)]
struct ListResult<'a> {
    bucket: &'a str,
    prefix: &'a str,
    objects: &'a [ObjectSummary],
    total_objects: usize,
    total_size: u64,
}

pub async fn execute(
    ctx: &CommandContext,
    path: Option<&str>,
    long: bool,
    human_readable: bool,
    summarize: bool,
) -> Result<()> {
    let template = ctx.template()?;
    let path = ObjectPath::parse(path.unwrap_or(""))?;
    let bucket = template.config().resolve_bucket(path.bucket())?.to_string();
    let prefix = path.key_or_empty();

    ctx.debug(&format!(
        "Listing objects in bucket '{}' with prefix '{}'",
        bucket, prefix
    ));

    let objects = template
        .list_objects_by_prefix(Some(&bucket), prefix)
        .await
        .context("Failed to list objects")?;
    let total_size: u64 = objects.iter().map(|o| o.size).sum();

    if ctx.is_json() {
        let result = ListResult {
            bucket: &bucket,
            prefix,
            objects: &objects,
            total_objects: objects.len(),
            total_size,
        };
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if summarize {
        println!(
            "Total Objects: {}\nTotal Size: {}",
            objects.len(),
            format_size(total_size, human_readable)
        );
    } else {
        for obj in &objects {
            if long {
                let date = obj
                    .last_modified
                    .as_ref()
                    .map(format_datetime)
                    .unwrap_or_else(|| " ".repeat(19));
                let storage = obj.storage_class.as_deref().unwrap_or("STANDARD");
                println!(
                    "{} {:>12}  {:8}  {}",
                    date,
                    format_size(obj.size, human_readable),
                    storage,
                    obj.key
                );
            } else {
                println!("{}", obj.key);
            }
        }

        if !ctx.quiet {
            println!(
                "\nTotal: {} object(s), {}",
                objects.len(),
                format_size(total_size, human_readable).bold()
            );
        }
    }

    Ok(())
}
