//! configure command - manage profiles

use super::CommandContext;
use crate::config::{self, DEFAULT_PROFILE};
use crate::ConfigureAction;
use anyhow::Result;
use colored::Colorize;
use osskit_core::OssConfig;
use std::io::{self, Write};
use std::path::Path;

pub async fn execute(ctx: &CommandContext, action: Option<ConfigureAction>) -> Result<()> {
    let path = ctx.config_path.as_path();
    let profile = ctx.profile.as_deref();

    match action {
        Some(ConfigureAction::Set { key, value }) => set_config(path, profile, &key, &value),
        Some(ConfigureAction::Get { key }) => get_config(ctx, &key),
        Some(ConfigureAction::List) => list_config(ctx),
        Some(ConfigureAction::AddProfile { name }) => add_profile(path, &name),
        Some(ConfigureAction::RemoveProfile { name }) => remove_profile(path, &name),
        None => interactive_configure(path, profile),
    }
}

/// Profile contents without the env overlay, so `set` never persists env values
fn read_profile(path: &Path, profile: Option<&str>) -> Result<OssConfig> {
    let file = config::ProfileFile::read(path)?;
    Ok(file
        .profiles
        .get(profile.unwrap_or(DEFAULT_PROFILE))
        .cloned()
        .unwrap_or_default())
}

fn set_config(path: &Path, profile: Option<&str>, key: &str, value: &str) -> Result<()> {
    let mut oss = read_profile(path, profile)?;
    config::set_value(&mut oss, key, value)?;
    config::save(path, profile, &oss)?;
    println!("Set {} = {}", key.cyan(), value);
    Ok(())
}

fn get_config(ctx: &CommandContext, key: &str) -> Result<()> {
    match config::get_value(&ctx.config, key) {
        Some(value) => println!("{}", value),
        None => println!("(not set)"),
    }
    Ok(())
}

fn list_config(ctx: &CommandContext) -> Result<()> {
    if ctx.is_json() {
        let values: serde_json::Map<String, serde_json::Value> = config::keys()
            .iter()
            .map(|key| {
                let value = config::get_value(&ctx.config, key)
                    .map(serde_json::Value::String)
                    .unwrap_or(serde_json::Value::Null);
                (key.to_string(), value)
            })
            .collect();
        let result = serde_json::json!({
            "profile": ctx.profile.as_deref().unwrap_or(DEFAULT_PROFILE),
            "values": values,
            "profiles": config::list_profiles(&ctx.config_path)?,
            "config_file": ctx.config_path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!(
        "{} [{}]",
        "Current configuration".bold(),
        ctx.profile.as_deref().unwrap_or(DEFAULT_PROFILE)
    );
    println!();

    for key in config::keys() {
        let value = config::get_value(&ctx.config, key).unwrap_or_else(|| "(not set)".to_string());
        println!("  {}: {}", key.cyan(), value);
    }

    println!();
    println!("{}", "Available profiles:".bold());

    let profiles = config::list_profiles(&ctx.config_path)?;
    if profiles.is_empty() {
        println!("  (none)");
    } else {
        for profile in profiles {
            println!("  - {}", profile);
        }
    }

    println!();
    println!(
        "Config file: {}",
        ctx.config_path.display().to_string().dimmed()
    );

    Ok(())
}

fn add_profile(path: &Path, name: &str) -> Result<()> {
    config::save(path, Some(name), &OssConfig::default())?;
    println!("Created profile: {}", name.green());
    println!(
        "Use 'osskit configure set <key> <value> --profile {}' to configure it.",
        name
    );
    Ok(())
}

fn remove_profile(path: &Path, name: &str) -> Result<()> {
    config::delete_profile(path, name)?;
    println!("Removed profile: {}", name.red());
    Ok(())
}

/// Prompt for a value, keeping `current` on empty input
fn prompt(label: &str, current: &str) -> Result<Option<String>> {
    print!("{} [{}]: ", label, current);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();
    Ok((!input.is_empty()).then(|| input.to_string()))
}

fn interactive_configure(path: &Path, profile: Option<&str>) -> Result<()> {
    println!("{}", "osskit configuration".bold());
    println!("Press Enter to keep current value.\n");

    let mut oss = read_profile(path, profile)?;

    if let Some(endpoint) = prompt("Endpoint URL", &oss.endpoint)? {
        oss.endpoint = endpoint;
    }
    if let Some(access_key) = prompt("Access Key", &oss.access_key)? {
        oss.access_key = access_key;
    }
    let masked = if oss.secret_key.is_empty() { "" } else { "***" };
    if let Some(secret_key) = prompt("Secret Key", masked)? {
        oss.secret_key = secret_key;
    }
    if let Some(region) = prompt("Region", &oss.region)? {
        oss.region = region;
    }
    let bucket = oss.bucket_name.clone().unwrap_or_default();
    if let Some(bucket) = prompt("Default bucket", &bucket)? {
        oss.bucket_name = Some(bucket);
    }
    let domain = oss.custom_domain.clone().unwrap_or_default();
    if let Some(domain) = prompt("Custom domain", &domain)? {
        oss.custom_domain = Some(domain);
    }
    if let Some(path_style) = prompt("Path-style access", &oss.path_style_access.to_string())? {
        config::set_value(&mut oss, "path_style_access", &path_style)?;
    }

    config::save(path, profile, &oss)?;

    println!();
    println!(
        "{} Configuration saved to {}",
        "✓".green(),
        path.display()
    );

    Ok(())
}
