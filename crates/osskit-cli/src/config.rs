//! Profile management for the osskit CLI
//!
//! Config file location: ~/.osskit/config.toml
//!
//! Example config:
//! ```toml
//! [default]
//! endpoint = "http://localhost:9000"
//! access_key = "minioadmin"
//! secret_key = "minioadmin"
//! region = "us-east-1"
//! bucket_name = "uploads"
//!
//! [aliyun]
//! endpoint = "https://oss-cn-hangzhou.aliyuncs.com"
//! region = "cn-hangzhou"
//! path_style_access = false
//! ```

use anyhow::{Context, Result};
use osskit_core::OssConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_PROFILE: &str = "default";

/// Configuration file with multiple profiles
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileFile {
    #[serde(flatten)]
    pub profiles: BTreeMap<String, OssConfig>,
}

impl ProfileFile {
    /// Get config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let home = directories::BaseDirs::new()
            .context("Could not determine home directory")?
            .home_dir()
            .to_path_buf();

        Ok(home.join(".osskit"))
    }

    /// Get config file path
    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Read the file at `path`; a missing file is an empty profile set
    pub fn read(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        // Create config directory if needed
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;
        Ok(())
    }
}

/// Load a profile, then overlay `OSS_*` environment variables
pub fn load(path: &Path, profile: Option<&str>) -> Result<OssConfig> {
    let profile_name = profile.unwrap_or(DEFAULT_PROFILE);
    let file = ProfileFile::read(path)?;

    let mut config = file
        .profiles
        .get(profile_name)
        .cloned()
        .unwrap_or_default();

    config.apply_env()?;
    Ok(config)
}

/// Store `config` under `profile`, keeping the other profiles
pub fn save(path: &Path, profile: Option<&str>, config: &OssConfig) -> Result<()> {
    let profile_name = profile.unwrap_or(DEFAULT_PROFILE);
    let mut file = ProfileFile::read(path)?;
    file.profiles.insert(profile_name.to_string(), config.clone());
    file.write(path)
}

pub fn list_profiles(path: &Path) -> Result<Vec<String>> {
    Ok(ProfileFile::read(path)?.profiles.into_keys().collect())
}

pub fn delete_profile(path: &Path, profile: &str) -> Result<()> {
    let mut file = ProfileFile::read(path)?;
    if file.profiles.remove(profile).is_some() {
        file.write(path)?;
    }
    Ok(())
}

/// All config keys accepted by `configure get/set`
pub fn keys() -> &'static [&'static str] {
    &[
        "enabled",
        "endpoint",
        "region",
        "access_key",
        "secret_key",
        "bucket_name",
        "custom_domain",
        "path_style_access",
    ]
}

/// Get a config value by key name
pub fn get_value(config: &OssConfig, key: &str) -> Option<String> {
    let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
    match key {
        "enabled" => Some(config.enabled.to_string()),
        "endpoint" => non_empty(&config.endpoint),
        "region" => Some(config.region.clone()),
        "access_key" => non_empty(&config.access_key),
        "secret_key" => non_empty(&config.secret_key).map(|_| "***".to_string()), // Hide secret
        "bucket_name" => config.bucket_name.clone(),
        "custom_domain" => config.custom_domain.clone(),
        "path_style_access" => Some(config.path_style_access.to_string()),
        _ => None,
    }
}

/// Set a config value by key name
pub fn set_value(config: &mut OssConfig, key: &str, value: &str) -> Result<()> {
    match key {
        "enabled" => config.enabled = value.parse()?,
        "endpoint" => config.endpoint = value.to_string(),
        "region" => config.region = value.to_string(),
        "access_key" => config.access_key = value.to_string(),
        "secret_key" => config.secret_key = value.to_string(),
        "bucket_name" => config.bucket_name = Some(value.to_string()),
        "custom_domain" => config.custom_domain = Some(value.to_string()),
        "path_style_access" => config.path_style_access = value.parse()?,
        _ => anyhow::bail!("Unknown config key: {}", key),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = OssConfig::new("http://localhost:9000", "test", "secret")
            .with_bucket_name("uploads");
        save(&path, None, &config).unwrap();
        save(
            &path,
            Some("cdn"),
            &OssConfig::new("https://s3.example.com", "a", "b").with_path_style_access(false),
        )
        .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("[default]"));
        assert!(content.contains("localhost:9000"));

        let file = ProfileFile::read(&path).unwrap();
        assert_eq!(file.profiles["default"].bucket_name.as_deref(), Some("uploads"));
        assert!(!file.profiles["cdn"].path_style_access);

        assert_eq!(list_profiles(&path).unwrap(), vec!["cdn", "default"]);

        delete_profile(&path, "cdn").unwrap();
        assert_eq!(list_profiles(&path).unwrap(), vec!["default"]);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(ProfileFile::read(&path).unwrap().profiles.is_empty());
        assert!(list_profiles(&path).unwrap().is_empty());
    }

    #[test]
    fn test_get_set_value() {
        let mut config = OssConfig::default();
        set_value(&mut config, "endpoint", "http://127.0.0.1:9000").unwrap();
        set_value(&mut config, "secret_key", "hunter2").unwrap();
        set_value(&mut config, "path_style_access", "false").unwrap();

        assert_eq!(
            get_value(&config, "endpoint").as_deref(),
            Some("http://127.0.0.1:9000")
        );
        assert_eq!(get_value(&config, "secret_key").as_deref(), Some("***"));
        assert_eq!(get_value(&config, "path_style_access").as_deref(), Some("false"));
        assert!(get_value(&config, "bucket_name").is_none());

        assert!(set_value(&mut config, "path_style_access", "sometimes").is_err());
        assert!(set_value(&mut config, "colour", "blue").is_err());
    }

    #[test]
    fn test_all_keys_are_gettable() {
        let config = OssConfig::new("http://localhost:9000", "ak", "sk")
            .with_bucket_name("b")
            .with_custom_domain("https://cdn.example.com");
        for key in keys() {
            assert!(get_value(&config, key).is_some(), "missing {}", key);
        }
    }
}
