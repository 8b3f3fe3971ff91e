//! CLI command implementations

pub mod buckets;
pub mod cat;
pub mod configure;
pub mod get;
pub mod ls;
pub mod mb;
pub mod presign;
pub mod put;
pub mod rb;
pub mod rm;
pub mod stat;
pub mod url;

use crate::object_path::ObjectPath;
use crate::OutputFormat;
use anyhow::{Context, Result};
use osskit_client::OssTemplate;
use osskit_core::OssConfig;
use std::path::PathBuf;

/// Context passed to all commands
pub struct CommandContext {
    pub config: OssConfig,
    pub config_path: PathBuf,
    pub profile: Option<String>,
    pub output_format: OutputFormat,
    pub verbose: bool,
    pub quiet: bool,
}

impl CommandContext {
    /// Build the facade from the loaded profile
    pub fn template(&self) -> Result<OssTemplate> {
        OssTemplate::from_config(self.config.clone())
            .context("Failed to create storage client")?
            .context("Object storage is disabled in this profile (enabled = false)")
    }

    /// Check if output should be JSON
    pub fn is_json(&self) -> bool {
        matches!(self.output_format, OutputFormat::Json)
    }

    /// Print info message if not quiet
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("{}", msg);
        }
    }

    /// Print verbose message if verbose mode
    pub fn debug(&self, msg: &str) {
        if self.verbose {
            eprintln!("[DEBUG] {}", msg);
        }
    }

    /// `s3://bucket/key` for messages, with the default bucket filled in
    pub fn display_path(&self, path: &ObjectPath) -> String {
        path.display(self.config.bucket_name.as_deref().unwrap_or("<default>"))
    }
}

/// Accept `bucket`, `s3://bucket` or `s3://bucket/`
pub fn bucket_arg(arg: Option<&str>) -> Option<&str> {
    arg.map(|b| b.strip_prefix("s3://").unwrap_or(b).trim_end_matches('/'))
        .filter(|b| !b.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_arg() {
        assert_eq!(bucket_arg(Some("photos")), Some("photos"));
        assert_eq!(bucket_arg(Some("s3://photos/")), Some("photos"));
        assert_eq!(bucket_arg(Some("s3://")), None);
        assert_eq!(bucket_arg(None), None);
    }
}
