//! osskit - command-line client for S3-compatible object storage
//!
//! Thin front end over `OssTemplate`: every subcommand maps to one facade
//! call, with buckets defaulting to the profile's `bucket_name`.

mod commands;
mod config;
mod object_path;
mod utils;

use clap::{Parser, Subcommand, ValueEnum};
use commands::CommandContext;
use osskit_core::types::{PolicyType, PresignMethod};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "osskit")]
#[command(author = "Osskit Team")]
#[command(version = osskit_core::VERSION)]
#[command(about = "Simple client for S3-compatible object storage", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Profile to use from the config file
    #[arg(short, long, global = true, env = "OSSKIT_PROFILE")]
    profile: Option<String>,

    /// Configuration file path (default: ~/.osskit/config.toml)
    #[arg(short, long, global = true, env = "OSSKIT_CONFIG")]
    config: Option<PathBuf>,

    /// Endpoint URL, overriding the profile
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Default bucket, overriding the profile
    #[arg(short, long, global = true)]
    bucket: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "text")]
    output: OutputFormat,

    /// Print debug messages
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress informational output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "OSSKIT_LOG_LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Show or edit profiles
    Configure {
        #[command(subcommand)]
        action: Option<ConfigureAction>,
    },

    /// List buckets
    Buckets {
        /// Show creation dates
        #[arg(short, long)]
        long: bool,
    },

    /// Make bucket (no-op if it already exists)
    Mb {
        /// Bucket name or s3://bucket
        bucket: Option<String>,

        /// Anonymous access preset (private, public-read, public-read-write, write-only)
        #[arg(long, default_value = "private")]
        policy: PolicyType,
    },

    /// Remove bucket
    Rb {
        /// Bucket name or s3://bucket
        bucket: Option<String>,

        /// Delete all objects first
        #[arg(short, long)]
        force: bool,
    },

    /// List objects by prefix
    Ls {
        /// Prefix or s3://bucket/prefix
        path: Option<String>,

        /// Show size, date and storage class
        #[arg(short, long)]
        long: bool,

        /// Human readable sizes
        #[arg(short = 'H', long)]
        human_readable: bool,

        /// Only print totals
        #[arg(long)]
        summarize: bool,
    },

    /// Upload a local file
    Put {
        /// Local file
        file: PathBuf,

        /// Destination key or s3://bucket/key (trailing / appends the file name)
        dest: Option<String>,

        /// Content type (guessed from the file name when omitted)
        #[arg(short = 't', long)]
        content_type: Option<String>,
    },

    /// Download an object to a local file
    Get {
        /// Key or s3://bucket/key
        path: String,

        /// Local destination (default: the key's file name)
        dest: Option<PathBuf>,
    },

    /// Stream object content to stdout
    Cat {
        /// Key or s3://bucket/key
        path: String,
    },

    /// Show object metadata
    Stat {
        /// Key or s3://bucket/key
        path: String,
    },

    /// Delete an object
    Rm {
        /// Key or s3://bucket/key
        path: String,
    },

    /// Generate a pre-signed URL
    Presign {
        /// Key or s3://bucket/key
        path: String,

        /// Expiry in seconds
        #[arg(short, long, default_value_t = 600)]
        expires: u64,

        /// GET (download) or PUT (upload)
        #[arg(short, long, default_value = "GET")]
        method: PresignMethod,
    },

    /// Print the URL of an object
    Url {
        /// Key or s3://bucket/key
        path: String,

        /// Public gateway URL (custom domain / addressing style) instead of the
        /// plain object URL
        #[arg(short, long)]
        gateway: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigureAction {
    /// Set a config value
    Set { key: String, value: String },
    /// Get a config value
    Get { key: String },
    /// List config values and profiles
    List,
    /// Create an empty profile
    AddProfile { name: String },
    /// Remove a profile
    RemoveProfile { name: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => config::ProfileFile::default_path()?,
    };

    let mut oss_config = config::load(&config_path, cli.profile.as_deref())?;

    // Override with CLI args
    if let Some(endpoint) = cli.endpoint {
        oss_config.endpoint = endpoint;
    }
    if let Some(bucket) = cli.bucket {
        oss_config.bucket_name = Some(bucket);
    }

    debug!(?oss_config, "Configuration loaded");

    let ctx = CommandContext {
        config: oss_config,
        config_path,
        profile: cli.profile,
        output_format: cli.output,
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Configure { action } => commands::configure::execute(&ctx, action).await,
        Commands::Buckets { long } => commands::buckets::execute(&ctx, long).await,
        Commands::Mb { bucket, policy } => {
            commands::mb::execute(&ctx, bucket.as_deref(), policy).await
        }
        Commands::Rb { bucket, force } => {
            commands::rb::execute(&ctx, bucket.as_deref(), force).await
        }
        Commands::Ls {
            path,
            long,
            human_readable,
            summarize,
        } => {
            commands::ls::execute(&ctx, path.as_deref(), long, human_readable, summarize).await
        }
        Commands::Put {
            file,
            dest,
            content_type,
        } => commands::put::execute(&ctx, &file, dest.as_deref(), content_type).await,
        Commands::Get { path, dest } => commands::get::execute(&ctx, &path, dest).await,
        Commands::Cat { path } => commands::cat::execute(&ctx, &path).await,
        Commands::Stat { path } => commands::stat::execute(&ctx, &path).await,
        Commands::Rm { path } => commands::rm::execute(&ctx, &path).await,
        Commands::Presign {
            path,
            expires,
            method,
        } => commands::presign::execute(&ctx, &path, expires, method).await,
        Commands::Url { path, gateway } => commands::url::execute(&ctx, &path, gateway),
    }
}
