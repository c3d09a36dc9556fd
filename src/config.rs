//! Configuration management for the resolution auditor.
//!
//! Handles:
//! - Command-line argument parsing
//! - Profile directory configuration

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use crate::profile::DocumentType;

/// Profile selection flags shared by every binary
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ProfileArgs {
    /// Explicitly specify the document type instead of detecting it
    #[arg(long, help = "Document type to audit as (ceg, condel, cnrh, coaride, geral)")]
    pub profile: Option<String>,

    /// Custom profile directory to search for profile files
    #[arg(long, help = "Directory containing *.profile.toml files")]
    pub profile_dir: Option<PathBuf>,
}

/// Command-line arguments for the language server
#[derive(Debug, Parser)]
#[command(name = "resolucao-ls")]
#[command(about = "Language server auditing the structure of legal resolutions")]
#[command(version)]
pub struct Args {
    #[command(flatten)]
    pub profile: ProfileArgs,

    /// Log level for the language server
    #[arg(
        long,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    /// Document type explicitly set via command line
    pub forced_document_type: Option<DocumentType>,
    /// Profile directories to search, highest priority first
    pub profile_dirs: Vec<PathBuf>,
    /// Log level
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            forced_document_type: None,
            profile_dirs: Vec::new(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args_and_env() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Create configuration from explicit arguments (useful for testing)
    pub fn from_args(args: Args) -> Result<Self> {
        let mut config = Self::from_profile_args(args.profile)?;
        config.log_level = args.log_level;
        Ok(config)
    }

    /// Resolve profile flags into a configuration
    pub fn from_profile_args(args: ProfileArgs) -> Result<Self> {
        let forced_document_type = args
            .profile
            .as_deref()
            .map(str::parse::<DocumentType>)
            .transpose()
            .context("Invalid --profile value")?;

        let mut profile_dirs = Vec::new();

        if let Some(custom_dir) = args.profile_dir {
            profile_dirs.push(custom_dir);
        }

        if let Some(config_dir) = dirs::config_dir() {
            profile_dirs.push(config_dir.join("resolucao-auditor").join("profiles"));
        }

        Ok(Config {
            forced_document_type,
            profile_dirs,
            ..Config::default()
        })
    }
}
