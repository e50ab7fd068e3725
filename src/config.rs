//! Configuration for hosts embedding the engine.
//!
//! Handles:
//! - Command-line argument parsing
//! - Language definition directory configuration

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments shared by engine hosts
#[derive(Debug, Parser)]
pub struct Args {
    /// Force a language id instead of detecting one per document
    #[arg(long, help = "Language to assume for opened documents (e.g. 'rust')")]
    pub language: Option<String>,

    /// Custom language directory to search for definition files
    #[arg(long, help = "Directory containing language definition TOML files")]
    pub languages_dir: Option<PathBuf>,

    /// Log level for the engine
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
    /// Language explicitly set via command line
    pub cli_language: Option<String>,
    /// Language definition directories to search
    pub language_dirs: Vec<PathBuf>,
    /// Log level
    pub log_level: String,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args_and_env() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Create configuration from explicit arguments (useful for testing)
    pub fn from_args(args: Args) -> Result<Self> {
        // Determine language definition directories
        let mut language_dirs = Vec::new();

        // Add user-specified directory if provided
        if let Some(custom_dir) = args.languages_dir {
            language_dirs.push(custom_dir);
        }

        // Add default user config directory
        if let Some(config_dir) = dirs::config_dir() {
            language_dirs.push(config_dir.join("findrefs").join("languages"));
        }

        Ok(Config {
            cli_language: args.language,
            language_dirs,
            log_level: args.log_level,
        })
    }

    /// Get the forced language from CLI arguments
    pub fn effective_language(&self) -> Option<String> {
        self.cli_language.clone()
    }
}
