pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_PATH;

#[derive(Parser)]
#[command(name = "devtools-release-notifier")]
#[command(about = "Watch developer tools for new releases and announce them", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check every configured tool for a new release
    Check {
        /// Write new releases to this JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip notifications; new versions are still cached
        #[arg(long)]
        no_notify: bool,

        /// Also write a Markdown page per new release under this directory
        #[arg(long)]
        markdown_dir: Option<PathBuf>,
    },
    /// Send a releases file to Discord, optionally with translated content
    Send {
        /// Releases JSON written by `check --output`
        releases: PathBuf,

        /// JSON array of {"tool_name", "translated_content"} objects
        #[arg(default_value = "[]")]
        translated: String,

        /// Write a Markdown page for every delivered release
        #[arg(long)]
        markdown_dir: Option<PathBuf>,
    },
    /// Validate the configuration file
    Validate,
    /// Write a commented sample configuration
    Init,
}
