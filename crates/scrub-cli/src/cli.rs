use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(name = "scrub")]
#[command(about = "Sanitize configuration trees for safe sharing", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Source configuration directory
    pub source: PathBuf,

    /// Output directory for the sanitized copy
    pub output: PathBuf,

    /// Application name recorded in the report (sonarr, radarr, ...)
    pub app_name: String,

    /// Path to a scrub.toml overriding the built-in catalog
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
