mod cli;
mod config;
mod stage;

use anyhow::Result;
use clap::Parser;
use scrub_engine::Sanitizer;
use tracing::info;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Initialize tracing
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let config = config::Config::load(cli.config.as_deref())?;

    // Validates the source directory and creates the output directory.
    let mut sanitizer = Sanitizer::new(config.registry(), &cli.source, &cli.output, &cli.app_name)?;

    info!(
        source = %cli.source.display(),
        output = %cli.output.display(),
        app = %cli.app_name,
        "starting sanitization"
    );

    let copied = stage::copy_tree(&cli.source, &cli.output)?;
    info!(files = copied, "staged working copy");

    sanitizer.sanitize_tree();
    let report = sanitizer.finish()?;

    println!("✓ Sanitization complete");
    println!("  Application: {}", report.app_name);
    println!("  Files processed: {}", report.statistics.files_processed);
    println!(
        "  Databases processed: {}",
        report.statistics.databases_processed
    );
    println!(
        "  Sensitive items sanitized: {}",
        report.statistics.sensitive_items_sanitized
    );
    println!("  Output: {}", report.output_directory);
    println!(
        "  Report: {}",
        cli.output.join(scrub_core::REPORT_FILE).display()
    );

    Ok(())
}
