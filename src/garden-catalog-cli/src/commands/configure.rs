//! Configuration command handlers
//!
//! Handles the `configure` subcommand for setting up garden-catalog defaults.

use crate::config::Config;
use anyhow::Result;
use std::path::PathBuf;

/// Handle the configure command
///
/// # Arguments
/// * `source_dir` - Optional source directory to set as default
/// * `output` - Optional catalog output path to set as default
/// * `show` - If true, show current configuration
pub fn handle(source_dir: Option<PathBuf>, output: Option<PathBuf>, show: bool) -> Result<()> {
    let mut config = Config::load_user()?;

    if show {
        show_config(&config);
        return Ok(());
    }

    if source_dir.is_none() && output.is_none() {
        show_usage();
        return Ok(());
    }

    if let Some(dir) = source_dir {
        println!("Source directory configured: {}", dir.display());
        config.source_dir = Some(dir);
    }
    if let Some(path) = output {
        println!("Catalog output configured: {}", path.display());
        config.output = Some(path);
    }
    config.save()?;

    if let Ok(path) = Config::config_path() {
        println!("Config saved to: {}", path.display());
    }

    Ok(())
}

/// Display current configuration
fn show_config(config: &Config) {
    let layout = config.layout(None);
    println!("Source directory: {}", layout.root.display());
    println!("Catalog output:   {}", config.output_path(None).display());

    match &config.code_tables {
        Some(path) => println!("Code tables:      {}", path.display()),
        None => println!("Code tables:      built-in"),
    }

    if let Ok(path) = Config::config_path() {
        println!("Config file: {}", path.display());
    }
}

/// Show usage help for the configure command
fn show_usage() {
    println!("Usage: garden-catalog configure --source-dir DIR [--output FILE]");
    println!("   or: garden-catalog configure --show");
    println!();
    println!("A catalog.toml in the working directory overrides these defaults.");
}
