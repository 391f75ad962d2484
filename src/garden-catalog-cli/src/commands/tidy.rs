//! Tidy command handler

use crate::config::Config;
use anyhow::{Context, Result};
use garden_catalog::TidyReport;
use std::path::Path;

pub fn handle(config: &Config, source: Option<&Path>, write: bool) -> Result<TidyReport> {
    let layout = config.layout(source);
    let report = garden_catalog::tidy(&layout, write)
        .with_context(|| format!("Failed to tidy tables under {}", layout.root.display()))?;

    if report.removed.is_empty() {
        println!("No duplicate ids");
    } else {
        println!("Duplicate ids:");
        for removal in &report.removed {
            println!("  {}: {}", removal.table, removal.count);
        }
    }
    println!("Shiny values refreshed: {}", report.revalued);

    if write {
        println!("Rewrote {} tables", report.rewritten);
    } else {
        println!();
        println!("Dry run; pass --write to rewrite the tables");
    }

    Ok(report)
}
