//! Build and check command handlers

use crate::config::Config;
use anyhow::{bail, Context, Result};
use garden_catalog::{build_from, write_catalog, BuildOutput};
use std::fs;
use std::path::Path;

/// Build the catalog and write it, printing a summary
pub fn build(
    config: &Config,
    source: Option<&Path>,
    output: Option<&Path>,
    report_path: Option<&Path>,
    deny_warnings: bool,
) -> Result<()> {
    let layout = config.layout(source);
    let output_path = config.output_path(output);

    let built = build_from(&layout)
        .with_context(|| format!("Failed to build catalog from {}", layout.root.display()))?;
    let (bytes, digest) = built.render().context("Failed to serialize catalog")?;

    if let Some(path) = report_path {
        let json = serde_json::to_string_pretty(&built.report)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
    }

    print_summary(&built);

    if deny_warnings && !built.report.warnings.is_empty() {
        bail!(
            "{} warnings with --deny-warnings; catalog not written",
            built.report.warnings.len()
        );
    }

    write_catalog(&output_path, &bytes)
        .with_context(|| format!("Failed to write catalog to {}", output_path.display()))?;

    println!();
    println!("Wrote {} ({} bytes)", output_path.display(), bytes.len());
    println!("  sha256: {}", digest);

    Ok(())
}

/// Rebuild and compare with the catalog on disk; fails when they differ
pub fn check(config: &Config, source: Option<&Path>, output: Option<&Path>) -> Result<()> {
    let layout = config.layout(source);
    let output_path = config.output_path(output);

    let built = build_from(&layout)
        .with_context(|| format!("Failed to build catalog from {}", layout.root.display()))?;
    let (bytes, digest) = built.render().context("Failed to serialize catalog")?;

    let existing = fs::read(&output_path)
        .with_context(|| format!("Failed to read catalog {}", output_path.display()))?;
    let existing_digest = garden_catalog::digest(&existing);

    print_summary(&built);
    println!();

    if existing_digest != digest {
        println!("Built:    {}", digest);
        println!("On disk:  {}", existing_digest);
        bail!(
            "{} is out of date; run `garden-catalog build`",
            output_path.display()
        );
    }

    println!("{} is up to date ({})", output_path.display(), digest);
    Ok(())
}

fn print_summary(built: &BuildOutput) {
    let catalog = &built.catalog;
    let report = &built.report;

    println!("Catalog:");
    for section in catalog.item_sections() {
        println!("  {:<16} {:>5}", section.section, section.items.len());
    }
    let tool_count: usize = catalog.tools.values().map(Vec::len).sum();
    println!(
        "  {:<16} {:>5} ({} buckets)",
        "Tools",
        tool_count,
        catalog.tools.len()
    );
    println!("  {:<16} {:>5}", "Stores", catalog.stores.len());
    println!("  {:<16} {:>5}", "Stocklists", catalog.stocklists.len());
    println!("  {:<16} {:>5}", "ActionHistories", catalog.action_histories.len());

    println!();
    println!("Shiny variants derived: {}", report.derived_variants);
    if report.removed.is_empty() {
        println!("Duplicate ids removed: 0");
    } else {
        println!("Duplicate ids removed: {}", report.total_removed());
        for removal in &report.removed {
            println!("  {}: {}", removal.table, removal.count);
        }
    }

    if report.warnings.is_empty() {
        println!("Warnings: none");
    } else {
        println!("Warnings ({}):", report.warnings.len());
        for warning in &report.warnings {
            println!("  {}", warning);
        }
    }
}
