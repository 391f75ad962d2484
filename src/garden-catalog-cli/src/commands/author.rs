//! Plant and decoration authoring command handlers

use crate::config::Config;
use anyhow::{Context, Result};
use garden_catalog::{DecorationDraft, DecorationRows, Item, PlantDraft, PlantRows};
use std::fs;
use std::path::Path;

/// Expand a plant draft and append its rows to the source tables
pub fn add_plant(
    config: &Config,
    draft_path: &Path,
    source: Option<&Path>,
    dry_run: bool,
) -> Result<PlantRows> {
    let text = fs::read_to_string(draft_path)
        .with_context(|| format!("Failed to read draft {}", draft_path.display()))?;
    let draft = PlantDraft::from_yaml(&text)
        .with_context(|| format!("Failed to parse plant draft {}", draft_path.display()))?;
    let rows = draft
        .expand(&config.allocator()?)
        .with_context(|| format!("Failed to allocate ids for '{}'", draft.name))?;

    println!("Plant:     {}", describe(&rows.plant.item));
    println!("Seed:      {}", describe(&rows.seed));
    println!("Harvested: {}", describe(&rows.harvested));
    for shiny in &rows.shiny_harvested {
        println!("  shiny:   {}", describe(shiny));
    }
    for rate in &rows.shiny_rates {
        println!("  rate:    {} {} {}", rate.id, rate.tier, rate.probability);
    }

    if dry_run {
        println!();
        println!("Dry run; nothing written");
        return Ok(rows);
    }

    let layout = config.layout(source);
    rows.append(&layout)
        .with_context(|| format!("Failed to append rows under {}", layout.root.display()))?;
    println!();
    println!("Appended to tables under {}", layout.root.display());
    Ok(rows)
}

/// Expand a decoration draft and append the decoration and blueprint rows
pub fn add_decoration(
    config: &Config,
    draft_path: &Path,
    source: Option<&Path>,
    dry_run: bool,
) -> Result<DecorationRows> {
    let text = fs::read_to_string(draft_path)
        .with_context(|| format!("Failed to read draft {}", draft_path.display()))?;
    let draft = DecorationDraft::from_yaml(&text)
        .with_context(|| format!("Failed to parse decoration draft {}", draft_path.display()))?;
    let rows = draft
        .expand(&config.allocator()?)
        .with_context(|| format!("Failed to allocate ids for '{}'", draft.name))?;

    println!("Decoration: {}", describe(&rows.decoration));
    println!("Blueprint:  {}", describe(&rows.blueprint));

    if dry_run {
        println!();
        println!("Dry run; nothing written");
        return Ok(rows);
    }

    let layout = config.layout(source);
    rows.append(&layout)
        .with_context(|| format!("Failed to append rows under {}", layout.root.display()))?;
    println!();
    println!("Appended to tables under {}", layout.root.display());
    Ok(rows)
}

fn describe(item: &Item) -> String {
    format!("{} {} (value {})", item.id, item.name, item.value)
}
