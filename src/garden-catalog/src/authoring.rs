//! Content authoring against the working source tables.
//!
//! Drafts are small YAML documents describing one new plant or decoration.
//! Expanding a draft allocates every identifier it needs and produces the
//! linked rows; appending writes them into the tables under a
//! [`SourceLayout`]. [`tidy`] is the matching clean-up pass over those tables.

use crate::clean::{clean_table, Removal};
use crate::error::{CatalogError, Result};
use crate::ids::{with_variant, IdAllocator, CANONICAL_VARIANT};
use crate::pipeline::SourceLayout;
use crate::records::{Item, Plant, ShinyRate, ShinyRef};
use crate::shiny::{default_shiny_refs, derive_variants, refresh_shiny_values};
use crate::table::{Table, ToRow};
use crate::types::{PlacementKind, ShinyTier, Subtype};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One entry of a draft's shiny table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShinyDraft {
    /// Variant suffix; required for tiers outside bronze/silver/gold, which
    /// always use `01`/`02`/`03`
    #[serde(default)]
    pub id_suffix: Option<String>,
    pub probability: f64,
}

/// A new crop: plant, seed, harvested item and shiny variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantDraft {
    pub name: String,
    pub icon: String,
    pub category: String,
    /// Item name as it appears in the crop code table (`Pineapple`)
    pub item: String,
    pub description: String,
    pub seed_value: u64,
    pub value: u64,
    pub harvested_value: u64,
    pub level: u32,
    pub base_exp: u32,
    pub grow_time: u64,
    pub repeated_grow_time: u64,
    pub num_harvests: u32,
    /// Tier name → entry; the default bronze/silver/gold table when omitted
    #[serde(default)]
    pub shiny_ids: Option<BTreeMap<String, ShinyDraft>>,
}

/// A new decoration and its blueprint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecorationDraft {
    pub name: String,
    pub icon: String,
    pub category: String,
    pub item: String,
    pub description: String,
    pub value: u64,
    pub level: u32,
    #[serde(default = "canonical_variant")]
    pub id_suffix: String,
}

fn canonical_variant() -> String {
    CANONICAL_VARIANT.to_string()
}

impl PlantDraft {
    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Allocate identifiers and build every row the plant needs
    pub fn expand(&self, allocator: &IdAllocator) -> Result<PlantRows> {
        let allocate = |placement, subtype| {
            allocator.allocate(
                placement,
                subtype,
                &self.category,
                &self.item,
                CANONICAL_VARIANT,
            )
        };
        let plant_id = allocate(PlacementKind::PlacedItem, Subtype::Plant)?;
        let seed_id = allocate(PlacementKind::InventoryItem, Subtype::Seed)?;
        let harvested_id = allocate(PlacementKind::InventoryItem, Subtype::HarvestedItem)?;

        let base = |id: &str, name: &str, placement, subtype: Subtype, value| Item {
            id: id.to_string(),
            name: name.to_string(),
            icon: self.icon.clone(),
            item_type: placement,
            subtype: subtype.to_string(),
            category: self.category.clone(),
            description: self.description.clone(),
            value,
            level: self.level,
            transform_id: None,
        };

        let harvested = base(
            &harvested_id,
            &self.name,
            PlacementKind::InventoryItem,
            Subtype::HarvestedItem,
            self.harvested_value,
        );
        let mut seed = base(
            &seed_id,
            &format!("{} seed", self.name),
            PlacementKind::InventoryItem,
            Subtype::Seed,
            self.seed_value,
        );
        seed.transform_id = Some(plant_id.clone());

        let mut plant_item = base(
            &plant_id,
            &self.name,
            PlacementKind::PlacedItem,
            Subtype::Plant,
            self.value,
        );
        plant_item.transform_id = Some(harvested_id.clone());

        let plant = Plant {
            item: plant_item,
            base_exp: self.base_exp,
            grow_time: self.grow_time,
            repeated_grow_time: self.repeated_grow_time,
            num_harvests: self.num_harvests,
            transform_shiny_ids: self.shiny_refs(&harvested_id)?,
        };

        let shiny_rates = plant
            .transform_shiny_ids
            .iter()
            .map(|(tier, shiny)| ShinyRate {
                id: shiny.id.clone(),
                plant_id: plant_id.clone(),
                tier: ShinyTier::parse(tier),
                probability: shiny.probability,
            })
            .collect();
        let shiny_harvested = derive_variants(&plant, &harvested);

        Ok(PlantRows {
            plant,
            seed,
            harvested,
            shiny_harvested,
            shiny_rates,
        })
    }

    fn shiny_refs(&self, harvested_id: &str) -> Result<BTreeMap<String, ShinyRef>> {
        let Some(table) = &self.shiny_ids else {
            return Ok(default_shiny_refs(harvested_id));
        };

        let mut refs = BTreeMap::new();
        for (tier_name, draft) in table {
            let tier = ShinyTier::parse(tier_name);
            let suffix = match (&draft.id_suffix, tier.id_suffix()) {
                (Some(explicit), Some(known)) if explicit != known => {
                    return Err(CatalogError::Draft {
                        name: self.name.clone(),
                        reason: format!(
                            "shiny tier '{}' always uses idSuffix '{}', not '{}'",
                            tier_name, known, explicit
                        ),
                    })
                }
                (Some(explicit), _) => explicit.as_str(),
                (None, Some(known)) => known,
                (None, None) => {
                    return Err(CatalogError::Draft {
                        name: self.name.clone(),
                        reason: format!("shiny tier '{}' needs an idSuffix", tier_name),
                    })
                }
            };
            if !(0.0..=1.0).contains(&draft.probability) {
                return Err(CatalogError::Draft {
                    name: self.name.clone(),
                    reason: format!(
                        "shiny tier '{}' probability {} is outside 0..=1",
                        tier_name, draft.probability
                    ),
                });
            }
            refs.insert(
                tier.name().to_string(),
                ShinyRef {
                    id: with_variant(harvested_id, suffix),
                    probability: draft.probability,
                },
            );
        }
        Ok(refs)
    }
}

impl DecorationDraft {
    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Allocate the decoration and blueprint ids and link them to each other
    pub fn expand(&self, allocator: &IdAllocator) -> Result<DecorationRows> {
        let decoration_id = allocator.allocate(
            PlacementKind::PlacedItem,
            Subtype::Decoration,
            &self.category,
            &self.item,
            &self.id_suffix,
        )?;
        let blueprint_id = allocator.allocate(
            PlacementKind::InventoryItem,
            Subtype::Blueprint,
            &self.category,
            &self.item,
            &self.id_suffix,
        )?;

        let row = |id: &str, placement, subtype: Subtype, transform: &str| Item {
            id: id.to_string(),
            name: self.name.clone(),
            icon: self.icon.clone(),
            item_type: placement,
            subtype: subtype.to_string(),
            category: self.category.clone(),
            description: self.description.clone(),
            value: self.value,
            level: self.level,
            transform_id: Some(transform.to_string()),
        };

        Ok(DecorationRows {
            decoration: row(
                &decoration_id,
                PlacementKind::PlacedItem,
                Subtype::Decoration,
                &blueprint_id,
            ),
            blueprint: row(
                &blueprint_id,
                PlacementKind::InventoryItem,
                Subtype::Blueprint,
                &decoration_id,
            ),
        })
    }
}

/// Rows produced by one plant draft
#[derive(Debug, Clone, PartialEq)]
pub struct PlantRows {
    pub plant: Plant,
    pub seed: Item,
    pub harvested: Item,
    pub shiny_harvested: Vec<Item>,
    pub shiny_rates: Vec<ShinyRate>,
}

impl PlantRows {
    pub fn append(&self, layout: &SourceLayout) -> Result<()> {
        let t = &layout.tables;
        append_records(&layout.resolve(&t.plants), std::slice::from_ref(&self.plant))?;
        append_records(&layout.resolve(&t.seeds), std::slice::from_ref(&self.seed))?;

        let mut harvested = vec![self.harvested.clone()];
        harvested.extend(self.shiny_harvested.iter().cloned());
        append_records(&layout.resolve(&t.harvested), &harvested)?;

        append_records(&layout.resolve(&t.shiny_rates), &self.shiny_rates)?;
        tracing::info!(
            "Added plant {} with {} shiny variants",
            self.plant.item.id,
            self.shiny_harvested.len()
        );
        Ok(())
    }
}

/// Rows produced by one decoration draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecorationRows {
    pub decoration: Item,
    pub blueprint: Item,
}

impl DecorationRows {
    pub fn append(&self, layout: &SourceLayout) -> Result<()> {
        let t = &layout.tables;
        append_records(
            &layout.resolve(&t.decorations),
            std::slice::from_ref(&self.decoration),
        )?;
        append_records(
            &layout.resolve(&t.blueprints),
            std::slice::from_ref(&self.blueprint),
        )?;
        tracing::info!(
            "Added decoration {} and blueprint {}",
            self.decoration.id,
            self.blueprint.id
        );
        Ok(())
    }
}

/// Append records to a table file, creating it with the record header if absent
pub fn append_records<T: ToRow>(path: &Path, records: &[T]) -> Result<()> {
    let mut table = if path.exists() {
        Table::read(path)?
    } else {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CatalogError::io(parent, e))?;
        }
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("table");
        Table::with_headers(name, T::HEADER)
    };
    for record in records {
        table.push_record(record);
    }
    table.write(path)
}

/// What a tidy pass found
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TidyReport {
    pub removed: Vec<Removal>,
    /// Shiny harvested items whose value no longer matched their base item
    pub revalued: usize,
    /// Tables rewritten on disk
    pub rewritten: usize,
}

/// Dedup and sort every item table; recompute shiny harvested values
///
/// Tables are only rewritten when `write` is set and something changed.
pub fn tidy(layout: &SourceLayout, write: bool) -> Result<TidyReport> {
    let mut report = TidyReport::default();
    let harvested_path = layout.resolve(&layout.tables.harvested);

    for (name, path) in layout.item_tables() {
        if !path.exists() {
            tracing::debug!("Skipping absent table {}", path.display());
            continue;
        }
        let table = Table::read(&path)?;
        let Some((mut cleaned, removed)) = clean_table(&table) else {
            continue;
        };
        let mut changed = removed > 0 || cleaned.rows != table.rows;

        if path == harvested_path {
            let revalued = revalue(&mut cleaned)?;
            report.revalued += revalued;
            changed |= revalued > 0;
        }

        if removed > 0 {
            report.removed.push(Removal {
                table: name.to_string(),
                count: removed,
            });
        }
        if write && changed {
            cleaned.write(&path)?;
            report.rewritten += 1;
            tracing::info!("Rewrote {}", path.display());
        }
    }
    Ok(report)
}

/// Refresh shiny values in a raw harvested table, returning the change count
fn revalue(table: &mut Table) -> Result<usize> {
    let mut items: Vec<Item> = table.records()?;
    let changed = refresh_shiny_values(&mut items);
    if changed == 0 {
        return Ok(0);
    }
    if let Some(idx) = table.column_index("value") {
        for (row, item) in table.rows.iter_mut().zip(&items) {
            if let Some(cell) = row.cells.get_mut(idx) {
                *cell = item.value.to_string();
            }
        }
    }
    Ok(changed)
}
