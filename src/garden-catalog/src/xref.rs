//! Cross-references between tables.
//!
//! The shiny-rate table is joined onto plants as `transformShinyIds`, and the
//! assembled catalog is checked for references that lead nowhere.

use crate::catalog::Catalog;
use crate::records::{Plant, ShinyRate, ShinyRef};
use crate::report::Warning;
use std::collections::{BTreeMap, HashSet};

/// Tolerance when checking that tier probabilities stay within 1
const PROBABILITY_EPSILON: f64 = 1e-9;

/// Plant id → (tier name → shiny item)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShinyIndex {
    by_plant: BTreeMap<String, BTreeMap<String, ShinyRef>>,
}

impl ShinyIndex {
    /// Index shiny-rate rows; a later row for the same plant and tier wins
    pub fn from_rates(rates: &[ShinyRate]) -> Self {
        let mut by_plant: BTreeMap<String, BTreeMap<String, ShinyRef>> = BTreeMap::new();
        for rate in rates {
            by_plant.entry(rate.plant_id.clone()).or_default().insert(
                rate.tier.name().to_string(),
                ShinyRef {
                    id: rate.id.clone(),
                    probability: rate.probability,
                },
            );
        }
        ShinyIndex { by_plant }
    }

    /// Tier table for a plant, empty when the plant has no rows
    pub fn refs_for(&self, plant_id: &str) -> BTreeMap<String, ShinyRef> {
        self.by_plant.get(plant_id).cloned().unwrap_or_default()
    }

    /// Set `transformShinyIds` on every plant, including empty tables
    pub fn attach(&self, plants: &mut [Plant]) {
        for plant in plants {
            plant.transform_shiny_ids = self.refs_for(&plant.item.id);
        }
    }

    /// Rate rows whose plant id matches no plant
    pub fn orphans(&self, plants: &[Plant]) -> Vec<Warning> {
        let known: HashSet<&str> = plants.iter().map(|p| p.item.id.as_str()).collect();
        self.by_plant
            .iter()
            .filter(|(plant_id, _)| !known.contains(plant_id.as_str()))
            .flat_map(|(plant_id, tiers)| {
                tiers.values().map(move |shiny| Warning::ReferenceGap {
                    section: "shinyItemRates".to_string(),
                    source_id: shiny.id.clone(),
                    field: "plantId".to_string(),
                    target: plant_id.clone(),
                })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.by_plant.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_plant.is_empty()
    }
}

/// Plants whose tier probabilities add up to more than 1
pub fn probability_overflows(plants: &[Plant]) -> Vec<Warning> {
    plants
        .iter()
        .filter_map(|plant| {
            let total: f64 = plant
                .transform_shiny_ids
                .values()
                .map(|shiny| shiny.probability)
                .sum();
            (total > 1.0 + PROBABILITY_EPSILON).then(|| Warning::ProbabilityOverflow {
                plant_id: plant.item.id.clone(),
                total,
            })
        })
        .collect()
}

/// Transform links and shiny ids that resolve to nothing in the catalog
pub fn reference_gaps(catalog: &Catalog) -> Vec<Warning> {
    let ids: HashSet<&str> = catalog.all_ids().collect();
    let mut gaps = Vec::new();

    for section in catalog.item_sections() {
        for item in section.items {
            if let Some(target) = item.transform_target() {
                if !ids.contains(target) {
                    gaps.push(Warning::ReferenceGap {
                        section: section.section.to_string(),
                        source_id: item.id.clone(),
                        field: "transformId".to_string(),
                        target: target.to_string(),
                    });
                }
            }
        }
    }

    for plant in &catalog.placed_items.plants {
        for (tier, shiny) in &plant.transform_shiny_ids {
            if !ids.contains(shiny.id.as_str()) {
                gaps.push(Warning::ReferenceGap {
                    section: "Plants".to_string(),
                    source_id: plant.item.id.clone(),
                    field: format!("transformShinyIds.{}", tier),
                    target: shiny.id.clone(),
                });
            }
        }
    }

    gaps
}

/// Identifiers shared by items in different catalog sections
///
/// Sections are already deduplicated on their own, so any id seen twice here
/// crosses a section boundary. Sections are listed in catalog order.
pub fn duplicate_ids(catalog: &Catalog) -> Vec<Warning> {
    let mut seen: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for section in catalog.item_sections() {
        for item in section.items {
            seen.entry(item.id.as_str()).or_default().push(section.section);
        }
    }
    for tool in catalog.tools.values().flatten() {
        seen.entry(tool.id.as_str()).or_default().push("Tools");
    }

    seen.into_iter()
        .filter(|(_, sections)| sections.len() > 1)
        .map(|(id, sections)| Warning::DuplicateId {
            id: id.to_string(),
            sections: sections.into_iter().map(str::to_string).collect(),
        })
        .collect()
}

/// Stores whose stocklist `(id, name)` pair matches no stocklist
pub fn missing_stocklists(catalog: &Catalog) -> Vec<Warning> {
    let keys: HashSet<(&str, &str)> = catalog.stocklists.iter().map(|s| s.key()).collect();
    catalog
        .stores
        .iter()
        .filter(|store| !keys.contains(&(store.stocklist_id.as_str(), store.stocklist_name.as_str())))
        .map(|store| Warning::MissingStocklist {
            store_id: store.id,
            stocklist_id: store.stocklist_id.clone(),
            stocklist_name: store.stocklist_name.clone(),
        })
        .collect()
}
