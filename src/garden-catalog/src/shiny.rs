//! Shiny harvested variants.
//!
//! A plant's `transformShinyIds` table lists the rarer tiers its harvest can
//! roll. Each tier becomes a synthesized harvested item whose value is the
//! canonical harvested value times the tier multiplier (bronze 2, silver 5,
//! gold 10, anything else 1).

use crate::ids::with_variant;
use crate::records::{Item, Plant, ShinyRef};
use crate::types::{PlacementKind, ShinyTier};
use std::collections::BTreeMap;

/// Synthesize one harvested item per tier in the plant's shiny table
///
/// `harvested` is the canonical item the plant's `transformId` points at.
/// Known tiers derive their id from it by swapping the variant suffix;
/// unknown tiers keep the id recorded in the shiny table.
pub fn derive_variants(plant: &Plant, harvested: &Item) -> Vec<Item> {
    plant
        .transform_shiny_ids
        .iter()
        .map(|(tier_name, shiny)| derive_variant(plant, harvested, &ShinyTier::parse(tier_name), shiny))
        .collect()
}

fn derive_variant(plant: &Plant, harvested: &Item, tier: &ShinyTier, shiny: &ShinyRef) -> Item {
    let id = match tier.id_suffix() {
        Some(suffix) => with_variant(&harvested.id, suffix),
        None => shiny.id.clone(),
    };
    let tier_name = tier.display_name();

    Item {
        id,
        name: shiny_name(tier, &plant.item.name),
        icon: plant.item.icon.clone(),
        item_type: PlacementKind::InventoryItem,
        subtype: "HarvestedItem".to_string(),
        category: plant.item.category.clone(),
        description: format!("{} version of {}", tier_name, plant.item.name),
        value: harvested.value.saturating_mul(tier.multiplier()),
        level: harvested.level,
        transform_id: None,
    }
}

/// `"Bronze pineapple"` for the bronze tier of `pineapple`
pub fn shiny_name(tier: &ShinyTier, base_name: &str) -> String {
    format!("{} {}", tier.display_name(), base_name)
}

/// Merge derived items into a collection, replacing any item with the same name
///
/// An existing row with the derived item's id is replaced as well, whatever
/// its name, so the first row carrying that id is always the derived one.
/// Replaced items keep their position; new names are appended in order.
/// Returns how many existing items were replaced.
pub fn upsert_by_name(target: &mut Vec<Item>, derived: Vec<Item>) -> usize {
    let mut replaced = 0;
    for item in derived {
        match target
            .iter_mut()
            .find(|existing| existing.name == item.name || existing.id == item.id)
        {
            Some(existing) => {
                *existing = item;
                replaced += 1;
            }
            None => target.push(item),
        }
    }
    replaced
}

/// Default tier table for a newly authored plant
pub fn default_shiny_refs(harvested_id: &str) -> BTreeMap<String, ShinyRef> {
    ShinyTier::KNOWN
        .iter()
        .filter_map(|tier| {
            let suffix = tier.id_suffix()?;
            let probability = tier.default_probability()?;
            Some((
                tier.name().to_string(),
                ShinyRef {
                    id: with_variant(harvested_id, suffix),
                    probability,
                },
            ))
        })
        .collect()
}

/// Recompute shiny item values from their base items
///
/// An item named `"{Tier} {base}"` (known tier, any case) whose base exists in
/// the same collection gets `base.value × multiplier`. Returns the number of
/// items whose value changed.
pub fn refresh_shiny_values(harvested: &mut [Item]) -> usize {
    let base_values: BTreeMap<String, u64> = harvested
        .iter()
        .map(|item| (item.name.clone(), item.value))
        .collect();

    let mut changed = 0;
    for item in harvested.iter_mut() {
        let Some((tier, base_name)) = split_shiny_name(&item.name) else {
            continue;
        };
        let Some(base_value) = base_values.get(base_name) else {
            continue;
        };
        let value = base_value.saturating_mul(tier.multiplier());
        if item.value != value {
            item.value = value;
            changed += 1;
        }
    }
    changed
}

/// Split `"Gold apple"` into its known tier and base name
fn split_shiny_name(name: &str) -> Option<(ShinyTier, &str)> {
    let (prefix, rest) = name.split_once(' ')?;
    let tier = ShinyTier::parse(prefix);
    match tier {
        ShinyTier::Other(_) => None,
        _ if rest.is_empty() => None,
        _ => Some((tier, rest)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn harvested(id: &str, name: &str, value: u64) -> Item {
        Item {
            id: id.to_string(),
            name: name.to_string(),
            icon: "🍍".to_string(),
            item_type: PlacementKind::InventoryItem,
            subtype: "HarvestedItem".to_string(),
            category: "Tropical".to_string(),
            description: "Sweet".to_string(),
            value,
            level: 4,
            transform_id: None,
        }
    }

    fn pineapple(tiers: &[(&str, &str, f64)]) -> Plant {
        Plant {
            item: Item {
                id: "0-02-10-05-00".to_string(),
                name: "pineapple".to_string(),
                icon: "🍍".to_string(),
                item_type: PlacementKind::PlacedItem,
                subtype: "Plant".to_string(),
                category: "Tropical".to_string(),
                description: "Spiky".to_string(),
                value: 150,
                level: 4,
                transform_id: Some("1-03-10-05-00".to_string()),
            },
            base_exp: 20,
            grow_time: 14400,
            repeated_grow_time: 7200,
            num_harvests: 3,
            transform_shiny_ids: tiers
                .iter()
                .map(|(tier, id, p)| {
                    (
                        tier.to_string(),
                        ShinyRef {
                            id: id.to_string(),
                            probability: *p,
                        },
                    )
                })
                .collect(),
        }
    }

    #[test]
    fn test_shiny_value_law() {
        let plant = pineapple(&[
            ("bronze", "1-03-10-05-01", 0.6),
            ("silver", "1-03-10-05-02", 0.3),
            ("gold", "1-03-10-05-03", 0.1),
            ("platinum", "1-03-10-05-09", 0.0),
        ]);
        let base = harvested("1-03-10-05-00", "pineapple", 200);
        let variants = derive_variants(&plant, &base);
        let by_name: BTreeMap<&str, &Item> =
            variants.iter().map(|v| (v.name.as_str(), v)).collect();

        assert_eq!(by_name["Bronze pineapple"].value, 400);
        assert_eq!(by_name["Silver pineapple"].value, 1000);
        assert_eq!(by_name["Gold pineapple"].value, 2000);
        assert_eq!(by_name["Platinum pineapple"].value, 200);
    }

    #[test]
    fn test_variant_fields() {
        let plant = pineapple(&[("silver", "ignored", 0.3)]);
        let base = harvested("1-03-10-05-00", "pineapple", 200);
        let variant = &derive_variants(&plant, &base)[0];

        assert_eq!(variant.id, "1-03-10-05-02");
        assert_eq!(variant.name, "Silver pineapple");
        assert_eq!(variant.description, "Silver version of pineapple");
        assert_eq!(variant.icon, "🍍");
        assert_eq!(variant.category, "Tropical");
        assert_eq!(variant.item_type, PlacementKind::InventoryItem);
        assert_eq!(variant.subtype, "HarvestedItem");
        assert_eq!(variant.level, 4);
    }

    #[test]
    fn test_unknown_tier_keeps_table_id() {
        let plant = pineapple(&[("platinum", "1-03-10-05-09", 0.01)]);
        let base = harvested("1-03-10-05-00", "pineapple", 200);
        assert_eq!(derive_variants(&plant, &base)[0].id, "1-03-10-05-09");
    }

    #[test]
    fn test_overwrite_law() {
        let plant = pineapple(&[("bronze", "1-03-10-05-01", 0.6), ("gold", "1-03-10-05-03", 0.1)]);
        let base = harvested("1-03-10-05-00", "pineapple", 200);
        let mut collection = vec![base.clone()];

        let replaced = upsert_by_name(&mut collection, derive_variants(&plant, &base));
        assert_eq!(replaced, 0);
        let first = collection.clone();

        let replaced = upsert_by_name(&mut collection, derive_variants(&plant, &base));
        assert_eq!(replaced, 2);
        assert_eq!(collection, first);
        assert_eq!(collection.len(), 3);
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut collection = vec![
            harvested("1-03-10-05-01", "Bronze pineapple", 1),
            harvested("1-03-10-05-00", "pineapple", 200),
        ];
        upsert_by_name(
            &mut collection,
            vec![harvested("1-03-10-05-01", "Bronze pineapple", 400)],
        );
        assert_eq!(collection[0].value, 400);
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn test_upsert_replaces_stale_row_with_same_id() {
        let mut collection = vec![
            harvested("1-03-10-05-00", "pineapple", 200),
            harvested("1-03-10-05-01", "bronze pineapple", 7),
        ];
        let replaced = upsert_by_name(
            &mut collection,
            vec![harvested("1-03-10-05-01", "Bronze pineapple", 400)],
        );
        assert_eq!(replaced, 1);
        assert_eq!(collection.len(), 2);
        assert_eq!(collection[1].name, "Bronze pineapple");
        assert_eq!(collection[1].value, 400);
    }

    #[test]
    fn test_default_shiny_refs() {
        let refs = default_shiny_refs("1-03-10-05-00");
        assert_eq!(refs.len(), 3);
        assert_eq!(refs["bronze"].id, "1-03-10-05-01");
        assert_eq!(refs["silver"].id, "1-03-10-05-02");
        assert_eq!(refs["gold"].id, "1-03-10-05-03");
        assert!((refs["bronze"].probability - 0.6).abs() < f64::EPSILON);
        assert!((refs["gold"].probability - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_refresh_shiny_values() {
        let mut items = vec![
            harvested("1-03-01-01-00", "garlic", 30),
            harvested("1-03-01-01-01", "Bronze garlic", 1),
            harvested("1-03-01-01-03", "gold garlic", 300),
            harvested("1-03-01-01-02", "Silver leek", 7),
        ];
        assert_eq!(refresh_shiny_values(&mut items), 1);
        assert_eq!(items[1].value, 60);
        assert_eq!(items[2].value, 300);
        assert_eq!(items[3].value, 7);
        assert_eq!(refresh_shiny_values(&mut items), 0);
    }
}
