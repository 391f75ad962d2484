//! The assembled catalog document.
//!
//! Section layout is fixed: every section below is always emitted, even when
//! its source table was empty. Icon buckets are all present; tool buckets are
//! keyed by the plural of each tool type.

use crate::error::Result;
use crate::records::{ActionHistory, Egg, Icon, IconRow, Item, Plant, Store, Tool};
use crate::stocklist::Stocklist;
use crate::types::IconBucket;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlacedItems {
    pub plants: Vec<Plant>,
    pub decorations: Vec<Item>,
    pub ground: Vec<Item>,
    pub placed_eggs: Vec<Egg>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InventoryItems {
    pub seeds: Vec<Item>,
    pub harvested_items: Vec<Item>,
    pub blueprints: Vec<Item>,
    pub inventory_eggs: Vec<Egg>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Catalog {
    pub placed_items: PlacedItems,
    pub inventory_items: InventoryItems,
    pub tools: BTreeMap<String, Vec<Tool>>,
    pub stores: Vec<Store>,
    pub stocklists: Vec<Stocklist>,
    pub icons: BTreeMap<String, Vec<Icon>>,
    pub action_histories: Vec<ActionHistory>,
}

/// Cleaned per-category collections ready to be assembled
#[derive(Debug, Clone, Default)]
pub struct CatalogParts {
    pub placed_items: PlacedItems,
    pub inventory_items: InventoryItems,
    pub tools: Vec<Tool>,
    pub stores: Vec<Store>,
    pub stocklists: Vec<Stocklist>,
    pub icons: Vec<IconRow>,
    pub action_histories: Vec<ActionHistory>,
}

/// Compose cleaned collections into the catalog document
pub fn assemble(parts: CatalogParts) -> Catalog {
    Catalog {
        placed_items: parts.placed_items,
        inventory_items: parts.inventory_items,
        tools: bucket_tools(parts.tools),
        stores: parts.stores,
        stocklists: parts.stocklists,
        icons: bucket_icons(parts.icons),
        action_histories: parts.action_histories,
    }
}

/// File icons under their bucket; every bucket exists even if empty
pub fn bucket_icons(rows: Vec<IconRow>) -> BTreeMap<String, Vec<Icon>> {
    let mut buckets: BTreeMap<String, Vec<Icon>> = IconBucket::ALL
        .iter()
        .map(|bucket| (bucket.to_string(), Vec::new()))
        .collect();
    for row in rows {
        buckets.entry(row.bucket.to_string()).or_default().push(row.icon);
    }
    buckets
}

/// Group tools by the plural of their type, keeping input order per bucket
pub fn bucket_tools(tools: Vec<Tool>) -> BTreeMap<String, Vec<Tool>> {
    let mut buckets: BTreeMap<String, Vec<Tool>> = BTreeMap::new();
    for tool in tools {
        buckets.entry(tool.bucket()).or_default().push(tool);
    }
    buckets
}

/// One item-bearing section of the catalog, for cross-section checks
pub struct SectionItems<'a> {
    pub section: &'static str,
    pub items: Vec<&'a Item>,
}

impl Catalog {
    /// Every item-bearing section with its items' shared fields
    pub fn item_sections(&self) -> Vec<SectionItems<'_>> {
        let placed = &self.placed_items;
        let inventory = &self.inventory_items;
        vec![
            SectionItems {
                section: "Plants",
                items: placed.plants.iter().map(|p| &p.item).collect(),
            },
            SectionItems {
                section: "Decorations",
                items: placed.decorations.iter().collect(),
            },
            SectionItems {
                section: "Ground",
                items: placed.ground.iter().collect(),
            },
            SectionItems {
                section: "PlacedEggs",
                items: placed.placed_eggs.iter().map(|e| &e.item).collect(),
            },
            SectionItems {
                section: "Seeds",
                items: inventory.seeds.iter().collect(),
            },
            SectionItems {
                section: "HarvestedItems",
                items: inventory.harvested_items.iter().collect(),
            },
            SectionItems {
                section: "Blueprints",
                items: inventory.blueprints.iter().collect(),
            },
            SectionItems {
                section: "InventoryEggs",
                items: inventory.inventory_eggs.iter().map(|e| &e.item).collect(),
            },
        ]
    }

    /// Identifiers of every item and tool in the catalog
    pub fn all_ids(&self) -> impl Iterator<Item = &str> {
        let item_ids: Vec<&str> = self
            .item_sections()
            .into_iter()
            .flat_map(|s| s.items.into_iter().map(|i| i.id.as_str()))
            .collect();
        let tool_ids = self.tools.values().flatten().map(|t| t.id.as_str());
        item_ids.into_iter().chain(tool_ids)
    }

    /// Pretty JSON with 4-space indentation and glyphs left unescaped
    pub fn to_json(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut ser)?;
        out.push(b'\n');
        Ok(out)
    }
}

/// SHA-256 of emitted catalog bytes, hex encoded
pub fn digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
