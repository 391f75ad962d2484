//! Stocklist grouping.
//!
//! The stocklist table is flat: one row per (stocklist, item). Rows are
//! grouped by the `(id, name)` pair, never by id alone, because the same id
//! shows up under different names in the source data.

use crate::records::StocklistRow;
use crate::report::Warning;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItem {
    pub name: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stocklist {
    pub id: String,
    pub name: String,
    pub items: Vec<StockItem>,
}

impl Stocklist {
    pub fn key(&self) -> (&str, &str) {
        (&self.id, &self.name)
    }
}

/// Group flat rows into stocklists
///
/// Groups come out in the order their key first appears. Within a group,
/// items keep row order and repeated item names stay as separate entries.
pub fn group_rows(rows: Vec<StocklistRow>) -> Vec<Stocklist> {
    let mut stocklists: Vec<Stocklist> = Vec::new();
    let mut index: HashMap<(String, String), usize> = HashMap::new();

    for row in rows {
        let key = (row.id, row.name);
        let slot = match index.get(&key) {
            Some(&slot) => slot,
            None => {
                stocklists.push(Stocklist {
                    id: key.0.clone(),
                    name: key.1.clone(),
                    items: Vec::new(),
                });
                index.insert(key, stocklists.len() - 1);
                stocklists.len() - 1
            }
        };
        stocklists[slot].items.push(StockItem {
            name: row.item_name,
            quantity: row.quantity,
        });
    }

    stocklists
}

/// Report item names listed more than once in the same stocklist
pub fn duplicate_items(stocklists: &[Stocklist]) -> Vec<Warning> {
    let mut warnings = Vec::new();
    for stocklist in stocklists {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for item in &stocklist.items {
            *counts.entry(&item.name).or_default() += 1;
        }
        warnings.extend(
            counts
                .into_iter()
                .filter(|(_, count)| *count > 1)
                .map(|(item_name, count)| Warning::DuplicateStockItem {
                    stocklist_id: stocklist.id.clone(),
                    stocklist_name: stocklist.name.clone(),
                    item_name: item_name.to_string(),
                    count,
                }),
        );
    }
    warnings
}
