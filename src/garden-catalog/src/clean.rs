//! Identifier-based deduplication and ordering.
//!
//! Two merge policies exist in the catalog and they never mix:
//!
//! - [`dedup_first_wins`] (here) keys on `id` and keeps the earliest record.
//! - [`crate::shiny::upsert_by_name`] keys on `name` (or a clashing
//!   `id`) and lets the newest derivation replace the old one.

use crate::records::{Egg, Item, Plant, Tool};
use crate::table::Table;
use serde::Serialize;
use std::collections::HashSet;

/// Anything carrying a composite identifier
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for Item {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Plant {
    fn key(&self) -> &str {
        &self.item.id
    }
}

impl Keyed for Egg {
    fn key(&self) -> &str {
        &self.item.id
    }
}

impl Keyed for Tool {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Records surviving a clean pass plus how many were dropped
#[derive(Debug, Clone, PartialEq)]
pub struct Cleaned<T> {
    pub records: Vec<T>,
    pub removed: usize,
}

/// Rows dropped from one source collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Removal {
    pub table: String,
    pub count: usize,
}

/// Drop records whose id repeats an earlier record's id, keeping input order
pub fn dedup_first_wins<T: Keyed>(records: Vec<T>) -> Cleaned<T> {
    let before = records.len();
    let mut seen = HashSet::with_capacity(before);
    let records: Vec<T> = records
        .into_iter()
        .filter(|record| seen.insert(record.key().to_string()))
        .collect();
    Cleaned {
        removed: before - records.len(),
        records,
    }
}

/// Sort ascending by identifier using plain string comparison
///
/// Segments are fixed-width and zero padded, so byte order matches the
/// numeric order of each segment without parsing them.
pub fn sort_by_id<T: Keyed>(records: &mut [T]) {
    records.sort_by(|a, b| a.key().cmp(b.key()));
}

/// Dedup then sort; running it on its own output changes nothing
pub fn clean<T: Keyed>(records: Vec<T>) -> Cleaned<T> {
    let mut cleaned = dedup_first_wins(records);
    sort_by_id(&mut cleaned.records);
    cleaned
}

/// Collects per-table removal counts across a clean pass
#[derive(Debug, Default)]
pub struct Cleaner {
    removals: Vec<Removal>,
}

impl Cleaner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clean one collection, recording removals under `table`
    pub fn run<T: Keyed>(&mut self, table: &str, records: Vec<T>) -> Vec<T> {
        let cleaned = clean(records);
        if cleaned.removed > 0 {
            tracing::info!("Removed {} duplicate rows from {}", cleaned.removed, table);
            self.removals.push(Removal {
                table: table.to_string(),
                count: cleaned.removed,
            });
        }
        cleaned.records
    }

    pub fn finish(self) -> Vec<Removal> {
        self.removals
    }
}

/// Raw-table row keyed by one column, for cleaning source files in place
struct KeyedRow {
    key: String,
    row: crate::table::Row,
}

impl Keyed for KeyedRow {
    fn key(&self) -> &str {
        &self.key
    }
}

/// Clean a raw source table by its `id` column
///
/// Returns the cleaned table and the number of dropped rows, or `None` when
/// the table has no `id` column.
pub fn clean_table(table: &Table) -> Option<(Table, usize)> {
    let idx = table.column_index("id")?;
    let keyed = table
        .rows
        .iter()
        .map(|row| KeyedRow {
            key: row.cells.get(idx).cloned().unwrap_or_default(),
            row: row.clone(),
        })
        .collect();
    let cleaned = clean(keyed);
    let table = Table {
        name: table.name.clone(),
        headers: table.headers.clone(),
        rows: cleaned.records.into_iter().map(|k| k.row).collect(),
    };
    Some((table, cleaned.removed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PlacementKind;

    fn item(id: &str, name: &str) -> Item {
        Item {
            id: id.to_string(),
            name: name.to_string(),
            icon: "🌱".to_string(),
            item_type: PlacementKind::InventoryItem,
            subtype: "Seed".to_string(),
            category: "Onion".to_string(),
            description: String::new(),
            value: 10,
            level: 0,
            transform_id: None,
        }
    }

    #[test]
    fn test_first_wins() {
        let cleaned = dedup_first_wins(vec![
            item("1-01-01-01-00", "garlic seed"),
            item("1-01-01-01-00", "impostor seed"),
        ]);
        assert_eq!(cleaned.removed, 1);
        assert_eq!(cleaned.records.len(), 1);
        assert_eq!(cleaned.records[0].name, "garlic seed");
    }

    #[test]
    fn test_sort_is_lexicographic() {
        let cleaned = clean(vec![
            item("1-01-12-01-00", "grapefruit"),
            item("1-01-02-04-00", "kale"),
            item("0-02-10-05-00", "pineapple"),
            item("1-01-02-01-00", "broccoli"),
        ]);
        let ids: Vec<&str> = cleaned.records.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["0-02-10-05-00", "1-01-02-01-00", "1-01-02-04-00", "1-01-12-01-00"]
        );
    }

    #[test]
    fn test_clean_is_idempotent() {
        let input = vec![
            item("1-01-03-01-00", "b"),
            item("1-01-01-01-00", "a"),
            item("1-01-03-01-00", "c"),
        ];
        let once = clean(input);
        let twice = clean(once.records.clone());
        assert_eq!(once.removed, 1);
        assert_eq!(twice.removed, 0);
        assert_eq!(once.records, twice.records);
    }

    #[test]
    fn test_cleaner_reports_only_lossy_tables() {
        let mut cleaner = Cleaner::new();
        let seeds = cleaner.run(
            "seeds",
            vec![item("a", "1"), item("a", "2"), item("a", "3")],
        );
        let harvested = cleaner.run("harvested", vec![item("b", "1")]);
        assert_eq!(seeds.len(), 1);
        assert_eq!(harvested.len(), 1);
        assert_eq!(
            cleaner.finish(),
            vec![Removal {
                table: "seeds".to_string(),
                count: 2
            }]
        );
    }

    #[test]
    fn test_clean_raw_table() {
        let csv = "id,name\n02,b\n01,a\n02,dup\n";
        let table = Table::parse("seeds", csv.as_bytes()).unwrap();
        let (cleaned, removed) = clean_table(&table).unwrap();
        assert_eq!(removed, 1);
        let rows: Vec<&str> = cleaned
            .rows
            .iter()
            .map(|r| r.cells[1].as_str())
            .collect();
        assert_eq!(rows, vec!["a", "b"]);

        let no_id = Table::parse("icons", "name\nx\n".as_bytes()).unwrap();
        assert!(clean_table(&no_id).is_none());
    }
}
