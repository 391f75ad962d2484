//! Composite identifier allocation.
//!
//! Every catalog entry is keyed by a dash-joined composite identifier:
//!
//! ```text
//! 0-02-10-05-00
//! │ │  │  │  └─ variant suffix (00 canonical, 01/02/03 bronze/silver/gold)
//! │ │  │  └──── item code within the category
//! │ │  └─────── category code
//! │ └────────── subtype code
//! └──────────── placement code (0 placed, 1 inventory)
//! ```
//!
//! Category and item codes come from [`CodeTable`] values handed to the
//! allocator. Two built-in tables exist: crops (used for seeds, plants and
//! harvested items) and decorations (used for decorations and blueprints).
//! Each table carries its own [`LookupPolicy`] because the two historically
//! disagree on how unmapped names are handled.

use crate::error::LookupError;
use crate::types::{PlacementKind, Subtype};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Category code used for unmapped categories under [`LookupPolicy::Fallback`]
pub const FALLBACK_CATEGORY_CODE: &str = "99";

/// Item code used for unmapped items under [`LookupPolicy::Fallback`]
pub const FALLBACK_ITEM_CODE: &str = "00";

/// Variant suffix of a canonical (non-shiny) item
pub const CANONICAL_VARIANT: &str = "00";

/// How a code table treats names it has no code for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupPolicy {
    /// Reject unmapped names with a [`LookupError`]
    #[default]
    Strict,
    /// Map unmapped categories to `99` and unmapped items to `00`
    Fallback,
}

/// Category and item name → code mappings for one domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeTable {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub policy: LookupPolicy,
    /// Category name → two-digit code
    pub categories: BTreeMap<String, String>,
    /// Category name → (item name → two-digit code)
    #[serde(default)]
    pub items: BTreeMap<String, BTreeMap<String, String>>,
}

impl CodeTable {
    /// Build a table from literal category and item listings
    pub fn from_entries(
        name: &str,
        policy: LookupPolicy,
        categories: &[(&str, &str)],
        items: &[(&str, &[(&str, &str)])],
    ) -> Self {
        let to_map = |pairs: &[(&str, &str)]| {
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>()
        };
        CodeTable {
            name: name.to_string(),
            policy,
            categories: to_map(categories),
            items: items
                .iter()
                .map(|(category, entries)| (category.to_string(), to_map(entries)))
                .collect(),
        }
    }

    /// Crop table used for seeds, plants and harvested items
    pub fn crops() -> Self {
        Self::from_entries(
            "items",
            LookupPolicy::Fallback,
            &[
                ("Onion", "01"),
                ("Leafy Green", "02"),
                ("Nightshade", "03"),
                ("Legume", "04"),
                ("Grain", "05"),
                ("Squash", "06"),
                ("Herb", "07"),
                ("Root Vegetable", "08"),
                ("Tree Fruit", "09"),
                ("Tropical", "10"),
                ("Berry", "11"),
                ("Citrus", "12"),
                ("Vine Fruit", "13"),
                ("Sea Vegetable", "14"),
                ("Error", "99"),
            ],
            &[
                (
                    "Onion",
                    &[
                        ("Garlic", "01"),
                        ("Green Onion", "02"),
                        ("Leek", "03"),
                        ("Red Onion", "04"),
                        ("Shallot", "05"),
                        ("Onion", "06"),
                    ],
                ),
                (
                    "Leafy Green",
                    &[
                        ("Broccoli", "01"),
                        ("Cabbage", "02"),
                        ("Cauliflower", "03"),
                        ("Kale", "04"),
                    ],
                ),
                (
                    "Nightshade",
                    &[("Bell Pepper", "01"), ("Eggplant", "02"), ("Tomato", "03")],
                ),
                (
                    "Legume",
                    &[
                        ("Beans", "01"),
                        ("Chickpeas", "02"),
                        ("Lentils", "03"),
                        ("Peas", "04"),
                    ],
                ),
                (
                    "Grain",
                    &[
                        ("Barley", "01"),
                        ("Corn", "02"),
                        ("Rice", "03"),
                        ("Wheat", "04"),
                    ],
                ),
                (
                    "Squash",
                    &[
                        ("Butternut Squash", "01"),
                        ("Cucumber", "02"),
                        ("Pumpkin", "03"),
                        ("Zucchini", "04"),
                    ],
                ),
                (
                    "Herb",
                    &[
                        ("Basil", "01"),
                        ("Mint", "02"),
                        ("Parsley", "03"),
                        ("Rosemary", "04"),
                        ("Thyme", "05"),
                    ],
                ),
                (
                    "Root Vegetable",
                    &[
                        ("Beet", "01"),
                        ("Carrot", "02"),
                        ("Parsnip", "03"),
                        ("Radish", "04"),
                        ("Sweet Potato", "05"),
                        ("Turnip", "06"),
                    ],
                ),
                (
                    "Tree Fruit",
                    &[
                        ("Apple", "01"),
                        ("Cherry", "02"),
                        ("Peach", "03"),
                        ("Pear", "04"),
                        ("Plum", "05"),
                    ],
                ),
                (
                    "Tropical",
                    &[
                        ("Banana", "01"),
                        ("Coconut", "02"),
                        ("Mango", "03"),
                        ("Papaya", "04"),
                        ("Pineapple", "05"),
                    ],
                ),
                (
                    "Berry",
                    &[
                        ("Blackberry", "01"),
                        ("Blueberry", "02"),
                        ("Cranberry", "03"),
                        ("Raspberry", "04"),
                        ("Strawberry", "05"),
                    ],
                ),
                (
                    "Citrus",
                    &[
                        ("Grapefruit", "01"),
                        ("Lemon", "02"),
                        ("Lime", "03"),
                        ("Orange", "04"),
                    ],
                ),
                (
                    "Vine Fruit",
                    &[
                        ("Grape", "01"),
                        ("Kiwi", "02"),
                        ("Melon", "03"),
                        ("Passionfruit", "04"),
                    ],
                ),
                (
                    "Sea Vegetable",
                    &[
                        ("Dulse", "01"),
                        ("Kelp", "02"),
                        ("Nori", "03"),
                        ("Wakame", "04"),
                    ],
                ),
            ],
        )
    }

    /// Decoration table used for decorations and their blueprints
    pub fn decorations() -> Self {
        Self::from_entries(
            "decorations",
            LookupPolicy::Strict,
            &[
                ("Normal", "01"),
                ("Bountiful", "02"),
                ("Speedy", "03"),
                ("Protective", "04"),
                ("Error", "99"),
            ],
            &[
                (
                    "Normal",
                    &[
                        ("Bench", "01"),
                        ("Flamingo", "02"),
                        ("Construction Sign", "03"),
                        ("Potted Plant", "04"),
                        ("Goose", "05"),
                    ],
                ),
                ("Bountiful", &[]),
                ("Speedy", &[]),
                ("Protective", &[]),
                ("Error", &[("Error", "99")]),
            ],
        )
    }

    pub fn with_policy(mut self, policy: LookupPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn category_code(&self, category: &str) -> Result<&str, LookupError> {
        match self.categories.get(category) {
            Some(code) => Ok(code),
            None if self.policy == LookupPolicy::Fallback => Ok(FALLBACK_CATEGORY_CODE),
            None => Err(LookupError::Category {
                table: self.name.clone(),
                category: category.to_string(),
            }),
        }
    }

    pub fn item_code(&self, category: &str, item: &str) -> Result<&str, LookupError> {
        match self.items.get(category).and_then(|items| items.get(item)) {
            Some(code) => Ok(code),
            None if self.policy == LookupPolicy::Fallback => Ok(FALLBACK_ITEM_CODE),
            None => Err(LookupError::Item {
                table: self.name.clone(),
                category: category.to_string(),
                item: item.to_string(),
            }),
        }
    }

    /// Check every code is exactly two ASCII digits
    pub fn validate(&self) -> Result<(), LookupError> {
        let item_codes = self.items.values().flat_map(|items| items.iter());
        for (name, code) in self.categories.iter().chain(item_codes) {
            if !is_two_digits(code) {
                return Err(LookupError::MalformedCode {
                    table: self.name.clone(),
                    name: name.clone(),
                    code: code.clone(),
                });
            }
        }
        Ok(())
    }
}

fn is_two_digits(code: &str) -> bool {
    code.len() == 2 && code.bytes().all(|b| b.is_ascii_digit())
}

/// The pair of code tables the allocator consults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeTables {
    pub items: CodeTable,
    pub decorations: CodeTable,
}

impl Default for CodeTables {
    fn default() -> Self {
        CodeTables {
            items: CodeTable::crops(),
            decorations: CodeTable::decorations(),
        }
    }
}

/// Maps item descriptions to composite identifiers
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    tables: CodeTables,
}

impl IdAllocator {
    pub fn new(tables: CodeTables) -> Self {
        IdAllocator { tables }
    }

    pub fn tables(&self) -> &CodeTables {
        &self.tables
    }

    /// Table that owns codes for a subtype
    pub fn table_for(&self, subtype: Subtype) -> &CodeTable {
        match subtype {
            Subtype::Decoration | Subtype::Blueprint => &self.tables.decorations,
            _ => &self.tables.items,
        }
    }

    /// Allocate an identifier, picking the code table from the subtype
    pub fn allocate(
        &self,
        placement: PlacementKind,
        subtype: Subtype,
        category: &str,
        item: &str,
        variant: &str,
    ) -> Result<String, LookupError> {
        allocate_in(self.table_for(subtype), placement, subtype, category, item, variant)
    }

    /// Allocate from names as they appear in the source tables
    pub fn allocate_named(
        &self,
        placement: &str,
        subtype: &str,
        category: &str,
        item: &str,
        variant: &str,
    ) -> Result<String, LookupError> {
        let placement: PlacementKind = placement.parse()?;
        let subtype: Subtype = subtype.parse()?;
        self.allocate(placement, subtype, category, item, variant)
    }
}

/// Allocate an identifier against an explicit code table
pub fn allocate_in(
    table: &CodeTable,
    placement: PlacementKind,
    subtype: Subtype,
    category: &str,
    item: &str,
    variant: &str,
) -> Result<String, LookupError> {
    let category_code = table.category_code(category)?;
    let item_code = table.item_code(category, item)?;
    Ok(format!(
        "{}-{}-{}-{}-{}",
        placement.code(),
        subtype.code(),
        category_code,
        item_code,
        variant
    ))
}

/// Replace the final two characters of an identifier with a variant suffix
///
/// `"1-03-10-05-00"` with `"02"` → `"1-03-10-05-02"`. Identifiers shorter
/// than two characters get the suffix appended.
pub fn with_variant(id: &str, suffix: &str) -> String {
    let cut = id
        .char_indices()
        .rev()
        .nth(1)
        .map(|(idx, _)| idx)
        .unwrap_or(0);
    format!("{}{}", &id[..cut], suffix)
}
