//! Identifier allocation command handler

use crate::cli::CodeTableArg;
use crate::config::Config;
use anyhow::{Context, Result};
use garden_catalog::ids::allocate_in;
use garden_catalog::{PlacementKind, Subtype};

/// Resolve a composite identifier from names
///
/// Without `table`, the subtype picks the code table (decorations and
/// blueprints use the decoration table, everything else the item table).
pub fn handle(
    config: &Config,
    placement: &str,
    subtype: &str,
    category: &str,
    item: &str,
    variant: &str,
    table: Option<CodeTableArg>,
) -> Result<String> {
    let allocator = config.allocator()?;
    let placement: PlacementKind = placement.parse()?;
    let subtype: Subtype = subtype.parse()?;

    let code_table = match table {
        Some(CodeTableArg::Items) => &allocator.tables().items,
        Some(CodeTableArg::Decorations) => &allocator.tables().decorations,
        None => allocator.table_for(subtype),
    };

    allocate_in(code_table, placement, subtype, category, item, variant).with_context(|| {
        format!(
            "Could not allocate an id for '{}' in '{}' using the {} table",
            item, category, code_table.name
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_plant() {
        let id = handle(
            &Config::default(),
            "PlacedItem",
            "Plant",
            "Tropical",
            "Pineapple",
            "00",
            None,
        )
        .unwrap();
        assert_eq!(id, "0-02-10-05-00");
    }

    #[test]
    fn test_allocate_blueprint_uses_decoration_table() {
        let id = handle(
            &Config::default(),
            "InventoryItem",
            "Blueprint",
            "Normal",
            "Goose",
            "00",
            None,
        )
        .unwrap();
        assert_eq!(id, "1-05-01-05-00");
    }

    #[test]
    fn test_forced_table() {
        // The item table falls back where the decoration table would refuse
        let id = handle(
            &Config::default(),
            "PlacedItem",
            "Decoration",
            "Normal",
            "Goose",
            "00",
            Some(CodeTableArg::Items),
        )
        .unwrap();
        assert_eq!(id, "0-04-99-00-00");
    }

    #[test]
    fn test_bad_placement() {
        let result = handle(
            &Config::default(),
            "Floating",
            "Plant",
            "Tropical",
            "Pineapple",
            "00",
            None,
        );
        assert!(result.is_err());
    }
}
