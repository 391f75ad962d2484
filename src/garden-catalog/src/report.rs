//! Build warnings and summary.
//!
//! Nothing in here stops a build. Schema, lookup and I/O problems are errors
//! and abort before output is written; everything collected here is data
//! quality that a content author should look at.

use crate::clean::Removal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// A reference field points at an identifier absent from the catalog
    ReferenceGap {
        section: String,
        source_id: String,
        field: String,
        target: String,
    },
    /// One identifier is used by items in more than one catalog section
    DuplicateId { id: String, sections: Vec<String> },
    /// Shiny tier probabilities for one plant add up to more than 1
    ProbabilityOverflow { plant_id: String, total: f64 },
    /// The same item name appears more than once in one stocklist
    DuplicateStockItem {
        stocklist_id: String,
        stocklist_name: String,
        item_name: String,
        count: usize,
    },
    /// A store sells from a stocklist `(id, name)` pair that does not exist
    MissingStocklist {
        store_id: u32,
        stocklist_id: String,
        stocklist_name: String,
    },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReferenceGap {
                section,
                source_id,
                field,
                target,
            } => write!(
                f,
                "{} {}: {} references missing id '{}'",
                section, source_id, field, target
            ),
            Self::DuplicateId { id, sections } => write!(
                f,
                "Id '{}' is used in several sections: {}",
                id,
                sections.join(", ")
            ),
            Self::ProbabilityOverflow { plant_id, total } => write!(
                f,
                "Plants {}: shiny probabilities sum to {:.4} (> 1)",
                plant_id, total
            ),
            Self::DuplicateStockItem {
                stocklist_id,
                stocklist_name,
                item_name,
                count,
            } => write!(
                f,
                "Stocklist {} '{}': item '{}' listed {} times",
                stocklist_id, stocklist_name, item_name, count
            ),
            Self::MissingStocklist {
                store_id,
                stocklist_id,
                stocklist_name,
            } => write!(
                f,
                "Store {}: stocklist {} '{}' does not exist",
                store_id, stocklist_id, stocklist_name
            ),
        }
    }
}

/// What a build did besides producing the catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BuildReport {
    /// Tables that lost rows to first-wins id dedup
    pub removed: Vec<Removal>,
    /// Shiny variants synthesized from plants
    pub derived_variants: usize,
    pub warnings: Vec<Warning>,
}

impl BuildReport {
    pub fn total_removed(&self) -> usize {
        self.removed.iter().map(|r| r.count).sum()
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.removed.is_empty()
    }

    pub(crate) fn warn_all(&mut self, warnings: Vec<Warning>) {
        for warning in &warnings {
            tracing::warn!("{}", warning);
        }
        self.warnings.extend(warnings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_display() {
        let gap = Warning::ReferenceGap {
            section: "Seeds".to_string(),
            source_id: "1-01-10-05-00".to_string(),
            field: "transformId".to_string(),
            target: "0-02-10-05-00".to_string(),
        };
        assert_eq!(
            gap.to_string(),
            "Seeds 1-01-10-05-00: transformId references missing id '0-02-10-05-00'"
        );
    }

    #[test]
    fn test_duplicate_id_display() {
        let warning = Warning::DuplicateId {
            id: "1-03-10-05-00".to_string(),
            sections: vec!["Seeds".to_string(), "HarvestedItems".to_string()],
        };
        assert_eq!(
            warning.to_string(),
            "Id '1-03-10-05-00' is used in several sections: Seeds, HarvestedItems"
        );
    }

    #[test]
    fn test_warning_json_is_tagged() {
        let warning = Warning::ProbabilityOverflow {
            plant_id: "0-02-10-05-00".to_string(),
            total: 1.2,
        };
        let json = serde_json::to_value(&warning).unwrap();
        assert_eq!(json["kind"], "probability_overflow");
        assert_eq!(json["plant_id"], "0-02-10-05-00");
    }

    #[test]
    fn test_report_totals() {
        let mut report = BuildReport::default();
        assert!(report.is_clean());
        report.removed.push(Removal {
            table: "seeds".to_string(),
            count: 2,
        });
        report.removed.push(Removal {
            table: "plants".to_string(),
            count: 1,
        });
        assert_eq!(report.total_removed(), 3);
        assert!(!report.is_clean());
    }
}
