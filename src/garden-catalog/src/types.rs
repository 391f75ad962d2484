//! Shared enumerations for catalog records.
//!
//! Names round-trip through `Display`/`FromStr` exactly as they appear in the
//! source tables and the emitted catalog.

use crate::error::LookupError;
use serde::{Deserialize, Serialize};

/// Whether an item lives in the garden or in a player's inventory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlacementKind {
    PlacedItem,
    InventoryItem,
}

impl PlacementKind {
    /// Single-digit code leading every composite identifier
    pub fn code(&self) -> &'static str {
        match self {
            Self::PlacedItem => "0",
            Self::InventoryItem => "1",
        }
    }
}

impl std::fmt::Display for PlacementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PlacedItem => write!(f, "PlacedItem"),
            Self::InventoryItem => write!(f, "InventoryItem"),
        }
    }
}

impl std::str::FromStr for PlacementKind {
    type Err = LookupError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PlacedItem" => Ok(Self::PlacedItem),
            "InventoryItem" => Ok(Self::InventoryItem),
            _ => Err(LookupError::Placement(s.to_string())),
        }
    }
}

/// Subtypes that take part in identifier allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Subtype {
    Ground,
    Seed,
    Plant,
    HarvestedItem,
    Decoration,
    Blueprint,
}

impl Subtype {
    /// Two-digit subtype segment of a composite identifier
    pub fn code(&self) -> &'static str {
        match self {
            Self::Ground => "00",
            Self::Seed => "01",
            Self::Plant => "02",
            Self::HarvestedItem => "03",
            Self::Decoration => "04",
            Self::Blueprint => "05",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ground => "Ground",
            Self::Seed => "Seed",
            Self::Plant => "Plant",
            Self::HarvestedItem => "HarvestedItem",
            Self::Decoration => "Decoration",
            Self::Blueprint => "Blueprint",
        }
    }
}

impl std::fmt::Display for Subtype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Subtype {
    type Err = LookupError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Ground" => Ok(Self::Ground),
            "Seed" => Ok(Self::Seed),
            "Plant" => Ok(Self::Plant),
            "HarvestedItem" => Ok(Self::HarvestedItem),
            "Decoration" => Ok(Self::Decoration),
            "Blueprint" => Ok(Self::Blueprint),
            _ => Err(LookupError::Subtype(s.to_string())),
        }
    }
}

/// Shiny rarity tier of a harvested item
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShinyTier {
    Bronze,
    Silver,
    Gold,
    /// Tier names outside the known three are carried through verbatim
    Other(String),
}

impl ShinyTier {
    /// Parse a tier name; never fails, unknown names become `Other`
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "bronze" => Self::Bronze,
            "silver" => Self::Silver,
            "gold" => Self::Gold,
            _ => Self::Other(name.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Bronze => "bronze",
            Self::Silver => "silver",
            Self::Gold => "gold",
            Self::Other(name) => name,
        }
    }

    /// Value multiplier applied to the canonical harvested value
    pub fn multiplier(&self) -> u64 {
        match self {
            Self::Bronze => 2,
            Self::Silver => 5,
            Self::Gold => 10,
            Self::Other(_) => 1,
        }
    }

    /// Identifier variant suffix reserved for this tier
    pub fn id_suffix(&self) -> Option<&'static str> {
        match self {
            Self::Bronze => Some("01"),
            Self::Silver => Some("02"),
            Self::Gold => Some("03"),
            Self::Other(_) => None,
        }
    }

    /// Draw probability a freshly authored plant gets for this tier
    pub fn default_probability(&self) -> Option<f64> {
        match self {
            Self::Bronze => Some(0.6),
            Self::Silver => Some(0.3),
            Self::Gold => Some(0.1),
            Self::Other(_) => None,
        }
    }

    /// Tier name with its first letter upper-cased (`"Bronze"`)
    pub fn display_name(&self) -> String {
        capitalize(self.name())
    }

    pub const KNOWN: [ShinyTier; 3] = [ShinyTier::Bronze, ShinyTier::Silver, ShinyTier::Gold];
}

impl std::fmt::Display for ShinyTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Upper-case the first character, lower-case the rest
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Bucket an icon is filed under in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IconBucket {
    Ground,
    Plants,
    Eggs,
    Decorations,
    Tools,
    Utilities,
    Other,
    Error,
}

impl IconBucket {
    pub const ALL: [IconBucket; 8] = [
        Self::Ground,
        Self::Plants,
        Self::Eggs,
        Self::Decorations,
        Self::Tools,
        Self::Utilities,
        Self::Other,
        Self::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ground => "Ground",
            Self::Plants => "Plants",
            Self::Eggs => "Eggs",
            Self::Decorations => "Decorations",
            Self::Tools => "Tools",
            Self::Utilities => "Utilities",
            Self::Other => "Other",
            Self::Error => "Error",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.as_str() == s)
    }
}

impl std::fmt::Display for IconBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
