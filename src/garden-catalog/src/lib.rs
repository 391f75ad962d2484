//! # garden-catalog
//!
//! Content catalog builder for the garden game - source tables in, one JSON
//! catalog out.
//!
//! This library provides functionality to:
//! - Allocate composite item identifiers from category and item code tables
//! - Read and type the CSV source tables (plants, seeds, stores, icons, ...)
//! - Derive shiny harvested variants and attach shiny tier tables to plants
//! - Deduplicate, sort, group and assemble everything into the catalog
//! - Author new plants and decorations into the working tables
//!
//! ## Example
//!
//! ```no_run
//! use garden_catalog::{build_from, write_catalog, SourceLayout};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let output = build_from(&SourceLayout::new("data"))?;
//! for warning in &output.report.warnings {
//!     eprintln!("warning: {}", warning);
//! }
//!
//! let (bytes, digest) = output.render()?;
//! write_catalog(Path::new("final/Items.json"), &bytes)?;
//! println!("sha256 {}", digest);
//! # Ok(())
//! # }
//! ```

pub mod authoring;
pub mod catalog;
pub mod clean;
pub mod error;
pub mod ids;
pub mod pipeline;
pub mod records;
pub mod report;
pub mod shiny;
pub mod stocklist;
pub mod table;
pub mod types;
pub mod xref;

#[doc(inline)]
pub use authoring::{tidy, DecorationDraft, DecorationRows, PlantDraft, PlantRows, TidyReport};
#[doc(inline)]
pub use catalog::{assemble, digest, Catalog, CatalogParts, InventoryItems, PlacedItems};
#[doc(inline)]
pub use clean::{clean, Cleaner, Removal};
#[doc(inline)]
pub use error::{CatalogError, LookupError, Result, SchemaError};
#[doc(inline)]
pub use ids::{CodeTable, CodeTables, IdAllocator, LookupPolicy};
#[doc(inline)]
pub use pipeline::{build, build_from, write_catalog, BuildOutput, SourceLayout, Sources, TablePaths};
#[doc(inline)]
pub use records::{ActionHistory, Egg, Icon, Item, Plant, ShinyRate, ShinyRef, Store, Tool};
#[doc(inline)]
pub use report::{BuildReport, Warning};
#[doc(inline)]
pub use stocklist::{StockItem, Stocklist};
#[doc(inline)]
pub use types::{IconBucket, PlacementKind, ShinyTier, Subtype};
