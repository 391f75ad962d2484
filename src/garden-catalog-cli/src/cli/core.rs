//! Core CLI definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "garden-catalog")]
#[command(about = "Garden item catalog builder", long_about = None)]
pub struct Cli {
    /// Config file (defaults to ./catalog.toml, then the user config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Which code table an allocation is resolved against
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CodeTableArg {
    Items,
    Decorations,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the catalog from the source tables
    #[command(visible_alias = "b")]
    Build {
        /// Source directory (uses configured default if not provided)
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Catalog output path (uses configured default if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write the build report as JSON
        #[arg(long)]
        report: Option<PathBuf>,

        /// Refuse to write the catalog when the build has warnings
        #[arg(long)]
        deny_warnings: bool,
    },

    /// Rebuild and compare against an existing catalog without writing
    Check {
        /// Source directory (uses configured default if not provided)
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Catalog to compare against (uses configured output if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Dedup and sort the item tables, and refresh shiny values
    Tidy {
        /// Source directory (uses configured default if not provided)
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Rewrite the tables (otherwise only report)
        #[arg(long)]
        write: bool,
    },

    /// Print the composite identifier for an item
    #[command(visible_alias = "a")]
    Allocate {
        /// Placement kind (PlacedItem or InventoryItem)
        #[arg(long)]
        placement: String,

        /// Subtype (Ground, Seed, Plant, HarvestedItem, Decoration, Blueprint)
        #[arg(long)]
        subtype: String,

        /// Category name (e.g. "Tropical")
        #[arg(long)]
        category: String,

        /// Item name within the category (e.g. "Pineapple")
        #[arg(long)]
        item: String,

        /// Variant suffix
        #[arg(long, default_value = "00")]
        variant: String,

        /// Force a code table instead of picking one from the subtype
        #[arg(long, value_enum)]
        table: Option<CodeTableArg>,
    },

    /// Add a plant (with seed, harvest and shiny variants) from a YAML draft
    AddPlant {
        /// Path to the plant draft
        draft: PathBuf,

        /// Source directory (uses configured default if not provided)
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Show the rows without appending them
        #[arg(long)]
        dry_run: bool,
    },

    /// Add a decoration and its blueprint from a YAML draft
    AddDecoration {
        /// Path to the decoration draft
        draft: PathBuf,

        /// Source directory (uses configured default if not provided)
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Show the rows without appending them
        #[arg(long)]
        dry_run: bool,
    },

    /// Configure default settings
    #[command(visible_alias = "c")]
    Configure {
        /// Set default source directory
        #[arg(long)]
        source_dir: Option<PathBuf>,

        /// Set default catalog output path
        #[arg(long)]
        output: Option<PathBuf>,

        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}
