//! The catalog build: load → resolve → derive → group → clean → assemble.
//!
//! Stages run in a fixed order and each one only sees the output of the
//! stages before it. A build either returns a complete catalog with its
//! report or fails before anything is written.

use crate::catalog::{assemble, digest, Catalog, CatalogParts, InventoryItems, PlacedItems};
use crate::clean::Cleaner;
use crate::error::{CatalogError, Result};
use crate::records::{
    ActionHistory, Egg, IconRow, Item, Plant, ShinyRate, StocklistRow, Store, Tool,
};
use crate::report::BuildReport;
use crate::shiny::{derive_variants, upsert_by_name};
use crate::stocklist::{duplicate_items, group_rows};
use crate::table::{FromRow, Table};
use crate::xref::{
    duplicate_ids, missing_stocklists, probability_overflows, reference_gaps, ShinyIndex,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Where each source table lives, relative to the source root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TablePaths {
    pub blueprints: PathBuf,
    pub harvested: PathBuf,
    pub seeds: PathBuf,
    pub inventory_eggs: PathBuf,
    pub plants: PathBuf,
    pub decorations: PathBuf,
    pub ground: PathBuf,
    pub placed_eggs: PathBuf,
    pub shiny_rates: PathBuf,
    pub tools: PathBuf,
    pub stores: PathBuf,
    pub stocklists: PathBuf,
    pub icons: PathBuf,
    pub action_histories: PathBuf,
}

impl Default for TablePaths {
    fn default() -> Self {
        TablePaths {
            blueprints: "items/inventoryItems/blueprints.csv".into(),
            harvested: "items/inventoryItems/harvested.csv".into(),
            seeds: "items/inventoryItems/seeds.csv".into(),
            inventory_eggs: "items/inventoryItems/eggs.csv".into(),
            plants: "items/placedItems/plants.csv".into(),
            decorations: "items/placedItems/decorations.csv".into(),
            ground: "items/placedItems/ground.csv".into(),
            placed_eggs: "items/placedItems/eggs.csv".into(),
            shiny_rates: "items/placedItems/shinyItemRates.csv".into(),
            tools: "garden/tools.csv".into(),
            stores: "store/stores.csv".into(),
            stocklists: "store/stocklist.csv".into(),
            icons: "user/icons.csv".into(),
            action_histories: "user/actionHistories.csv".into(),
        }
    }
}

/// A source root plus the table paths beneath it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLayout {
    pub root: PathBuf,
    pub tables: TablePaths,
}

impl SourceLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        SourceLayout {
            root: root.into(),
            tables: TablePaths::default(),
        }
    }

    pub fn with_tables(mut self, tables: TablePaths) -> Self {
        self.tables = tables;
        self
    }

    pub fn resolve(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }

    /// Item tables keyed by `id`, as (table name, path) pairs
    pub fn item_tables(&self) -> Vec<(&'static str, PathBuf)> {
        let t = &self.tables;
        vec![
            ("blueprints", self.resolve(&t.blueprints)),
            ("harvested", self.resolve(&t.harvested)),
            ("seeds", self.resolve(&t.seeds)),
            ("inventoryEggs", self.resolve(&t.inventory_eggs)),
            ("plants", self.resolve(&t.plants)),
            ("decorations", self.resolve(&t.decorations)),
            ("ground", self.resolve(&t.ground)),
            ("placedEggs", self.resolve(&t.placed_eggs)),
            ("tools", self.resolve(&t.tools)),
        ]
    }
}

/// Normalized records from every source table
#[derive(Debug, Clone, Default)]
pub struct Sources {
    pub blueprints: Vec<Item>,
    pub harvested: Vec<Item>,
    pub seeds: Vec<Item>,
    pub inventory_eggs: Vec<Egg>,
    pub plants: Vec<Plant>,
    pub decorations: Vec<Item>,
    pub ground: Vec<Item>,
    pub placed_eggs: Vec<Egg>,
    pub shiny_rates: Vec<ShinyRate>,
    pub tools: Vec<Tool>,
    pub stores: Vec<Store>,
    pub stocklist_rows: Vec<StocklistRow>,
    pub icons: Vec<IconRow>,
    pub action_histories: Vec<ActionHistory>,
}

impl Sources {
    /// Read and type every table under a layout
    ///
    /// Egg tables are optional; every other table must exist.
    pub fn load(layout: &SourceLayout) -> Result<Self> {
        let t = &layout.tables;
        let path = |p: &PathBuf| layout.resolve(p);

        let sources = Sources {
            blueprints: load_table(&path(&t.blueprints), Required::Yes)?,
            harvested: load_table(&path(&t.harvested), Required::Yes)?,
            seeds: load_table(&path(&t.seeds), Required::Yes)?,
            inventory_eggs: load_table(&path(&t.inventory_eggs), Required::No)?,
            plants: load_table(&path(&t.plants), Required::Yes)?,
            decorations: load_table(&path(&t.decorations), Required::Yes)?,
            ground: load_table(&path(&t.ground), Required::Yes)?,
            placed_eggs: load_table(&path(&t.placed_eggs), Required::No)?,
            shiny_rates: load_table(&path(&t.shiny_rates), Required::Yes)?,
            tools: load_table(&path(&t.tools), Required::Yes)?,
            stores: load_table(&path(&t.stores), Required::Yes)?,
            stocklist_rows: load_table(&path(&t.stocklists), Required::Yes)?,
            icons: load_table(&path(&t.icons), Required::Yes)?,
            action_histories: load_table(&path(&t.action_histories), Required::Yes)?,
        };

        tracing::info!(
            "Loaded {} plants, {} seeds, {} harvested items, {} shiny rates from {}",
            sources.plants.len(),
            sources.seeds.len(),
            sources.harvested.len(),
            sources.shiny_rates.len(),
            layout.root.display()
        );
        Ok(sources)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Required {
    Yes,
    No,
}

fn load_table<T: FromRow>(path: &Path, required: Required) -> Result<Vec<T>> {
    if required == Required::No && !path.exists() {
        tracing::debug!("Optional table {} not present", path.display());
        return Ok(Vec::new());
    }
    let table = Table::read(path)?;
    Ok(table.records()?)
}

/// A finished build: the catalog and what happened along the way
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub catalog: Catalog,
    pub report: BuildReport,
}

impl BuildOutput {
    /// Serialized catalog bytes and their digest
    pub fn render(&self) -> Result<(Vec<u8>, String)> {
        let bytes = self.catalog.to_json()?;
        let hash = digest(&bytes);
        Ok((bytes, hash))
    }
}

/// Run every stage over already-loaded sources
pub fn build(sources: Sources) -> BuildOutput {
    let Sources {
        blueprints,
        mut harvested,
        seeds,
        inventory_eggs,
        mut plants,
        decorations,
        ground,
        placed_eggs,
        shiny_rates,
        tools,
        stores,
        stocklist_rows,
        icons,
        action_histories,
    } = sources;

    let mut report = BuildReport::default();

    // Shiny tier tables onto plants
    let index = ShinyIndex::from_rates(&shiny_rates);
    index.attach(&mut plants);
    report.warn_all(index.orphans(&plants));
    report.warn_all(probability_overflows(&plants));

    // Shiny harvested variants, replacing earlier derivations by name
    let derived = derive_all(&plants, &harvested);
    report.derived_variants = derived.len();
    let replaced = upsert_by_name(&mut harvested, derived);
    tracing::info!(
        "Derived {} shiny variants ({} replaced existing rows)",
        report.derived_variants,
        replaced
    );

    let stocklists = group_rows(stocklist_rows);
    report.warn_all(duplicate_items(&stocklists));

    let mut cleaner = Cleaner::new();
    let parts = CatalogParts {
        placed_items: PlacedItems {
            plants: cleaner.run("plants", plants),
            decorations: cleaner.run("decorations", decorations),
            ground: cleaner.run("ground", ground),
            placed_eggs: cleaner.run("placedEggs", placed_eggs),
        },
        inventory_items: InventoryItems {
            seeds: cleaner.run("seeds", seeds),
            harvested_items: cleaner.run("harvested", harvested),
            blueprints: cleaner.run("blueprints", blueprints),
            inventory_eggs: cleaner.run("inventoryEggs", inventory_eggs),
        },
        tools: cleaner.run("tools", tools),
        stores,
        stocklists,
        icons,
        action_histories,
    };
    report.removed = cleaner.finish();

    let catalog = assemble(parts);
    report.warn_all(duplicate_ids(&catalog));
    report.warn_all(reference_gaps(&catalog));
    report.warn_all(missing_stocklists(&catalog));

    BuildOutput { catalog, report }
}

/// Derive shiny variants for every plant whose canonical harvest exists
///
/// Plants with a dangling `transformId` are skipped here; the reference
/// check reports them once the catalog is assembled.
fn derive_all(plants: &[Plant], harvested: &[Item]) -> Vec<Item> {
    let mut canonical: HashMap<&str, &Item> = HashMap::new();
    for item in harvested {
        canonical.entry(item.id.as_str()).or_insert(item);
    }

    plants
        .iter()
        .filter(|plant| !plant.transform_shiny_ids.is_empty())
        .filter_map(|plant| {
            let target = plant.item.transform_target()?;
            match canonical.get(target) {
                Some(base) => Some(derive_variants(plant, base)),
                None => {
                    tracing::debug!(
                        "Plant {} has no harvested item {}; skipping shiny variants",
                        plant.item.id,
                        target
                    );
                    None
                }
            }
        })
        .flatten()
        .collect()
}

/// Load, build and render in one step
pub fn build_from(layout: &SourceLayout) -> Result<BuildOutput> {
    Ok(build(Sources::load(layout)?))
}

/// Write catalog bytes through a sibling temp file and rename into place
///
/// An interrupted write leaves any previous catalog untouched.
pub fn write_catalog(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| CatalogError::io(parent, e))?;
    }
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "catalog.json".to_string());
    let tmp = path.with_file_name(format!(".{}.tmp", file_name));

    fs::write(&tmp, bytes).map_err(|e| CatalogError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        CatalogError::io(path, e)
    })?;
    Ok(())
}
