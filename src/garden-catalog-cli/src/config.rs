//! Configuration management for the garden-catalog CLI

use anyhow::{Context, Result};
use garden_catalog::{CodeTables, IdAllocator, LookupPolicy, SourceLayout, TablePaths};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Project-local config file, checked before the user config
pub const LOCAL_CONFIG: &str = "catalog.toml";

const DEFAULT_SOURCE_DIR: &str = "data";
const DEFAULT_OUTPUT: &str = "data/final/Items.json";

/// Lookup policy overrides for the two code tables
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<LookupPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decorations: Option<LookupPolicy>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    /// Per-table path overrides, relative to `source_dir`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tables: Option<TablePaths>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<PolicyConfig>,
    /// TOML file replacing the built-in code tables
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_tables: Option<PathBuf>,
}

impl Config {
    /// Get the path to the user config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("garden-catalog");

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration: explicit path, then `./catalog.toml`, then the user config
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        let local = Path::new(LOCAL_CONFIG);
        if local.exists() {
            return Self::load_from(local);
        }

        Self::load_user()
    }

    /// Load only the user config file, or defaults if it doesn't exist
    pub fn load_user() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Config::default());
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save configuration to the user config file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory at {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        Ok(())
    }

    /// Source layout, with a command-line source directory taking precedence
    pub fn layout(&self, source_override: Option<&Path>) -> SourceLayout {
        let root = source_override
            .map(Path::to_path_buf)
            .or_else(|| self.source_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE_DIR));
        SourceLayout::new(root).with_tables(self.tables.clone().unwrap_or_default())
    }

    /// Catalog output path, with a command-line path taking precedence
    pub fn output_path(&self, output_override: Option<&Path>) -> PathBuf {
        output_override
            .map(Path::to_path_buf)
            .or_else(|| self.output.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT))
    }

    /// Code tables from `code_tables` or the built-ins, with policy overrides applied
    pub fn code_tables(&self) -> Result<CodeTables> {
        let mut tables = match &self.code_tables {
            Some(path) => {
                let contents = fs::read_to_string(path).with_context(|| {
                    format!("Failed to read code tables from {}", path.display())
                })?;
                toml::from_str(&contents).with_context(|| {
                    format!("Failed to parse code tables {}", path.display())
                })?
            }
            None => CodeTables::default(),
        };

        if let Some(policy) = &self.policy {
            if let Some(items) = policy.items {
                tables.items.policy = items;
            }
            if let Some(decorations) = policy.decorations {
                tables.decorations.policy = decorations;
            }
        }

        tables
            .items
            .validate()
            .context("Invalid item code table")?;
        tables
            .decorations
            .validate()
            .context("Invalid decoration code table")?;
        Ok(tables)
    }

    pub fn allocator(&self) -> Result<IdAllocator> {
        Ok(IdAllocator::new(self.code_tables()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.layout(None).root, PathBuf::from("data"));
        assert_eq!(config.output_path(None), PathBuf::from("data/final/Items.json"));
    }

    #[test]
    fn test_overrides_take_precedence() {
        let config = Config {
            source_dir: Some(PathBuf::from("content")),
            output: Some(PathBuf::from("out.json")),
            ..Config::default()
        };
        assert_eq!(config.layout(None).root, PathBuf::from("content"));
        assert_eq!(
            config.layout(Some(Path::new("other"))).root,
            PathBuf::from("other")
        );
        assert_eq!(
            config.output_path(Some(Path::new("x.json"))),
            PathBuf::from("x.json")
        );
    }

    #[test]
    fn test_parse_partial_tables_and_policy() {
        let config: Config = toml::from_str(
            r#"
source_dir = "content"

[tables]
tools = "garden/tools_v2.csv"

[policy]
decorations = "fallback"
"#,
        )
        .unwrap();

        let layout = config.layout(None);
        assert_eq!(layout.tables.tools, PathBuf::from("garden/tools_v2.csv"));
        assert_eq!(
            layout.tables.seeds,
            PathBuf::from("items/inventoryItems/seeds.csv")
        );

        let tables = config.code_tables().unwrap();
        assert_eq!(tables.decorations.policy, LookupPolicy::Fallback);
        assert_eq!(tables.items.policy, LookupPolicy::Fallback);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            source_dir: Some(PathBuf::from("content")),
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load(Some(&path)).unwrap(), config);
    }

    #[test]
    fn test_code_tables_file_replaces_builtins() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("codes.toml");
        fs::write(
            &path,
            r#"
[items]
name = "crops"
policy = "strict"
categories = { Fungus = "15" }
items = { Fungus = { Morel = "01" } }

[decorations]
name = "decorations"
categories = { Normal = "01" }
"#,
        )
        .unwrap();
        let config = Config {
            code_tables: Some(path),
            ..Config::default()
        };
        let allocator = config.allocator().unwrap();
        let id = allocator
            .allocate_named("PlacedItem", "Plant", "Fungus", "Morel", "00")
            .unwrap();
        assert_eq!(id, "0-02-15-01-00");
        assert!(allocator
            .allocate_named("PlacedItem", "Plant", "Tropical", "Pineapple", "00")
            .is_err());
    }

    #[test]
    fn test_malformed_code_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("codes.toml");
        fs::write(
            &path,
            "[items]\ncategories = { Fungus = \"7\" }\n[decorations]\ncategories = {}\n",
        )
        .unwrap();
        let config = Config {
            code_tables: Some(path),
            ..Config::default()
        };
        assert!(config.code_tables().is_err());
    }
}
