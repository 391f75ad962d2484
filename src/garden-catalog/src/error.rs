//! Error types for catalog builds.

use std::path::PathBuf;
use thiserror::Error;

/// A source row or table that does not match its declared shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("{table}: missing required column '{column}'")]
    MissingColumn { table: String, column: String },

    #[error("{table} line {line}: column '{column}' has invalid value '{value}' (expected {expected})")]
    InvalidValue {
        table: String,
        line: u64,
        column: String,
        value: String,
        expected: &'static str,
    },
}

/// A name the identifier tables cannot map to a code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("Invalid placement kind: {0}")]
    Placement(String),

    #[error("Invalid subtype: {0}")]
    Subtype(String),

    #[error("Category '{category}' not found in {table} table")]
    Category { table: String, category: String },

    #[error("Item '{item}' not found in category '{category}' of {table} table")]
    Item {
        table: String,
        category: String,
        item: String,
    },

    #[error("Code '{code}' for '{name}' in {table} table is not two digits")]
    MalformedCode {
        table: String,
        name: String,
        code: String,
    },
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid draft '{name}': {reason}")]
    Draft { name: String, reason: String },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CatalogError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CatalogError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        CatalogError::Csv {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = CatalogError> = std::result::Result<T, E>;
