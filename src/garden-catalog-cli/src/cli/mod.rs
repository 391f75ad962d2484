//! CLI argument definitions for garden-catalog
//!
//! This module contains all clap-derived structs and enums for CLI parsing.

mod core;

pub use self::core::{Cli, CodeTableArg, Commands};
