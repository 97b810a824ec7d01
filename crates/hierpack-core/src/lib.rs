#![forbid(unsafe_code)]

//! Weighted hierarchy model (headless).
//!
//! Flat rows naming a position in a named hierarchy of up to eleven levels are folded into an
//! aggregation tree, which can then be searched, re-focused and handed to a layout engine.
//!
//! Design goals:
//! - every operation is a pure function of its explicit inputs
//! - malformed input degrades (fallback parses, zero weights, skipped rows) instead of failing
//! - deterministic output: child order is first-seen order, never hash order

pub mod config;
pub mod error;
pub mod focus;
pub mod geom;
pub mod hierarchy;
pub mod level;
pub mod path_index;
pub mod rows;
pub mod search;

pub use config::HierpackConfig;
pub use error::{Error, Result};
pub use focus::{FocusChange, FocusResolution, FocusState, resolve_focus, resolve_focus_key};
pub use hierarchy::{
    BuildOptions, Hierarchy, HierarchyBuilder, MAX_LEVELS, ROOT_DEPTH, Row, TreeNode,
    build_hierarchy,
};
pub use level::{ParsedLevel, parse_level};
pub use path_index::{PATH_DELIMITER, PathIndex, join_path_key};
pub use rows::{ColumnMapping, rows_from_json_records, rows_from_records};
pub use search::{SearchIndex, SearchOptions, SearchRecord, flatten, search};

/// Builds a hierarchy using the `hierarchy` section of `config`.
pub fn build_with_config(rows: &[Row], config: &HierpackConfig) -> Result<Hierarchy> {
    let options: BuildOptions = config.section("hierarchy")?;
    Ok(HierarchyBuilder::new(options).build(rows))
}
