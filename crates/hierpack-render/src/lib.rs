#![forbid(unsafe_code)]

//! Headless circle-packing layout and label selection.
//!
//! Every call recomputes from scratch; nothing is cached between calls, so re-focusing is just
//! another call with a different subtree.

pub mod labels;
pub mod model;
pub mod pack;
pub mod text;

use crate::labels::{LabelOptions, select_labels};
use crate::model::{LayoutNode, PackedView};
use crate::pack::PackOptions;
use hierpack_core::{HierpackConfig, TreeNode};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid layout configuration: {0}")]
    Config(#[from] hierpack_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutOptions {
    pub pack: PackOptions,
    pub labels: LabelOptions,
}

impl LayoutOptions {
    /// Reads the `pack` and `labels` sections.
    pub fn from_config(config: &HierpackConfig) -> Result<Self> {
        Ok(Self {
            pack: config.section("pack")?,
            labels: config.section("labels")?,
        })
    }
}

pub fn layout(focus: &TreeNode, width: f64, height: f64, options: &LayoutOptions) -> LayoutNode {
    pack::layout(focus, width, height, &options.pack)
}

/// Lays out `focus` and selects its labels in one step.
pub fn layout_view(focus: &TreeNode, width: f64, height: f64, options: &LayoutOptions) -> PackedView {
    let root = layout(focus, width, height, options);
    let labels = select_labels(&root, &options.labels)
        .iter()
        .map(|l| l.to_placement())
        .collect();
    PackedView {
        width,
        height,
        root,
        labels,
    }
}
