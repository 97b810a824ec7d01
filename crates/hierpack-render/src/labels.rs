//! Greedy label selection.
//!
//! Candidates (non-root nodes larger than `min_radius`) are visited largest first. A candidate
//! is kept when its circle stays clear of every label kept so far, allowing
//! `overlap_allowance` pixels of overlap; otherwise it is dropped for good. Smaller circles can
//! lose out even where a global arrangement would have room for them.

use crate::model::{LabelPlacement, LayoutNode};
use crate::text::truncate_with_ellipsis;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LabelOptions {
    /// Circles at or below this radius are never labelled.
    pub min_radius: f64,
    /// Pixels two labelled circles may overlap.
    pub overlap_allowance: f64,
    /// Radius pixels per character of label text.
    pub chars_per_radius: f64,
}

impl Default for LabelOptions {
    fn default() -> Self {
        Self {
            min_radius: 20.0,
            overlap_allowance: 0.0,
            chars_per_radius: 4.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label<'a> {
    pub node: &'a LayoutNode,
    pub text: String,
}

impl Label<'_> {
    pub fn to_placement(&self) -> LabelPlacement {
        LabelPlacement {
            path_key: self.node.path_key.clone(),
            text: self.text.clone(),
            x: self.node.x,
            y: self.node.y,
            r: self.node.r,
        }
    }
}

/// Picks the labelled subset of `root`'s descendants, largest circle first.
pub fn select_labels<'a>(root: &'a LayoutNode, options: &LabelOptions) -> Vec<Label<'a>> {
    let mut candidates = root
        .iter()
        .skip(1)
        .filter(|n| n.r > options.min_radius)
        .collect::<Vec<_>>();
    // Stable: equal radii keep pre-order.
    candidates.sort_by(|a, b| b.r.partial_cmp(&a.r).unwrap_or(Ordering::Equal));

    let mut shown: Vec<&LayoutNode> = Vec::new();
    for candidate in candidates {
        let clear = shown.iter().all(|accepted| {
            candidate.distance_to(accepted) >= candidate.r + accepted.r - options.overlap_allowance
        });
        if clear {
            shown.push(candidate);
        }
    }

    tracing::debug!(labels = shown.len(), "selected labels");
    shown
        .into_iter()
        .map(|node| Label {
            node,
            text: display_text(node, options.chars_per_radius),
        })
        .collect()
}

fn display_text(node: &LayoutNode, chars_per_radius: f64) -> String {
    let max_columns = if chars_per_radius > 0.0 {
        (node.r / chars_per_radius).floor().max(0.0) as usize
    } else {
        usize::MAX
    };
    truncate_with_ellipsis(&node.name, max_columns).into_owned()
}
