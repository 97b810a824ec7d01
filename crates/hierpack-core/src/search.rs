//! Flattened, render-agnostic records over a tree, plus substring search.

use crate::hierarchy::TreeNode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRecord {
    pub name: String,
    pub code: String,
    pub suffix: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descriptive_name: Option<String>,
    pub raw_label: String,
    pub path_key: String,
    pub aggregate_weight: f64,
    pub depth: i32,
}

impl SearchRecord {
    fn from_node(node: &TreeNode) -> Self {
        Self {
            name: node.name().to_string(),
            code: node.code().to_string(),
            suffix: node.suffix().to_string(),
            descriptive_name: node.descriptive_name.clone(),
            raw_label: node.raw_label().to_string(),
            path_key: node.path_key.clone(),
            aggregate_weight: 0.0,
            depth: node.depth,
        }
    }

    /// `needle` must already be lowercase.
    fn matches_lowercase(&self, needle: &str) -> bool {
        let hit = |field: &str| field.to_lowercase().contains(needle);
        hit(&self.name)
            || hit(&self.code)
            || hit(&self.suffix)
            || self.descriptive_name.as_deref().is_some_and(hit)
            || hit(&self.raw_label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchOptions {
    pub limit: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { limit: 10 }
    }
}

/// Every non-root node of `root`'s subtree in pre-order, with aggregate weights filled in.
pub fn flatten(root: &TreeNode) -> Vec<SearchRecord> {
    fn visit(node: &TreeNode, out: &mut Vec<SearchRecord>) -> f64 {
        let slot = if node.is_root() {
            None
        } else {
            out.push(SearchRecord::from_node(node));
            Some(out.len() - 1)
        };
        let mut sum = node.direct_value.unwrap_or(0.0);
        for child in &node.children {
            sum += visit(child, out);
        }
        if let Some(idx) = slot {
            out[idx].aggregate_weight = sum;
        }
        sum
    }

    let mut out = Vec::new();
    visit(root, &mut out);
    out
}

/// Case-insensitive substring match over name, code, suffix, descriptive name and raw label.
///
/// Matches keep their relative order; at most `limit` are returned. A blank query matches
/// nothing.
pub fn search<'a>(query: &str, records: &'a [SearchRecord], limit: usize) -> Vec<&'a SearchRecord> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() || limit == 0 {
        return Vec::new();
    }
    records
        .iter()
        .filter(|r| r.matches_lowercase(&needle))
        .take(limit)
        .collect()
}

/// Records for one tree, built once and queried many times.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    records: Vec<SearchRecord>,
}

impl SearchIndex {
    pub fn new(root: &TreeNode) -> Self {
        let records = flatten(root);
        tracing::debug!(records = records.len(), "built search index");
        Self { records }
    }

    pub fn records(&self) -> &[SearchRecord] {
        &self.records
    }

    pub fn search(&self, query: &str, limit: usize) -> Vec<&SearchRecord> {
        search(query, &self.records, limit)
    }
}
