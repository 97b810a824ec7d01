//! Aggregation tree built from flat rows.
//!
//! Each row names a position in a variable-depth hierarchy (one raw string per level) plus a
//! weight. Rows are folded into a single tree rooted at an unnamed node:
//!
//! - a row's *effective path* stops at its first blank level; later levels are ignored
//! - nodes are keyed by the joined raw strings of their path, so equal prefixes share nodes
//! - a row's weight is added to the node where its effective path ends (`direct_value`)
//! - descriptive names are attached to every prefix of a row's path, last write wins
//!
//! Child order is first-seen order across the rows. Nothing is sorted here.

use crate::level::{ParsedLevel, is_blank, parse_present};
use crate::path_index::{PATH_DELIMITER, PathIndex};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Maximum number of level columns a row can carry.
pub const MAX_LEVELS: usize = 11;

/// Depth reported by the root node.
pub const ROOT_DEPTH: i32 = -1;

/// One input row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub descriptive_name: Option<String>,
    #[serde(default)]
    pub levels: Vec<Option<String>>,
}

impl Row {
    /// A row whose levels are all present.
    pub fn new<I, S>(weight: f64, levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            weight: Some(weight),
            descriptive_name: None,
            levels: levels.into_iter().map(|s| Some(s.into())).collect(),
        }
    }

    /// A row with explicit gaps.
    pub fn with_gaps(weight: Option<f64>, levels: &[Option<&str>]) -> Self {
        Self {
            weight,
            descriptive_name: None,
            levels: levels.iter().map(|l| l.map(str::to_string)).collect(),
        }
    }

    pub fn with_descriptive_name(mut self, name: impl Into<String>) -> Self {
        self.descriptive_name = Some(name.into());
        self
    }

    /// The weight used for aggregation. Missing and non-finite weights count as zero.
    pub fn effective_weight(&self) -> f64 {
        self.weight.filter(|w| w.is_finite()).unwrap_or(0.0)
    }

    /// Leading present levels, up to `max_levels`; stops at the first blank level.
    pub fn effective_path(&self, max_levels: usize) -> Vec<&str> {
        self.levels
            .iter()
            .take(max_levels.min(MAX_LEVELS))
            .map_while(|level| {
                let level = level.as_deref();
                if is_blank(level) { None } else { level }
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildOptions {
    /// Attach descriptive names from rows. When off, every node's name is the parsed level.
    pub use_descriptive_names: bool,
    /// Level columns considered per row (clamped to [`MAX_LEVELS`]).
    pub max_levels: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            use_descriptive_names: true,
            max_levels: MAX_LEVELS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    /// Parsed level; `None` only for the root.
    #[serde(flatten)]
    pub level: Option<ParsedLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descriptive_name: Option<String>,
    pub depth: i32,
    pub path_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direct_value: Option<f64>,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn root() -> Self {
        Self {
            level: None,
            descriptive_name: None,
            depth: ROOT_DEPTH,
            path_key: String::new(),
            direct_value: None,
            children: Vec::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.level.is_none()
    }

    pub fn name(&self) -> &str {
        self.level.as_ref().map_or("", |l| l.name.as_str())
    }

    pub fn code(&self) -> &str {
        self.level.as_ref().map_or("", |l| l.code.as_str())
    }

    pub fn suffix(&self) -> &str {
        self.level.as_ref().map_or("", |l| l.suffix.as_str())
    }

    pub fn raw_label(&self) -> &str {
        self.level.as_ref().map_or("", |l| l.raw.as_str())
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Sum of `direct_value` over this node's whole subtree, itself included.
    pub fn aggregate_weight(&self) -> f64 {
        self.direct_value.unwrap_or(0.0)
            + self
                .children
                .iter()
                .map(TreeNode::aggregate_weight)
                .sum::<f64>()
    }

    pub fn find_child(&self, raw_label: &str) -> Option<&TreeNode> {
        self.children.iter().find(|c| c.raw_label() == raw_label)
    }

    /// Pre-order traversal, this node first.
    pub fn iter(&self) -> Iter<'_> {
        Iter { stack: vec![self] }
    }
}

pub struct Iter<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// A built tree plus its path-key index.
#[derive(Debug, Clone)]
pub struct Hierarchy {
    root: TreeNode,
    index: PathIndex,
}

impl Default for Hierarchy {
    fn default() -> Self {
        Self {
            root: TreeNode::root(),
            index: PathIndex::new(),
        }
    }
}

impl Hierarchy {
    pub fn root(&self) -> &TreeNode {
        &self.root
    }

    pub fn index(&self) -> &PathIndex {
        &self.index
    }

    pub fn into_root(self) -> TreeNode {
        self.root
    }

    /// Number of indexed path keys. This is the non-root node count unless a raw level contains
    /// [`PATH_DELIMITER`], in which case colliding keys are indexed once.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// `true` when the root has no children.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Looks a node up by path key. The empty key names the root.
    pub fn find(&self, path_key: &str) -> Option<&TreeNode> {
        self.breadcrumbs(path_key).pop()
    }

    /// Nodes from the root down to `path_key`, both included. Empty when the key is unknown.
    pub fn breadcrumbs(&self, path_key: &str) -> Vec<&TreeNode> {
        let route: &[usize] = if path_key.is_empty() {
            &[]
        } else {
            match self.index.route(path_key) {
                Some(route) => route,
                None => return Vec::new(),
            }
        };

        let mut node = &self.root;
        let mut out = Vec::with_capacity(route.len() + 1);
        out.push(node);
        for &pos in route {
            let Some(child) = node.children.get(pos) else {
                return Vec::new();
            };
            node = child;
            out.push(node);
        }
        out
    }
}

#[derive(Debug, Clone, Default)]
pub struct HierarchyBuilder {
    options: BuildOptions,
}

impl HierarchyBuilder {
    pub fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    pub fn build(&self, rows: &[Row]) -> Hierarchy {
        let max_levels = self.options.max_levels.min(MAX_LEVELS);
        let names = if self.options.use_descriptive_names {
            descriptive_names(rows, max_levels)
        } else {
            FxHashMap::default()
        };

        let mut hierarchy = Hierarchy::default();
        let mut skipped = 0usize;
        for (row_idx, row) in rows.iter().enumerate() {
            let path = row.effective_path(max_levels);
            if path.is_empty() {
                tracing::trace!(row = row_idx, "row has an empty effective path; skipped");
                skipped += 1;
                continue;
            }
            insert_path(&mut hierarchy, &path, row.effective_weight(), &names);
        }

        tracing::debug!(
            rows = rows.len(),
            skipped,
            nodes = hierarchy.len(),
            "built hierarchy"
        );
        hierarchy
    }
}

/// Convenience wrapper around [`HierarchyBuilder::build`].
pub fn build_hierarchy(rows: &[Row], options: &BuildOptions) -> Hierarchy {
    HierarchyBuilder::new(options.clone()).build(rows)
}

fn push_key(key: &mut String, raw: &str) {
    if !key.is_empty() {
        key.push_str(PATH_DELIMITER);
    }
    key.push_str(raw);
}

/// Path key -> descriptive name, for every prefix of every row's path. Later rows overwrite.
fn descriptive_names(rows: &[Row], max_levels: usize) -> FxHashMap<String, String> {
    let mut names: FxHashMap<String, String> = FxHashMap::default();
    for row in rows {
        let Some(name) = row
            .descriptive_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
        else {
            continue;
        };
        let mut key = String::new();
        for raw in row.effective_path(max_levels) {
            push_key(&mut key, raw);
            names.insert(key.clone(), name.to_string());
        }
    }
    names
}

fn insert_path(
    hierarchy: &mut Hierarchy,
    path: &[&str],
    weight: f64,
    names: &FxHashMap<String, String>,
) {
    let Hierarchy { root, index } = hierarchy;
    let mut node = root;
    let mut key = String::new();
    let mut route: Vec<usize> = Vec::with_capacity(path.len());

    for (depth, raw) in path.iter().enumerate() {
        push_key(&mut key, raw);
        // A key can name a node under another parent when a raw level contains the delimiter.
        let existing = index
            .route(&key)
            .and_then(|r| r.split_last())
            .filter(|(_, parent)| *parent == route.as_slice())
            .map(|(pos, _)| *pos)
            .or_else(|| node.children.iter().position(|c| c.path_key == key));
        let pos = match existing {
            Some(pos) => pos,
            None => {
                let pos = node.children.len();
                node.children.push(TreeNode {
                    level: Some(parse_present(raw)),
                    descriptive_name: names.get(&key).cloned(),
                    depth: depth as i32,
                    path_key: key.clone(),
                    direct_value: None,
                    children: Vec::new(),
                });
                if index.contains(&key) {
                    tracing::trace!(path_key = %key, "path key already indexed; keeping first node");
                } else {
                    let mut child_route = route.clone();
                    child_route.push(pos);
                    index.insert(key.clone(), child_route);
                }
                pos
            }
        };
        route.push(pos);
        node = &mut node.children[pos];
    }

    node.direct_value = Some(node.direct_value.unwrap_or(0.0) + weight);
}
