use serde::{Deserialize, Serialize};

/// One laid-out node. Coordinates are viewport pixels; `(x, y)` is the circle centre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutNode {
    pub path_key: String,
    pub name: String,
    pub code: String,
    pub suffix: String,
    pub raw_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descriptive_name: Option<String>,
    pub depth: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direct_value: Option<f64>,
    pub aggregate_weight: f64,
    pub x: f64,
    pub y: f64,
    pub r: f64,
    #[serde(default)]
    pub children: Vec<LayoutNode>,
}

impl LayoutNode {
    /// Pre-order traversal, this node first.
    pub fn iter(&self) -> Iter<'_> {
        Iter { stack: vec![self] }
    }

    pub fn distance_to(&self, other: &LayoutNode) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

pub struct Iter<'a> {
    stack: Vec<&'a LayoutNode>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a LayoutNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelPlacement {
    pub path_key: String,
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

/// A layout plus the labels chosen for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackedView {
    pub width: f64,
    pub height: f64,
    pub root: LayoutNode,
    pub labels: Vec<LabelPlacement>,
}
