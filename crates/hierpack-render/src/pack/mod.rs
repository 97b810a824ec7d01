//! Circle-packing layout of a (sub)tree into a viewport.
//!
//! Pipeline, applied to a fresh working copy on every call:
//! 1. aggregate weights bottom-up and order children by descending weight (stable)
//! 2. leaves get a radius proportional to `sqrt(weight)`; zero-weight leaves get a floor radius
//! 3. bottom-up, siblings are front-chain packed and each parent becomes their enclosing circle
//! 4. the pack runs twice: once unpadded to learn the output scale, then with the padding
//!    converted to layout units so the gap between siblings is `padding` pixels after scaling
//! 5. the root is scaled to the smaller viewport side and centred

mod enclose;
mod siblings;

use crate::model::LayoutNode;
use hierpack_core::TreeNode;
use hierpack_core::geom::{Point, point, size};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Circle {
    pub(crate) center: Point,
    pub(crate) r: f64,
}

impl Circle {
    pub(crate) fn new(x: f64, y: f64, r: f64) -> Self {
        Self {
            center: point(x, y),
            r,
        }
    }

    fn is_finite(&self) -> bool {
        self.center.x.is_finite() && self.center.y.is_finite() && self.r.is_finite()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PackOptions {
    /// Gap between sibling circles, in output pixels.
    pub padding: f64,
    /// Radius of a zero-weight leaf relative to the largest leaf radius in the subtree.
    pub zero_weight_radius_ratio: f64,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            padding: 3.0,
            zero_weight_radius_ratio: 0.1,
        }
    }
}

#[derive(Debug, Clone)]
struct PackNode<'a> {
    node: &'a TreeNode,
    value: f64,
    /// Arena indices, in packing order.
    children: Vec<usize>,
    /// Relative to the parent's centre until the final translation.
    circle: Circle,
}

/// Lays out `focus` and its descendants inside a `width` x `height` viewport.
///
/// Pure: the same inputs always give the same output, and `focus` is never modified.
pub fn layout(focus: &TreeNode, width: f64, height: f64, options: &PackOptions) -> LayoutNode {
    let viewport = size(sanitize_extent(width), sanitize_extent(height));
    let extent = viewport.width.min(viewport.height);

    let mut arena: Vec<PackNode<'_>> = Vec::new();
    push_node(&mut arena, focus);

    assign_leaf_radii(&mut arena, options.zero_weight_radius_ratio);

    // Arena is pre-order, so walking it backwards visits children before parents.
    for idx in (0..arena.len()).rev() {
        pack_children(&mut arena, idx, 0.0);
    }
    if options.padding > 0.0 && extent > 0.0 {
        let pad = options.padding.max(0.0) * arena[0].circle.r / extent;
        for idx in (0..arena.len()).rev() {
            pack_children(&mut arena, idx, pad);
        }
    }

    let k = if arena[0].circle.r > 0.0 {
        extent / (2.0 * arena[0].circle.r)
    } else {
        0.0
    };
    let out = to_layout(&arena, 0, point(viewport.width / 2.0, viewport.height / 2.0), k);
    tracing::debug!(
        nodes = arena.len(),
        width = viewport.width,
        height = viewport.height,
        radius = out.r,
        "packed layout"
    );
    out
}

fn sanitize_extent(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

fn push_node<'a>(arena: &mut Vec<PackNode<'a>>, node: &'a TreeNode) -> usize {
    let idx = arena.len();
    arena.push(PackNode {
        node,
        value: 0.0,
        children: Vec::new(),
        circle: Circle::new(0.0, 0.0, 0.0),
    });

    let mut sum = node.direct_value.unwrap_or(0.0);
    let mut children = Vec::with_capacity(node.children.len());
    for child in &node.children {
        let child_idx = push_node(arena, child);
        sum += arena[child_idx].value;
        children.push(child_idx);
    }
    // Stable: equal weights keep build order.
    children.sort_by(|a, b| {
        arena[*b]
            .value
            .partial_cmp(&arena[*a].value)
            .unwrap_or(Ordering::Equal)
    });

    arena[idx].value = sum;
    arena[idx].children = children;
    idx
}

fn assign_leaf_radii(arena: &mut [PackNode<'_>], zero_weight_ratio: f64) {
    // Overflowed sums saturate; NaN (from inf - inf) counts as zero.
    let drawable = |value: f64| if value > 0.0 { value.min(f64::MAX) } else { 0.0 };
    let heaviest = arena
        .iter()
        .filter(|n| n.children.is_empty())
        .map(|n| drawable(n.value))
        .fold(0.0, f64::max);
    // Radii are relative to the heaviest leaf; the output scale `k` absorbs the factor.
    let leaf_radius = |value: f64| {
        let value = drawable(value);
        if value > 0.0 { (value / heaviest).sqrt() } else { 0.0 }
    };
    let floor = if heaviest > 0.0 {
        zero_weight_ratio.max(1e-3)
    } else {
        1.0
    };

    for n in arena.iter_mut().filter(|n| n.children.is_empty()) {
        let r = leaf_radius(n.value);
        n.circle.r = if r > 0.0 { r } else { floor };
    }
}

fn pack_children(arena: &mut [PackNode<'_>], idx: usize, pad: f64) {
    if arena[idx].children.is_empty() {
        return;
    }
    let children = arena[idx].children.clone();
    let mut circles = children
        .iter()
        .map(|&c| {
            let r = arena[c].circle.r;
            Circle::new(0.0, 0.0, r + pad)
        })
        .collect::<Vec<_>>();

    let e = siblings::pack_siblings(&mut circles);

    for (&c, packed) in children.iter().zip(&circles) {
        arena[c].circle = Circle {
            center: packed.center,
            r: packed.r - pad,
        };
    }
    arena[idx].circle.r = e + pad;
}

fn to_layout(arena: &[PackNode<'_>], idx: usize, center: Point, k: f64) -> LayoutNode {
    let n = &arena[idx];
    let children = n
        .children
        .iter()
        .map(|&c| {
            let rel = arena[c].circle.center.to_vector() * k;
            to_layout(arena, c, center + rel, k)
        })
        .collect();

    LayoutNode {
        path_key: n.node.path_key.clone(),
        name: n.node.name().to_string(),
        code: n.node.code().to_string(),
        suffix: n.node.suffix().to_string(),
        raw_label: n.node.raw_label().to_string(),
        descriptive_name: n.node.descriptive_name.clone(),
        depth: n.node.depth,
        direct_value: n.node.direct_value,
        aggregate_weight: n.value,
        x: center.x,
        y: center.y,
        r: n.circle.r * k,
        children,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hierpack_core::{HierarchyBuilder, Row};

    #[test]
    fn children_are_ordered_by_weight_with_stable_ties() {
        let h = HierarchyBuilder::default().build(&[
            Row::new(1.0, ["small"]),
            Row::new(5.0, ["tie-a"]),
            Row::new(9.0, ["big"]),
            Row::new(5.0, ["tie-b"]),
        ]);
        let out = layout(h.root(), 100.0, 100.0, &PackOptions::default());
        let order = out
            .children
            .iter()
            .map(|c| c.raw_label.as_str())
            .collect::<Vec<_>>();
        assert_eq!(order, vec!["big", "tie-a", "tie-b", "small"]);
    }

    #[test]
    fn zero_weight_leaf_gets_floor_radius() {
        let h = HierarchyBuilder::default().build(&[
            Row::new(100.0, ["A"]),
            Row::with_gaps(None, &[Some("B")]),
        ]);
        let out = layout(h.root(), 200.0, 200.0, &PackOptions::default());
        let b = out.children.iter().find(|c| c.raw_label == "B").unwrap();
        let a = out.children.iter().find(|c| c.raw_label == "A").unwrap();
        assert!(b.r > 0.0);
        assert!((b.r / a.r - 0.1).abs() < 1e-9);
        assert_eq!(b.aggregate_weight, 0.0);
    }

    #[test]
    fn padding_separates_siblings_in_pixels() {
        let h = HierarchyBuilder::default()
            .build(&[Row::new(1.0, ["A"]), Row::new(1.0, ["B"])]);
        let opts = PackOptions {
            padding: 10.0,
            ..PackOptions::default()
        };
        let out = layout(h.root(), 300.0, 300.0, &opts);
        let (a, b) = (&out.children[0], &out.children[1]);
        let gap = ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt() - a.r - b.r;
        // Padding is converted with the unpadded scale, so the rendered gap is slightly smaller.
        assert!(gap > 8.0 && gap <= 10.0 + 1e-9, "gap = {gap}");
    }

    #[test]
    fn overflowing_weights_stay_finite() {
        let h = HierarchyBuilder::default().build(&[
            Row::new(1e308, ["A", "X"]),
            Row::new(1e308, ["A", "X"]),
            Row::new(1e308, ["A", "Y"]),
            Row::new(1.0, ["B"]),
        ]);
        let out = layout(h.root(), 400.0, 400.0, &PackOptions::default());
        assert!((out.r - 200.0).abs() < 1e-9);
        for n in out.iter() {
            assert!(n.x.is_finite() && n.y.is_finite() && n.r.is_finite(), "{n:?}");
        }
        let a = out.children.iter().find(|c| c.raw_label == "A").unwrap();
        let x = a.children.iter().find(|c| c.raw_label == "X").unwrap();
        let y = a.children.iter().find(|c| c.raw_label == "Y").unwrap();
        assert!(x.r >= y.r);
    }

    #[test]
    fn degenerate_viewport_collapses_without_nan() {
        let h = HierarchyBuilder::default().build(&[Row::new(1.0, ["A", "B"])]);
        for (w, h_) in [(0.0, 100.0), (-5.0, 10.0), (f64::NAN, 10.0)] {
            let out = layout(h.root(), w, h_, &PackOptions::default());
            for n in out.iter() {
                assert!(n.x.is_finite() && n.y.is_finite());
                assert_eq!(n.r, 0.0);
            }
        }
    }
}
