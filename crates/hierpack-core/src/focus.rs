//! Focus (re-root) selection.
//!
//! Focus is a path key into an unchanged [`Hierarchy`]; changing it never touches the tree.

use crate::hierarchy::{Hierarchy, TreeNode};
use crate::search::SearchRecord;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FocusResolution<'a> {
    Focus(&'a TreeNode),
    /// Unknown or childless target; the current focus stays.
    NoOp,
}

/// Resolves a focus target by path key. Childless nodes are rejected so a layout never
/// degenerates to a single circle.
pub fn resolve_focus_key<'a>(hierarchy: &'a Hierarchy, path_key: &str) -> FocusResolution<'a> {
    match hierarchy.find(path_key) {
        Some(node) if node.has_children() => FocusResolution::Focus(node),
        _ => FocusResolution::NoOp,
    }
}

pub fn resolve_focus<'a>(hierarchy: &'a Hierarchy, record: &SearchRecord) -> FocusResolution<'a> {
    resolve_focus_key(hierarchy, &record.path_key)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusChange {
    Changed,
    Unchanged,
}

/// Current focus, as a path key. `None` means the root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusState {
    path_key: Option<String>,
}

impl FocusState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path_key(&self) -> &str {
        self.path_key.as_deref().unwrap_or("")
    }

    pub fn focus_key(&mut self, hierarchy: &Hierarchy, path_key: &str) -> FocusChange {
        match resolve_focus_key(hierarchy, path_key) {
            FocusResolution::Focus(node) => {
                let next = (!node.is_root()).then(|| node.path_key.clone());
                if next == self.path_key {
                    return FocusChange::Unchanged;
                }
                tracing::debug!(path_key = %node.path_key, "focus changed");
                self.path_key = next;
                FocusChange::Changed
            }
            FocusResolution::NoOp => {
                tracing::debug!(path_key, "focus target rejected");
                FocusChange::Unchanged
            }
        }
    }

    pub fn focus(&mut self, hierarchy: &Hierarchy, record: &SearchRecord) -> FocusChange {
        self.focus_key(hierarchy, &record.path_key)
    }

    pub fn reset(&mut self) {
        self.path_key = None;
    }

    /// The focused node; falls back to the root when the key no longer resolves (e.g. after a
    /// rebuild from new rows).
    pub fn current<'a>(&self, hierarchy: &'a Hierarchy) -> &'a TreeNode {
        hierarchy
            .find(self.path_key())
            .unwrap_or_else(|| hierarchy.root())
    }

    pub fn breadcrumbs<'a>(&self, hierarchy: &'a Hierarchy) -> Vec<&'a TreeNode> {
        let crumbs = hierarchy.breadcrumbs(self.path_key());
        if crumbs.is_empty() {
            vec![hierarchy.root()]
        } else {
            crumbs
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::{HierarchyBuilder, Row};
    use crate::search::flatten;

    fn sample() -> Hierarchy {
        HierarchyBuilder::default().build(&[
            Row::new(1.0, ["A", "B", "C"]),
            Row::new(2.0, ["A", "D"]),
            Row::new(3.0, ["E"]),
        ])
    }

    #[test]
    fn childless_targets_are_rejected() {
        let h = sample();
        assert_eq!(resolve_focus_key(&h, "E"), FocusResolution::NoOp);
        assert_eq!(resolve_focus_key(&h, "missing"), FocusResolution::NoOp);
        let FocusResolution::Focus(node) = resolve_focus_key(&h, "A|B") else {
            panic!("expected focus");
        };
        assert_eq!(node.path_key, "A|B");
    }

    #[test]
    fn resolves_from_search_records() {
        let h = sample();
        let records = flatten(h.root());
        let a = records.iter().find(|r| r.path_key == "A").unwrap();
        assert!(matches!(resolve_focus(&h, a), FocusResolution::Focus(_)));
    }

    #[test]
    fn state_keeps_focus_on_rejection() {
        let h = sample();
        let mut state = FocusState::new();
        assert_eq!(state.focus_key(&h, "A"), FocusChange::Changed);
        assert_eq!(state.focus_key(&h, "A|D"), FocusChange::Unchanged);
        assert_eq!(state.current(&h).path_key, "A");
        assert_eq!(state.focus_key(&h, "A"), FocusChange::Unchanged);
        assert_eq!(state.breadcrumbs(&h).len(), 2);
        state.reset();
        assert!(state.current(&h).is_root());
    }

    #[test]
    fn stale_focus_falls_back_to_root() {
        let h = sample();
        let mut state = FocusState::new();
        state.focus_key(&h, "A|B");
        let rebuilt = HierarchyBuilder::default().build(&[Row::new(1.0, ["Z", "Y"])]);
        assert!(state.current(&rebuilt).is_root());
        assert_eq!(state.breadcrumbs(&rebuilt).len(), 1);
    }
}
