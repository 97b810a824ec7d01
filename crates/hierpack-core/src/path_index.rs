use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

/// Separator between raw level strings inside a path key.
///
/// Level strings are assumed never to contain it; a collision merges two distinct positions
/// into one node and is not detected.
pub const PATH_DELIMITER: &str = "|";

pub fn join_path_key<S: AsRef<str>>(parts: &[S]) -> String {
    let mut out = String::new();
    for (idx, part) in parts.iter().enumerate() {
        if idx > 0 {
            out.push_str(PATH_DELIMITER);
        }
        out.push_str(part.as_ref());
    }
    out
}

/// Path key -> child-index route from the root.
///
/// Built alongside the tree so that lookups and breadcrumbs never need parent pointers.
/// Iteration follows node creation order.
#[derive(Debug, Clone, Default)]
pub struct PathIndex {
    routes: IndexMap<String, Vec<usize>, FxBuildHasher>,
}

impl PathIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, path_key: String, route: Vec<usize>) {
        self.routes.insert(path_key, route);
    }

    pub fn route(&self, path_key: &str) -> Option<&[usize]> {
        self.routes.get(path_key).map(Vec::as_slice)
    }

    pub fn contains(&self, path_key: &str) -> bool {
        self.routes.contains_key(path_key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
