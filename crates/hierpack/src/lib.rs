#![forbid(unsafe_code)]

//! `hierpack` folds flat weighted rows into a named hierarchy and lays it out as nested
//! circles, headless.
//!
//! # Features
//!
//! - `render`: enable circle-packing layout and label selection (`hierpack::render`)

pub use hierpack_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use hierpack_render::labels::{Label, LabelOptions, select_labels};
    pub use hierpack_render::model::{LabelPlacement, LayoutNode, PackedView};
    pub use hierpack_render::pack::PackOptions;
    pub use hierpack_render::text::truncate_with_ellipsis;
    pub use hierpack_render::{LayoutOptions, layout, layout_view};

    use hierpack_core::{
        FocusChange, FocusState, Hierarchy, HierpackConfig, Row, SearchIndex, SearchOptions,
        SearchRecord, TreeNode,
    };

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Core(#[from] hierpack_core::Error),
        #[error(transparent)]
        Render(#[from] hierpack_render::Error),
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// Builds the hierarchy for `rows` and lays out its root in one call.
    pub fn view_rows(
        rows: &[Row],
        config: &HierpackConfig,
        width: f64,
        height: f64,
    ) -> Result<PackedView> {
        let hierarchy = hierpack_core::build_with_config(rows, config)?;
        let options = LayoutOptions::from_config(config)?;
        Ok(layout_view(hierarchy.root(), width, height, &options))
    }

    /// A built hierarchy together with its search index, current focus and layout options.
    ///
    /// Intended for UI integrations: the tree is built once per row set, focus changes and
    /// viewport changes only trigger a fresh layout of the focused subtree.
    #[derive(Debug, Clone)]
    pub struct HeadlessPacker {
        hierarchy: Hierarchy,
        index: SearchIndex,
        focus: FocusState,
        pub layout_options: LayoutOptions,
        pub search_options: SearchOptions,
    }

    impl HeadlessPacker {
        pub fn from_rows(rows: &[Row], config: &HierpackConfig) -> Result<Self> {
            let hierarchy = hierpack_core::build_with_config(rows, config)?;
            let layout_options = LayoutOptions::from_config(config)?;
            let search_options = config.section("search")?;
            Ok(Self::from_hierarchy(hierarchy, layout_options, search_options))
        }

        pub fn from_hierarchy(
            hierarchy: Hierarchy,
            layout_options: LayoutOptions,
            search_options: SearchOptions,
        ) -> Self {
            let index = SearchIndex::new(hierarchy.root());
            Self {
                hierarchy,
                index,
                focus: FocusState::new(),
                layout_options,
                search_options,
            }
        }

        /// Replaces the tree. The focus is kept when its path still names a node with children.
        pub fn set_rows(&mut self, rows: &[Row], config: &HierpackConfig) -> Result<()> {
            let hierarchy = hierpack_core::build_with_config(rows, config)?;
            self.index = SearchIndex::new(hierarchy.root());
            let previous = std::mem::take(&mut self.focus);
            let key = previous.path_key().to_string();
            self.hierarchy = hierarchy;
            self.focus.focus_key(&self.hierarchy, &key);
            Ok(())
        }

        pub fn hierarchy(&self) -> &Hierarchy {
            &self.hierarchy
        }

        pub fn records(&self) -> &[SearchRecord] {
            self.index.records()
        }

        /// Matches `query` using the configured result limit.
        pub fn search(&self, query: &str) -> Vec<&SearchRecord> {
            self.index.search(query, self.search_options.limit)
        }

        pub fn focus_key(&mut self, path_key: &str) -> FocusChange {
            self.focus.focus_key(&self.hierarchy, path_key)
        }

        pub fn focus(&mut self, record: &SearchRecord) -> FocusChange {
            self.focus.focus(&self.hierarchy, record)
        }

        pub fn reset_focus(&mut self) {
            self.focus.reset();
        }

        pub fn focused(&self) -> &TreeNode {
            self.focus.current(&self.hierarchy)
        }

        pub fn breadcrumbs(&self) -> Vec<&TreeNode> {
            self.focus.breadcrumbs(&self.hierarchy)
        }

        pub fn layout(&self, width: f64, height: f64) -> LayoutNode {
            layout(self.focused(), width, height, &self.layout_options)
        }

        pub fn view(&self, width: f64, height: f64) -> PackedView {
            layout_view(self.focused(), width, height, &self.layout_options)
        }
    }
}
