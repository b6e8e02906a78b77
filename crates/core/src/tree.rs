//! Tree reconstruction: indexes the flat change list by GUID, links
//! parent/child edges, and establishes deterministic sibling order from
//! the fractional position keys.

use indexmap::IndexMap;
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::{Guid, NodeChange};

/// Pages whose name starts with this (case-insensitive) are hidden from
/// the visible page list but still walked for component discovery.
const INTERNAL_PAGE_PREFIX: &str = "internal only";

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("no DOCUMENT root among {records} records")]
    EmptyDocument { records: usize },
    #[error("document has no user-visible pages")]
    NoPages,
    #[error("no user-visible page with id `{0}`")]
    PageNotFound(String),
}

/// One reconstructed node: its change record plus arena indices of its
/// children, ordered frontmost first.
#[derive(Debug)]
pub struct TreeNode {
    pub change: NodeChange,
    pub children: Vec<usize>,
}

impl TreeNode {
    fn position(&self) -> &str {
        self.change
            .parent_index
            .as_ref()
            .map(|p| p.position.as_str())
            .unwrap_or("")
    }
}

/// Arena-backed scene tree. Edges are plain indices, so cycles are
/// impossible by construction: a record is inserted once, keyed by GUID,
/// before any edge exists.
#[derive(Debug)]
pub struct SceneTree {
    nodes: Vec<TreeNode>,
    by_guid: IndexMap<Guid, usize>,
    root: usize,
    pub warnings: Vec<String>,
}

impl SceneTree {
    /// Build the tree from the filtered (non-removed) change list.
    pub fn build(changes: Vec<NodeChange>) -> Result<Self, TreeError> {
        let total = changes.len();
        let mut nodes: Vec<TreeNode> = Vec::with_capacity(total);
        let mut by_guid: IndexMap<Guid, usize> = IndexMap::with_capacity(total);
        let mut warnings = Vec::new();

        for change in changes {
            let Some(guid) = change.guid else {
                warnings.push(format!(
                    "dropping {} record without a guid",
                    change.node_type
                ));
                continue;
            };
            if by_guid.contains_key(&guid) {
                warnings.push(format!("dropping duplicate record for {guid}"));
                continue;
            }
            by_guid.insert(guid, nodes.len());
            nodes.push(TreeNode {
                change,
                children: Vec::new(),
            });
        }

        let root = nodes
            .iter()
            .position(|n| n.change.node_type == "DOCUMENT")
            .ok_or(TreeError::EmptyDocument { records: total })?;

        let mut orphans = 0usize;
        for index in 0..nodes.len() {
            if index == root {
                continue;
            }
            let parent = nodes[index]
                .change
                .parent_index
                .as_ref()
                .and_then(|p| by_guid.get(&p.guid).copied());
            match parent {
                Some(parent_index) if parent_index != index => {
                    nodes[parent_index].children.push(index);
                }
                _ => orphans += 1,
            }
        }
        if orphans > 0 {
            debug!(orphans, "records with unresolvable parents dropped");
        }

        let mut tree = Self {
            nodes,
            by_guid,
            root,
            warnings,
        };
        tree.sort_children(tree.root);
        debug!(nodes = tree.nodes.len(), "tree reconstructed");
        Ok(tree)
    }

    /// Recursively order siblings by their fractional position key using
    /// raw byte comparison, greatest key first — index 0 is the frontmost
    /// sibling. Locale-aware comparison would reorder the symbol range the
    /// keys are drawn from and silently corrupt stacking order.
    fn sort_children(&mut self, index: usize) {
        let mut children = std::mem::take(&mut self.nodes[index].children);
        children.sort_by(|&a, &b| self.nodes[b].position().cmp(self.nodes[a].position()));
        for pair in children.windows(2) {
            let position = self.nodes[pair[0]].position();
            if !position.is_empty() && position == self.nodes[pair[1]].position() {
                let message =
                    format!("tied sibling position key `{position}`; keeping document order");
                warn!("{message}");
                self.warnings.push(message);
            }
        }
        for &child in &children {
            self.sort_children(child);
        }
        self.nodes[index].children = children;
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root_index(&self) -> usize {
        self.root
    }

    pub fn node(&self, index: usize) -> &TreeNode {
        &self.nodes[index]
    }

    pub fn get(&self, guid: Guid) -> Option<&TreeNode> {
        self.by_guid.get(&guid).map(|&i| &self.nodes[i])
    }

    pub fn index_of(&self, guid: Guid) -> Option<usize> {
        self.by_guid.get(&guid).copied()
    }

    /// All canvases under the root, internal ones included.
    pub fn canvases(&self) -> Vec<usize> {
        self.nodes[self.root]
            .children
            .iter()
            .copied()
            .filter(|&i| self.nodes[i].change.node_type == "CANVAS")
            .collect()
    }

    /// User-visible pages: canvases whose name does not match the
    /// internal-only naming pattern.
    pub fn visible_pages(&self) -> Vec<usize> {
        self.canvases()
            .into_iter()
            .filter(|&i| !is_internal_page(self.nodes[i].change.display_name()))
            .collect()
    }
}

/// Case-insensitive prefix match against the internal-only page pattern.
pub fn is_internal_page(name: &str) -> bool {
    name.get(..INTERNAL_PAGE_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(INTERNAL_PAGE_PREFIX))
}
