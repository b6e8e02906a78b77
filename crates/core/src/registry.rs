//! Component registry: assigns a stable identifier to every component
//! definition across the whole forest before any node conversion begins,
//! so instances can resolve forward references — including definitions on
//! canvases excluded from the visible page list.

use std::collections::HashMap;

use tracing::debug;

use crate::model::Guid;
use crate::tree::SceneTree;

#[derive(Debug, Default)]
pub struct ComponentRegistry {
    ids: HashMap<Guid, String>,
}

impl ComponentRegistry {
    /// Depth-first walk over every canvas, internal ones included. Runs to
    /// completion before conversion starts; the registry is read-only
    /// afterward.
    pub fn build(tree: &SceneTree) -> Self {
        let mut registry = Self::default();
        let mut counter = 0usize;
        for canvas in tree.canvases() {
            registry.visit(tree, canvas, &mut counter);
        }
        debug!(components = registry.ids.len(), "component registry built");
        registry
    }

    fn visit(&mut self, tree: &SceneTree, index: usize, counter: &mut usize) {
        let node = tree.node(index);
        if node.change.node_type == "SYMBOL"
            && let Some(guid) = node.change.guid
        {
            *counter += 1;
            self.ids.insert(guid, format!("component-{counter}"));
        }
        for &child in &node.children {
            self.visit(tree, child, counter);
        }
    }

    pub fn resolve(&self, guid: Guid) -> Option<&str> {
        self.ids.get(&guid).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NodeChange, ParentIndex};

    fn record(
        node_type: &str,
        guid: (u64, u64),
        parent: Option<((u64, u64), &str)>,
        name: &str,
    ) -> NodeChange {
        NodeChange {
            guid: Some(Guid::new(guid.0, guid.1)),
            node_type: node_type.to_string(),
            name: Some(name.to_string()),
            parent_index: parent.map(|(p, position)| ParentIndex {
                guid: Guid::new(p.0, p.1),
                position: position.to_string(),
            }),
            ..NodeChange::default()
        }
    }

    #[test]
    fn registers_symbols_on_internal_canvases() {
        let tree = SceneTree::build(vec![
            record("DOCUMENT", (0, 0), None, ""),
            record("CANVAS", (0, 1), Some(((0, 0), "%")), "Page 1"),
            record(
                "CANVAS",
                (0, 2),
                Some(((0, 0), "$")),
                "Internal Only: Library",
            ),
            record("SYMBOL", (0, 3), Some(((0, 2), "!")), "Button"),
        ])
        .unwrap();

        let registry = ComponentRegistry::build(&tree);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.resolve(Guid::new(0, 3)), Some("component-1"));
    }

    #[test]
    fn unknown_guid_does_not_resolve() {
        let tree = SceneTree::build(vec![record("DOCUMENT", (0, 0), None, "")]).unwrap();
        let registry = ComponentRegistry::build(&tree);
        assert_eq!(registry.resolve(Guid::new(7, 7)), None);
    }
}
