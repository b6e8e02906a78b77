//! Decoded-document API: owns the reconstructed tree, the component
//! registry, and the blob table, and exposes page listing and conversion.

use serde::Serialize;
use tracing::debug;

use figtree_protocol::{PageInfo, SceneNode};

use crate::DecodeError;
use crate::container;
use crate::mapper::{self, ConvertContext};
use crate::model::{BlobStore, NodeChange};
use crate::registry::ComponentRegistry;
use crate::scene;
use crate::schema;
use crate::tree::{SceneTree, TreeError};

/// The flat decode result of one container: filtered change records plus
/// the blob table they reference.
#[derive(Debug)]
pub struct SceneFile {
    pub changes: Vec<NodeChange>,
    pub blobs: BlobStore,
}

/// Run container splitting, schema compilation, and scene decoding over
/// one in-memory buffer.
pub fn decode_scene(data: &[u8]) -> Result<SceneFile, DecodeError> {
    let chunks = container::split_chunks(data)?;
    let compiled = schema::compile_schema(&chunks[0])?;
    let decoded = scene::decode_scene_chunk(&compiled, &chunks[1])?;
    Ok(SceneFile {
        changes: decoded.changes,
        blobs: decoded.blobs,
    })
}

/// One converted page.
#[derive(Debug, Clone, Serialize)]
pub struct ConvertedPage {
    pub info: PageInfo,
    pub root: SceneNode,
}

/// Conversion output: page trees plus the ordered warning list collected
/// along the way.
#[derive(Debug, Clone, Serialize)]
pub struct Conversion {
    pub pages: Vec<ConvertedPage>,
    pub warnings: Vec<String>,
}

/// A fully reconstructed document, ready for page listing and conversion.
/// All state is owned per-decode; two documents never share anything.
#[derive(Debug)]
pub struct SceneDocument {
    tree: SceneTree,
    registry: ComponentRegistry,
    blobs: BlobStore,
}

impl SceneDocument {
    /// Build the tree and the component registry from a decoded file. The
    /// registry pass runs to completion here, before any conversion, so
    /// instances can resolve components defined later in document order.
    pub fn build(file: SceneFile) -> Result<Self, DecodeError> {
        let tree = SceneTree::build(file.changes)?;
        let registry = ComponentRegistry::build(&tree);
        Ok(Self {
            tree,
            registry,
            blobs: file.blobs,
        })
    }

    /// Decode a raw container buffer end to end.
    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        Self::build(decode_scene(data)?)
    }

    pub fn blobs(&self) -> &BlobStore {
        &self.blobs
    }

    /// `{id, name, childCount}` for each user-visible page, without
    /// converting any nodes.
    pub fn pages(&self) -> Vec<PageInfo> {
        self.tree
            .visible_pages()
            .into_iter()
            .map(|index| self.page_info(index))
            .collect()
    }

    fn page_info(&self, index: usize) -> PageInfo {
        let node = self.tree.node(index);
        PageInfo {
            id: node.change.guid.map(|g| g.to_string()).unwrap_or_default(),
            name: node.change.display_name().to_string(),
            child_count: node.children.len(),
        }
    }

    /// Convert a single user-visible page by its id.
    pub fn convert_page(&self, page_id: &str) -> Result<Conversion, DecodeError> {
        let index = self
            .tree
            .visible_pages()
            .into_iter()
            .find(|&i| {
                self.tree.node(i).change.guid.map(|g| g.to_string()).as_deref() == Some(page_id)
            })
            .ok_or_else(|| TreeError::PageNotFound(page_id.to_string()))?;
        Ok(self.convert_indices(&[index]))
    }

    /// Convert every user-visible page.
    pub fn convert_all(&self) -> Result<Conversion, DecodeError> {
        let pages = self.tree.visible_pages();
        if pages.is_empty() {
            return Err(TreeError::NoPages.into());
        }
        Ok(self.convert_indices(&pages))
    }

    fn convert_indices(&self, indices: &[usize]) -> Conversion {
        let mut ctx = ConvertContext::new(&self.tree, &self.registry, &self.blobs);
        let pages = indices
            .iter()
            .map(|&index| ConvertedPage {
                info: self.page_info(index),
                root: mapper::convert_page(&mut ctx, index),
            })
            .collect::<Vec<_>>();
        let mut warnings = self.tree.warnings.clone();
        warnings.extend(ctx.warnings);
        debug!(
            pages = pages.len(),
            warnings = warnings.len(),
            "conversion finished"
        );
        Conversion { pages, warnings }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Guid, ParentIndex, SymbolData};

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

    fn document_with_internal_library() -> SceneDocument {
        let mut instance = record("INSTANCE", (0, 10), Some(((0, 1), "!")), "Button");
        instance.symbol_data = Some(SymbolData {
            symbol_id: Some(Guid::new(0, 20)),
        });
        SceneDocument::build(SceneFile {
            changes: vec![
                record("DOCUMENT", (0, 0), None, "Document"),
                record("CANVAS", (0, 1), Some(((0, 0), "%")), "Page 1"),
                record(
                    "CANVAS",
                    (0, 2),
                    Some(((0, 0), "$")),
                    "Internal Only: Library",
                ),
                instance,
                record("SYMBOL", (0, 20), Some(((0, 2), "!")), "Button"),
            ],
            blobs: BlobStore::default(),
        })
        .unwrap()
    }

    #[test]
    fn page_listing_excludes_internal_canvases() {
        let doc = document_with_internal_library();
        let pages = doc.pages();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].name, "Page 1");
        assert_eq!(pages[0].id, "0:1");
        assert_eq!(pages[0].child_count, 1);
    }

    #[test]
    fn instance_resolves_through_internal_canvas() {
        let doc = document_with_internal_library();
        let conversion = doc.convert_all().unwrap();
        assert_eq!(conversion.pages.len(), 1);
        assert!(conversion.warnings.is_empty());
        let instance = &conversion.pages[0].root.children[0];
        assert_eq!(
            instance.kind,
            figtree_protocol::NodeKind::Instance {
                component_id: "component-1".to_string()
            }
        );
    }

    #[test]
    fn convert_page_by_unknown_id_fails() {
        let doc = document_with_internal_library();
        assert!(doc.convert_page("9:9").is_err());
    }

    #[test]
    fn internal_page_is_not_convertible_directly() {
        let doc = document_with_internal_library();
        assert!(doc.convert_page("0:2").is_err());
    }

    #[test]
    fn document_without_visible_pages_fails() {
        let doc = SceneDocument::build(SceneFile {
            changes: vec![record("DOCUMENT", (0, 0), None, "Document")],
            blobs: BlobStore::default(),
        })
        .unwrap();
        assert!(matches!(
            doc.convert_all(),
            Err(DecodeError::Tree(TreeError::NoPages))
        ));
    }
}
