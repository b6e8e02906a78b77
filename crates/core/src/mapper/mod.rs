//! Node conversion: a pure dispatch on the record's type tag, producing
//! normalized scene nodes. Anything that goes wrong locally — an
//! unresolvable instance, an undecodable geometry stream, an unsupported
//! type — degrades with a recorded warning and never aborts the run.

pub mod icons;
pub mod layout;
pub mod paint;
pub mod text;

use figtree_protocol::{CornerRadius, NodeKind, SceneNode, Sizing};
use tracing::warn;

use crate::geometry;
use crate::model::{BlobStore, NodeChange};
use crate::registry::ComponentRegistry;
use crate::tree::SceneTree;

/// State threaded through one conversion run. The registry and warning
/// list travel here rather than in globals, so two decodes can convert on
/// separate threads with zero synchronization.
pub struct ConvertContext<'a> {
    tree: &'a SceneTree,
    registry: &'a ComponentRegistry,
    blobs: &'a BlobStore,
    pub warnings: Vec<String>,
}

impl<'a> ConvertContext<'a> {
    pub fn new(
        tree: &'a SceneTree,
        registry: &'a ComponentRegistry,
        blobs: &'a BlobStore,
    ) -> Self {
        Self {
            tree,
            registry,
            blobs,
            warnings: Vec::new(),
        }
    }

    fn warn(&mut self, message: String) {
        warn!("{message}");
        self.warnings.push(message);
    }
}

/// Convert one page (canvas) into a frame-rooted normalized tree.
pub fn convert_page(ctx: &mut ConvertContext<'_>, canvas_index: usize) -> SceneNode {
    let tree = ctx.tree;
    let canvas = &tree.node(canvas_index).change;
    let mut root = base_node(canvas, None, NodeKind::Frame);
    root.width = Sizing::Hug;
    root.height = Sizing::Hug;
    root.children = convert_children(ctx, canvas_index);
    root
}

fn convert_children(ctx: &mut ConvertContext<'_>, index: usize) -> Vec<SceneNode> {
    let tree = ctx.tree;
    let parent = &tree.node(index).change;
    tree.node(index)
        .children
        .iter()
        .filter_map(|&child| convert_node(ctx, child, Some(parent)))
        .collect()
}

/// Convert one tree node. `None` means the node has no representation and
/// was dropped (invisible, or unsupported leaf — the latter with a
/// warning).
pub fn convert_node(
    ctx: &mut ConvertContext<'_>,
    index: usize,
    parent: Option<&NodeChange>,
) -> Option<SceneNode> {
    let tree = ctx.tree;
    let node = tree.node(index);
    let change = &node.change;
    if change.visible == Some(false) {
        return None;
    }

    match change.node_type.as_str() {
        "FRAME" | "SECTION" | "SYMBOL" | "COMPONENT_SET" => {
            convert_container(ctx, index, parent, NodeKind::Frame)
        }
        "GROUP" => convert_container(ctx, index, parent, NodeKind::Group),
        "INSTANCE" => convert_instance(ctx, index, parent),
        "RECTANGLE" | "ROUNDED_RECTANGLE" => Some(base_node(change, parent, NodeKind::Rectangle)),
        "ELLIPSE" => Some(convert_ellipse(change, parent)),
        "LINE" => Some(base_node(change, parent, NodeKind::Line)),
        "TEXT" => Some(convert_text(change, parent)),
        "VECTOR" | "STAR" | "POLYGON" | "REGULAR_POLYGON" | "BOOLEAN_OPERATION" | "HIGHLIGHT" => {
            Some(convert_vector(ctx, index, parent))
        }
        other => {
            if node.children.is_empty() {
                ctx.warn(format!(
                    "dropping unsupported leaf node type {other} (`{}`)",
                    change.display_name()
                ));
                None
            } else {
                ctx.warn(format!(
                    "converting unsupported node type {other} (`{}`) as a plain frame",
                    change.display_name()
                ));
                convert_container(ctx, index, parent, NodeKind::Frame)
            }
        }
    }
}

fn base_node(change: &NodeChange, parent: Option<&NodeChange>, kind: NodeKind) -> SceneNode {
    let (x, y) = change.position();
    let (width, height) = layout::sizing(change, parent);
    SceneNode {
        id: change.guid.map(|g| g.to_string()).unwrap_or_default(),
        name: change.display_name().to_string(),
        kind,
        x,
        y,
        width,
        height,
        opacity: change.opacity.unwrap_or(1.0),
        fills: paint::fills(change),
        stroke: paint::stroke(change),
        effects: paint::effects(change),
        corner_radius: layout::corner_radius(change),
        layout: layout::auto_layout(change),
        children: Vec::new(),
    }
}

fn image_leaf(
    change: &NodeChange,
    parent: Option<&NodeChange>,
    source: String,
    corner_radius: Option<CornerRadius>,
) -> SceneNode {
    let mut node = base_node(change, parent, NodeKind::Image { source });
    node.fills = Vec::new();
    if corner_radius.is_some() {
        node.corner_radius = corner_radius;
    }
    node
}

fn convert_container(
    ctx: &mut ConvertContext<'_>,
    index: usize,
    parent: Option<&NodeChange>,
    kind: NodeKind,
) -> Option<SceneNode> {
    let tree = ctx.tree;
    let node = tree.node(index);
    let change = &node.change;

    // A childless container whose only visible fill is an image converts
    // to the image itself, not an empty wrapper around one.
    if node.children.is_empty()
        && let Some(source) = paint::sole_image_fill(change)
    {
        return Some(image_leaf(change, parent, source, None));
    }

    let mut out = base_node(change, parent, kind);
    out.children = convert_children(ctx, index);
    Some(out)
}

fn convert_instance(
    ctx: &mut ConvertContext<'_>,
    index: usize,
    parent: Option<&NodeChange>,
) -> Option<SceneNode> {
    let tree = ctx.tree;
    let change = &tree.node(index).change;
    let target = change
        .overridden_symbol_id
        .or_else(|| change.symbol_data.as_ref().and_then(|s| s.symbol_id));
    let component_id = target
        .and_then(|guid| ctx.registry.resolve(guid))
        .map(str::to_owned);

    match component_id {
        Some(component_id) => {
            let mut out = base_node(change, parent, NodeKind::Instance { component_id });
            out.children = convert_children(ctx, index);
            Some(out)
        }
        None => {
            ctx.warn(format!(
                "instance `{}` does not resolve to a known component; converting structurally",
                change.display_name()
            ));
            convert_container(ctx, index, parent, NodeKind::Frame)
        }
    }
}

fn convert_ellipse(change: &NodeChange, parent: Option<&NodeChange>) -> SceneNode {
    // Image-filled ellipses become round-cornered image leaves so the
    // circular clip survives consumers that render images as rectangles.
    if let Some(source) = paint::sole_image_fill(change) {
        let radius = change.width().min(change.height()) / 2.0;
        return image_leaf(change, parent, source, Some(CornerRadius::Uniform(radius)));
    }
    base_node(change, parent, NodeKind::Ellipse)
}

fn convert_text(change: &NodeChange, parent: Option<&NodeChange>) -> SceneNode {
    let mut out = base_node(
        change,
        parent,
        NodeKind::Text {
            content: text::content(change),
            style: text::base_style(change),
            align: text::alignment(change),
        },
    );
    // The text color lives in the style, not in fills.
    out.fills = Vec::new();
    out
}

fn convert_vector(
    ctx: &mut ConvertContext<'_>,
    index: usize,
    parent: Option<&NodeChange>,
) -> SceneNode {
    let tree = ctx.tree;
    let change = &tree.node(index).change;

    if let Some(path) = icons::lookup(change.display_name()) {
        return base_node(
            change,
            parent,
            NodeKind::VectorPath {
                path_data: path.to_string(),
            },
        );
    }

    let refs = if change.fill_geometry.is_empty() {
        &change.stroke_geometry
    } else {
        &change.fill_geometry
    };
    let blobs: Vec<&[u8]> = refs
        .iter()
        .filter_map(|r| r.commands_blob)
        .filter_map(|i| ctx.blobs.bytes(i as usize))
        .collect();
    let mut commands = geometry::decode_commands(&blobs);

    if commands.is_empty() {
        ctx.warn(format!(
            "vector `{}` has no decodable geometry; using a rectangle placeholder",
            change.display_name()
        ));
        return base_node(change, parent, NodeKind::Rectangle);
    }

    if let Some(norm) = change.vector_data.as_ref().and_then(|v| v.normalized_size)
        && norm.x > 0.0
        && norm.y > 0.0
    {
        let sx = change.width() / norm.x;
        let sy = change.height() / norm.y;
        if sx != 1.0 || sy != 1.0 {
            geometry::scale_commands(&mut commands, sx, sy);
        }
    }

    base_node(
        change,
        parent,
        NodeKind::VectorPath {
            path_data: geometry::to_path_data(&commands),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Guid, ImageRef, Paint, ParentIndex, SymbolData, Vector};

    fn record(node_type: &str, guid: (u64, u64), parent: Option<(u64, u64)>) -> NodeChange {
        NodeChange {
            guid: Some(Guid::new(guid.0, guid.1)),
            node_type: node_type.to_string(),
            name: Some(format!("{node_type}-{}", guid.1)),
            parent_index: parent.map(|p| ParentIndex {
                guid: Guid::new(p.0, p.1),
                position: "!".to_string(),
            }),
            ..NodeChange::default()
        }
    }

    fn image_paint(blob: u64) -> Paint {
        Paint {
            paint_type: "IMAGE".to_string(),
            image: Some(ImageRef {
                data_blob: Some(blob),
                ..ImageRef::default()
            }),
            ..Paint::default()
        }
    }

    fn convert_first_page(changes: Vec<NodeChange>) -> (SceneNode, Vec<String>) {
        let tree = SceneTree::build(changes).unwrap();
        let registry = ComponentRegistry::build(&tree);
        let blobs = BlobStore::default();
        let mut ctx = ConvertContext::new(&tree, &registry, &blobs);
        let page = convert_page(&mut ctx, tree.canvases()[0]);
        (page, ctx.warnings)
    }

    #[test]
    fn unresolved_instance_converts_structurally() {
        let mut instance = record("INSTANCE", (0, 2), Some((0, 1)));
        instance.symbol_data = Some(SymbolData {
            symbol_id: Some(Guid::new(9, 9)),
        });
        let (page, warnings) = convert_first_page(vec![
            record("DOCUMENT", (0, 0), None),
            record("CANVAS", (0, 1), Some((0, 0))),
            instance,
        ]);
        assert_eq!(page.children.len(), 1);
        assert_eq!(page.children[0].kind, NodeKind::Frame);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("does not resolve"));
    }

    #[test]
    fn resolved_instance_carries_component_id() {
        let mut symbol = record("SYMBOL", (0, 5), Some((0, 1)));
        symbol.name = Some("Button".to_string());
        let mut instance = record("INSTANCE", (0, 2), Some((0, 1)));
        instance.symbol_data = Some(SymbolData {
            symbol_id: Some(Guid::new(0, 5)),
        });
        let (page, warnings) = convert_first_page(vec![
            record("DOCUMENT", (0, 0), None),
            record("CANVAS", (0, 1), Some((0, 0))),
            symbol,
            instance,
        ]);
        assert!(warnings.is_empty());
        let converted = page
            .children
            .iter()
            .find(|n| matches!(n.kind, NodeKind::Instance { .. }))
            .unwrap();
        assert_eq!(
            converted.kind,
            NodeKind::Instance {
                component_id: "component-1".to_string()
            }
        );
    }

    #[test]
    fn image_only_frame_becomes_image_leaf() {
        let mut frame = record("FRAME", (0, 2), Some((0, 1)));
        frame.fill_paints = vec![image_paint(4)];
        let (page, _) = convert_first_page(vec![
            record("DOCUMENT", (0, 0), None),
            record("CANVAS", (0, 1), Some((0, 0))),
            frame,
        ]);
        assert_eq!(
            page.children[0].kind,
            NodeKind::Image {
                source: "__blob:4".to_string()
            }
        );
        assert!(page.children[0].fills.is_empty());
    }

    #[test]
    fn image_frame_with_children_stays_a_frame() {
        let mut frame = record("FRAME", (0, 2), Some((0, 1)));
        frame.fill_paints = vec![image_paint(4)];
        let (page, _) = convert_first_page(vec![
            record("DOCUMENT", (0, 0), None),
            record("CANVAS", (0, 1), Some((0, 0))),
            frame,
            record("RECTANGLE", (0, 3), Some((0, 2))),
        ]);
        assert_eq!(page.children[0].kind, NodeKind::Frame);
        assert_eq!(page.children[0].children.len(), 1);
    }

    #[test]
    fn image_ellipse_gets_half_min_dimension_radius() {
        let mut ellipse = record("ELLIPSE", (0, 2), Some((0, 1)));
        ellipse.fill_paints = vec![image_paint(0)];
        ellipse.size = Some(Vector { x: 40.0, y: 60.0 });
        let (page, _) = convert_first_page(vec![
            record("DOCUMENT", (0, 0), None),
            record("CANVAS", (0, 1), Some((0, 0))),
            ellipse,
        ]);
        assert!(matches!(page.children[0].kind, NodeKind::Image { .. }));
        assert_eq!(
            page.children[0].corner_radius,
            Some(CornerRadius::Uniform(20.0))
        );
    }

    #[test]
    fn unknown_leaf_is_dropped_with_warning() {
        let (page, warnings) = convert_first_page(vec![
            record("DOCUMENT", (0, 0), None),
            record("CANVAS", (0, 1), Some((0, 0))),
            record("WIDGET", (0, 2), Some((0, 1))),
        ]);
        assert!(page.children.is_empty());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("unsupported leaf"));
    }

    #[test]
    fn unknown_container_degrades_to_frame() {
        let (page, warnings) = convert_first_page(vec![
            record("DOCUMENT", (0, 0), None),
            record("CANVAS", (0, 1), Some((0, 0))),
            record("WIDGET", (0, 2), Some((0, 1))),
            record("RECTANGLE", (0, 3), Some((0, 2))),
        ]);
        assert_eq!(page.children[0].kind, NodeKind::Frame);
        assert_eq!(page.children[0].children.len(), 1);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn invisible_nodes_are_skipped_silently() {
        let mut hidden = record("RECTANGLE", (0, 2), Some((0, 1)));
        hidden.visible = Some(false);
        let (page, warnings) = convert_first_page(vec![
            record("DOCUMENT", (0, 0), None),
            record("CANVAS", (0, 1), Some((0, 0))),
            hidden,
        ]);
        assert!(page.children.is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn named_icon_vector_uses_glyph_table() {
        let mut vector = record("VECTOR", (0, 2), Some((0, 1)));
        vector.name = Some("Icon/Check".to_string());
        let (page, warnings) = convert_first_page(vec![
            record("DOCUMENT", (0, 0), None),
            record("CANVAS", (0, 1), Some((0, 0))),
            vector,
        ]);
        assert!(warnings.is_empty());
        match &page.children[0].kind {
            NodeKind::VectorPath { path_data } => assert!(path_data.starts_with("M9 16.17")),
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn vector_without_geometry_falls_back_to_rectangle() {
        let (page, warnings) = convert_first_page(vec![
            record("DOCUMENT", (0, 0), None),
            record("CANVAS", (0, 1), Some((0, 0))),
            record("VECTOR", (0, 2), Some((0, 1))),
        ]);
        assert_eq!(page.children[0].kind, NodeKind::Rectangle);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("rectangle placeholder"));
    }
}
