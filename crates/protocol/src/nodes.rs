use serde::{Deserialize, Serialize};

use crate::layout::{AutoLayout, CornerRadius, Sizing};
use crate::style::{Effect, Fill, Stroke, TextAlign, TextContent, TextStyle};

/// What a scene node is. Closed set — conversion always lands on one of
/// these variants or drops the node with a warning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Generic container (frames, sections, component definitions, and the
    /// structural-copy fallback for unresolved instances).
    Frame,
    /// Container without its own geometry; bounds derive from children.
    Group,
    Rectangle,
    Ellipse,
    Line,
    /// Vector geometry rendered as SVG-style path data.
    VectorPath { path_data: String },
    Text {
        content: TextContent,
        style: TextStyle,
        align: TextAlign,
    },
    /// Image leaf. `source` is an opaque `__blob:<index>` or `__hash:<hex>`
    /// token resolved by an external collaborator.
    Image { source: String },
    /// A placed copy of a component; `component_id` is the stable id the
    /// component registry assigned to the target definition.
    Instance { component_id: String },
}

/// One node of the normalized output tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    /// Decode-scoped identifier, stringified from the source GUID.
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    /// Position relative to the parent, in pixels.
    pub x: f64,
    pub y: f64,
    pub width: Sizing,
    pub height: Sizing,
    /// `0.0..=1.0`, pre-multiplied into nothing — renderers apply it.
    pub opacity: f64,
    pub fills: Vec<Fill>,
    pub stroke: Option<Stroke>,
    pub effects: Vec<Effect>,
    pub corner_radius: Option<CornerRadius>,
    /// Present when the node lays out children automatically.
    pub layout: Option<AutoLayout>,
    /// Ordered frontmost-first.
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    /// Total node count of this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(SceneNode::subtree_len).sum::<usize>()
    }
}

/// Cheap page descriptor returned by the listing interface, without
/// performing node conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub id: String,
    pub name: String,
    pub child_count: usize,
}
