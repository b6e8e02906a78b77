//! Typed node-change records. Each record describes one node's full or
//! partial state and is deserialized from the generic object graph the
//! compiled schema produced; every field is defaulted so format versions
//! that omit fields still decode.

use serde::Deserialize;

use super::guid::Guid;

/// Parent linkage: the parent's GUID plus the fractional sibling-position
/// key. Position keys order siblings by raw byte comparison.
#[derive(Debug, Clone, Deserialize)]
pub struct ParentIndex {
    pub guid: Guid,
    #[serde(default)]
    pub position: String,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

/// Wire color, components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct WireColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Default for WireColor {
    fn default() -> Self {
        Self {
            r: 0.0,
            g: 0.0,
            b: 0.0,
            a: 1.0,
        }
    }
}

/// 2×3 affine transform in row-major `{m00 m01 m02 / m10 m11 m12}` form.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct Matrix {
    pub m00: f64,
    pub m01: f64,
    pub m02: f64,
    pub m10: f64,
    pub m11: f64,
    pub m12: f64,
}

impl Default for Matrix {
    fn default() -> Self {
        Self {
            m00: 1.0,
            m01: 0.0,
            m02: 0.0,
            m10: 0.0,
            m11: 1.0,
            m12: 0.0,
        }
    }
}

/// A dimensioned scalar such as line height or letter spacing:
/// `units` is `"PIXELS"`, `"PERCENT"`, or `"RAW"`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WireNumber {
    pub value: f64,
    pub units: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FontName {
    pub family: Option<String>,
    pub style: Option<String>,
}

/// Image reference on an image paint: either a content hash or a direct
/// blob-table index.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ImageRef {
    pub hash: Vec<u8>,
    pub name: Option<String>,
    #[serde(rename = "dataBlob")]
    pub data_blob: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WireGradientStop {
    pub color: Option<WireColor>,
    pub position: f32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Paint {
    /// `SOLID`, `GRADIENT_LINEAR`, `GRADIENT_RADIAL`, `GRADIENT_ANGULAR`,
    /// `IMAGE`, `EMOJI`, ...
    #[serde(rename = "type")]
    pub paint_type: String,
    pub color: Option<WireColor>,
    pub opacity: Option<f64>,
    pub visible: Option<bool>,
    pub stops: Vec<WireGradientStop>,
    pub transform: Option<Matrix>,
    pub image: Option<ImageRef>,
}

impl Paint {
    pub fn is_visible(&self) -> bool {
        self.visible.unwrap_or(true) && self.opacity.unwrap_or(1.0) > 0.0
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WireEffect {
    /// `DROP_SHADOW`, `INNER_SHADOW`, `FOREGROUND_BLUR`, `BACKGROUND_BLUR`.
    #[serde(rename = "type")]
    pub effect_type: String,
    pub color: Option<WireColor>,
    pub offset: Option<Vector>,
    pub radius: f64,
    pub spread: f64,
    pub visible: Option<bool>,
}

/// Reference to a path-geometry opcode stream in the blob table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GeometryRef {
    #[serde(rename = "commandsBlob")]
    pub commands_blob: Option<u64>,
}

/// Vector-specific payload; `normalized_size` is the authoring-time size
/// the geometry coordinates are expressed against.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VectorData {
    #[serde(rename = "normalizedSize")]
    pub normalized_size: Option<Vector>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StyleOverride {
    #[serde(rename = "styleID")]
    pub style_id: u64,
    #[serde(rename = "fontSize")]
    pub font_size: Option<f64>,
    #[serde(rename = "fontName")]
    pub font_name: Option<FontName>,
    #[serde(rename = "fillPaints")]
    pub fill_paints: Vec<Paint>,
    #[serde(rename = "textDecoration")]
    pub text_decoration: Option<String>,
    #[serde(rename = "letterSpacing")]
    pub letter_spacing: Option<WireNumber>,
    #[serde(rename = "lineHeight")]
    pub line_height: Option<WireNumber>,
}

/// Flat text payload: a character buffer, a parallel per-character style-id
/// array, and the override table those ids point into.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TextData {
    pub characters: Option<String>,
    #[serde(rename = "characterStyleIDs")]
    pub character_style_ids: Vec<u64>,
    #[serde(rename = "styleOverrideTable")]
    pub style_override_table: Vec<StyleOverride>,
}

/// Component linkage on an `INSTANCE` node.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SymbolData {
    #[serde(rename = "symbolID")]
    pub symbol_id: Option<Guid>,
}

/// One decoded change record. Records with `phase == REMOVED` are filtered
/// out before tree building; surviving records are never mutated.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NodeChange {
    pub guid: Option<Guid>,
    /// `DOCUMENT`, `CANVAS`, `FRAME`, `SYMBOL`, `INSTANCE`, `TEXT`, ...
    #[serde(rename = "type")]
    pub node_type: String,
    pub name: Option<String>,
    pub phase: Option<String>,
    #[serde(rename = "parentIndex")]
    pub parent_index: Option<ParentIndex>,
    pub size: Option<Vector>,
    pub transform: Option<Matrix>,
    pub visible: Option<bool>,
    pub opacity: Option<f64>,

    #[serde(rename = "fillPaints")]
    pub fill_paints: Vec<Paint>,
    #[serde(rename = "strokePaints")]
    pub stroke_paints: Vec<Paint>,
    #[serde(rename = "strokeWeight")]
    pub stroke_weight: Option<f64>,
    #[serde(rename = "strokeAlign")]
    pub stroke_align: Option<String>,
    #[serde(rename = "dashPattern")]
    pub dash_pattern: Vec<f64>,
    pub effects: Vec<WireEffect>,

    #[serde(rename = "cornerRadius")]
    pub corner_radius: Option<f64>,
    #[serde(rename = "rectangleTopLeftCornerRadius")]
    pub corner_radius_top_left: Option<f64>,
    #[serde(rename = "rectangleTopRightCornerRadius")]
    pub corner_radius_top_right: Option<f64>,
    #[serde(rename = "rectangleBottomLeftCornerRadius")]
    pub corner_radius_bottom_left: Option<f64>,
    #[serde(rename = "rectangleBottomRightCornerRadius")]
    pub corner_radius_bottom_right: Option<f64>,

    #[serde(rename = "fillGeometry")]
    pub fill_geometry: Vec<GeometryRef>,
    #[serde(rename = "strokeGeometry")]
    pub stroke_geometry: Vec<GeometryRef>,
    #[serde(rename = "vectorData")]
    pub vector_data: Option<VectorData>,

    #[serde(rename = "textData")]
    pub text_data: Option<TextData>,
    #[serde(rename = "fontSize")]
    pub font_size: Option<f64>,
    #[serde(rename = "fontName")]
    pub font_name: Option<FontName>,
    #[serde(rename = "textAlignHorizontal")]
    pub text_align_horizontal: Option<String>,
    #[serde(rename = "textAutoResize")]
    pub text_auto_resize: Option<String>,
    #[serde(rename = "lineHeight")]
    pub line_height: Option<WireNumber>,
    #[serde(rename = "letterSpacing")]
    pub letter_spacing: Option<WireNumber>,

    #[serde(rename = "symbolData")]
    pub symbol_data: Option<SymbolData>,
    #[serde(rename = "overriddenSymbolID")]
    pub overridden_symbol_id: Option<Guid>,

    #[serde(rename = "stackMode")]
    pub stack_mode: Option<String>,
    #[serde(rename = "stackSpacing")]
    pub stack_spacing: Option<f64>,
    #[serde(rename = "stackHorizontalPadding")]
    pub stack_horizontal_padding: Option<f64>,
    #[serde(rename = "stackVerticalPadding")]
    pub stack_vertical_padding: Option<f64>,
    #[serde(rename = "stackPaddingRight")]
    pub stack_padding_right: Option<f64>,
    #[serde(rename = "stackPaddingBottom")]
    pub stack_padding_bottom: Option<f64>,
    #[serde(rename = "stackPrimarySizing")]
    pub stack_primary_sizing: Option<String>,
    #[serde(rename = "stackCounterSizing")]
    pub stack_counter_sizing: Option<String>,
    #[serde(rename = "stackPrimaryAlignItems")]
    pub stack_primary_align_items: Option<String>,
    #[serde(rename = "stackCounterAlignItems")]
    pub stack_counter_align_items: Option<String>,
    #[serde(rename = "stackChildPrimaryGrow")]
    pub stack_child_primary_grow: Option<f64>,
    #[serde(rename = "stackChildAlignSelf")]
    pub stack_child_align_self: Option<String>,
}

impl NodeChange {
    pub fn is_removed(&self) -> bool {
        self.phase.as_deref() == Some("REMOVED")
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// Position relative to the parent, taken from the transform's
    /// translation column.
    pub fn position(&self) -> (f64, f64) {
        match &self.transform {
            Some(t) => (t.m02, t.m12),
            None => (0.0, 0.0),
        }
    }

    pub fn width(&self) -> f64 {
        self.size.map(|s| s.x).unwrap_or(0.0)
    }

    pub fn height(&self) -> f64 {
        self.size.map(|s| s.y).unwrap_or(0.0)
    }
}
