use serde::{Deserialize, Serialize};

/// RGBA color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
}

/// One stop of a gradient fill.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Position along the gradient axis, `0.0..=1.0`.
    pub position: f32,
    pub color: Color,
}

/// A single background/foreground paint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Fill {
    Solid(Color),
    LinearGradient {
        /// Axis angle in degrees, rounded to an integer.
        angle_degrees: i32,
        stops: Vec<GradientStop>,
    },
    RadialGradient {
        stops: Vec<GradientStop>,
    },
    /// Image paint. `source` is an opaque `__blob:<index>` or `__hash:<hex>`
    /// token until an external image resolver materializes it.
    Image {
        source: String,
    },
}

/// Where the stroke sits relative to the node boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrokeAlign {
    Inside,
    Center,
    Outside,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Color,
    /// Stroke weight in pixels.
    pub weight: f64,
    pub align: StrokeAlign,
    /// Dash/gap lengths; empty means solid.
    pub dashes: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    DropShadow {
        color: Color,
        offset_x: f64,
        offset_y: f64,
        radius: f64,
        spread: f64,
    },
    InnerShadow {
        color: Color,
        offset_x: f64,
        offset_y: f64,
        radius: f64,
        spread: f64,
    },
    LayerBlur {
        radius: f64,
    },
    BackgroundBlur {
        radius: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
    Justified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextDecoration {
    Underline,
    Strikethrough,
}

/// Character-level text styling. On a text node this is the base style;
/// on a [`TextRun`] every field is an override relative to that base.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_family: Option<String>,
    pub font_size: Option<f64>,
    pub font_weight: Option<u32>,
    pub italic: bool,
    pub color: Option<Color>,
    pub letter_spacing: Option<f64>,
    pub line_height: Option<f64>,
    pub decoration: Option<TextDecoration>,
}

impl TextStyle {
    /// True when no field deviates from the base style.
    pub fn is_plain(&self) -> bool {
        *self == TextStyle::default()
    }
}

/// One styled run of a text node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    pub style: TextStyle,
}

/// Text content: a plain string when no run carries overrides, otherwise
/// an ordered run list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TextContent {
    Plain(String),
    Runs(Vec<TextRun>),
}
