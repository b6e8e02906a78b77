use serde::{Deserialize, Serialize};

/// How a node resolves its size along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Sizing {
    /// Fixed pixel value.
    Fixed(f64),
    /// Grow to fill the available space in the parent container.
    Fill,
    /// Shrink to fit content.
    Hug,
}

/// Edge padding, stored in its simplest equivalent form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Padding {
    /// All four edges equal.
    Uniform(f64),
    /// top == bottom and left == right.
    Symmetric { vertical: f64, horizontal: f64 },
    /// Four independent edge values.
    PerEdge {
        top: f64,
        right: f64,
        bottom: f64,
        left: f64,
    },
}

impl Padding {
    /// Collapse four edge values to the simplest equivalent form.
    pub fn from_edges(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        if top == bottom && left == right {
            if top == left {
                Padding::Uniform(top)
            } else {
                Padding::Symmetric {
                    vertical: top,
                    horizontal: left,
                }
            }
        } else {
            Padding::PerEdge {
                top,
                right,
                bottom,
                left,
            }
        }
    }
}

/// Corner radii, collapsed to a single scalar when all corners agree.
///
/// Per-corner order follows the wire record declaration: top-left,
/// top-right, bottom-left, bottom-right.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CornerRadius {
    Uniform(f64),
    PerCorner {
        top_left: f64,
        top_right: f64,
        bottom_left: f64,
        bottom_right: f64,
    },
}

impl CornerRadius {
    /// Collapse four corner values to the simplest equivalent form.
    pub fn from_corners(top_left: f64, top_right: f64, bottom_left: f64, bottom_right: f64) -> Self {
        if top_left == top_right && top_left == bottom_left && top_left == bottom_right {
            CornerRadius::Uniform(top_left)
        } else {
            CornerRadius::PerCorner {
                top_left,
                top_right,
                bottom_left,
                bottom_right,
            }
        }
    }
}

/// Main-axis direction of an auto-layout container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StackDirection {
    Horizontal,
    Vertical,
}

/// Child distribution along the main axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MainAxisAlign {
    Start,
    Center,
    End,
    SpaceBetween,
}

/// Child alignment along the cross axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossAxisAlign {
    Start,
    Center,
    End,
}

/// Flex-like automatic child layout on a container node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoLayout {
    pub direction: StackDirection,
    /// Gap between consecutive children, in pixels.
    pub gap: f64,
    pub padding: Option<Padding>,
    pub align_main: MainAxisAlign,
    pub align_cross: CrossAxisAlign,
}
