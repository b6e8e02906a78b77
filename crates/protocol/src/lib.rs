pub mod layout;
pub mod nodes;
pub mod style;

pub use layout::{
    AutoLayout, CornerRadius, CrossAxisAlign, MainAxisAlign, Padding, Sizing, StackDirection,
};
pub use nodes::{NodeKind, PageInfo, SceneNode};
pub use style::{
    Color, Effect, Fill, GradientStop, Stroke, StrokeAlign, TextAlign, TextContent, TextDecoration,
    TextRun, TextStyle,
};
