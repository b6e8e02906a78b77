//! Auto-layout mapping: per-axis sizing resolution, stack properties, and
//! corner-radius extraction.

use figtree_protocol::{
    AutoLayout, CornerRadius, CrossAxisAlign, MainAxisAlign, Padding, Sizing, StackDirection,
};

use crate::model::NodeChange;

fn stack_direction(change: &NodeChange) -> Option<StackDirection> {
    match change.stack_mode.as_deref() {
        Some("HORIZONTAL") => Some(StackDirection::Horizontal),
        Some("VERTICAL") => Some(StackDirection::Vertical),
        _ => None,
    }
}

fn hugs(sizing_mode: Option<&str>) -> bool {
    matches!(
        sizing_mode,
        Some("RESIZE_TO_FIT") | Some("RESIZE_TO_FIT_WITH_IMPLICIT_SIZE")
    )
}

/// Resolve width and height sizing behaviors for one node.
///
/// Each axis independently considers the node's own sizing modes and stack
/// orientation, then the parent's orientation together with the node's
/// grow/stretch flags. Fill wins over hug, hug wins over the fixed pixel
/// fallback.
pub fn sizing(change: &NodeChange, parent: Option<&NodeChange>) -> (Sizing, Sizing) {
    let own = stack_direction(change);
    let primary_hug = hugs(change.stack_primary_sizing.as_deref());
    let counter_hug = hugs(change.stack_counter_sizing.as_deref());

    let (mut hug_w, mut hug_h) = match own {
        Some(StackDirection::Horizontal) => (primary_hug, counter_hug),
        Some(StackDirection::Vertical) => (counter_hug, primary_hug),
        None => (false, false),
    };
    // Text auto-resize behaves like hug without any stack involved.
    match change.text_auto_resize.as_deref() {
        Some("WIDTH_AND_HEIGHT") => {
            hug_w = true;
            hug_h = true;
        }
        Some("HEIGHT") => hug_h = true,
        _ => {}
    }

    let grow = change.stack_child_primary_grow.unwrap_or(0.0) > 0.0;
    let stretch = change.stack_child_align_self.as_deref() == Some("STRETCH");
    let (fill_w, fill_h) = match parent.and_then(stack_direction) {
        Some(StackDirection::Horizontal) => (grow, stretch),
        Some(StackDirection::Vertical) => (stretch, grow),
        None => (false, false),
    };

    let width = if fill_w {
        Sizing::Fill
    } else if hug_w {
        Sizing::Hug
    } else {
        Sizing::Fixed(change.width())
    };
    let height = if fill_h {
        Sizing::Fill
    } else if hug_h {
        Sizing::Hug
    } else {
        Sizing::Fixed(change.height())
    };
    (width, height)
}

/// Extract stack layout from a container record, if it has one.
pub fn auto_layout(change: &NodeChange) -> Option<AutoLayout> {
    let direction = stack_direction(change)?;

    let left = change.stack_horizontal_padding.unwrap_or(0.0);
    let top = change.stack_vertical_padding.unwrap_or(0.0);
    let right = change.stack_padding_right.unwrap_or(left);
    let bottom = change.stack_padding_bottom.unwrap_or(top);
    let padding = if top == 0.0 && right == 0.0 && bottom == 0.0 && left == 0.0 {
        None
    } else {
        Some(Padding::from_edges(top, right, bottom, left))
    };

    let align_main = match change.stack_primary_align_items.as_deref() {
        Some("CENTER") => MainAxisAlign::Center,
        Some("MAX") => MainAxisAlign::End,
        Some("SPACE_BETWEEN") | Some("SPACE_EVENLY") => MainAxisAlign::SpaceBetween,
        _ => MainAxisAlign::Start,
    };
    let align_cross = match change.stack_counter_align_items.as_deref() {
        Some("CENTER") => CrossAxisAlign::Center,
        Some("MAX") => CrossAxisAlign::End,
        _ => CrossAxisAlign::Start,
    };

    Some(AutoLayout {
        direction,
        gap: change.stack_spacing.unwrap_or(0.0),
        padding,
        align_main,
        align_cross,
    })
}

/// Corner radii, preferring the four independent corner fields over the
/// single legacy scalar.
pub fn corner_radius(change: &NodeChange) -> Option<CornerRadius> {
    let fallback = change.corner_radius.unwrap_or(0.0);
    let any_independent = change.corner_radius_top_left.is_some()
        || change.corner_radius_top_right.is_some()
        || change.corner_radius_bottom_left.is_some()
        || change.corner_radius_bottom_right.is_some();
    if any_independent {
        let radius = CornerRadius::from_corners(
            change.corner_radius_top_left.unwrap_or(fallback),
            change.corner_radius_top_right.unwrap_or(fallback),
            change.corner_radius_bottom_left.unwrap_or(fallback),
            change.corner_radius_bottom_right.unwrap_or(fallback),
        );
        if radius == CornerRadius::Uniform(0.0) {
            return None;
        }
        return Some(radius);
    }
    (fallback > 0.0).then_some(CornerRadius::Uniform(fallback))
}
