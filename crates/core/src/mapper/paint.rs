//! Paint mapping: fills, strokes, and effects from wire records to the
//! normalized style model.

use figtree_protocol::{Color, Effect, Fill, GradientStop, Stroke, StrokeAlign};

use crate::model::{Matrix, NodeChange, Paint, WireColor, WireEffect};

fn color(wire: WireColor, opacity: f64) -> Color {
    Color::rgba(wire.r, wire.g, wire.b, wire.a * opacity as f32)
}

/// Gradient axis angle in degrees, from the rotation/shear terms of the
/// paint's 2×2 affine sub-transform, rounded to an integer in `[0, 360)`.
pub fn gradient_angle(transform: &Matrix) -> i32 {
    let degrees = transform.m01.atan2(transform.m00).to_degrees().round() as i32;
    degrees.rem_euclid(360)
}

fn stops(paint: &Paint) -> Vec<GradientStop> {
    paint
        .stops
        .iter()
        .map(|stop| GradientStop {
            position: stop.position,
            color: color(stop.color.unwrap_or_default(), paint.opacity.unwrap_or(1.0)),
        })
        .collect()
}

/// Opaque source token for an image paint: a direct blob-table index when
/// present, otherwise the content hash. Resolved by an external image
/// collaborator.
pub fn image_source(paint: &Paint) -> Option<String> {
    let image = paint.image.as_ref()?;
    if let Some(index) = image.data_blob {
        return Some(format!("__blob:{index}"));
    }
    if image.hash.is_empty() {
        return None;
    }
    let hex: String = image.hash.iter().map(|b| format!("{b:02x}")).collect();
    Some(format!("__hash:{hex}"))
}

fn convert_paint(paint: &Paint) -> Option<Fill> {
    match paint.paint_type.as_str() {
        "SOLID" => Some(Fill::Solid(color(
            paint.color.unwrap_or_default(),
            paint.opacity.unwrap_or(1.0),
        ))),
        "GRADIENT_LINEAR" => Some(Fill::LinearGradient {
            angle_degrees: paint
                .transform
                .as_ref()
                .map(gradient_angle)
                .unwrap_or(0),
            stops: stops(paint),
        }),
        "GRADIENT_RADIAL" | "GRADIENT_ANGULAR" | "GRADIENT_DIAMOND" => {
            Some(Fill::RadialGradient { stops: stops(paint) })
        }
        "IMAGE" => image_source(paint).map(|source| Fill::Image { source }),
        _ => None,
    }
}

/// Visible fills, in paint order.
pub fn fills(change: &NodeChange) -> Vec<Fill> {
    change
        .fill_paints
        .iter()
        .filter(|p| p.is_visible())
        .filter_map(convert_paint)
        .collect()
}

/// When the node's only visible fill is an image paint, its source token.
pub fn sole_image_fill(change: &NodeChange) -> Option<String> {
    let visible: Vec<&Paint> = change.fill_paints.iter().filter(|p| p.is_visible()).collect();
    match visible.as_slice() {
        [paint] if paint.paint_type == "IMAGE" => image_source(paint),
        _ => None,
    }
}

/// First visible solid stroke paint, with weight, alignment, and dash
/// pattern.
pub fn stroke(change: &NodeChange) -> Option<Stroke> {
    let paint = change
        .stroke_paints
        .iter()
        .find(|p| p.is_visible() && p.paint_type == "SOLID")?;
    let align = match change.stroke_align.as_deref() {
        Some("INSIDE") => StrokeAlign::Inside,
        Some("OUTSIDE") => StrokeAlign::Outside,
        _ => StrokeAlign::Center,
    };
    Some(Stroke {
        color: color(paint.color.unwrap_or_default(), paint.opacity.unwrap_or(1.0)),
        weight: change.stroke_weight.unwrap_or(1.0),
        align,
        dashes: change.dash_pattern.clone(),
    })
}

fn convert_effect(effect: &WireEffect) -> Option<Effect> {
    if !effect.visible.unwrap_or(true) {
        return None;
    }
    let offset = effect.offset.unwrap_or_default();
    match effect.effect_type.as_str() {
        "DROP_SHADOW" => Some(Effect::DropShadow {
            color: color(effect.color.unwrap_or_default(), 1.0),
            offset_x: offset.x,
            offset_y: offset.y,
            radius: effect.radius,
            spread: effect.spread,
        }),
        "INNER_SHADOW" => Some(Effect::InnerShadow {
            color: color(effect.color.unwrap_or_default(), 1.0),
            offset_x: offset.x,
            offset_y: offset.y,
            radius: effect.radius,
            spread: effect.spread,
        }),
        "FOREGROUND_BLUR" => Some(Effect::LayerBlur {
            radius: effect.radius,
        }),
        "BACKGROUND_BLUR" => Some(Effect::BackgroundBlur {
            radius: effect.radius,
        }),
        _ => None,
    }
}

pub fn effects(change: &NodeChange) -> Vec<Effect> {
    change.effects.iter().filter_map(convert_effect).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ImageRef, WireGradientStop};

    fn solid(r: f32, g: f32, b: f32) -> Paint {
        Paint {
            paint_type: "SOLID".to_string(),
            color: Some(WireColor { r, g, b, a: 1.0 }),
            ..Paint::default()
        }
    }

    #[test]
    fn invisible_paints_are_skipped() {
        let change = NodeChange {
            fill_paints: vec![
                Paint {
                    visible: Some(false),
                    ..solid(1.0, 0.0, 0.0)
                },
                solid(0.0, 1.0, 0.0),
            ],
            ..NodeChange::default()
        };
        assert_eq!(fills(&change).len(), 1);
    }

    #[test]
    fn paint_opacity_folds_into_alpha() {
        let change = NodeChange {
            fill_paints: vec![Paint {
                opacity: Some(0.5),
                ..solid(1.0, 1.0, 1.0)
            }],
            ..NodeChange::default()
        };
        match &fills(&change)[0] {
            Fill::Solid(c) => assert!((c.a - 0.5).abs() < 1e-6),
            other => panic!("unexpected fill: {other:?}"),
        }
    }

    #[test]
    fn gradient_angle_from_identity_is_zero() {
        assert_eq!(gradient_angle(&Matrix::default()), 0);
    }

    #[test]
    fn gradient_angle_from_quarter_turn() {
        let transform = Matrix {
            m00: 0.0,
            m01: 1.0,
            m02: 0.0,
            m10: -1.0,
            m11: 0.0,
            m12: 0.0,
        };
        assert_eq!(gradient_angle(&transform), 90);
    }

    #[test]
    fn gradient_angle_normalizes_negative_values() {
        let transform = Matrix {
            m00: 0.0,
            m01: -1.0,
            m02: 0.0,
            m10: 1.0,
            m11: 0.0,
            m12: 0.0,
        };
        assert_eq!(gradient_angle(&transform), 270);
    }

    #[test]
    fn linear_gradient_keeps_stop_order() {
        let change = NodeChange {
            fill_paints: vec![Paint {
                paint_type: "GRADIENT_LINEAR".to_string(),
                stops: vec![
                    WireGradientStop {
                        color: Some(WireColor {
                            r: 0.0,
                            g: 0.0,
                            b: 0.0,
                            a: 1.0,
                        }),
                        position: 0.0,
                    },
                    WireGradientStop {
                        color: Some(WireColor {
                            r: 1.0,
                            g: 1.0,
                            b: 1.0,
                            a: 1.0,
                        }),
                        position: 1.0,
                    },
                ],
                ..Paint::default()
            }],
            ..NodeChange::default()
        };
        match &fills(&change)[0] {
            Fill::LinearGradient { stops, .. } => {
                assert_eq!(stops.len(), 2);
                assert_eq!(stops[1].position, 1.0);
            }
            other => panic!("unexpected fill: {other:?}"),
        }
    }

    #[test]
    fn image_source_prefers_blob_index_over_hash() {
        let paint = Paint {
            paint_type: "IMAGE".to_string(),
            image: Some(ImageRef {
                hash: vec![0xAB, 0xCD],
                data_blob: Some(3),
                ..ImageRef::default()
            }),
            ..Paint::default()
        };
        assert_eq!(image_source(&paint).as_deref(), Some("__blob:3"));
    }

    #[test]
    fn image_source_falls_back_to_hash_hex() {
        let paint = Paint {
            paint_type: "IMAGE".to_string(),
            image: Some(ImageRef {
                hash: vec![0xAB, 0xCD],
                ..ImageRef::default()
            }),
            ..Paint::default()
        };
        assert_eq!(image_source(&paint).as_deref(), Some("__hash:abcd"));
    }

    #[test]
    fn sole_image_fill_requires_exactly_one_visible_paint() {
        let image_paint = Paint {
            paint_type: "IMAGE".to_string(),
            image: Some(ImageRef {
                data_blob: Some(0),
                ..ImageRef::default()
            }),
            ..Paint::default()
        };
        let only_image = NodeChange {
            fill_paints: vec![image_paint.clone()],
            ..NodeChange::default()
        };
        assert_eq!(sole_image_fill(&only_image).as_deref(), Some("__blob:0"));

        let mixed = NodeChange {
            fill_paints: vec![image_paint, solid(0.0, 0.0, 0.0)],
            ..NodeChange::default()
        };
        assert_eq!(sole_image_fill(&mixed), None);
    }
}
