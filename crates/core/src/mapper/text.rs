//! Text mapping: resolves the flat character buffer, per-character style
//! ids, and the override table into styled runs — collapsing back to a
//! plain string when nothing deviates from the base style.

use figtree_protocol::{Color, TextAlign, TextContent, TextDecoration, TextRun, TextStyle};

use crate::model::{FontName, NodeChange, StyleOverride, WireNumber};

/// Weight inferred from a font style name (`"SemiBold"`, `"Black Italic"`).
fn weight_from_style(style: &str) -> Option<u32> {
    let lowered = style.to_ascii_lowercase();
    let weight = if lowered.contains("thin") {
        100
    } else if lowered.contains("extralight") || lowered.contains("ultra light") {
        200
    } else if lowered.contains("light") {
        300
    } else if lowered.contains("medium") {
        500
    } else if lowered.contains("semibold") || lowered.contains("semi bold") {
        600
    } else if lowered.contains("extrabold") || lowered.contains("ultra bold") {
        800
    } else if lowered.contains("bold") {
        700
    } else if lowered.contains("black") || lowered.contains("heavy") {
        900
    } else if lowered.contains("regular") || lowered.contains("normal") {
        400
    } else {
        return None;
    };
    Some(weight)
}

fn is_italic(style: &str) -> bool {
    style.to_ascii_lowercase().contains("italic")
}

fn pixels(number: &WireNumber) -> Option<f64> {
    (number.units != "PERCENT").then_some(number.value)
}

fn font_fields(font: &FontName) -> (Option<String>, Option<u32>, bool) {
    let family = font.family.clone();
    let (weight, italic) = match font.style.as_deref() {
        Some(style) => (weight_from_style(style), is_italic(style)),
        None => (None, false),
    };
    (family, weight, italic)
}

fn first_solid_color(paints: &[crate::model::Paint]) -> Option<Color> {
    paints
        .iter()
        .find(|p| p.is_visible() && p.paint_type == "SOLID")
        .and_then(|p| p.color)
        .map(|c| Color::rgba(c.r, c.g, c.b, c.a))
}

/// Base style from node-level text fields.
pub fn base_style(change: &NodeChange) -> TextStyle {
    let (font_family, font_weight, italic) = change
        .font_name
        .as_ref()
        .map(font_fields)
        .unwrap_or((None, None, false));
    TextStyle {
        font_family,
        font_size: change.font_size,
        font_weight,
        italic,
        color: first_solid_color(&change.fill_paints),
        letter_spacing: change.letter_spacing.as_ref().and_then(pixels),
        line_height: change.line_height.as_ref().and_then(pixels),
        decoration: None,
    }
}

pub fn alignment(change: &NodeChange) -> TextAlign {
    match change.text_align_horizontal.as_deref() {
        Some("CENTER") => TextAlign::Center,
        Some("RIGHT") => TextAlign::Right,
        Some("JUSTIFIED") => TextAlign::Justified,
        _ => TextAlign::Left,
    }
}

/// Style override relative to the base style; empty when the override
/// table has no entry for the id.
fn override_style(overrides: &[StyleOverride], style_id: u64) -> TextStyle {
    let Some(entry) = overrides.iter().find(|o| o.style_id == style_id) else {
        return TextStyle::default();
    };
    let (font_family, font_weight, italic) = entry
        .font_name
        .as_ref()
        .map(font_fields)
        .unwrap_or((None, None, false));
    TextStyle {
        font_family,
        font_size: entry.font_size,
        font_weight,
        italic,
        color: first_solid_color(&entry.fill_paints),
        letter_spacing: entry.letter_spacing.as_ref().and_then(pixels),
        line_height: entry.line_height.as_ref().and_then(pixels),
        decoration: match entry.text_decoration.as_deref() {
            Some("UNDERLINE") => Some(TextDecoration::Underline),
            Some("STRIKETHROUGH") => Some(TextDecoration::Strikethrough),
            _ => None,
        },
    }
}

/// Resolve text content. Contiguous runs of identical style id fold into
/// one run; when every run carries no overrides the whole text collapses
/// to a single plain string.
pub fn content(change: &NodeChange) -> TextContent {
    let Some(data) = change.text_data.as_ref() else {
        return TextContent::Plain(String::new());
    };
    let characters = data.characters.clone().unwrap_or_default();
    if characters.is_empty() || data.character_style_ids.is_empty() {
        return TextContent::Plain(characters);
    }

    let mut runs: Vec<(u64, String)> = Vec::new();
    for (index, ch) in characters.chars().enumerate() {
        // Ids past the end of the array inherit the base style.
        let style_id = data.character_style_ids.get(index).copied().unwrap_or(0);
        match runs.last_mut() {
            Some((current, text)) if *current == style_id => text.push(ch),
            _ => runs.push((style_id, ch.to_string())),
        }
    }

    let styled: Vec<TextRun> = runs
        .into_iter()
        .map(|(style_id, text)| TextRun {
            style: if style_id == 0 {
                TextStyle::default()
            } else {
                override_style(&data.style_override_table, style_id)
            },
            text,
        })
        .collect();

    if styled.iter().all(|run| run.style.is_plain()) {
        return TextContent::Plain(characters);
    }
    TextContent::Runs(styled)
}
