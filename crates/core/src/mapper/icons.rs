//! Known icon glyph table. Vector nodes exported from common icon sets
//! keep their icon name; resolving those by name reproduces the glyph
//! exactly instead of re-deriving it from the geometry stream.
//!
//! Paths are on a 24×24 grid.

/// Look up a glyph by node name. Matching normalizes case, separators,
/// and `icon/`-style prefixes.
pub fn lookup(name: &str) -> Option<&'static str> {
    glyph(&normalize(name))
}

fn normalize(name: &str) -> String {
    let last = name.rsplit('/').next().unwrap_or(name);
    last.trim()
        .to_ascii_lowercase()
        .replace([' ', '-', '_'], "")
}

fn glyph(key: &str) -> Option<&'static str> {
    let path = match key {
        "check" | "checkmark" | "done" => "M9 16.17 4.83 12l-1.42 1.41L9 19 21 7l-1.41-1.41z",
        "close" | "x" | "cross" => {
            "M19 6.41 17.59 5 12 10.59 6.41 5 5 6.41 10.59 12 5 17.59 6.41 19 12 13.41 17.59 19 19 17.59 13.41 12z"
        }
        "menu" | "hamburger" => "M3 18h18v-2H3v2zm0-5h18v-2H3v2zm0-7v2h18V6H3z",
        "search" | "magnifier" => {
            "M15.5 14h-.79l-.28-.27C15.41 12.59 16 11.11 16 9.5 16 5.91 13.09 3 9.5 3S3 5.91 3 9.5 5.91 16 9.5 16c1.61 0 3.09-.59 4.23-1.57l.27.28v.79l5 4.99L20.49 19l-4.99-5zm-6 0C7.01 14 5 11.99 5 9.5S7.01 5 9.5 5 14 7.01 14 9.5 11.99 14 9.5 14z"
        }
        "plus" | "add" => "M19 13h-6v6h-2v-6H5v-2h6V5h2v6h6v2z",
        "minus" | "remove" => "M19 13H5v-2h14v2z",
        "arrowright" | "arrowforward" => {
            "M12 4l-1.41 1.41L16.17 11H4v2h12.17l-5.58 5.59L12 20l8-8z"
        }
        "arrowleft" | "arrowback" => {
            "M20 11H7.83l5.59-5.59L12 4l-8 8 8 8 1.41-1.41L7.83 13H20v-2z"
        }
        "chevrondown" | "expandmore" | "caretdown" => "M16.59 8.59 12 13.17 7.41 8.59 6 10l6 6 6-6z",
        "chevronup" | "expandless" | "caretup" => "M12 8l-6 6 1.41 1.41L12 10.83l4.59 4.58L18 14z",
        "chevronright" | "caretright" => "M10 6 8.59 7.41 13.17 12l-4.58 4.59L10 18l6-6z",
        "chevronleft" | "caretleft" => "M15.41 7.41 14 6l-6 6 6 6 1.41-1.41L10.83 12z",
        "star" => {
            "M12 17.27 18.18 21l-1.64-7.03L22 9.24l-7.19-.61L12 2 9.19 8.63 2 9.24l5.46 4.73L5.82 21z"
        }
        "heart" | "favorite" => {
            "M12 21.35l-1.45-1.32C5.4 15.36 2 12.28 2 8.5 2 5.42 4.42 3 7.5 3c1.74 0 3.41.81 4.5 2.09C13.09 3.81 14.76 3 16.5 3 19.58 3 22 5.42 22 8.5c0 3.78-3.4 6.86-8.55 11.54L12 21.35z"
        }
        _ => return None,
    };
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_up_exact_names() {
        assert!(lookup("check").is_some());
        assert!(lookup("unknown-glyph").is_none());
    }

    #[test]
    fn normalizes_prefixes_and_separators() {
        assert_eq!(lookup("Icon/Arrow Right"), lookup("arrow-right"));
        assert!(lookup("Icon/Arrow Right").is_some());
        assert_eq!(lookup("expand_more"), lookup("chevron-down"));
    }
}
