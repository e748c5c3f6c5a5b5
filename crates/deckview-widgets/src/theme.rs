//! Default colors and color-name parsing for overview skins
//!
//! Skin files name colors as hex strings ("#RRGGBB", "#AARRGGBB") or as
//! a handful of common color names. A color that cannot be parsed never
//! fails the skin: the caller's default is used and a warning is logged.

use iced::Color;

/// Overview background when the skin names none
pub const DEFAULT_BACKGROUND: Color = Color::from_rgb(0.1, 0.1, 0.12);

/// End-of-track warning border (200, 25, 20)
pub const DEFAULT_END_OF_TRACK: Color = Color::from_rgb(200.0 / 255.0, 25.0 / 255.0, 20.0 / 255.0);

pub const DEFAULT_AXES: Color = Color::from_rgb(0.5, 0.5, 0.5);
pub const DEFAULT_PLAY_POSITION: Color = Color::WHITE;
pub const DEFAULT_LOW: Color = Color::from_rgb(0.8, 0.2, 0.2);
pub const DEFAULT_MID: Color = Color::from_rgb(0.2, 0.8, 0.4);
pub const DEFAULT_HIGH: Color = Color::from_rgb(0.2, 0.5, 1.0);

/// Played part of the waveform is not tinted unless the skin asks for it
pub const DEFAULT_PLAYED_OVERLAY: Color = Color::TRANSPARENT;

/// Mark range defaults (loop: green while enabled, gray while disabled)
pub const DEFAULT_RANGE_ACTIVE: Color = Color::from_rgb(0.0, 0.8, 0.0);
pub const DEFAULT_RANGE_DISABLED: Color = Color::from_rgb(0.5, 0.5, 0.5);

/// Named colors accepted in skin files
const NAMED_COLORS: [(&str, Color); 14] = [
    ("black", Color::BLACK),
    ("white", Color::WHITE),
    ("transparent", Color::TRANSPARENT),
    ("red", Color::from_rgb(1.0, 0.0, 0.0)),
    ("green", Color::from_rgb(0.0, 128.0 / 255.0, 0.0)),
    ("lime", Color::from_rgb(0.0, 1.0, 0.0)),
    ("blue", Color::from_rgb(0.0, 0.0, 1.0)),
    ("yellow", Color::from_rgb(1.0, 1.0, 0.0)),
    ("cyan", Color::from_rgb(0.0, 1.0, 1.0)),
    ("magenta", Color::from_rgb(1.0, 0.0, 1.0)),
    ("orange", Color::from_rgb(1.0, 165.0 / 255.0, 0.0)),
    ("gray", Color::from_rgb(128.0 / 255.0, 128.0 / 255.0, 128.0 / 255.0)),
    ("grey", Color::from_rgb(128.0 / 255.0, 128.0 / 255.0, 128.0 / 255.0)),
    ("purple", Color::from_rgb(128.0 / 255.0, 0.0, 128.0 / 255.0)),
];

/// Parse a skin color string
///
/// Supports "#RRGGBB", "#AARRGGBB" (alpha first) and the names in
/// `NAMED_COLORS` (case-insensitive).
pub fn parse_color(text: &str) -> Option<Color> {
    let text = text.trim();
    if let Some(hex) = text.strip_prefix('#') {
        return parse_hex(hex);
    }
    let lower = text.to_ascii_lowercase();
    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, color)| *color)
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        6 => Some(Color::from_rgb8(byte(0)?, byte(2)?, byte(4)?)),
        8 => {
            let alpha = byte(0)? as f32 / 255.0;
            Some(Color::from_rgba8(byte(2)?, byte(4)?, byte(6)?, alpha))
        }
        _ => None,
    }
}

/// Parse an optional skin color, falling back to `default`
pub fn color_or(text: Option<&str>, default: Color) -> Color {
    match text {
        None => default,
        Some(text) => parse_color(text).unwrap_or_else(|| {
            log::warn!("Invalid skin color '{}', using default", text);
            default
        }),
    }
}

/// Convert a cue color into an iced color
pub fn rgb_to_color(rgb: deckview_core::RgbColor) -> Color {
    Color::from_rgb8(rgb.red(), rgb.green(), rgb.blue())
}

/// Black or white, whichever reads better on top of `color`
pub fn contrast_color(color: Color) -> Color {
    let luma = 0.299 * color.r + 0.587 * color.g + 0.114 * color.b;
    if luma > 0.5 {
        Color::BLACK
    } else {
        Color::WHITE
    }
}

/// Same color with a different alpha
pub fn with_alpha(color: Color, alpha: f32) -> Color {
    Color { a: alpha, ..color }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_rgb() {
        let color = parse_color("#FF0000").unwrap();
        assert_eq!(color.r, 1.0);
        assert_eq!(color.g, 0.0);
        assert_eq!(color.b, 0.0);
        assert_eq!(color.a, 1.0);
    }

    #[test]
    fn test_parse_hex_argb() {
        let color = parse_color("#8000FF00").unwrap();
        assert_eq!(color.g, 1.0);
        assert!((color.a - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_parse_named_color_case_insensitive() {
        assert_eq!(parse_color("White"), Some(Color::WHITE));
        assert_eq!(parse_color(" black "), Some(Color::BLACK));
    }

    #[test]
    fn test_malformed_colors_rejected() {
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("#GGHHII"), None);
        assert_eq!(parse_color("notacolor"), None);
        assert_eq!(parse_color(""), None);
    }

    #[test]
    fn test_color_or_falls_back() {
        assert_eq!(color_or(None, Color::WHITE), Color::WHITE);
        assert_eq!(color_or(Some("bogus"), Color::WHITE), Color::WHITE);
        assert_eq!(color_or(Some("#000000"), Color::WHITE), Color::BLACK);
    }

    #[test]
    fn test_contrast_color() {
        assert_eq!(contrast_color(Color::WHITE), Color::BLACK);
        assert_eq!(contrast_color(Color::BLACK), Color::WHITE);
    }
}
