use ratatui::style::Color;

use crate::model::UiConfig;

/// Parsed color theme shared by the renderers and the TUI chrome
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub green: Color,
    pub border: Color,
    pub selection_bg: Color,
    /// Foreground used on top of category badges
    pub badge_text: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x0C, 0x00, 0x1B),
            text: Color::Rgb(0xB0, 0xAA, 0xFF),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xFB, 0x41, 0x96),
            dim: Color::Rgb(0x7D, 0x78, 0xBF),
            red: Color::Rgb(0xFF, 0x44, 0x44),
            green: Color::Rgb(0x44, 0xFF, 0x88),
            border: Color::Rgb(0x44, 0x3D, 0x6B),
            selection_bg: Color::Rgb(0x3D, 0x14, 0x38),
            badge_text: Color::Rgb(0xFF, 0xFF, 0xFF),
        }
    }
}

/// Parse a hex color like "#FF4444" into an RGB Color. An eight-digit
/// "#RRGGBBAA" form is accepted and its alpha ignored.
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 && hex.len() != 8 {
        return None;
    }
    if !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    if hex.len() == 8 {
        u8::from_str_radix(&hex[6..8], 16).ok()?;
    }
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Create a theme from UI config, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                tracing::warn!(key = %key, value = %value, "ignoring invalid theme color");
                continue;
            };
            match key.as_str() {
                "background" => theme.background = color,
                "text" => theme.text = color,
                "text_bright" => theme.text_bright = color,
                "highlight" => theme.highlight = color,
                "dim" => theme.dim = color,
                "red" => theme.red = color,
                "green" => theme.green = color,
                "border" => theme.border = color,
                "selection_bg" => theme.selection_bg = color,
                "badge_text" => theme.badge_text = color,
                _ => tracing::warn!(key = %key, "unknown theme color"),
            }
        }

        theme
    }

    /// Background for a category badge, falling back to dim
    pub fn badge_color(&self, color: &str) -> Color {
        parse_hex_color(color).unwrap_or(self.dim)
    }
}
