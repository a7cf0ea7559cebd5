//! Colors used by the history, choice and detail panes.

use ratatui::style::{Color, Modifier, Style};

use crate::config::ThemeConfig;

pub const TEXT_MUTED: Color = Color::DarkGray;
pub const ACCENT_PRIMARY: Color = Color::Cyan;
pub const SELECTED_BG: Color = Color::Rgb(40, 44, 52);
pub const ERROR: Color = Color::LightRed;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub changed: Color,
    pub removed: Color,
    pub similar: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            changed: Color::Green,
            removed: Color::Red,
            similar: Color::Reset,
        }
    }
}

impl Theme {
    /// Resolve configured color names; unknown names keep the default
    pub fn from_config(config: &ThemeConfig) -> Self {
        let defaults = Self::default();
        Self {
            changed: resolve(&config.changed, defaults.changed),
            removed: resolve(&config.removed, defaults.removed),
            similar: resolve(&config.similar, defaults.similar),
        }
    }

    pub fn changed_style(&self) -> Style {
        Style::default()
            .fg(self.changed)
            .add_modifier(Modifier::BOLD)
    }

    pub fn removed_style(&self) -> Style {
        Style::default()
            .fg(self.removed)
            .add_modifier(Modifier::CROSSED_OUT)
    }

    pub fn similar_style(&self) -> Style {
        Style::default().fg(self.similar)
    }
}

fn resolve(name: &str, fallback: Color) -> Color {
    parse_color(name).unwrap_or_else(|| {
        tracing::warn!(color = %name, "Unknown theme color, using default");
        fallback
    })
}

/// Parse a named color or a `#RGB`/`#RRGGBB` hex string
pub fn parse_color(name: &str) -> Option<Color> {
    let name = name.trim();
    if name.starts_with('#') {
        return parse_hex_color(name);
    }
    let color = match name.to_ascii_lowercase().as_str() {
        "reset" | "default" => Color::Reset,
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "gray" | "grey" => Color::Gray,
        "darkgray" | "dark-gray" | "darkgrey" => Color::DarkGray,
        "white" => Color::White,
        _ => return None,
    };
    Some(color)
}

fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }

    match hex.len() {
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
            Some(Color::Rgb(r, g, b))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}
