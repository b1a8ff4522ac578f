use std::fs;

use ratatui::style::Color;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};

use crate::preferences::ColorScheme;

#[derive(Embed)]
#[folder = "assets/themes/"]
struct ThemeAssets;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub text_muted: String,
    pub accent: String,
    pub accent_dim: String,
    pub border: String,
    pub border_focused: String,
    pub header_bg: String,
    pub header_fg: String,
    pub bar_filled: String,
    pub bar_empty: String,
    pub sidebar_bg: String,
    pub overlay: String,
    pub completed: String,
    pub warning: String,
    pub error: String,
}

impl Theme {
    pub fn load(name: &str) -> Option<Self> {
        // Try user themes dir
        if let Some(config_dir) = dirs::config_dir() {
            let user_theme_path = config_dir.join("rimba").join("themes").join(format!("{name}.toml"));
            if let Ok(content) = fs::read_to_string(&user_theme_path) {
                if let Ok(theme) = toml::from_str::<Theme>(&content) {
                    return Some(theme);
                }
            }
        }

        // Try bundled themes
        let filename = format!("{name}.toml");
        if let Some(file) = ThemeAssets::get(&filename) {
            if let Ok(content) = std::str::from_utf8(file.data.as_ref()) {
                if let Ok(theme) = toml::from_str::<Theme>(content) {
                    return Some(theme);
                }
            }
        }

        None
    }

    pub fn for_scheme(scheme: ColorScheme) -> Self {
        Self::load(scheme.theme_name()).unwrap_or_else(|| Self {
            name: scheme.theme_name().to_string(),
            colors: match scheme {
                ColorScheme::Dark => ThemeColors::default(),
                ColorScheme::Light => ThemeColors::light(),
            },
        })
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::for_scheme(ColorScheme::Dark)
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: "#14201a".to_string(),
            fg: "#dde8df".to_string(),
            text_muted: "#7f9687".to_string(),
            accent: "#7fc99a".to_string(),
            accent_dim: "#2f4a3a".to_string(),
            border: "#34493c".to_string(),
            border_focused: "#7fc99a".to_string(),
            header_bg: "#1d2e24".to_string(),
            header_fg: "#dde8df".to_string(),
            bar_filled: "#7fc99a".to_string(),
            bar_empty: "#24372c".to_string(),
            sidebar_bg: "#1a2a20".to_string(),
            overlay: "#000000".to_string(),
            completed: "#a6d189".to_string(),
            warning: "#e5c890".to_string(),
            error: "#e78284".to_string(),
        }
    }
}

impl ThemeColors {
    fn light() -> Self {
        Self {
            bg: "#f7f5ee".to_string(),
            fg: "#23302a".to_string(),
            text_muted: "#6b7a70".to_string(),
            accent: "#2e7d4f".to_string(),
            accent_dim: "#cfe3d5".to_string(),
            border: "#b9c7bd".to_string(),
            border_focused: "#2e7d4f".to_string(),
            header_bg: "#e4ede4".to_string(),
            header_fg: "#1c2a22".to_string(),
            bar_filled: "#2e7d4f".to_string(),
            bar_empty: "#dfe7e0".to_string(),
            sidebar_bg: "#eef3ec".to_string(),
            overlay: "#1c2a22".to_string(),
            completed: "#40a02b".to_string(),
            warning: "#b7791f".to_string(),
            error: "#c0392b".to_string(),
        }
    }

    fn parse_rgb(hex: &str) -> Option<(u8, u8, u8)> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 {
            return None;
        }
        match (
            u8::from_str_radix(&hex[0..2], 16),
            u8::from_str_radix(&hex[2..4], 16),
            u8::from_str_radix(&hex[4..6], 16),
        ) {
            (Ok(r), Ok(g), Ok(b)) => Some((r, g, b)),
            _ => None,
        }
    }

    pub fn parse_color(hex: &str) -> Color {
        Self::parse_rgb(hex)
            .map(|(r, g, b)| Color::Rgb(r, g, b))
            .unwrap_or(Color::White)
    }

    /// `base` seen through `overlay` at the given opacity. Non-RGB colours
    /// are left alone.
    pub fn mix(base: Color, overlay: Color, alpha: f32) -> Color {
        let alpha = alpha.clamp(0.0, 1.0);
        match (base, overlay) {
            (Color::Rgb(r1, g1, b1), Color::Rgb(r2, g2, b2)) => {
                let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * alpha).round() as u8;
                Color::Rgb(mix(r1, r2), mix(g1, g2), mix(b1, b2))
            }
            _ => base,
        }
    }

    pub fn bg(&self) -> Color { Self::parse_color(&self.bg) }
    pub fn fg(&self) -> Color { Self::parse_color(&self.fg) }
    pub fn text_muted(&self) -> Color { Self::parse_color(&self.text_muted) }
    pub fn accent(&self) -> Color { Self::parse_color(&self.accent) }
    pub fn accent_dim(&self) -> Color { Self::parse_color(&self.accent_dim) }
    pub fn border(&self) -> Color { Self::parse_color(&self.border) }
    pub fn border_focused(&self) -> Color { Self::parse_color(&self.border_focused) }
    pub fn header_bg(&self) -> Color { Self::parse_color(&self.header_bg) }
    pub fn header_fg(&self) -> Color { Self::parse_color(&self.header_fg) }
    pub fn bar_filled(&self) -> Color { Self::parse_color(&self.bar_filled) }
    pub fn bar_empty(&self) -> Color { Self::parse_color(&self.bar_empty) }
    pub fn sidebar_bg(&self) -> Color { Self::parse_color(&self.sidebar_bg) }
    pub fn completed(&self) -> Color { Self::parse_color(&self.completed) }
    pub fn warning(&self) -> Color { Self::parse_color(&self.warning) }
    pub fn error(&self) -> Color { Self::parse_color(&self.error) }
    pub fn overlay(&self) -> Color { Self::parse_color(&self.overlay) }
}
