use std::fs;

use ratatui::style::Color;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};

use crate::config::config_dir;
use crate::generator::arithmetic::Mode;

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
    pub muted: String,
    pub accent: String,
    pub border: String,
    pub header_bg: String,
    pub header_fg: String,
    pub score: String,
    pub success: String,
    pub error: String,
    pub error_bg: String,
    pub hint: String,
    pub addition: String,
    pub subtraction: String,
    pub multiplication: String,
    pub division: String,
    pub daily: String,
}

impl Theme {
    pub fn load(name: &str) -> Option<Self> {
        // User themes shadow bundled ones
        let user_theme_path = config_dir().join("themes").join(format!("{name}.toml"));
        if let Ok(content) = fs::read_to_string(&user_theme_path)
            && let Ok(theme) = toml::from_str::<Theme>(&content)
        {
            return Some(theme);
        }

        let filename = format!("{name}.toml");
        let file = ThemeAssets::get(&filename)?;
        let content = std::str::from_utf8(file.data.as_ref()).ok()?;
        toml::from_str::<Theme>(content).ok()
    }

    pub fn available_themes() -> Vec<String> {
        ThemeAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(|n| n.to_string()))
            .collect()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::load("savanna").unwrap_or_else(|| Self {
            name: "default".to_string(),
            colors: ThemeColors::default(),
        })
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: "#fefce8".to_string(),
            fg: "#1f2937".to_string(),
            muted: "#6b7280".to_string(),
            accent: "#1e40af".to_string(),
            border: "#fcd34d".to_string(),
            header_bg: "#fef3c7".to_string(),
            header_fg: "#15803d".to_string(),
            score: "#ca8a04".to_string(),
            success: "#16a34a".to_string(),
            error: "#dc2626".to_string(),
            error_bg: "#fee2e2".to_string(),
            hint: "#1e3a8a".to_string(),
            addition: "#22c55e".to_string(),
            subtraction: "#3b82f6".to_string(),
            multiplication: "#ef4444".to_string(),
            division: "#a855f7".to_string(),
            daily: "#eab308".to_string(),
        }
    }
}

impl ThemeColors {
    pub fn parse_color(hex: &str) -> Color {
        let hex = hex.trim_start_matches('#');
        if hex.len() == 6
            && let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            )
        {
            return Color::Rgb(r, g, b);
        }
        Color::White
    }

    pub fn bg(&self) -> Color { Self::parse_color(&self.bg) }
    pub fn fg(&self) -> Color { Self::parse_color(&self.fg) }
    pub fn muted(&self) -> Color { Self::parse_color(&self.muted) }
    pub fn accent(&self) -> Color { Self::parse_color(&self.accent) }
    pub fn border(&self) -> Color { Self::parse_color(&self.border) }
    pub fn header_bg(&self) -> Color { Self::parse_color(&self.header_bg) }
    pub fn header_fg(&self) -> Color { Self::parse_color(&self.header_fg) }
    pub fn score(&self) -> Color { Self::parse_color(&self.score) }
    pub fn success(&self) -> Color { Self::parse_color(&self.success) }
    pub fn error(&self) -> Color { Self::parse_color(&self.error) }
    pub fn error_bg(&self) -> Color { Self::parse_color(&self.error_bg) }
    pub fn hint(&self) -> Color { Self::parse_color(&self.hint) }
    pub fn daily(&self) -> Color { Self::parse_color(&self.daily) }

    pub fn mode(&self, mode: Mode) -> Color {
        match mode {
            Mode::Addition => Self::parse_color(&self.addition),
            Mode::Subtraction => Self::parse_color(&self.subtraction),
            Mode::Multiplication => Self::parse_color(&self.multiplication),
            Mode::Division => Self::parse_color(&self.division),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_themes_parse() {
        let names = Theme::available_themes();
        assert!(names.contains(&"savanna".to_string()));
        for name in names {
            assert!(Theme::load(&name).is_some(), "theme {name} failed to parse");
        }
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(ThemeColors::parse_color("#22c55e"), Color::Rgb(0x22, 0xc5, 0x5e));
        assert_eq!(ThemeColors::parse_color("nope"), Color::White);
    }

    #[test]
    fn test_unknown_theme_is_none() {
        assert!(Theme::load("does-not-exist").is_none());
    }
}
