//! Theme colors, with optional overrides from the `[theme]` config table

use ratatui::style::Color;

use crate::config::ThemeColors;

/// Theme colors for the UI
#[derive(Debug, Clone)]
pub struct Theme {
    pub accent: Color,       // Focused borders, key hints
    pub danger: Color,       // Invalid words, rejection
    pub success: Color,      // Accepted phrase, valid words
    pub warning: Color,      // Status messages
    pub text: Color,         // Primary text
    pub text_dim: Color,     // Placeholders, hints
    pub bg_selected: Color,  // Highlighted suggestion
    pub inactive: Color,     // Unfocused borders
    pub header: Color,       // Slot numbers, section titles
}

impl Default for Theme {
    fn default() -> Self {
        // Catppuccin-inspired
        Self {
            accent: Color::Rgb(250, 179, 135),
            danger: Color::Rgb(243, 139, 168),
            success: Color::Rgb(166, 218, 149),
            warning: Color::Rgb(249, 226, 175),
            text: Color::Rgb(205, 214, 244),
            text_dim: Color::Rgb(147, 153, 178),
            bg_selected: Color::Rgb(69, 71, 90),
            inactive: Color::Rgb(88, 91, 112),
            header: Color::Rgb(137, 180, 250),
        }
    }
}

impl Theme {
    /// Default theme with config overrides applied. Unparsable colors are
    /// logged and ignored.
    pub fn from_config(colors: &ThemeColors) -> Self {
        let mut theme = Self::default();

        let overrides = [
            (&colors.accent, &mut theme.accent, "accent"),
            (&colors.danger, &mut theme.danger, "danger"),
            (&colors.success, &mut theme.success, "success"),
            (&colors.text, &mut theme.text, "text"),
            (&colors.text_dim, &mut theme.text_dim, "text_dim"),
            (&colors.inactive, &mut theme.inactive, "inactive"),
        ];

        for (value, slot, name) in overrides {
            let Some(value) = value else { continue };
            match Self::parse_hex_color(value) {
                Some(color) => *slot = color,
                None => tracing::warn!("Ignoring invalid theme color {} = {:?}", name, value),
            }
        }

        theme
    }

    /// Parse a hex color string (#RRGGBB or #RGB)
    fn parse_hex_color(s: &str) -> Option<Color> {
        let s = s.trim().trim_start_matches('#');
        if !s.is_ascii() {
            return None;
        }

        match s.len() {
            6 => {
                let r = u8::from_str_radix(&s[0..2], 16).ok()?;
                let g = u8::from_str_radix(&s[2..4], 16).ok()?;
                let b = u8::from_str_radix(&s[4..6], 16).ok()?;
                Some(Color::Rgb(r, g, b))
            }
            3 => {
                let r = u8::from_str_radix(&s[0..1], 16).ok()? * 17;
                let g = u8::from_str_radix(&s[1..2], 16).ok()? * 17;
                let b = u8::from_str_radix(&s[2..3], 16).ok()? * 17;
                Some(Color::Rgb(r, g, b))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(Theme::parse_hex_color("#FFC107"), Some(Color::Rgb(255, 193, 7)));
        assert_eq!(Theme::parse_hex_color("fff"), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(Theme::parse_hex_color("#12345"), None);
        assert_eq!(Theme::parse_hex_color("#gggggg"), None);
    }

    #[test]
    fn test_overrides_apply_and_bad_values_are_ignored() {
        let colors = ThemeColors {
            accent: Some("#000000".to_string()),
            danger: Some("not-a-color".to_string()),
            ..Default::default()
        };
        let theme = Theme::from_config(&colors);

        assert_eq!(theme.accent, Color::Rgb(0, 0, 0));
        assert_eq!(theme.danger, Theme::default().danger);
    }
}
