use ratatui::style::Color;

use unveil_core::config::{ThemeColorOverrides, ThemeConfig};

/// Runtime theme with configurable colors
#[derive(Debug, Clone)]
pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    /// Body copy and hints
    pub muted: Color,
    /// Section tags, hero title, marquee
    pub accent: Color,
    /// Intro overlay backdrop
    pub overlay: Color,
    pub status_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            bg: Color::Rgb(0x0a, 0x0a, 0x0a),
            fg: Color::Rgb(0xf2, 0xf2, 0xf2),
            muted: Color::Rgb(0x8a, 0x8a, 0x8a),
            accent: Color::Rgb(0x00, 0xff, 0xb3),
            overlay: Color::Rgb(0x00, 0x00, 0x00),
            status_bg: Color::Rgb(0x1c, 0x1c, 0x1c),
        }
    }

    pub fn light() -> Self {
        Self {
            bg: Color::Rgb(0xfa, 0xfa, 0xf7),
            fg: Color::Rgb(0x1a, 0x1a, 0x1a),
            muted: Color::Rgb(0x6b, 0x6b, 0x6b),
            accent: Color::Rgb(0x00, 0x99, 0x6b),
            overlay: Color::Rgb(0xff, 0xff, 0xff),
            status_bg: Color::Rgb(0xe6, 0xe6, 0xe0),
        }
    }

    /// `fg` faded towards the background by `opacity` (0 = invisible)
    pub fn fade(&self, fg: Color, opacity: f64) -> Color {
        blend(self.bg, fg, opacity)
    }
}

/// Linear blend of two RGB colors; non-RGB colors snap at the midpoint
pub fn blend(from: Color, to: Color, t: f64) -> Color {
    let t = t.clamp(0.0, 1.0);
    match (from, to) {
        (Color::Rgb(r1, g1, b1), Color::Rgb(r2, g2, b2)) => {
            let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
            Color::Rgb(mix(r1, r2), mix(g1, g2), mix(b1, b2))
        }
        _ if t < 0.5 => from,
        _ => to,
    }
}

pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.trim().trim_start_matches('#');

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

pub fn load_theme(config: &ThemeConfig) -> Theme {
    let base = match config.name.to_lowercase().as_str() {
        "light" => Theme::light(),
        "dark" => Theme::dark(),
        other => {
            tracing::warn!("Unknown theme '{}', using dark", other);
            Theme::dark()
        }
    };

    apply_overrides(base, &config.colors)
}

fn apply_overrides(mut theme: Theme, overrides: &ThemeColorOverrides) -> Theme {
    let slots: [(&Option<String>, &mut Color); 5] = [
        (&overrides.bg, &mut theme.bg),
        (&overrides.fg, &mut theme.fg),
        (&overrides.muted, &mut theme.muted),
        (&overrides.accent, &mut theme.accent),
        (&overrides.overlay, &mut theme.overlay),
    ];

    for (hex, slot) in slots {
        if let Some(hex) = hex {
            match parse_hex_color(hex) {
                Some(color) => *slot = color,
                None => tracing::warn!("Ignoring invalid theme color '{}'", hex),
            }
        }
    }

    theme
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#00ffb3"), Some(Color::Rgb(0x00, 0xff, 0xb3)));
        assert_eq!(parse_hex_color("fff"), Some(Color::Rgb(0xff, 0xff, 0xff)));
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("zzzzzz"), None);
    }

    #[test]
    fn test_blend() {
        let black = Color::Rgb(0, 0, 0);
        let white = Color::Rgb(255, 255, 255);
        assert_eq!(blend(black, white, 0.0), black);
        assert_eq!(blend(black, white, 1.0), white);
        assert_eq!(blend(black, white, 0.5), Color::Rgb(128, 128, 128));
        assert_eq!(blend(black, white, 7.0), white);
    }

    #[test]
    fn test_overrides() {
        let config = ThemeConfig {
            name: "light".to_string(),
            colors: ThemeColorOverrides {
                accent: Some("#ff0000".to_string()),
                bg: Some("nope".to_string()),
                ..Default::default()
            },
        };
        let theme = load_theme(&config);
        assert_eq!(theme.accent, Color::Rgb(0xff, 0, 0));
        assert_eq!(theme.bg, Theme::light().bg);
    }
}
