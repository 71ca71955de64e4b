use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// `#rrggbb` form of a colour, for chart documents.
pub fn to_css(color: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}

// ---------------------------------------------------------------------------
// Series palette: column position → CSS colour
// ---------------------------------------------------------------------------

/// Assigns colours to series by position: the configured names first,
/// then generated hues once they run out.
#[derive(Debug, Clone)]
pub struct SeriesPalette {
    named: Vec<String>,
    generated: Vec<String>,
}

impl SeriesPalette {
    /// Palette able to colour `series_count` series without repeats.
    pub fn new(named: &[String], series_count: usize) -> Self {
        let overflow = series_count.saturating_sub(named.len());
        SeriesPalette {
            named: named.to_vec(),
            generated: generate_palette(overflow).into_iter().map(to_css).collect(),
        }
    }

    pub fn color_for(&self, position: usize) -> &str {
        if let Some(name) = self.named.get(position) {
            return name;
        }
        let rest = position - self.named.len();
        match self.generated.get(rest) {
            Some(c) => c,
            None => "gray",
        }
    }
}

// ---------------------------------------------------------------------------
// CSS colour parsing for the egui viewer
// ---------------------------------------------------------------------------

/// Parse a CSS colour: a named colour, `#rrggbb`, `rgb(..)` or `rgba(..)`.
pub fn parse_css(text: &str) -> Option<Color32> {
    let text = text.trim();
    if let Some(hex) = text.strip_prefix('#') {
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        return Some(Color32::from_rgb(channel(0)?, channel(2)?, channel(4)?));
    }
    if let Some(args) = text
        .strip_prefix("rgba(")
        .or_else(|| text.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        if parts.len() < 3 || parts.len() > 4 {
            return None;
        }
        let channel = |s: &str| s.parse::<u8>().ok();
        let alpha = match parts.get(3) {
            Some(a) => (a.parse::<f32>().ok()?.clamp(0.0, 1.0) * 255.0).round() as u8,
            None => 255,
        };
        return Some(Color32::from_rgba_unmultiplied(
            channel(parts[0])?,
            channel(parts[1])?,
            channel(parts[2])?,
            alpha,
        ));
    }
    let named: Srgb<u8> = palette::named::from_str(&text.to_ascii_lowercase())?;
    Some(Color32::from_rgb(named.red, named.green, named.blue))
}

/// Like [`parse_css`], falling back to gray for unknown colours.
pub fn css_color(text: &str) -> Color32 {
    parse_css(text).unwrap_or(Color32::GRAY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_named_hex_and_rgba() {
        assert_eq!(parse_css("red"), Some(Color32::from_rgb(255, 0, 0)));
        assert_eq!(parse_css("DarkGoldenrod"), Some(Color32::from_rgb(184, 134, 11)));
        assert_eq!(parse_css("#6495ed"), Some(Color32::from_rgb(100, 149, 237)));
        assert_eq!(
            parse_css("rgba(100, 149, 237, 0.9)"),
            Some(Color32::from_rgba_unmultiplied(100, 149, 237, 230))
        );
        assert_eq!(parse_css("no-such-colour"), None);
        assert_eq!(css_color("no-such-colour"), Color32::GRAY);
    }

    #[test]
    fn series_palette_extends_past_named_colours() {
        let named = vec!["black".to_string(), "blue".to_string()];
        let palette = SeriesPalette::new(&named, 4);
        assert_eq!(palette.color_for(1), "blue");
        let third = palette.color_for(2).to_string();
        assert!(third.starts_with('#'));
        assert_ne!(third, palette.color_for(3));
        assert_eq!(palette.color_for(10), "gray");
    }

    #[test]
    fn generated_palette_has_requested_length() {
        assert!(generate_palette(0).is_empty());
        assert_eq!(generate_palette(5).len(), 5);
    }
}
