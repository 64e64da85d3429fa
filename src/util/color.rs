//! CSS-style color strings as they appear in scene JSON.

use glam::Vec3;

use crate::error::SceneError;

/// Linear RGB color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
}

/// Named colors accepted in addition to hex notation.
const NAMED: &[(&str, [u8; 3])] = &[
    ("black", [0, 0, 0]),
    ("white", [255, 255, 255]),
    ("red", [255, 0, 0]),
    ("green", [0, 128, 0]),
    ("blue", [0, 0, 255]),
    ("yellow", [255, 255, 0]),
    ("cyan", [0, 255, 255]),
    ("magenta", [255, 0, 255]),
    ("gray", [128, 128, 128]),
    ("grey", [128, 128, 128]),
    ("orange", [255, 165, 0]),
];

impl Color {
    /// Pure black.
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
    /// Pure white.
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    /// Build a color from 8-bit channels.
    #[must_use]
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Parse `#rrggbb`, `#rgb` or one of a few CSS color names.
    pub fn parse(input: &str) -> Result<Self, SceneError> {
        let s = input.trim();
        let invalid = || SceneError::InvalidColor(input.to_owned());

        if let Some(hex) = s.strip_prefix('#') {
            let digits: Vec<u8> = hex
                .chars()
                .map(|c| c.to_digit(16).map(|d| d as u8))
                .collect::<Option<_>>()
                .ok_or_else(invalid)?;
            return match digits.as_slice() {
                [r, g, b] => Ok(Self::rgb8(r * 17, g * 17, b * 17)),
                [r1, r0, g1, g0, b1, b0] => Ok(Self::rgb8(
                    r1 * 16 + r0,
                    g1 * 16 + g0,
                    b1 * 16 + b0,
                )),
                _ => Err(invalid()),
            };
        }

        let lower = s.to_ascii_lowercase();
        NAMED
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, [r, g, b])| Self::rgb8(*r, *g, *b))
            .ok_or_else(invalid)
    }

    /// Parse an optional color, falling back to `default` when absent.
    pub fn parse_or(
        input: Option<&str>,
        default: &str,
    ) -> Result<Self, SceneError> {
        Self::parse(input.unwrap_or(default))
    }

    /// Channels as a vector, for shading math.
    #[must_use]
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.r, self.g, self.b)
    }

    /// Quantize to 8-bit RGBA.
    #[must_use]
    pub fn to_rgba8(self, alpha: f32) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(alpha)]
    }

    /// `#rrggbb` notation.
    #[must_use]
    pub fn to_hex(self) -> String {
        let [r, g, b, _] = self.to_rgba8(1.0);
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!(
            Color::parse("#52afb0").unwrap(),
            Color::rgb8(0x52, 0xaf, 0xb0)
        );
        assert_eq!(Color::parse("#fff").unwrap(), Color::WHITE);
        assert_eq!(Color::parse(" #000000 ").unwrap(), Color::BLACK);
    }

    #[test]
    fn parses_named_colors_case_insensitively() {
        assert_eq!(Color::parse("Red").unwrap(), Color::rgb8(255, 0, 0));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            Color::parse("#12345"),
            Err(SceneError::InvalidColor(_))
        ));
        assert!(Color::parse("#gggggg").is_err());
        assert!(Color::parse("chartreuse-ish").is_err());
    }

    #[test]
    fn hex_round_trip_is_stable() {
        let c = Color::parse("#2c3c54").unwrap();
        assert_eq!(c.to_hex(), "#2c3c54");
    }
}
