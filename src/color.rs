//! Color math used by the theme synthesizer.
//!
//! Pure functions over packed RGB values: hex conversion, WCAG relative
//! luminance and contrast ratio, and the brightness/saturation scaling the
//! synthesizer leans on to force colors into legible ranges.

use crate::error::ThemeError;

/// Immutable RGB color value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` hex string. The leading `#` is optional; anything
    /// other than exactly six hex digits is rejected.
    pub fn from_hex(hex: &str) -> Result<Self, ThemeError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ThemeError::InvalidColorFormat(hex.to_string()));
        }
        let parse = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| ThemeError::InvalidColorFormat(hex.to_string()))
        };
        Ok(Self {
            r: parse(0..2)?,
            g: parse(2..4)?,
            b: parse(4..6)?,
        })
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// WCAG relative luminance: sRGB gamma expansion per channel, then the
    /// 0.2126/0.7152/0.0722 weighted sum. Range [0.0, 1.0].
    pub fn luminance(self) -> f64 {
        fn channel(c: u8) -> f64 {
            let c = c as f64 / 255.0;
            if c <= 0.03928 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        0.2126 * channel(self.r) + 0.7152 * channel(self.g) + 0.0722 * channel(self.b)
    }

    /// Multiply each channel by `factor`, clamped to [0, 255].
    pub fn scale_brightness(self, factor: f64) -> Self {
        let scale = |c: u8| ((c as f64 * factor).clamp(0.0, 255.0)) as u8;
        Self {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
        }
    }

    /// Blend each channel toward its luma gray. Factor 0.0 is fully gray,
    /// 1.0 is unchanged, above 1.0 oversaturates.
    pub fn scale_saturation(self, factor: f64) -> Self {
        let gray = 0.299 * self.r as f64 + 0.587 * self.g as f64 + 0.114 * self.b as f64;
        let blend = |c: u8| (gray + (c as f64 - gray) * factor).clamp(0.0, 255.0) as u8;
        Self {
            r: blend(self.r),
            g: blend(self.g),
            b: blend(self.b),
        }
    }
}

/// Contrast ratio `(L_lighter + 0.05) / (L_darker + 0.05)`. Symmetric in its
/// arguments; range [1.0, 21.0].
pub fn contrast_ratio(a: Rgb, b: Rgb) -> f64 {
    let (la, lb) = (a.luminance(), b.luminance());
    let lighter = la.max(lb);
    let darker = la.min(lb);
    (lighter + 0.05) / (darker + 0.05)
}

/// Rescale `fg` until it reaches `min_ratio` contrast against `bg`.
///
/// Against a light background the foreground is darkened (factor from 0.7
/// down to 0.1 in steps of 0.05); against a dark one it is brightened (1.3 up
/// to 3.0 in steps of 0.1). If the bound is hit first, the boundary-clamped
/// best effort is returned.
pub fn ensure_contrast(fg: Rgb, bg: Rgb, min_ratio: f64) -> Rgb {
    let mut ratio = contrast_ratio(fg, bg);
    if ratio >= min_ratio {
        return fg;
    }

    let (mut factor, step, limit) = if bg.luminance() > 0.5 {
        (0.7, -0.05, 0.1)
    } else {
        (1.3, 0.1, 3.0)
    };

    let mut adjusted = fg;
    while ratio < min_ratio {
        let in_bounds = if step < 0.0 { factor > limit } else { factor < limit };
        if !in_bounds {
            break;
        }
        adjusted = fg.scale_brightness(factor);
        ratio = contrast_ratio(adjusted, bg);
        factor += step;
    }

    adjusted
}
