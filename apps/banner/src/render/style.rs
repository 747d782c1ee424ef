//! Colors and per-draw-call text styles.
//!
//! A `TextStyle` is handed to every text draw call. Nothing about the style
//! survives the call, so one layer's stroke or shadow cannot leak into the next.

use std::str::FromStr;

use thiserror::Error;

/// 8-bit straight-alpha color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::opaque(0, 0, 0);
    pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a recognized color")]
pub struct ParseColorError(String);

impl FromStr for Rgba {
    type Err = ParseColorError;

    /// Accepts `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa` and a small set of CSS
    /// color keywords.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let err = || ParseColorError(raw.to_string());

        if let Some(hex) = raw.strip_prefix('#') {
            if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(err());
            }
            let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).map(|v| v * 17);
            let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
            return match hex.len() {
                3 => Ok(Rgba::opaque(
                    nibble(0).map_err(|_| err())?,
                    nibble(1).map_err(|_| err())?,
                    nibble(2).map_err(|_| err())?,
                )),
                4 => Ok(Rgba::new(
                    nibble(0).map_err(|_| err())?,
                    nibble(1).map_err(|_| err())?,
                    nibble(2).map_err(|_| err())?,
                    nibble(3).map_err(|_| err())?,
                )),
                6 => Ok(Rgba::opaque(
                    byte(0).map_err(|_| err())?,
                    byte(2).map_err(|_| err())?,
                    byte(4).map_err(|_| err())?,
                )),
                8 => Ok(Rgba::new(
                    byte(0).map_err(|_| err())?,
                    byte(2).map_err(|_| err())?,
                    byte(4).map_err(|_| err())?,
                    byte(6).map_err(|_| err())?,
                )),
                _ => Err(err()),
            };
        }

        match raw.to_ascii_lowercase().as_str() {
            "black" => Ok(Rgba::BLACK),
            "white" => Ok(Rgba::WHITE),
            "red" => Ok(Rgba::opaque(255, 0, 0)),
            "green" => Ok(Rgba::opaque(0, 128, 0)),
            "blue" => Ok(Rgba::opaque(0, 0, 255)),
            "yellow" => Ok(Rgba::opaque(255, 255, 0)),
            "orange" => Ok(Rgba::opaque(255, 165, 0)),
            "purple" => Ok(Rgba::opaque(128, 0, 128)),
            "gray" | "grey" => Ok(Rgba::opaque(128, 128, 128)),
            "transparent" => Ok(Rgba::TRANSPARENT),
            _ => Err(err()),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Text styles
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Rgba,
    pub width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowStyle {
    pub color: Rgba,
    pub offset_x: f32,
    pub offset_y: f32,
    /// Gaussian sigma in pixels.
    pub blur: f32,
}

impl ShadowStyle {
    /// Soft drop shadow under the headline.
    pub const SOFT: ShadowStyle = ShadowStyle {
        color: Rgba::new(0, 0, 0, 128),
        offset_x: 4.0,
        offset_y: 4.0,
        blur: 4.0,
    };
}

/// Everything one text draw call needs to know about appearance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub fill: Rgba,
    pub stroke: Option<StrokeStyle>,
    pub shadow: Option<ShadowStyle>,
}

impl TextStyle {
    pub fn plain(fill: Rgba) -> Self {
        Self {
            fill,
            stroke: None,
            shadow: None,
        }
    }

    /// Adds an outline pass; a zero width means no outline.
    pub fn with_stroke(mut self, color: Rgba, width: f32) -> Self {
        self.stroke = (width > 0.0).then_some(StrokeStyle { color, width });
        self
    }

    pub fn with_shadow(mut self, shadow: ShadowStyle) -> Self {
        self.shadow = Some(shadow);
        self
    }
}
