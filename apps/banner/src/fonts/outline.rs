//! TrueType/OpenType glyph provider backed by `ttf-parser`.
//!
//! The face is parsed once at registration to validate the file; afterwards
//! each call re-borrows the face from the owned bytes, which is cheap (table
//! directory lookup only).

use std::sync::Arc;

use tiny_skia::{Path, PathBuilder};
use ttf_parser::{Face, GlyphId, OutlineBuilder};

use super::GlyphProvider;
use crate::banner::error::BannerError;

pub struct OutlineFont {
    family: String,
    data: Arc<Vec<u8>>,
    index: u32,
    units_per_em: f32,
    ascender: f32,
    descender: f32,
}

impl OutlineFont {
    /// Parses font bytes and registers them under `family`.
    pub fn from_bytes(family: impl Into<String>, data: Vec<u8>) -> Result<Self, BannerError> {
        let family = family.into();
        let face = Face::parse(&data, 0).map_err(|e| {
            BannerError::Decode(format!("font file for family '{family}' is invalid: {e}"))
        })?;
        let units_per_em = face.units_per_em() as f32;
        let ascender = face.ascender() as f32;
        let descender = face.descender() as f32;

        Ok(Self {
            family,
            data: Arc::new(data),
            index: 0,
            units_per_em,
            ascender,
            descender,
        })
    }

    fn face(&self) -> Option<Face<'_>> {
        Face::parse(&self.data, self.index).ok()
    }

    fn scale(&self, size_px: f32) -> f32 {
        size_px / self.units_per_em
    }
}

impl GlyphProvider for OutlineFont {
    fn family(&self) -> &str {
        &self.family
    }

    fn measure(&self, text: &str, size_px: f32) -> f32 {
        let Some(face) = self.face() else {
            return 0.0;
        };
        let units: f32 = text
            .chars()
            .map(|c| {
                let gid = face.glyph_index(c).unwrap_or(GlyphId(0));
                face.glyph_hor_advance(gid).unwrap_or(0) as f32
            })
            .sum();
        units * self.scale(size_px)
    }

    fn outline(&self, text: &str, size_px: f32, x: f32, baseline_y: f32) -> Option<Path> {
        let face = self.face()?;
        let scale = self.scale(size_px);
        let mut builder = GlyphPathBuilder::new(x, baseline_y, scale);

        for c in text.chars() {
            let gid = face.glyph_index(c).unwrap_or(GlyphId(0));
            // Outline-less glyphs (spaces) only advance the pen.
            face.outline_glyph(gid, &mut builder);
            let advance = face.glyph_hor_advance(gid).unwrap_or(0) as f32;
            builder.origin_x += advance * scale;
        }

        builder.finish()
    }

    fn vertical_metrics(&self, size_px: f32) -> (f32, f32) {
        let scale = self.scale(size_px);
        (self.ascender * scale, self.descender * scale)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Outline → tiny-skia path
// ────────────────────────────────────────────────────────────────────────────

/// Collects glyph outlines into one path, flipping font units (y up) into
/// canvas pixels (y down).
struct GlyphPathBuilder {
    builder: PathBuilder,
    origin_x: f32,
    origin_y: f32,
    scale: f32,
}

impl GlyphPathBuilder {
    fn new(origin_x: f32, origin_y: f32, scale: f32) -> Self {
        Self {
            builder: PathBuilder::new(),
            origin_x,
            origin_y,
            scale,
        }
    }

    fn finish(self) -> Option<Path> {
        self.builder.finish()
    }

    fn px(&self, x: f32) -> f32 {
        self.origin_x + x * self.scale
    }

    fn py(&self, y: f32) -> f32 {
        self.origin_y - y * self.scale
    }
}

impl OutlineBuilder for GlyphPathBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = (self.px(x), self.py(y));
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = (self.px(x), self.py(y));
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1, x, y) = (self.px(x1), self.py(y1), self.px(x), self.py(y));
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = (self.px(x1), self.py(y1));
        let (x2, y2) = (self.px(x2), self.py(y2));
        let (x, y) = (self.px(x), self.py(y));
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}
