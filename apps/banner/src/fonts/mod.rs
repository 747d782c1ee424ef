// Font registration and glyph metrics.
// Families are registered once at startup; rendering only ever reads them.

pub mod font_metrics;
pub mod outline;

use std::collections::HashMap;
use std::sync::Arc;

use tiny_skia::Path;

use crate::banner::error::BannerError;

pub use font_metrics::MetricTableFont;
pub use outline::OutlineFont;

// ────────────────────────────────────────────────────────────────────────────
// Glyph provider seam
// ────────────────────────────────────────────────────────────────────────────

/// Measures and outlines text for one registered font family.
///
/// Sizes are in pixels. Outlines are returned in canvas coordinates (y grows
/// downward) so they can be filled or stroked directly onto the surface.
pub trait GlyphProvider: Send + Sync {
    fn family(&self) -> &str;

    /// Advance width of `text` rendered at `size_px`.
    fn measure(&self, text: &str, size_px: f32) -> f32;

    /// Outline of `text` with the left end of its baseline at `(x, baseline_y)`.
    /// Returns `None` when the text has no visible glyphs (e.g. only spaces).
    fn outline(&self, text: &str, size_px: f32, x: f32, baseline_y: f32) -> Option<Path>;

    /// `(ascent, descent)` at `size_px`, both measured downward from the em top
    /// convention used by OpenType: ascent is positive, descent is negative.
    fn vertical_metrics(&self, size_px: f32) -> (f32, f32);

    /// Baseline y that places the em box's vertical middle at `middle_y`.
    fn middle_baseline(&self, size_px: f32, middle_y: f32) -> f32 {
        let (ascent, descent) = self.vertical_metrics(size_px);
        middle_y + (ascent + descent) / 2.0
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Registry
// ────────────────────────────────────────────────────────────────────────────

/// Process-wide table of font families, keyed by lowercase family name.
#[derive(Clone, Default)]
pub struct FontRegistry {
    families: HashMap<String, Arc<dyn GlyphProvider>>,
}

impl FontRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a provider under its own family name. A later registration
    /// of the same family replaces the earlier one.
    pub fn register(&mut self, provider: Arc<dyn GlyphProvider>) {
        let key = provider.family().to_lowercase();
        self.families.insert(key, provider);
    }

    pub fn get(&self, family: &str) -> Result<Arc<dyn GlyphProvider>, BannerError> {
        self.families
            .get(&family.to_lowercase())
            .cloned()
            .ok_or_else(|| BannerError::FontNotRegistered(family.to_string()))
    }

    /// Registered family names, sorted.
    pub fn families(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.families.values().map(|p| p.family()).collect();
        names.sort_unstable();
        names
    }
}

/// The providers a banner draws with, one per text role.
#[derive(Clone)]
pub struct FontSet {
    pub main: Arc<dyn GlyphProvider>,
    pub heading: Arc<dyn GlyphProvider>,
    pub options: Arc<dyn GlyphProvider>,
}

impl FontSet {
    /// Uses a single family for every role.
    #[cfg(test)]
    pub fn uniform(provider: Arc<dyn GlyphProvider>) -> Self {
        Self {
            main: provider.clone(),
            heading: provider.clone(),
            options: provider,
        }
    }

    pub fn from_registry(
        registry: &FontRegistry,
        main: &str,
        heading: &str,
        options: &str,
    ) -> Result<Self, BannerError> {
        Ok(Self {
            main: registry.get(main)?,
            heading: registry.get(heading)?,
            options: registry.get(options)?,
        })
    }
}
