//! Banner composition: fit → layout → render → PNG.
//!
//! `compose` is synchronous and CPU-bound. Callers on the async runtime run it
//! inside `tokio::task::spawn_blocking`. The composer itself is read-only and
//! shared across requests; every call allocates its own surface.

use bytes::Bytes;
use tracing::debug;

use crate::banner::error::BannerError;
use crate::banner::request::BannerRequest;
use crate::fonts::FontSet;
use crate::layout::{
    Layout, LayoutConfig, LayoutEngine, OptionsBlock, TextBlock, TextFitter, LINE_HEIGHT_RATIO,
};
use crate::render::raster::{encode_png, new_surface};
use crate::render::Renderer;

/// The finished banner. Its PNG decodes to exactly `width` × `height`.
#[derive(Debug, Clone)]
pub struct RenderedBanner {
    pub width: u32,
    pub height: u32,
    pub png: Bytes,
}

/// Fitted blocks and their placement, before any pixel is drawn.
#[derive(Debug, Clone)]
pub struct BannerPlan {
    pub main: TextBlock,
    pub options: OptionsBlock,
    pub layout: Layout,
}

pub struct BannerComposer {
    fonts: FontSet,
    config: LayoutConfig,
}

impl BannerComposer {
    pub fn new(fonts: FontSet, config: LayoutConfig) -> Self {
        Self { fonts, config }
    }

    /// Renders `request` to PNG bytes. Fails before drawing anything if the
    /// request is invalid or the layout cannot be computed.
    pub fn compose(&self, request: &BannerRequest) -> Result<RenderedBanner, BannerError> {
        let plan = self.plan(request)?;

        let mut canvas = new_surface(request.width, request.height)?;
        Renderer::new(&self.fonts, &self.config).render(
            &mut canvas,
            request,
            &plan.main,
            &plan.options,
            &plan.layout,
        )?;
        let png = encode_png(&canvas)?;

        debug!(
            width = request.width,
            height = request.height,
            main_lines = plan.main.lines.len(),
            main_font = plan.main.font_size_px,
            option_font = plan.options.font_size_px,
            bytes = png.len(),
            "Banner composed"
        );

        Ok(RenderedBanner {
            width: request.width,
            height: request.height,
            png: Bytes::from(png),
        })
    }

    /// Fits every text block and places it.
    pub fn plan(&self, request: &BannerRequest) -> Result<BannerPlan, BannerError> {
        request.validate()?;

        let engine = LayoutEngine::new(&self.config, &self.fonts);
        let options = visible_options(&request.options);
        let (max_width, max_height) = engine.main_text_bounds(request, !options.is_empty());
        let main = TextFitter::new(self.fonts.main.as_ref()).fit(
            &request.main_text,
            max_width,
            max_height,
            self.config.main_initial_font_px,
        );
        let options = self.size_options(&engine, request, &main, options);
        let layout = engine.layout(request, &main, &options)?;

        Ok(BannerPlan {
            main,
            options,
            layout,
        })
    }

    /// One font size for all options: the largest size at which every option
    /// fits the text width on one line and the list fits under the main text.
    fn size_options(
        &self,
        engine: &LayoutEngine,
        request: &BannerRequest,
        main: &TextBlock,
        options: Vec<String>,
    ) -> OptionsBlock {
        let initial = self.config.option_initial_font_px;
        if options.is_empty() {
            return OptionsBlock {
                options,
                font_size_px: initial,
            };
        }

        let budget = engine.options_budget(request, main).max(0.0);
        let per_option = budget / options.len() as f32;
        // per-option pitch is spacing × size; the fitter checks 1.2 × size
        let line_budget = per_option / self.config.option_spacing * LINE_HEIGHT_RATIO;
        let max_width = engine.max_text_width(request);

        let fitter = TextFitter::new(self.fonts.options.as_ref());
        let font_size_px = options
            .iter()
            .map(|o| fitter.fit_line(o, max_width, line_budget, initial).font_size_px)
            .min()
            .unwrap_or(initial);

        OptionsBlock {
            options,
            font_size_px,
        }
    }
}

/// Trimmed options with blanks dropped, in caller order.
fn visible_options(options: &[String]) -> Vec<String> {
    options
        .iter()
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
