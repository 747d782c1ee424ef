//! Layout engine: places every banner block on the canvas.
//!
//! The canvas is split by fixed ratios, never by content: the top
//! `image_region_ratio` of the height is the image region, the rest is the
//! text region. Inside the text region the blocks stack top-down:
//!
//! ```text
//! main text     centered in the text region, lifted by main_offset_ratio
//! heading       main.bottom + heading_padding
//! underline     heading.bottom + underline_gap
//! options       underline.bottom + options_padding, widest first
//! ```
//!
//! Everything is centered on the canvas midline.

use tracing::warn;

use crate::banner::error::BannerError;
use crate::banner::request::BannerRequest;
use crate::fonts::{FontSet, GlyphProvider};
use crate::layout::text_fit::{line_height, TextBlock};

// ────────────────────────────────────────────────────────────────────────────
// Configuration
// ────────────────────────────────────────────────────────────────────────────

/// Every tunable ratio, padding and initial font size of the banner layout.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Fraction of canvas height given to the image region.
    pub image_region_ratio: f32,
    /// Overlay height as a fraction of canvas height, before `scale_factor`.
    pub overlay_height_ratio: f32,
    /// Usable text width as a fraction of canvas width.
    pub text_width_ratio: f32,
    /// Main text height budget (fraction of the text region) with options.
    pub main_band_ratio: f32,
    /// Main text height budget (fraction of the text region) without options.
    pub main_band_ratio_alone: f32,
    /// Upward shift of the main text (fraction of the text region) when
    /// options follow it.
    pub main_offset_ratio: f32,
    /// Space kept free under the last option (fraction of the text region).
    pub bottom_margin_ratio: f32,
    pub main_initial_font_px: u32,
    pub option_initial_font_px: u32,
    /// Vertical pitch of the options list as a multiple of their font size.
    pub option_spacing: f32,
    pub heading_text: String,
    pub heading_font_px: u32,
    pub heading_padding: f32,
    pub underline_gap: f32,
    pub underline_thickness: f32,
    pub options_padding: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            image_region_ratio: 0.67,
            overlay_height_ratio: 0.7,
            text_width_ratio: 0.8,
            main_band_ratio: 0.4,
            main_band_ratio_alone: 0.8,
            main_offset_ratio: 0.25,
            bottom_margin_ratio: 0.04,
            main_initial_font_px: 60,
            option_initial_font_px: 45,
            option_spacing: 1.5,
            heading_text: "Which one would you pick?".to_string(),
            heading_font_px: 28,
            heading_padding: 12.0,
            underline_gap: 4.0,
            underline_thickness: 2.0,
            options_padding: 10.0,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Output types
// ────────────────────────────────────────────────────────────────────────────

/// A positioned region of the canvas, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl LayoutBox {
    /// Builds a box, rejecting negative or non-finite geometry.
    pub fn new(name: &str, x: f32, y: f32, width: f32, height: f32) -> Result<Self, BannerError> {
        let finite = [x, y, width, height].iter().all(|v| v.is_finite());
        if !finite || width < 0.0 || height < 0.0 {
            return Err(BannerError::Layout(format!(
                "{name} box has invalid geometry x={x} y={y} w={width} h={height}"
            )));
        }
        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }

    /// A box of the given size horizontally centered on `center_x`.
    fn centered(
        name: &str,
        center_x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Result<Self, BannerError> {
        Self::new(name, center_x - width / 2.0, y, width, height)
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }
}

/// The option labels sized as one block: all options share one font size.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionsBlock {
    /// Caller order.
    pub options: Vec<String>,
    pub font_size_px: u32,
}

impl OptionsBlock {
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedOption {
    pub text: String,
    pub bounds: LayoutBox,
}

/// Block name → box. Optional blocks are absent when there is nothing to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub image_region: LayoutBox,
    pub text_region: LayoutBox,
    pub overlay: Option<LayoutBox>,
    pub main_text: LayoutBox,
    pub heading: Option<LayoutBox>,
    pub underline: Option<LayoutBox>,
    /// Display order: widest first.
    pub options: Vec<PlacedOption>,
}

// ────────────────────────────────────────────────────────────────────────────
// Engine
// ────────────────────────────────────────────────────────────────────────────

pub struct LayoutEngine<'a> {
    config: &'a LayoutConfig,
    fonts: &'a FontSet,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(config: &'a LayoutConfig, fonts: &'a FontSet) -> Self {
        Self { config, fonts }
    }

    /// `(top, height)` of the text region for a canvas of `height` px.
    pub fn text_region(&self, height: u32) -> (f32, f32) {
        let top = height as f32 * self.config.image_region_ratio;
        (top, height as f32 - top)
    }

    /// Width and height available to the main text block. `has_options`
    /// refers to the options that will actually be drawn, after blanks are
    /// dropped.
    pub fn main_text_bounds(&self, request: &BannerRequest, has_options: bool) -> (f32, f32) {
        let (_, text_height) = self.text_region(request.height);
        let ratio = if has_options {
            self.config.main_band_ratio
        } else {
            self.config.main_band_ratio_alone
        };
        (self.max_text_width(request), text_height * ratio)
    }

    pub fn max_text_width(&self, request: &BannerRequest) -> f32 {
        request.width as f32 * self.config.text_width_ratio
    }

    /// Vertical space left for a non-empty options list once `main` is placed.
    pub fn options_budget(&self, request: &BannerRequest, main: &TextBlock) -> f32 {
        let (text_top, text_height) = self.text_region(request.height);
        let bottom_limit = text_top + text_height * (1.0 - self.config.bottom_margin_ratio);
        let main_bottom = self.main_top(request, main, true) + main.height();
        bottom_limit - self.options_top(main_bottom)
    }

    fn main_top(&self, request: &BannerRequest, main: &TextBlock, has_options: bool) -> f32 {
        let (text_top, text_height) = self.text_region(request.height);
        let offset = if has_options {
            text_height * self.config.main_offset_ratio
        } else {
            0.0
        };
        text_top + text_height / 2.0 - offset - main.height() / 2.0
    }

    fn heading_height(&self) -> f32 {
        line_height(self.config.heading_font_px)
    }

    /// Top of the options list given the bottom of the main text block.
    fn options_top(&self, main_bottom: f32) -> f32 {
        main_bottom
            + self.config.heading_padding
            + self.heading_height()
            + self.config.underline_gap
            + self.config.underline_thickness
            + self.config.options_padding
    }

    /// Places every block for `request`.
    pub fn layout(
        &self,
        request: &BannerRequest,
        main: &TextBlock,
        options: &OptionsBlock,
    ) -> Result<Layout, BannerError> {
        let width = request.width as f32;
        let height = request.height as f32;
        let mid_x = width / 2.0;
        let (text_top, text_height) = self.text_region(request.height);

        let image_region = LayoutBox::new("image region", 0.0, 0.0, width, text_top)?;
        let text_region = LayoutBox::new("text region", 0.0, text_top, width, text_height)?;

        let overlay = match &request.overlay_image {
            Some(img) => Some(self.place_overlay(
                request,
                &image_region,
                img.width(),
                img.height(),
            )?),
            None => None,
        };

        let main_width = widest(self.fonts.main.as_ref(), &main.lines, main.font_size_px);
        let main_box = LayoutBox::centered(
            "main text",
            mid_x,
            self.main_top(request, main, !options.is_empty()),
            main_width,
            main.height(),
        )?;

        let mut heading = None;
        let mut underline = None;
        let mut placed = Vec::with_capacity(options.options.len());

        if !options.is_empty() {
            let heading_width = self
                .fonts
                .heading
                .measure(&self.config.heading_text, self.config.heading_font_px as f32);
            let heading_box = LayoutBox::centered(
                "heading",
                mid_x,
                main_box.bottom() + self.config.heading_padding,
                heading_width,
                self.heading_height(),
            )?;
            let underline_box = LayoutBox::centered(
                "underline",
                mid_x,
                heading_box.bottom() + self.config.underline_gap,
                heading_width,
                self.config.underline_thickness,
            )?;

            let pitch = options.font_size_px as f32 * self.config.option_spacing;
            let mut y = self.options_top(main_box.bottom());
            for (text, text_width) in self.display_order(options) {
                let bounds = LayoutBox::centered("option", mid_x, y, text_width, pitch)?;
                y = bounds.bottom();
                placed.push(PlacedOption { text, bounds });
            }

            heading = Some(heading_box);
            underline = Some(underline_box);
        }

        let lowest = placed
            .last()
            .map(|o| o.bounds.bottom())
            .unwrap_or(main_box.bottom());
        if lowest > height {
            warn!(
                overflow_px = lowest - height,
                main_font = main.font_size_px,
                option_font = options.font_size_px,
                "Banner text extends past the canvas bottom"
            );
        }

        Ok(Layout {
            image_region,
            text_region,
            overlay,
            main_text: main_box,
            heading,
            underline,
            options: placed,
        })
    }

    /// Options sorted by measured width, widest first. Equal widths keep
    /// caller order.
    pub fn display_order(&self, options: &OptionsBlock) -> Vec<(String, f32)> {
        let size = options.font_size_px as f32;
        let mut measured: Vec<(String, f32)> = options
            .options
            .iter()
            .map(|o| (o.clone(), self.fonts.options.measure(o, size)))
            .collect();
        measured.sort_by(|a, b| b.1.total_cmp(&a.1));
        measured
    }

    /// Uniform scale so the overlay's height is `overlay_height_ratio ×
    /// scale_factor` of the canvas, centered in the image region.
    fn place_overlay(
        &self,
        request: &BannerRequest,
        image_region: &LayoutBox,
        image_width: u32,
        image_height: u32,
    ) -> Result<LayoutBox, BannerError> {
        if image_width == 0 || image_height == 0 {
            return Err(BannerError::Layout(format!(
                "overlay image has no pixels ({image_width}x{image_height})"
            )));
        }
        let target_height =
            request.height as f32 * self.config.overlay_height_ratio * request.scale_factor;
        let scale = target_height / image_height as f32;
        let target_width = image_width as f32 * scale;

        LayoutBox::new(
            "overlay",
            image_region.center_x() - target_width / 2.0,
            image_region.center_y() - target_height / 2.0,
            target_width,
            target_height,
        )
    }
}

fn widest(font: &dyn GlyphProvider, lines: &[String], font_size_px: u32) -> f32 {
    lines
        .iter()
        .map(|l| font.measure(l, font_size_px as f32))
        .fold(0.0, f32::max)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
