//! Draws a laid-out banner onto a surface in a fixed z-order:
//!
//! 1. background (fill, then background image when one is supplied)
//! 2. overlay image
//! 3. main text: shadow, stroke, fill per line
//! 4. heading label and its underline
//! 5. options, widest first
//!
//! Each layer is complete before the next starts. Styles are passed per call,
//! so the main text's stroke and shadow never reach the later layers.

use image::DynamicImage;
use tiny_skia::{
    FillRule, FilterQuality, LineJoin, Paint, Path, Pixmap, PixmapPaint, Rect, Stroke, Transform,
};

use crate::banner::error::BannerError;
use crate::banner::request::BannerRequest;
use crate::fonts::{FontSet, GlyphProvider};
use crate::layout::{Layout, LayoutBox, LayoutConfig, OptionsBlock, TextBlock};
use crate::render::raster::{blur_pixmap, image_to_pixmap, new_surface};
use crate::render::style::{Rgba, ShadowStyle, TextStyle};

/// Vertical offset of the background image from the canvas top.
const BACKGROUND_OFFSET_Y: f32 = 0.0;

pub struct Renderer<'a> {
    fonts: &'a FontSet,
    config: &'a LayoutConfig,
}

impl<'a> Renderer<'a> {
    pub fn new(fonts: &'a FontSet, config: &'a LayoutConfig) -> Self {
        Self { fonts, config }
    }

    pub fn render(
        &self,
        canvas: &mut Pixmap,
        request: &BannerRequest,
        main: &TextBlock,
        options: &OptionsBlock,
        layout: &Layout,
    ) -> Result<(), BannerError> {
        let mid_x = canvas.width() as f32 / 2.0;

        self.draw_background(canvas, request)?;

        if let (Some(image), Some(bounds)) = (&request.overlay_image, &layout.overlay) {
            draw_image(canvas, image, bounds)?;
        }

        let main_style = TextStyle::plain(request.text_color)
            .with_stroke(request.stroke_color, request.stroke_width)
            .with_shadow(ShadowStyle::SOFT);
        for (i, line) in main.lines.iter().enumerate() {
            let middle_y = layout.main_text.y + (i as f32 + 0.5) * main.line_height_px;
            draw_text_line(
                canvas,
                self.fonts.main.as_ref(),
                line,
                main.font_size_px as f32,
                mid_x,
                middle_y,
                &main_style,
            )?;
        }

        if let (Some(heading), Some(underline)) = (&layout.heading, &layout.underline) {
            draw_text_line(
                canvas,
                self.fonts.heading.as_ref(),
                &self.config.heading_text,
                self.config.heading_font_px as f32,
                mid_x,
                heading.center_y(),
                &TextStyle::plain(request.text_color),
            )?;
            fill_box(canvas, underline, request.text_color);
        }

        let option_style = TextStyle::plain(request.option_color);
        for option in &layout.options {
            draw_text_line(
                canvas,
                self.fonts.options.as_ref(),
                &option.text,
                options.font_size_px as f32,
                mid_x,
                option.bounds.center_y(),
                &option_style,
            )?;
        }

        Ok(())
    }

    fn draw_background(&self, canvas: &mut Pixmap, request: &BannerRequest) -> Result<(), BannerError> {
        canvas.fill(request.background_color.to_skia());

        if let Some(image) = &request.background_image {
            let bounds = LayoutBox::new(
                "background",
                0.0,
                BACKGROUND_OFFSET_Y,
                canvas.width() as f32,
                canvas.height() as f32,
            )?;
            draw_image(canvas, image, &bounds)?;
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Primitives
// ────────────────────────────────────────────────────────────────────────────

/// Draws `image` stretched into `bounds`.
fn draw_image(canvas: &mut Pixmap, image: &DynamicImage, bounds: &LayoutBox) -> Result<(), BannerError> {
    let source = image_to_pixmap(image)?;
    let sx = bounds.width / source.width() as f32;
    let sy = bounds.height / source.height() as f32;
    let paint = PixmapPaint {
        quality: FilterQuality::Bicubic,
        ..PixmapPaint::default()
    };
    canvas.draw_pixmap(
        0,
        0,
        source.as_ref(),
        &paint,
        Transform::from_row(sx, 0.0, 0.0, sy, bounds.x, bounds.y),
        None,
    );
    Ok(())
}

/// Draws one line of text centered on `center_x`, with its em box's vertical
/// middle on `middle_y`.
fn draw_text_line(
    canvas: &mut Pixmap,
    font: &dyn GlyphProvider,
    text: &str,
    size_px: f32,
    center_x: f32,
    middle_y: f32,
    style: &TextStyle,
) -> Result<(), BannerError> {
    let x = center_x - font.measure(text, size_px) / 2.0;
    let baseline = font.middle_baseline(size_px, middle_y);
    let Some(path) = font.outline(text, size_px, x, baseline) else {
        return Ok(());
    };

    if let Some(shadow) = &style.shadow {
        draw_shadow(canvas, &path, style, shadow)?;
    }
    if let Some(stroke) = &style.stroke {
        canvas.stroke_path(
            &path,
            &paint(stroke.color),
            &outline_stroke(stroke.width),
            Transform::identity(),
            None,
        );
    }
    canvas.fill_path(
        &path,
        &paint(style.fill),
        FillRule::Winding,
        Transform::identity(),
        None,
    );
    Ok(())
}

/// Renders the text silhouette into a scratch layer, blurs it and composites
/// it under where the text will go.
fn draw_shadow(
    canvas: &mut Pixmap,
    path: &Path,
    style: &TextStyle,
    shadow: &ShadowStyle,
) -> Result<(), BannerError> {
    let stroke_width = style.stroke.map(|s| s.width).unwrap_or(0.0);
    let margin = (shadow.blur * 3.0 + stroke_width).ceil().max(1.0);
    let bounds = path.bounds();
    let origin_x = (bounds.left() - margin).floor();
    let origin_y = (bounds.top() - margin).floor();
    let width = (bounds.width() + 2.0 * margin).ceil() as u32 + 1;
    let height = (bounds.height() + 2.0 * margin).ceil() as u32 + 1;

    let mut layer = new_surface(width, height)?;
    let to_layer = Transform::from_translate(-origin_x, -origin_y);
    let shadow_paint = paint(shadow.color);
    if stroke_width > 0.0 {
        layer.stroke_path(path, &shadow_paint, &outline_stroke(stroke_width), to_layer, None);
    }
    layer.fill_path(path, &shadow_paint, FillRule::Winding, to_layer, None);

    let blurred = blur_pixmap(&layer, shadow.blur)?;
    canvas.draw_pixmap(
        0,
        0,
        blurred.as_ref(),
        &PixmapPaint::default(),
        Transform::from_translate(origin_x + shadow.offset_x, origin_y + shadow.offset_y),
        None,
    );
    Ok(())
}

fn fill_box(canvas: &mut Pixmap, bounds: &LayoutBox, color: Rgba) {
    if let Some(rect) = Rect::from_xywh(bounds.x, bounds.y, bounds.width, bounds.height) {
        canvas.fill_rect(rect, &paint(color), Transform::identity(), None);
    }
}

fn outline_stroke(width: f32) -> Stroke {
    let mut stroke = Stroke::default();
    stroke.width = width;
    stroke.line_join = LineJoin::Round;
    stroke
}

fn paint(color: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color.to_skia());
    paint.anti_alias = true;
    paint
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::MetricTableFont;
    use crate::layout::{LayoutEngine, TextFitter};
    use image::{Rgba as ImageRgba, RgbaImage};
    use std::sync::Arc;

    fn fonts() -> FontSet {
        FontSet::uniform(Arc::new(MetricTableFont::inter()))
    }

    fn pixel(canvas: &Pixmap, x: u32, y: u32) -> (u8, u8, u8, u8) {
        let p = canvas.pixel(x, y).unwrap().demultiply();
        (p.red(), p.green(), p.blue(), p.alpha())
    }

    /// Fits the main text at up to 60px and the options at 30px, then lays out.
    fn plan(request: &BannerRequest) -> (TextBlock, OptionsBlock, Layout) {
        let config = LayoutConfig::default();
        let fonts = fonts();
        let engine = LayoutEngine::new(&config, &fonts);
        let (w, h) = engine.main_text_bounds(request, !request.options.is_empty());
        let main = TextFitter::new(fonts.main.as_ref()).fit(&request.main_text, w, h, 60);
        let options = OptionsBlock {
            options: request.options.clone(),
            font_size_px: 30,
        };
        let layout = engine.layout(request, &main, &options).unwrap();
        (main, options, layout)
    }

    fn render(request: &BannerRequest) -> Pixmap {
        let config = LayoutConfig::default();
        let fonts = fonts();
        let (main, options, layout) = plan(request);
        let mut canvas = new_surface(request.width, request.height).unwrap();
        Renderer::new(&fonts, &config)
            .render(&mut canvas, request, &main, &options, &layout)
            .unwrap();
        canvas
    }

    /// Box of the first glyph of `line` drawn centered on `center_x` with its
    /// em middle on `middle_y`, the way the renderer places it.
    fn first_glyph(line: &str, size_px: f32, center_x: f32, middle_y: f32) -> Rect {
        let font = MetricTableFont::inter();
        let x = center_x - font.measure(line, size_px) / 2.0;
        let baseline = font.middle_baseline(size_px, middle_y);
        let first: String = line.chars().take(1).collect();
        font.outline(&first, size_px, x, baseline).unwrap().bounds()
    }

    fn center_x(rect: &Rect) -> f32 {
        (rect.left() + rect.right()) / 2.0
    }

    fn center_y(rect: &Rect) -> f32 {
        (rect.top() + rect.bottom()) / 2.0
    }

    fn main_first_glyph(request: &BannerRequest) -> Rect {
        let (main, _, layout) = plan(request);
        let middle_y = layout.main_text.y + 0.5 * main.line_height_px;
        first_glyph(
            &main.lines[0],
            main.font_size_px as f32,
            request.width as f32 / 2.0,
            middle_y,
        )
    }

    #[test]
    fn test_background_fill_covers_canvas_without_images() {
        let request = BannerRequest {
            width: 200,
            height: 250,
            background_color: Rgba::opaque(10, 200, 30),
            main_text: String::new(),
            ..Default::default()
        };
        let canvas = render(&request);
        for (x, y) in [(0, 0), (199, 0), (100, 125), (0, 249), (199, 249)] {
            assert_eq!(pixel(&canvas, x, y), (10, 200, 30, 255), "pixel ({x},{y})");
        }
    }

    #[test]
    fn test_background_image_takes_precedence_over_fill() {
        let mut img = RgbaImage::new(4, 4);
        for p in img.pixels_mut() {
            *p = ImageRgba([0, 0, 255, 255]);
        }
        let request = BannerRequest {
            width: 100,
            height: 100,
            background_color: Rgba::opaque(255, 0, 0),
            background_image: Some(DynamicImage::ImageRgba8(img)),
            main_text: String::new(),
            ..Default::default()
        };
        let canvas = render(&request);
        assert_eq!(pixel(&canvas, 50, 10), (0, 0, 255, 255));
        assert_eq!(pixel(&canvas, 50, 95), (0, 0, 255, 255));
    }

    #[test]
    fn test_overlay_drawn_at_center_of_image_region() {
        let mut img = RgbaImage::new(10, 10);
        for p in img.pixels_mut() {
            *p = ImageRgba([255, 0, 0, 255]);
        }
        let request = BannerRequest {
            width: 400,
            height: 500,
            overlay_image: Some(DynamicImage::ImageRgba8(img)),
            scale_factor: 0.5,
            main_text: String::new(),
            ..Default::default()
        };
        let canvas = render(&request);
        // image region is 0..335, overlay is 175px tall centered at y=167.5
        assert_eq!(pixel(&canvas, 200, 167), (255, 0, 0, 255));
        // corners of the image region stay background
        assert_eq!(pixel(&canvas, 5, 5), (255, 255, 255, 255));
    }

    #[test]
    fn test_main_text_paints_fill_color_on_midline() {
        let request = BannerRequest {
            width: 600,
            height: 600,
            text_color: Rgba::opaque(0, 0, 200),
            stroke_width: 0.0,
            main_text: "HHHH".to_string(),
            ..Default::default()
        };
        let fonts = fonts();
        let (main, _, layout) = plan(&request);

        let canvas = render(&request);
        let baseline = fonts.main.middle_baseline(main.font_size_px as f32, layout.main_text.center_y());
        // sample just above the baseline, inside the first block glyph of "HH|HH"
        let probe_y = (baseline - 3.0) as u32;
        let h_width = fonts.main.measure("H", main.font_size_px as f32);
        let probe_x = (300.0 - h_width * 1.5) as u32;
        assert_eq!(pixel(&canvas, probe_x, probe_y), (0, 0, 200, 255));
    }

    #[test]
    fn test_options_use_option_color_without_stroke() {
        let request = BannerRequest {
            width: 600,
            height: 800,
            option_color: Rgba::opaque(0, 160, 0),
            main_text: "Pick".to_string(),
            options: vec!["MMMMMMMM".to_string()],
            ..Default::default()
        };
        let fonts = fonts();
        let (_, _, layout) = plan(&request);
        let canvas = render(&request);

        let bounds = layout.options[0].bounds;
        let baseline = fonts.options.middle_baseline(30.0, bounds.center_y());
        let m_width = fonts.options.measure("M", 30.0);
        // center of the first "M" block
        let probe_x = (bounds.x + m_width / 2.0) as u32;
        let probe_y = (baseline - 8.0) as u32;
        assert_eq!(pixel(&canvas, probe_x, probe_y), (0, 160, 0, 255));
    }

    #[test]
    fn test_main_text_stroke_surrounds_fill() {
        let request = BannerRequest {
            width: 600,
            height: 600,
            text_color: Rgba::opaque(0, 0, 200),
            stroke_color: Rgba::opaque(220, 0, 0),
            stroke_width: 8.0,
            main_text: "HHHH".to_string(),
            ..Default::default()
        };
        let glyph = main_first_glyph(&request);
        let canvas = render(&request);
        let mid_y = center_y(&glyph) as u32;

        // the 8px stroke reaches 4px past the fill edge, drawn over the shadow
        let outside_x = (glyph.left() - 2.5) as u32;
        assert_eq!(pixel(&canvas, outside_x, mid_y), (220, 0, 0, 255));
        // the fill is drawn last and covers the inner half of the stroke
        let inside_x = center_x(&glyph) as u32;
        assert_eq!(pixel(&canvas, inside_x, mid_y), (0, 0, 200, 255));
    }

    #[test]
    fn test_main_text_shadow_falls_below_right() {
        let request = BannerRequest {
            width: 600,
            height: 600,
            text_color: Rgba::opaque(0, 0, 200),
            stroke_width: 0.0,
            main_text: "HHHH".to_string(),
            ..Default::default()
        };
        let glyph = main_first_glyph(&request);
        let canvas = render(&request);

        let below = pixel(&canvas, center_x(&glyph) as u32, (glyph.bottom() + 3.0) as u32);
        let above = pixel(&canvas, center_x(&glyph) as u32, (glyph.top() - 4.0) as u32);
        // a grey of the black shadow over the white background
        assert_eq!(below.0, below.1);
        assert_eq!(below.1, below.2);
        assert!(below.0 < 240, "expected shadow below the glyph, got {below:?}");
        assert!(below.0 < above.0, "shadow should be offset downward");

        let right = pixel(&canvas, (glyph.right() + 3.0) as u32, center_y(&glyph) as u32);
        let left = pixel(&canvas, (glyph.left() - 4.0) as u32, center_y(&glyph) as u32);
        assert!(right.0 < left.0, "shadow should be offset to the right");
    }

    #[test]
    fn test_main_text_stroke_and_shadow_stay_off_options() {
        let request = BannerRequest {
            width: 600,
            height: 800,
            option_color: Rgba::opaque(0, 160, 0),
            stroke_color: Rgba::opaque(220, 0, 0),
            stroke_width: 8.0,
            main_text: "Pick".to_string(),
            options: vec!["MMMMMMMM".to_string()],
            ..Default::default()
        };
        let (_, options, layout) = plan(&request);
        let canvas = render(&request);

        let bounds = layout.options[0].bounds;
        let glyph = first_glyph(
            &options.options[0],
            options.font_size_px as f32,
            request.width as f32 / 2.0,
            bounds.center_y(),
        );
        let white = (255, 255, 255, 255);
        // no outline left of the glyph
        let left_x = glyph.left().floor() as u32 - 2;
        assert_eq!(pixel(&canvas, left_x, center_y(&glyph) as u32), white);
        // no shadow below it
        let below_y = glyph.bottom().ceil() as u32 + 3;
        assert_eq!(pixel(&canvas, center_x(&glyph) as u32, below_y), white);
        // and the glyph itself is plain option color
        assert_eq!(
            pixel(&canvas, center_x(&glyph) as u32, center_y(&glyph) as u32),
            (0, 160, 0, 255)
        );
    }

    #[test]
    fn test_render_is_deterministic() {
        let request = BannerRequest {
            width: 300,
            height: 400,
            main_text: "Same input same pixels every single time".to_string(),
            options: vec!["One".to_string(), "Three".to_string()],
            ..Default::default()
        };
        let a = render(&request);
        let b = render(&request);
        assert_eq!(a.data(), b.data());
    }
}
