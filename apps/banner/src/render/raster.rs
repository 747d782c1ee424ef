//! Conversions between decoded images and tiny-skia pixmaps.

use image::{imageops, DynamicImage, RgbaImage};
use tiny_skia::{IntSize, Pixmap};

use crate::banner::error::BannerError;

/// Allocates a transparent surface of exactly `width` × `height`.
pub fn new_surface(width: u32, height: u32) -> Result<Pixmap, BannerError> {
    Pixmap::new(width, height)
        .ok_or_else(|| BannerError::Layout(format!("cannot allocate {width}x{height} surface")))
}

/// Converts a decoded image into a premultiplied pixmap.
pub fn image_to_pixmap(image: &DynamicImage) -> Result<Pixmap, BannerError> {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut data = rgba.into_raw();
    for px in data.chunks_exact_mut(4) {
        let a = px[3];
        px[0] = premul_u8(px[0], a);
        px[1] = premul_u8(px[1], a);
        px[2] = premul_u8(px[2], a);
    }
    let size = IntSize::from_wh(width, height).ok_or_else(|| {
        BannerError::Layout(format!("image has invalid size {width}x{height}"))
    })?;
    Pixmap::from_vec(data, size)
        .ok_or_else(|| BannerError::Layout("image buffer does not match its size".to_string()))
}

/// Gaussian blur of a pixmap. Operates on premultiplied data, which keeps
/// edges from picking up dark fringes.
pub fn blur_pixmap(pixmap: &Pixmap, sigma: f32) -> Result<Pixmap, BannerError> {
    if sigma <= 0.0 {
        return Ok(pixmap.clone());
    }
    let (width, height) = (pixmap.width(), pixmap.height());
    let buffer = RgbaImage::from_raw(width, height, pixmap.data().to_vec())
        .ok_or_else(|| BannerError::Layout("shadow buffer size mismatch".to_string()))?;
    let blurred = imageops::blur(&buffer, sigma);
    let size = IntSize::from_wh(width, height)
        .ok_or_else(|| BannerError::Layout(format!("invalid shadow size {width}x{height}")))?;
    Pixmap::from_vec(blurred.into_raw(), size)
        .ok_or_else(|| BannerError::Layout("blurred buffer does not match its size".to_string()))
}

/// Encodes the finished surface as PNG.
pub fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>, BannerError> {
    pixmap
        .encode_png()
        .map_err(|e| BannerError::Layout(format!("png encode failed: {e}")))
}

fn premul_u8(channel: u8, alpha: u8) -> u8 {
    ((channel as u16 * alpha as u16 + 127) / 255) as u8
}
