// Rasterization: draws a laid-out banner with tiny-skia and encodes it as PNG.

pub mod raster;
pub mod renderer;
pub mod style;

pub use renderer::Renderer;
