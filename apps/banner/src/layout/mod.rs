// Text fitting and banner layout.
// Pure computation: no I/O, no drawing, nothing kept between requests.

pub mod engine;
pub mod text_fit;

pub use engine::{Layout, LayoutBox, LayoutConfig, LayoutEngine, OptionsBlock};
pub use text_fit::{TextBlock, TextFitter, LINE_HEIGHT_RATIO};
