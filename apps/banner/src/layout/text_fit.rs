//! Text fitting: picks a font size and word-wrap that fit a bounding box.
//!
//! # Algorithm
//! - Up to `SHORT_TEXT_MAX_WORDS` words: the text stays on one line and only the
//!   font size shrinks until the line fits both width and height.
//! - Longer text: greedy word-wrap at the current size, then check the whole
//!   block. Any violation (block too tall, or a line still too wide because it
//!   holds a single unsplittable word) drops the size by 1px and re-wraps from
//!   scratch.
//!
//! The scan is linear and downward, so it is bounded by the initial size and
//! always lands on the largest fitting size. At the 1px floor the last wrap is
//! returned as-is and overflow is accepted.

use crate::fonts::GlyphProvider;

/// Line height as a multiple of font size.
pub const LINE_HEIGHT_RATIO: f32 = 1.2;

/// Texts with at most this many words are never wrapped.
pub const SHORT_TEXT_MAX_WORDS: usize = 4;

const MIN_FONT_SIZE: u32 = 1;

// ────────────────────────────────────────────────────────────────────────────
// Output type
// ────────────────────────────────────────────────────────────────────────────

/// Wrapped text at the size it was fitted for.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub font_size_px: u32,
    pub line_height_px: f32,
}

impl TextBlock {
    fn new(lines: Vec<String>, font_size_px: u32) -> Self {
        Self {
            lines,
            font_size_px,
            line_height_px: line_height(font_size_px),
        }
    }

    pub fn height(&self) -> f32 {
        self.lines.len() as f32 * self.line_height_px
    }
}

pub fn line_height(font_size_px: u32) -> f32 {
    font_size_px as f32 * LINE_HEIGHT_RATIO
}

// ────────────────────────────────────────────────────────────────────────────
// Fitter
// ────────────────────────────────────────────────────────────────────────────

pub struct TextFitter<'a> {
    font: &'a dyn GlyphProvider,
}

impl<'a> TextFitter<'a> {
    pub fn new(font: &'a dyn GlyphProvider) -> Self {
        Self { font }
    }

    /// Fits `text` into `max_width` × `max_height`, starting at
    /// `initial_font_size` and shrinking 1px at a time.
    pub fn fit(
        &self,
        text: &str,
        max_width: f32,
        max_height: f32,
        initial_font_size: u32,
    ) -> TextBlock {
        let initial = initial_font_size.max(MIN_FONT_SIZE);
        let words: Vec<&str> = text.split_whitespace().collect();

        if words.is_empty() {
            return TextBlock::new(Vec::new(), initial);
        }

        if words.len() <= SHORT_TEXT_MAX_WORDS {
            self.fit_line(text, max_width, max_height, initial)
        } else {
            self.fit_wrapped(&words, max_width, max_height, initial)
        }
    }

    /// Keeps `text` on one line (whitespace normalized) and only shrinks the
    /// font. Used directly for option labels, which are never wrapped.
    pub fn fit_line(
        &self,
        text: &str,
        max_width: f32,
        max_height: f32,
        initial_font_size: u32,
    ) -> TextBlock {
        let line = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if line.is_empty() {
            return TextBlock::new(Vec::new(), initial_font_size.max(MIN_FONT_SIZE));
        }
        let mut font_size = initial_font_size.max(MIN_FONT_SIZE);

        while font_size > MIN_FONT_SIZE
            && (self.font.measure(&line, font_size as f32) > max_width
                || line_height(font_size) > max_height)
        {
            font_size -= 1;
        }

        TextBlock::new(vec![line], font_size)
    }

    fn fit_wrapped(
        &self,
        words: &[&str],
        max_width: f32,
        max_height: f32,
        initial: u32,
    ) -> TextBlock {
        let mut font_size = initial;

        loop {
            let lines = self.wrap(words, max_width, font_size as f32);
            let total_height = lines.len() as f32 * line_height(font_size);
            let too_tall = total_height > max_height;
            let too_wide = lines
                .iter()
                .any(|l| self.font.measure(l, font_size as f32) > max_width);

            if (!too_tall && !too_wide) || font_size == MIN_FONT_SIZE {
                return TextBlock::new(lines, font_size);
            }
            font_size -= 1;
        }
    }

    /// Greedy wrap at a fixed size. A word that alone exceeds `max_width`
    /// gets its own line rather than being split.
    pub fn wrap(&self, words: &[&str], max_width: f32, font_size: f32) -> Vec<String> {
        let mut lines: Vec<String> = Vec::new();
        let mut current = String::new();

        for word in words {
            if current.is_empty() {
                current.push_str(word);
                continue;
            }
            let candidate = format!("{current} {word}");
            if self.font.measure(&candidate, font_size) <= max_width {
                current = candidate;
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::MetricTableFont;

    const TWENTY_WORDS: &str = "Discover the brand new collection of handmade ceramic mugs \
                                bowls and plates crafted by local artists for your everyday \
                                kitchen table rituals";

    fn fit(text: &str, max_w: f32, max_h: f32, initial: u32) -> TextBlock {
        let font = MetricTableFont::inter();
        TextFitter::new(&font).fit(text, max_w, max_h, initial)
    }

    fn widest_line(block: &TextBlock) -> f32 {
        let font = MetricTableFont::inter();
        block
            .lines
            .iter()
            .map(|l| font.measure(l, block.font_size_px as f32))
            .fold(0.0, f32::max)
    }

    #[test]
    fn test_twenty_word_fixture_has_twenty_words() {
        assert_eq!(TWENTY_WORDS.split_whitespace().count(), 20);
    }

    #[test]
    fn test_empty_text_yields_no_lines() {
        let block = fit("   ", 500.0, 200.0, 60);
        assert!(block.lines.is_empty());
        assert_eq!(block.font_size_px, 60);
    }

    #[test]
    fn test_short_text_stays_on_one_line_at_initial_size() {
        let block = fit("Short headline", 864.0, 356.0, 60);
        assert_eq!(block.lines, vec!["Short headline".to_string()]);
        assert_eq!(block.font_size_px, 60);
        assert!((block.line_height_px - 72.0).abs() < 1e-3);
    }

    #[test]
    fn test_short_text_never_wraps_even_when_narrow() {
        let block = fit("four words right here", 40.0, 500.0, 60);
        assert_eq!(block.lines.len(), 1);
        assert!(block.font_size_px < 60);
        assert!(widest_line(&block) <= 40.0 || block.font_size_px == 1);
    }

    #[test]
    fn test_short_text_shrinks_to_height() {
        // 31px box → 25px (25 * 1.2 = 30 fits, 26 * 1.2 = 31.2 does not)
        let block = fit("Sale", 1000.0, 31.0, 60);
        assert_eq!(block.font_size_px, 25);
    }

    #[test]
    fn test_short_text_stops_at_floor() {
        let block = fit("Supercalifragilistic", 1.0, 1.0, 50);
        assert_eq!(block.font_size_px, 1);
        assert_eq!(block.lines.len(), 1);
    }

    #[test]
    fn test_long_text_wraps_and_shrinks() {
        let block = fit(TWENTY_WORDS, 400.0 * 0.8, 1350.0 * 0.33 * 0.45, 60);
        assert!(block.lines.len() > 1, "expected wrapping, got {:?}", block.lines);
        assert!(block.font_size_px < 60);
        assert!(block.height() <= 1350.0 * 0.33 * 0.45);
        assert!(widest_line(&block) <= 320.0);
    }

    #[test]
    fn test_long_text_preserves_every_word_in_order() {
        let block = fit(TWENTY_WORDS, 300.0, 200.0, 60);
        let rejoined = block.lines.join(" ");
        let original: Vec<&str> = TWENTY_WORDS.split_whitespace().collect();
        assert_eq!(rejoined, original.join(" "));
    }

    #[test]
    fn test_oversized_word_is_its_own_line_at_floor() {
        let text = "a b c d Pneumonoultramicroscopicsilicovolcanoconiosis e";
        let block = fit(text, 20.0, 10_000.0, 30);
        assert_eq!(block.font_size_px, 1);
        assert!(block
            .lines
            .iter()
            .any(|l| l == "Pneumonoultramicroscopicsilicovolcanoconiosis"));
        assert!(block.lines.iter().all(|l| !l.is_empty()));
    }

    #[test]
    fn test_oversized_word_forces_shrink_above_floor() {
        // The long word fits once the size drops far enough; lines must then fit.
        let text = "one two three four Extraordinarily five six";
        let block = fit(text, 200.0, 10_000.0, 60);
        assert!(block.font_size_px > 1);
        assert!(widest_line(&block) <= 200.0);
    }

    #[test]
    fn test_font_size_never_below_one() {
        for (w, h) in [(1.0, 1.0), (0.5, 0.5), (10.0, 2.0)] {
            let block = fit(TWENTY_WORDS, w, h, 45);
            assert!(block.font_size_px >= 1);
        }
    }

    #[test]
    fn test_lines_fit_width_whenever_above_floor() {
        for width in [150.0, 250.0, 400.0, 864.0] {
            for height in [60.0, 120.0, 400.0] {
                let block = fit(TWENTY_WORDS, width, height, 70);
                if block.font_size_px > 1 {
                    assert!(
                        widest_line(&block) <= width,
                        "w={width} h={height} size={}",
                        block.font_size_px
                    );
                }
            }
        }
    }

    #[test]
    fn test_shrinking_height_never_grows_font() {
        let mut previous = u32::MAX;
        for height in [600.0, 400.0, 250.0, 180.0, 120.0, 80.0, 40.0, 10.0] {
            let block = fit(TWENTY_WORDS, 500.0, height, 70);
            assert!(
                block.font_size_px <= previous,
                "height {height} produced larger font {} > {previous}",
                block.font_size_px
            );
            previous = block.font_size_px;
        }
    }

    #[test]
    fn test_fit_is_deterministic() {
        let a = fit(TWENTY_WORDS, 333.0, 210.0, 64);
        let b = fit(TWENTY_WORDS, 333.0, 210.0, 64);
        assert_eq!(a, b);
    }

    #[test]
    fn test_fit_line_keeps_long_text_on_one_line() {
        let font = MetricTableFont::inter();
        let block = TextFitter::new(&font).fit_line(TWENTY_WORDS, 800.0, 100.0, 45);
        assert_eq!(block.lines.len(), 1);
        assert!(widest_line(&block) <= 800.0);
    }

    #[test]
    fn test_wrap_never_emits_empty_leading_line() {
        let font = MetricTableFont::inter();
        let fitter = TextFitter::new(&font);
        let lines = fitter.wrap(&["Gigantic", "x"], 5.0, 40.0);
        assert_eq!(lines, vec!["Gigantic".to_string(), "x".to_string()]);
    }
}
