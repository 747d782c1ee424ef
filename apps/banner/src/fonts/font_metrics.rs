//! Static font-metric tables used when no font file is registered.
//!
//! Character widths are in em units (relative to font size). The tables are an
//! approximation of the real faces: close enough to size and wrap banner text
//! the same way the outline font would, and fully deterministic, which is what
//! the tests rely on.
//!
//! Glyphs are drawn as solid blocks sized from the same table, so a banner
//! rendered without a font file still shows where every word lands.
//! All tables cover ASCII 0x20..=0x7E (95 printable characters).
//! Index = (char as usize) - 32.

use tiny_skia::{Path, PathBuilder, Rect};

use super::GlyphProvider;

/// Ascent above the baseline, in em.
const ASCENT_EM: f32 = 0.8;
/// Descent below the baseline, in em (negative, OpenType convention).
const DESCENT_EM: f32 = -0.2;
/// Height of a drawn block glyph, in em.
const BLOCK_HEIGHT_EM: f32 = 0.7;
/// Horizontal inset on each side of a block glyph, as a fraction of its advance.
const BLOCK_INSET: f32 = 0.08;

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table for a font family.
///
/// `widths[i]` = width of ASCII character `(i + 32)` at 1em, covering 0x20
/// (space) through 0x7E (~).
///
/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
pub struct FontMetricTable {
    pub family: &'static str,
    widths: [f32; 95],
    /// Fallback width for non-ASCII characters (codepoints > 0x7E).
    pub average_char_width: f32,
}

impl FontMetricTable {
    /// Width of a single character in em units.
    pub fn char_width(&self, c: char) -> f32 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            self.widths[code - 32]
        } else if c.is_whitespace() {
            self.widths[0]
        } else {
            self.average_char_width
        }
    }

    /// Measures the rendered width of a string in em units.
    ///
    /// Non-ASCII characters fall back to `average_char_width`.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars().map(|c| self.char_width(c)).sum()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

/// Inter: humanist sans-serif, the default banner face.
static INTER_TABLE: FontMetricTable = FontMetricTable {
    family: "Inter",
    #[rustfmt::skip]
    widths: [
        // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
        0.25, 0.30, 0.38, 0.56, 0.56, 0.89, 0.67, 0.22, 0.33, 0.33, 0.39, 0.59, 0.28, 0.33, 0.28, 0.31,
        // 0     1     2     3     4     5     6     7     8     9
        0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56,
        // :     ;     <     =     >     ?     @
        0.28, 0.28, 0.59, 0.59, 0.59, 0.50, 1.02,
        // A     B     C     D     E     F     G     H     I     J     K     L     M
        0.67, 0.61, 0.61, 0.67, 0.56, 0.50, 0.67, 0.67, 0.25, 0.39, 0.61, 0.53, 0.78,
        // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
        0.67, 0.72, 0.56, 0.72, 0.61, 0.50, 0.56, 0.67, 0.67, 0.89, 0.61, 0.61, 0.56,
        // [     \     ]     ^     _     `
        0.28, 0.31, 0.28, 0.47, 0.56, 0.34,
        // a     b     c     d     e     f     g     h     i     j     k     l     m
        0.56, 0.56, 0.50, 0.56, 0.56, 0.31, 0.56, 0.56, 0.22, 0.22, 0.53, 0.22, 0.83,
        // n     o     p     q     r     s     t     u     v     w     x     y     z
        0.56, 0.56, 0.56, 0.56, 0.33, 0.44, 0.39, 0.56, 0.50, 0.72, 0.50, 0.50, 0.44,
        // {     |     }     ~
        0.33, 0.26, 0.33, 0.59,
    ],
    average_char_width: 0.52,
};

/// Oswald: condensed display sans-serif, for headings. Approx. 68% of Inter.
static OSWALD_TABLE: FontMetricTable = FontMetricTable {
    family: "Oswald",
    #[rustfmt::skip]
    widths: [
        // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
        0.17, 0.20, 0.26, 0.38, 0.38, 0.61, 0.46, 0.15, 0.23, 0.23, 0.27, 0.40, 0.19, 0.23, 0.19, 0.21,
        // 0     1     2     3     4     5     6     7     8     9
        0.38, 0.38, 0.38, 0.38, 0.38, 0.38, 0.38, 0.38, 0.38, 0.38,
        // :     ;     <     =     >     ?     @
        0.19, 0.19, 0.40, 0.40, 0.40, 0.34, 0.69,
        // A     B     C     D     E     F     G     H     I     J     K     L     M
        0.46, 0.41, 0.41, 0.46, 0.38, 0.34, 0.46, 0.46, 0.17, 0.27, 0.41, 0.36, 0.53,
        // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
        0.46, 0.49, 0.38, 0.49, 0.41, 0.34, 0.38, 0.46, 0.46, 0.61, 0.41, 0.41, 0.38,
        // [     \     ]     ^     _     `
        0.19, 0.21, 0.19, 0.32, 0.38, 0.23,
        // a     b     c     d     e     f     g     h     i     j     k     l     m
        0.38, 0.38, 0.34, 0.38, 0.38, 0.21, 0.38, 0.38, 0.15, 0.15, 0.36, 0.15, 0.56,
        // n     o     p     q     r     s     t     u     v     w     x     y     z
        0.38, 0.38, 0.38, 0.38, 0.23, 0.30, 0.27, 0.38, 0.34, 0.49, 0.34, 0.34, 0.30,
        // {     |     }     ~
        0.23, 0.18, 0.23, 0.40,
    ],
    average_char_width: 0.35,
};

// ────────────────────────────────────────────────────────────────────────────
// Glyph provider
// ────────────────────────────────────────────────────────────────────────────

/// A glyph provider backed by a static width table.
#[derive(Clone, Copy)]
pub struct MetricTableFont {
    table: &'static FontMetricTable,
}

impl MetricTableFont {
    pub fn inter() -> Self {
        Self {
            table: &INTER_TABLE,
        }
    }

    pub fn oswald() -> Self {
        Self {
            table: &OSWALD_TABLE,
        }
    }
}

impl GlyphProvider for MetricTableFont {
    fn family(&self) -> &str {
        self.table.family
    }

    fn measure(&self, text: &str, size_px: f32) -> f32 {
        self.table.measure_str(text) * size_px
    }

    fn outline(&self, text: &str, size_px: f32, x: f32, baseline_y: f32) -> Option<Path> {
        let mut builder = PathBuilder::new();
        let mut pen_x = x;
        let top = baseline_y - BLOCK_HEIGHT_EM * size_px;
        for c in text.chars() {
            let advance = self.table.char_width(c) * size_px;
            if !c.is_whitespace() {
                let inset = advance * BLOCK_INSET;
                let width = advance - 2.0 * inset;
                if let Some(rect) =
                    Rect::from_xywh(pen_x + inset, top, width, BLOCK_HEIGHT_EM * size_px)
                {
                    builder.push_rect(rect);
                }
            }
            pen_x += advance;
        }
        builder.finish()
    }

    fn vertical_metrics(&self, size_px: f32) -> (f32, f32) {
        (ASCENT_EM * size_px, DESCENT_EM * size_px)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
