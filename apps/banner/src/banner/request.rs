//! Banner request types: the raw query, its parsed form, and the fully
//! resolved `BannerRequest` the composer consumes.
//!
//! Defaults are applied exactly once, here. Nothing downstream substitutes
//! values mid-pipeline.

use image::DynamicImage;
use serde::Deserialize;

use crate::banner::error::BannerError;
use crate::render::style::Rgba;
use crate::sources::BannerRow;

pub const DEFAULT_WIDTH: u32 = 1080;
pub const DEFAULT_HEIGHT: u32 = 1350;
pub const DEFAULT_STROKE_WIDTH: f32 = 3.0;
pub const DEFAULT_SCALE_FACTOR: f32 = 0.3;
pub const DEFAULT_MAIN_TEXT: &str = "Default Text";
pub const DEFAULT_OPTIONS: [&str; 3] = ["Option 1", "Option 2", "Option 3"];

/// Upper bound on either canvas dimension; each in-flight request holds a
/// full width × height RGBA buffer.
pub const MAX_DIMENSION: u32 = 4096;

/// Upper bound on `scale_factor`. At the limit the overlay is several canvases
/// tall, which keeps every overlay box finite.
pub const MAX_SCALE_FACTOR: f32 = 10.0;

/// Upper bound on the main-text outline width, in pixels.
pub const MAX_STROKE_WIDTH: f32 = 64.0;

// ────────────────────────────────────────────────────────────────────────────
// Resolved request
// ────────────────────────────────────────────────────────────────────────────

/// Everything needed to draw one banner. Built per call, consumed once.
#[derive(Debug, Clone)]
pub struct BannerRequest {
    pub width: u32,
    pub height: u32,
    pub background_color: Rgba,
    pub text_color: Rgba,
    pub option_color: Rgba,
    pub stroke_color: Rgba,
    pub stroke_width: f32,
    /// Extra scale applied to the overlay image on top of its base height.
    pub scale_factor: f32,
    pub main_text: String,
    /// Options in caller order. Display order is decided at layout time.
    pub options: Vec<String>,
    pub background_image: Option<DynamicImage>,
    pub overlay_image: Option<DynamicImage>,
}

impl Default for BannerRequest {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            background_color: Rgba::WHITE,
            text_color: Rgba::BLACK,
            option_color: Rgba::BLACK,
            stroke_color: Rgba::BLACK,
            stroke_width: DEFAULT_STROKE_WIDTH,
            scale_factor: DEFAULT_SCALE_FACTOR,
            main_text: DEFAULT_MAIN_TEXT.to_string(),
            options: Vec::new(),
            background_image: None,
            overlay_image: None,
        }
    }
}

impl BannerRequest {
    /// Checks the invariants composition relies on.
    pub fn validate(&self) -> Result<(), BannerError> {
        if self.width == 0 || self.height == 0 {
            return Err(BannerError::InvalidRequest(format!(
                "canvas must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width > MAX_DIMENSION || self.height > MAX_DIMENSION {
            return Err(BannerError::InvalidRequest(format!(
                "canvas {}x{} exceeds the {MAX_DIMENSION}px limit",
                self.width, self.height
            )));
        }
        if !(0.0..=MAX_STROKE_WIDTH).contains(&self.stroke_width) {
            return Err(BannerError::InvalidRequest(format!(
                "stroke width must be in 0..={MAX_STROKE_WIDTH}, got {}",
                self.stroke_width
            )));
        }
        if !(self.scale_factor > 0.0 && self.scale_factor <= MAX_SCALE_FACTOR) {
            return Err(BannerError::InvalidRequest(format!(
                "scale factor must be in (0, {MAX_SCALE_FACTOR}], got {}",
                self.scale_factor
            )));
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Query parameters
// ────────────────────────────────────────────────────────────────────────────

/// Raw `GET /banner` query. Everything is a string so malformed values can be
/// reported as validation errors instead of extractor rejections.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerQuery {
    pub csv_url: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
    pub bg_color: Option<String>,
    pub text_color: Option<String>,
    pub option_color: Option<String>,
    pub stroke_style: Option<String>,
    pub line_width: Option<String>,
    pub scale_factor: Option<String>,
    pub main_text: Option<String>,
    pub option1: Option<String>,
    pub option2: Option<String>,
    pub option3: Option<String>,
    pub bg_url: Option<String>,
    pub img_url: Option<String>,
}

/// A query with every value parsed and defaulted, still waiting on the
/// fetched row and images.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedQuery {
    pub csv_url: String,
    pub width: u32,
    pub height: u32,
    pub background_color: Rgba,
    pub text_color: Rgba,
    pub option_color: Rgba,
    pub stroke_color: Rgba,
    pub stroke_width: f32,
    pub scale_factor: f32,
    pub main_text: Option<String>,
    pub options: [Option<String>; 3],
    pub background_url: Option<String>,
    pub overlay_url: Option<String>,
}

impl BannerQuery {
    /// Parses and defaults every parameter. `default_overlay_url` is used when
    /// the query names no overlay image.
    pub fn resolve(self, default_overlay_url: Option<&str>) -> Result<ResolvedQuery, BannerError> {
        let csv_url = non_blank(self.csv_url)
            .ok_or_else(|| BannerError::MissingInput("csvUrl is required".to_string()))?;

        Ok(ResolvedQuery {
            csv_url,
            width: parse_or("width", self.width, DEFAULT_WIDTH)?,
            height: parse_or("height", self.height, DEFAULT_HEIGHT)?,
            background_color: parse_or("bgColor", self.bg_color, Rgba::WHITE)?,
            text_color: parse_or("textColor", self.text_color, Rgba::BLACK)?,
            option_color: parse_or("optionColor", self.option_color, Rgba::BLACK)?,
            stroke_color: parse_or("strokeStyle", self.stroke_style, Rgba::BLACK)?,
            stroke_width: parse_or("lineWidth", self.line_width, DEFAULT_STROKE_WIDTH)?,
            scale_factor: parse_or("scaleFactor", self.scale_factor, DEFAULT_SCALE_FACTOR)?,
            main_text: non_blank(self.main_text),
            options: [
                non_blank(self.option1),
                non_blank(self.option2),
                non_blank(self.option3),
            ],
            background_url: non_blank(self.bg_url),
            overlay_url: non_blank(self.img_url)
                .or_else(|| default_overlay_url.map(str::to_string)),
        })
    }
}

impl ResolvedQuery {
    /// Merges the query with the fetched row and decoded images.
    ///
    /// Per text field: query value, then CSV column, then default.
    pub fn into_request(
        self,
        row: BannerRow,
        background_image: Option<DynamicImage>,
        overlay_image: Option<DynamicImage>,
    ) -> BannerRequest {
        let [q1, q2, q3] = self.options;
        let options = [(q1, row.option1), (q2, row.option2), (q3, row.option3)]
            .into_iter()
            .zip(DEFAULT_OPTIONS)
            .map(|((query, csv), fallback)| {
                query
                    .or_else(|| non_blank(csv))
                    .unwrap_or_else(|| fallback.to_string())
            })
            .collect();

        let main_text = self
            .main_text
            .or_else(|| non_blank(row.text))
            .unwrap_or_else(|| DEFAULT_MAIN_TEXT.to_string());

        BannerRequest {
            width: self.width,
            height: self.height,
            background_color: self.background_color,
            text_color: self.text_color,
            option_color: self.option_color,
            stroke_color: self.stroke_color,
            stroke_width: self.stroke_width,
            scale_factor: self.scale_factor,
            main_text,
            options,
            background_image,
            overlay_image,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_or<T>(name: &str, raw: Option<String>, default: T) -> Result<T, BannerError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match non_blank(raw) {
        None => Ok(default),
        Some(v) => v
            .trim()
            .parse()
            .map_err(|e| BannerError::InvalidRequest(format!("invalid {name} '{v}': {e}"))),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn query_with_csv() -> BannerQuery {
        BannerQuery {
            csv_url: Some("https://example.com/rows.csv".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_request_matches_documented_defaults() {
        let req = BannerRequest::default();
        assert_eq!((req.width, req.height), (1080, 1350));
        assert_eq!(req.background_color, Rgba::WHITE);
        assert_eq!(req.text_color, Rgba::BLACK);
        assert_eq!(req.stroke_width, 3.0);
        assert!((req.scale_factor - 0.3).abs() < 1e-6);
        assert_eq!(req.main_text, "Default Text");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_dimension() {
        let req = BannerRequest {
            width: 0,
            ..Default::default()
        };
        assert!(matches!(req.validate(), Err(BannerError::InvalidRequest(_))));
    }

    #[test]
    fn test_validate_rejects_negative_stroke() {
        let req = BannerRequest {
            stroke_width: -1.0,
            ..Default::default()
        };
        assert!(matches!(req.validate(), Err(BannerError::InvalidRequest(_))));
    }

    #[test]
    fn test_validate_bounds_scale_factor() {
        for scale_factor in [0.0, -0.5, 1e37, f32::INFINITY, f32::NAN, MAX_SCALE_FACTOR + 0.1] {
            let req = BannerRequest {
                scale_factor,
                ..Default::default()
            };
            assert!(
                matches!(req.validate(), Err(BannerError::InvalidRequest(_))),
                "scale factor {scale_factor} should be rejected"
            );
        }
        let at_limit = BannerRequest {
            scale_factor: MAX_SCALE_FACTOR,
            ..Default::default()
        };
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_huge_stroke() {
        for stroke_width in [1e30, f32::NAN] {
            let req = BannerRequest {
                stroke_width,
                ..Default::default()
            };
            assert!(matches!(req.validate(), Err(BannerError::InvalidRequest(_))));
        }
    }

    #[test]
    fn test_validate_rejects_oversized_canvas() {
        let req = BannerRequest {
            height: MAX_DIMENSION + 1,
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_resolve_requires_csv_url() {
        let err = BannerQuery::default().resolve(None).unwrap_err();
        assert!(matches!(err, BannerError::MissingInput(_)));

        let blank = BannerQuery {
            csv_url: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            blank.resolve(None),
            Err(BannerError::MissingInput(_))
        ));
    }

    #[test]
    fn test_resolve_applies_defaults() {
        let resolved = query_with_csv().resolve(None).unwrap();
        assert_eq!(resolved.width, DEFAULT_WIDTH);
        assert_eq!(resolved.height, DEFAULT_HEIGHT);
        assert_eq!(resolved.stroke_color, Rgba::BLACK);
        assert_eq!(resolved.overlay_url, None);
        assert_eq!(resolved.background_url, None);
    }

    #[test]
    fn test_resolve_parses_values() {
        let query = BannerQuery {
            width: Some("400".to_string()),
            bg_color: Some("#123456".to_string()),
            line_width: Some("0".to_string()),
            scale_factor: Some("0.5".to_string()),
            ..query_with_csv()
        };
        let resolved = query.resolve(None).unwrap();
        assert_eq!(resolved.width, 400);
        assert_eq!(resolved.background_color, Rgba::opaque(0x12, 0x34, 0x56));
        assert_eq!(resolved.stroke_width, 0.0);
        assert!((resolved.scale_factor - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_resolve_rejects_malformed_number_and_color() {
        let bad_width = BannerQuery {
            width: Some("wide".to_string()),
            ..query_with_csv()
        };
        assert!(matches!(
            bad_width.resolve(None),
            Err(BannerError::InvalidRequest(msg)) if msg.contains("width")
        ));

        let bad_color = BannerQuery {
            text_color: Some("#zz".to_string()),
            ..query_with_csv()
        };
        assert!(matches!(
            bad_color.resolve(None),
            Err(BannerError::InvalidRequest(msg)) if msg.contains("textColor")
        ));
    }

    #[test]
    fn test_resolve_uses_default_overlay_only_when_absent() {
        let resolved = query_with_csv()
            .resolve(Some("https://cdn.example.com/fallback.png"))
            .unwrap();
        assert_eq!(
            resolved.overlay_url.as_deref(),
            Some("https://cdn.example.com/fallback.png")
        );

        let explicit = BannerQuery {
            img_url: Some("https://cdn.example.com/mine.png".to_string()),
            ..query_with_csv()
        };
        let resolved = explicit
            .resolve(Some("https://cdn.example.com/fallback.png"))
            .unwrap();
        assert_eq!(
            resolved.overlay_url.as_deref(),
            Some("https://cdn.example.com/mine.png")
        );
    }

    #[test]
    fn test_into_request_precedence_query_then_csv_then_default() {
        let query = BannerQuery {
            option1: Some("From query".to_string()),
            ..query_with_csv()
        };
        let row = BannerRow {
            text: Some("From CSV".to_string()),
            option1: Some("CSV one".to_string()),
            option2: Some("CSV two".to_string()),
            option3: Some("   ".to_string()),
        };
        let request = query.resolve(None).unwrap().into_request(row, None, None);

        assert_eq!(request.main_text, "From CSV");
        assert_eq!(
            request.options,
            vec!["From query", "CSV two", "Option 3"]
        );
    }

    #[test]
    fn test_into_request_empty_row_uses_defaults() {
        let request = query_with_csv()
            .resolve(None)
            .unwrap()
            .into_request(BannerRow::default(), None, None);
        assert_eq!(request.main_text, DEFAULT_MAIN_TEXT);
        assert_eq!(request.options, vec!["Option 1", "Option 2", "Option 3"]);
    }
}
