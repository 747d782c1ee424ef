// External collaborators: the CSV row source and the image source.
// Both run strictly before composition; the composer never does I/O.

pub mod csv_rows;
pub mod remote_image;

use async_trait::async_trait;
use image::DynamicImage;
use serde::Deserialize;

use crate::banner::error::BannerError;

pub use csv_rows::HttpCsvRowSource;
pub use remote_image::HttpImageSource;

/// First data row of the banner CSV. Missing or blank columns are `None`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BannerRow {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub option1: Option<String>,
    #[serde(default)]
    pub option2: Option<String>,
    #[serde(default)]
    pub option3: Option<String>,
}

#[async_trait]
pub trait RowSource: Send + Sync {
    /// Fetches `url` and returns its first data row. An empty sheet yields an
    /// empty row, not an error.
    async fn first_row(&self, url: &str) -> Result<BannerRow, BannerError>;
}

#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Fetches and decodes the image at `url`.
    async fn fetch_image(&self, url: &str) -> Result<DynamicImage, BannerError>;
}
