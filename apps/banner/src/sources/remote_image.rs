//! Image source over HTTP.

use async_trait::async_trait;
use image::DynamicImage;
use reqwest::Client;
use tracing::debug;

use super::ImageSource;
use crate::banner::error::BannerError;

#[derive(Clone)]
pub struct HttpImageSource {
    client: Client,
}

impl HttpImageSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageSource for HttpImageSource {
    async fn fetch_image(&self, url: &str) -> Result<DynamicImage, BannerError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| BannerError::fetch(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BannerError::fetch(url, format!("status {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| BannerError::fetch(url, e))?;
        // Decoding a large JPEG or PNG is CPU-bound; keep it off the async workers.
        let image = tokio::task::spawn_blocking(move || decode_image(&body))
            .await
            .map_err(|e| BannerError::Decode(format!("image decode task failed: {e}")))??;
        debug!(
            url,
            width = image.width(),
            height = image.height(),
            "Fetched banner image"
        );
        Ok(image)
    }
}

/// Decodes any format the `image` crate recognizes from its magic bytes.
pub fn decode_image(data: &[u8]) -> Result<DynamicImage, BannerError> {
    image::load_from_memory(data).map_err(|e| BannerError::Decode(format!("invalid image: {e}")))
}
