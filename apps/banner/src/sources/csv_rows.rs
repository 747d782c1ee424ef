//! CSV row source over HTTP.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{BannerRow, RowSource};
use crate::banner::error::BannerError;

#[derive(Clone)]
pub struct HttpCsvRowSource {
    client: Client,
}

impl HttpCsvRowSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RowSource for HttpCsvRowSource {
    async fn first_row(&self, url: &str) -> Result<BannerRow, BannerError> {
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
        debug!(url, bytes = body.len(), "Fetched banner CSV");

        parse_first_row(&body)
    }
}

/// Parses a headed CSV document and returns its first data row.
///
/// Columns are matched by header name; unknown columns are ignored and
/// missing ones stay `None`.
pub fn parse_first_row(data: &[u8]) -> Result<BannerRow, BannerError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(data);

    match reader.deserialize::<BannerRow>().next() {
        None => Ok(BannerRow::default()),
        Some(Ok(row)) => Ok(normalize(row)),
        Some(Err(e)) => Err(BannerError::Decode(format!("malformed CSV: {e}"))),
    }
}

fn normalize(row: BannerRow) -> BannerRow {
    let clean = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
    BannerRow {
        text: clean(row.text),
        option1: clean(row.option1),
        option2: clean(row.option2),
        option3: clean(row.option3),
    }
}
