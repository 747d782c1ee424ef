use thiserror::Error;

/// Failures of a single banner composition, including its fetch phase.
///
/// Every variant aborts the whole request; no partial raster is ever returned
/// and nothing is retried.
#[derive(Debug, Error)]
pub enum BannerError {
    /// A required upstream value (e.g. the CSV URL) was not supplied.
    #[error("Missing input: {0}")]
    MissingInput(String),

    /// A resolved request violates its invariants (zero size, negative stroke).
    #[error("Invalid banner request: {0}")]
    InvalidRequest(String),

    /// A collaborator request failed or returned a non-success status.
    #[error("Fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// Fetched bytes could not be decoded (image, CSV, or font file).
    #[error("Decode error: {0}")]
    Decode(String),

    /// A layout or raster invariant was violated. Indicates a bug, not bad input.
    #[error("Layout invariant violated: {0}")]
    Layout(String),

    #[error("Font family '{0}' is not registered")]
    FontNotRegistered(String),
}

impl BannerError {
    pub fn fetch(url: &str, reason: impl ToString) -> Self {
        BannerError::Fetch {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}
