use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use image::DynamicImage;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::banner::error::BannerError;
use crate::banner::request::BannerQuery;
use crate::errors::AppError;
use crate::sources::ImageSource;
use crate::state::AppState;

/// GET /banner
///
/// Resolves the query, fetches the CSV row and any images, then composes the
/// banner off the async runtime. Responds with `image/png`.
pub async fn handle_banner(
    State(state): State<AppState>,
    Query(query): Query<BannerQuery>,
) -> Result<Response, AppError> {
    let request_id = Uuid::new_v4();
    let span = info_span!("banner", %request_id);
    render_banner(state, query).instrument(span).await
}

async fn render_banner(state: AppState, query: BannerQuery) -> Result<Response, AppError> {
    let resolved = query.resolve(state.config.default_overlay_url.as_deref())?;

    let row = state.rows.first_row(&resolved.csv_url).await?;
    let (background, overlay) = tokio::try_join!(
        fetch_optional(state.images.as_ref(), resolved.background_url.as_deref()),
        fetch_optional(state.images.as_ref(), resolved.overlay_url.as_deref()),
    )?;
    let request = resolved.into_request(row, background, overlay);

    let _permit = state
        .render_permits
        .clone()
        .acquire_owned()
        .await
        .map_err(|e| AppError::Unavailable(e.to_string()))?;

    let composer = state.composer.clone();
    let banner = tokio::task::spawn_blocking(move || composer.compose(&request))
        .await
        .map_err(|e| anyhow::anyhow!("render task failed: {e}"))??;

    info!(
        width = banner.width,
        height = banner.height,
        bytes = banner.png.len(),
        "Banner rendered"
    );

    Ok(([(header::CONTENT_TYPE, "image/png")], banner.png).into_response())
}

async fn fetch_optional(
    images: &dyn ImageSource,
    url: Option<&str>,
) -> Result<Option<DynamicImage>, BannerError> {
    match url {
        Some(url) => images.fetch_image(url).await.map(Some),
        None => Ok(None),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
