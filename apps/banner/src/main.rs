mod banner;
mod config;
mod errors;
mod fonts;
mod layout;
mod render;
mod routes;
mod sources;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::banner::composer::BannerComposer;
use crate::config::Config;
use crate::fonts::{FontRegistry, FontSet, MetricTableFont, OutlineFont};
use crate::layout::LayoutConfig;
use crate::routes::build_router;
use crate::sources::{HttpCsvRowSource, HttpImageSource};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting banner service v{}", env!("CARGO_PKG_VERSION"));

    // Register fonts before the first request; the registry is read-only afterwards
    let fonts = load_fonts(&config).await?;

    // Shared HTTP client for CSV and image fetches
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.fetch_timeout_secs))
        .build()
        .context("failed to build HTTP client")?;
    info!("HTTP client initialized (timeout: {}s)", config.fetch_timeout_secs);

    // Build app state
    let state = AppState {
        composer: Arc::new(BannerComposer::new(fonts, LayoutConfig::default())),
        rows: Arc::new(HttpCsvRowSource::new(client.clone())),
        images: Arc::new(HttpImageSource::new(client)),
        render_permits: Arc::new(Semaphore::new(config.max_concurrent_renders)),
        config: config.clone(),
    };
    info!("Render concurrency: {}", config.max_concurrent_renders);

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Registers the built-in metric fonts plus `FONT_PATH` when set, then resolves
/// `FONT_FAMILY` for every text role.
async fn load_fonts(config: &Config) -> Result<FontSet> {
    let mut registry = FontRegistry::new();
    registry.register(Arc::new(MetricTableFont::inter()));
    registry.register(Arc::new(MetricTableFont::oswald()));

    match &config.font_path {
        Some(path) => {
            let data = tokio::fs::read(path)
                .await
                .with_context(|| format!("failed to read font file {path}"))?;
            let font = OutlineFont::from_bytes(config.font_family.clone(), data)
                .with_context(|| format!("failed to load font file {path}"))?;
            registry.register(Arc::new(font));
            info!("Registered font '{}' from {path}", config.font_family);
        }
        None => warn!(
            "FONT_PATH not set; '{}' renders with built-in block glyphs",
            config.font_family
        ),
    }

    let family = config.font_family.as_str();
    let fonts = FontSet::from_registry(&registry, family, family, family)?;
    info!("Fonts registered: {:?}", registry.families());
    Ok(fonts)
}
