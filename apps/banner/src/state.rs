use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::banner::composer::BannerComposer;
use crate::config::Config;
use crate::sources::{ImageSource, RowSource};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Built once at startup with the registered fonts; read-only afterwards.
    pub composer: Arc<BannerComposer>,
    pub rows: Arc<dyn RowSource>,
    pub images: Arc<dyn ImageSource>,
    /// Caps concurrent compositions; each one holds a full pixel buffer.
    pub render_permits: Arc<Semaphore>,
}
