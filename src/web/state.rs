use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::PipelineConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Pipeline settings; each request builds its own client from them.
    pub config: Arc<PipelineConfig>,
    /// Most recent successful report, served by a bare `/download_pdf`.
    pub latest_report: Arc<Mutex<Option<Uuid>>>,
}

impl AppState {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config: Arc::new(config),
            latest_report: Arc::new(Mutex::new(None)),
        }
    }
}
