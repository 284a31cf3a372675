use std::sync::Arc;
use std::time::Instant;

use crate::config::AppConfig;
use crate::database::ConnectionManager;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<ConnectionManager>,
    pub config: AppConfig,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(db: Arc<ConnectionManager>, config: AppConfig) -> Self {
        Self {
            db,
            config,
            started_at: Instant::now(),
        }
    }
}
