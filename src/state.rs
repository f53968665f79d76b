//! Shared application state threaded through the router.

use crate::config::AppConfig;
use crate::db::Database;
use crate::session::SessionRegistry;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub sessions: SessionRegistry,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(db: Database, config: AppConfig) -> Self {
        Self {
            db,
            sessions: SessionRegistry::new(),
            config,
        }
    }
}
