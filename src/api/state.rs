use std::sync::Arc;
use std::time::Duration;

use crate::core::AppConfig;
use crate::portal::Portal;
use crate::rooms::{RoomsCache, new_rooms_cache};

pub struct AppState {
    pub portal: Arc<dyn Portal>,
    // Campus-wide results keyed by requested range
    pub cache: RoomsCache,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(portal: Arc<dyn Portal>, config: AppConfig) -> Self {
        let cache = new_rooms_cache(Duration::from_secs(config.cache_ttl_secs));
        Self {
            portal,
            cache,
            config,
        }
    }
}
