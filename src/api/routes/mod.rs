//! API routes module

pub mod buildings;
pub mod rooms;

use std::sync::{Arc, RwLock};

use crate::api::state::AppState;
use axum::Router;

type SharedState = Arc<RwLock<AppState>>;

/// Create the combined API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Free rooms across campus
        .nest("/rooms", rooms::router())
        // Building directory
        .nest("/buildings", buildings::router())
}
