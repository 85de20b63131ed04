//! Router for the rooms API

use std::sync::{Arc, RwLock};

use axum::{Router, extract::State, response::IntoResponse, response::Json};
use axum_extra::extract::Query;
use http::{HeaderValue, header};

use super::public;
use crate::api::state::AppState;
use crate::rooms::{FanOutOptions, TimeRange, get_free_rooms};

type SharedState = Arc<RwLock<AppState>>;

async fn rooms_handler(
    State(state): State<SharedState>,
    Query(params): Query<public::RoomsQuery>,
) -> Result<impl IntoResponse, crate::api::public::ApiError> {
    let range = TimeRange::from_params(params.datefrom.as_deref(), params.dateto.as_deref())?;

    let (portal, cache, options, max_age) = {
        let shared_state = state.read().expect("Unable to read share state");
        (
            Arc::clone(&shared_state.portal),
            shared_state.cache.clone(),
            FanOutOptions::from(&shared_state.config),
            shared_state.config.response_cache_secs,
        )
    };

    tracing::debug!("Looking up free rooms for {}", range);
    let results = get_free_rooms(portal.as_ref(), &cache, &range, options).await?;

    let cache_control = HeaderValue::from_str(&format!("public, max-age={}", max_age))?;
    Ok(([(header::CACHE_CONTROL, cache_control)], Json(results)))
}

/// Create the rooms router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", axum::routing::get(rooms_handler))
}
