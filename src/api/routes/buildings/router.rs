//! Router for the buildings API

use std::sync::{Arc, RwLock};

use axum::{Router, extract::State, response::Json};

use super::public;
use crate::api::state::AppState;

type SharedState = Arc<RwLock<AppState>>;

async fn list_buildings(
    State(state): State<SharedState>,
) -> Result<Json<Vec<public::BuildingResponse>>, crate::api::public::ApiError> {
    let portal = Arc::clone(&state.read().expect("Unable to read share state").portal);

    let buildings = portal.fetch_buildings().await?;

    let resp = buildings
        .into_iter()
        .map(|building| public::BuildingResponse {
            id: building.id,
            label: building.label,
        })
        .collect();

    Ok(Json(resp))
}

/// Create the buildings router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", axum::routing::get(list_buildings))
}
