//! Public types for the buildings API
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct BuildingResponse {
    pub id: String,
    pub label: String,
}
