use anyhow::Result;

use crate::api::public::buildings::BuildingResponse;
use crate::core::AppConfig;
use crate::portal::{Portal, PortalClient};

pub async fn run() -> Result<()> {
    let config = AppConfig::default();
    let portal = PortalClient::from_config(&config)?;

    let buildings: Vec<BuildingResponse> = portal
        .fetch_buildings()
        .await?
        .into_iter()
        .map(|building| BuildingResponse {
            id: building.id,
            label: building.label,
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&buildings)?);

    Ok(())
}
