use std::time::Duration;

use anyhow::Result;

use crate::core::AppConfig;
use crate::portal::PortalClient;
use crate::rooms::{FanOutOptions, SlotAlignment, TimeRange, get_free_rooms, new_rooms_cache};

pub async fn run(
    from: Option<String>,
    to: Option<String>,
    alignment: Option<SlotAlignment>,
) -> Result<()> {
    let mut config = AppConfig::default();
    if let Some(alignment) = alignment {
        config.slot_alignment = alignment;
    }

    let range = TimeRange::from_params(from.as_deref(), to.as_deref())?;
    let portal = PortalClient::from_config(&config)?;
    let cache = new_rooms_cache(Duration::from_secs(config.cache_ttl_secs));

    let results = get_free_rooms(&portal, &cache, &range, FanOutOptions::from(&config)).await?;
    println!("{}", serde_json::to_string_pretty(&results)?);

    Ok(())
}
