//! Fans out availability lookups across every building on campus

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use futures::{StreamExt, stream};
use moka::future::Cache;

use super::availability::fetch_availability;
use super::models::{FreeRoomsResult, SlotAlignment};
use super::range::{RangeKey, TimeRange};
use crate::core::AppConfig;
use crate::portal::Portal;

/// Completed campus-wide results keyed by the requested range
pub type RoomsCache = Cache<RangeKey, Arc<Vec<FreeRoomsResult>>>;

const ROOMS_CACHE_CAPACITY: u64 = 1024;

pub fn new_rooms_cache(ttl: Duration) -> RoomsCache {
    Cache::builder()
        .max_capacity(ROOMS_CACHE_CAPACITY)
        .time_to_live(ttl)
        .build()
}

#[derive(Clone, Copy, Debug)]
pub struct FanOutOptions {
    /// Upper bound on in-flight timetable requests
    pub max_concurrent_fetches: usize,
    pub alignment: SlotAlignment,
}

impl Default for FanOutOptions {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: 8,
            alignment: SlotAlignment::Exact,
        }
    }
}

impl From<&AppConfig> for FanOutOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            max_concurrent_fetches: config.max_concurrent_fetches,
            alignment: config.slot_alignment,
        }
    }
}

/// Free rooms of every building for `range`, in directory order.
///
/// Served from `cache` when possible. Otherwise the building directory is
/// fetched (failing the whole call if that fails) and each building is
/// looked up with at most `max_concurrent_fetches` requests in flight.
/// Only fully successful results are cached so a flaky building gets
/// retried on the next request.
pub async fn get_free_rooms(
    portal: &dyn Portal,
    cache: &RoomsCache,
    range: &TimeRange,
    options: FanOutOptions,
) -> Result<Arc<Vec<FreeRoomsResult>>> {
    let key = range.cache_key();
    if let Some(cached) = cache.get(&key).await {
        tracing::debug!("Serving free rooms for {} from cache", range);
        return Ok(cached);
    }

    let buildings = portal
        .fetch_buildings()
        .await
        .context("Failed to fetch building directory")?;

    let lookups: Vec<_> = buildings
        .iter()
        .map(|building| fetch_availability(portal, building, range, options.alignment))
        .collect();

    // `buffered` yields in input order regardless of completion order
    let results: Vec<FreeRoomsResult> = stream::iter(lookups)
        .buffered(options.max_concurrent_fetches.max(1))
        .collect()
        .await;

    let failed = results.iter().filter(|r| !r.is_ok()).count();
    let results = Arc::new(results);
    if failed == 0 {
        cache.insert(key, Arc::clone(&results)).await;
    } else {
        tracing::warn!(
            "{} of {} buildings failed for {}, not caching",
            failed,
            results.len(),
            range
        );
    }

    Ok(results)
}
