use std::env;
use std::str::FromStr;

use crate::rooms::SlotAlignment;

pub const DEFAULT_PORTAL_URL: &str = "https://easycourse.unisa.it/AgendaStudenti";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub portal_url: String,
    pub max_concurrent_fetches: usize,
    pub cache_ttl_secs: u64,
    pub response_cache_secs: u64,
    pub upstream_timeout_secs: Option<u64>,
    pub slot_alignment: SlotAlignment,
}

/// Read an env var and parse it, falling back to `default` when the var
/// is missing or can't be parsed.
fn env_or<T>(name: &str, default: T) -> T
where
    T: FromStr,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid value for {}: {:?}", name, raw);
            default
        }),
        Err(_) => default,
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let portal_url = env::var("FREEROOMS_PORTAL_URL")
            .unwrap_or_else(|_| DEFAULT_PORTAL_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let max_concurrent_fetches = env_or("FREEROOMS_MAX_CONCURRENT_FETCHES", 8);
        let cache_ttl_secs = env_or("FREEROOMS_CACHE_TTL_SECS", 600);
        let response_cache_secs = env_or("FREEROOMS_RESPONSE_CACHE_SECS", 600);
        let upstream_timeout_secs = env::var("FREEROOMS_UPSTREAM_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| match raw.trim().parse() {
                Ok(secs) => Some(secs),
                Err(_) => {
                    tracing::warn!(
                        "Ignoring invalid value for FREEROOMS_UPSTREAM_TIMEOUT_SECS: {:?}",
                        raw
                    );
                    None
                }
            });
        let slot_alignment = env_or("FREEROOMS_SLOT_ALIGNMENT", SlotAlignment::Exact);

        Self {
            portal_url,
            max_concurrent_fetches,
            cache_ttl_secs,
            response_cache_secs,
            upstream_timeout_secs,
            slot_alignment,
        }
    }
}
