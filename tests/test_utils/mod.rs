//! Test utilities for integration tests
use std::fs;
use std::sync::{Arc, RwLock};

use axum::{Router, body::Body};
use mockito::{Matcher, Mock, ServerGuard};

use freerooms::api::AppState;
use freerooms::api::app;
use freerooms::core::AppConfig;
use freerooms::portal::PortalClient;
use freerooms::rooms::SlotAlignment;

/// Config pointing at a mock portal
pub fn test_config(portal_url: &str) -> AppConfig {
    AppConfig {
        portal_url: portal_url.to_string(),
        max_concurrent_fetches: 4,
        cache_ttl_secs: 600,
        response_cache_secs: 600,
        upstream_timeout_secs: Some(5),
        slot_alignment: SlotAlignment::Exact,
    }
}

/// Creates a test application router backed by the portal at `portal_url`.
pub fn test_app(portal_url: &str) -> Router {
    let config = test_config(portal_url);
    let portal = PortalClient::from_config(&config).expect("Failed to build portal client");
    let app_state = AppState::new(Arc::new(portal), config);
    app(Arc::new(RwLock::new(app_state)))
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not utf-8")
}

/// Serve the two-building directory fixture
pub async fn mock_directory(server: &mut ServerGuard) -> Mock {
    let body = fs::read_to_string("./tests/data/buildings.js").unwrap();
    server
        .mock("GET", "/combo_call_new.php")
        .match_query(Matcher::UrlEncoded("sw".into(), "rooms_".into()))
        .with_status(200)
        .with_header("content-type", "text/javascript")
        .with_body(body)
        .create_async()
        .await
}

/// Serve the timetable fixture of `building_id` for 11-03-2024
pub async fn mock_timetable(server: &mut ServerGuard, building_id: &str) -> Mock {
    let path = format!(
        "./tests/data/timetable_{}.json",
        building_id.to_lowercase()
    );
    let body = fs::read_to_string(path).unwrap();
    server
        .mock("GET", "/rooms_call_new.php")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("views".into(), "rooms".into()),
            Matcher::UrlEncoded("include".into(), "rooms".into()),
            Matcher::UrlEncoded("sede".into(), building_id.into()),
            Matcher::UrlEncoded("date".into(), "11-03-2024".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}
