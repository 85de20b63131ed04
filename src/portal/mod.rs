//! Client for the scheduling portal's undocumented endpoints

pub mod models;

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;

use crate::core::AppConfig;
pub use models::{Building, RoomRecord, TimeSlot, Timetable};

/// Source of building and timetable data
#[async_trait]
pub trait Portal: Send + Sync {
    /// Fetch every building on campus in the order the portal lists them
    async fn fetch_buildings(&self) -> Result<Vec<Building>>;

    /// Fetch the occupancy timetable of a building for one day
    async fn fetch_timetable(&self, building_id: &str, date: NaiveDate) -> Result<Timetable>;
}

#[derive(Clone, Debug)]
pub struct PortalClient {
    base_url: String,
    client: Client,
}

impl PortalClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(
            &config.portal_url,
            config.upstream_timeout_secs.map(Duration::from_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_text(&self, url: reqwest::Url) -> Result<String> {
        let res = self.client.get(url.as_str()).send().await?;
        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            anyhow::bail!("Portal request to {} failed: {} ({})", url.path(), status, text);
        }
        res.text()
            .await
            .with_context(|| format!("Failed to read portal response from {}", url.path()))
    }
}

#[async_trait]
impl Portal for PortalClient {
    async fn fetch_buildings(&self) -> Result<Vec<Building>> {
        let mut url = reqwest::Url::parse(&format!("{}/combo_call_new.php", self.base_url))?;
        url.query_pairs_mut().append_pair("sw", "rooms_");

        let text = self.get_text(url).await?;
        let buildings = parse_buildings(&text)?;
        tracing::debug!("Fetched {} buildings", buildings.len());
        Ok(buildings)
    }

    async fn fetch_timetable(&self, building_id: &str, date: NaiveDate) -> Result<Timetable> {
        let mut url = reqwest::Url::parse(&format!("{}/rooms_call_new.php", self.base_url))?;
        url.query_pairs_mut()
            .append_pair("views", "rooms")
            .append_pair("include", "rooms")
            .append_pair("sede", building_id)
            .append_pair("date", &date.format("%d-%m-%Y").to_string());

        let text = self.get_text(url).await?;
        let timetable = serde_json::from_str(&text)
            .with_context(|| format!("Invalid timetable payload for building {}", building_id))?;
        Ok(timetable)
    }
}

/// The directory comes back as a JavaScript statement such as
/// `var elenco_sedi = [...];`. Pull the JSON value out of the first
/// assignment and parse it.
pub fn parse_buildings(body: &str) -> Result<Vec<Building>> {
    let statement = body.split(';').next().unwrap_or(body);
    let (_, value) = statement
        .split_once('=')
        .ok_or_else(|| anyhow!("No assignment found in building directory payload"))?;

    serde_json::from_str(value.trim()).context("Invalid building directory JSON")
}
