use crate::domain::model::{Coordinate, GeocodeSource};
use crate::domain::ports::Geocoder;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;

pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com";

/// Keyed free-text lookup against the Google Maps Geocoding API. Unlike
/// the other services this one signals errors in-band through `status`.
pub struct GoogleMaps {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GoogleMaps {
    pub fn new(client: Client, api_key: String) -> Self {
        Self::with_base_url(client, DEFAULT_BASE_URL, api_key)
    }

    pub fn with_base_url(client: Client, base_url: impl Into<String>, api_key: String) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key,
        }
    }
}

#[async_trait]
impl Geocoder for GoogleMaps {
    fn source(&self) -> GeocodeSource {
        GeocodeSource::GoogleMaps
    }

    async fn resolve(&self, query: &str) -> Result<Option<Coordinate>> {
        let url = format!("{}/maps/api/geocode/json", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("address", query), ("key", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::debug!("Google Maps returned status {}", response.status());
            return Ok(None);
        }

        let body: serde_json::Value = response.json().await?;
        if body.get("status").and_then(|s| s.as_str()) != Some("OK") {
            return Ok(None);
        }

        let coordinate = body
            .pointer("/results/0/geometry/location")
            .and_then(|location| Coordinate::from_values(location.get("lat")?, location.get("lng")?));
        Ok(coordinate)
    }
}
