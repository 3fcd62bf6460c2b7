use crate::domain::model::{Coordinate, GeocodeSource};
use crate::domain::ports::Geocoder;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;

pub const DEFAULT_BASE_URL: &str = "https://geocode.search.hereapi.com";

/// Keyed free-text lookup against the HERE Geocoding and Search API.
pub struct Here {
    client: Client,
    base_url: String,
    api_key: String,
}

impl Here {
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
impl Geocoder for Here {
    fn source(&self) -> GeocodeSource {
        GeocodeSource::Here
    }

    async fn resolve(&self, query: &str) -> Result<Option<Coordinate>> {
        let url = format!("{}/v1/geocode", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("q", query), ("apiKey", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::debug!("HERE returned status {}", response.status());
            return Ok(None);
        }

        let body: serde_json::Value = response.json().await?;
        let coordinate = body
            .pointer("/items/0/position")
            .and_then(|position| Coordinate::from_values(position.get("lat")?, position.get("lng")?));
        Ok(coordinate)
    }
}
