use crate::domain::model::{Coordinate, GeocodeSource};
use crate::domain::ports::Geocoder;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;

pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

// Nominatim's usage policy requires an identifying agent.
const USER_AGENT: &str = "concurso-map/0.1 (+https://github.com/concurso-map)";

/// Free, keyless free-text lookup. First in the cascade and rate-sensitive,
/// which is why the pipeline spaces calls out.
pub struct Nominatim {
    client: Client,
    base_url: String,
}

impl Nominatim {
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl Geocoder for Nominatim {
    fn source(&self) -> GeocodeSource {
        GeocodeSource::Nominatim
    }

    async fn resolve(&self, query: &str) -> Result<Option<Coordinate>> {
        let url = format!("{}/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("q", query), ("format", "json")])
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::debug!("Nominatim returned status {}", response.status());
            return Ok(None);
        }

        let body: serde_json::Value = response.json().await?;
        let coordinate = body
            .as_array()
            .and_then(|entries| entries.first())
            .and_then(|entry| Coordinate::from_values(entry.get("lat")?, entry.get("lon")?));
        Ok(coordinate)
    }
}
