use crate::domain::model::{Coordinate, GeocodeSource};
use crate::domain::ports::Geocoder;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;

pub const DEFAULT_BASE_URL: &str = "https://api.opencagedata.com";

/// Keyed free-text lookup against the OpenCage geocoding API.
pub struct OpenCage {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenCage {
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
impl Geocoder for OpenCage {
    fn source(&self) -> GeocodeSource {
        GeocodeSource::OpenCage
    }

    async fn resolve(&self, query: &str) -> Result<Option<Coordinate>> {
        let url = format!("{}/geocode/v1/json", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("q", query), ("key", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::debug!("OpenCage returned status {}", response.status());
            return Ok(None);
        }

        let body: serde_json::Value = response.json().await?;
        let coordinate = body
            .pointer("/results/0/geometry")
            .and_then(|geometry| Coordinate::from_values(geometry.get("lat")?, geometry.get("lng")?));
        Ok(coordinate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn geocoder(server: &MockServer) -> OpenCage {
        OpenCage::with_base_url(Client::new(), server.base_url(), "test-key".to_string())
    }

    #[tokio::test]
    async fn resolves_first_result_geometry() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/geocode/v1/json")
                .query_param("q", "Escola Y")
                .query_param("key", "test-key");
            then.status(200).json_body(serde_json::json!({
                "results": [
                    {"geometry": {"lat": 10.0, "lng": 10.0}},
                    {"geometry": {"lat": -22.0, "lng": -50.0}}
                ]
            }));
        });

        let result = geocoder(&server).resolve("Escola Y").await.unwrap();

        mock.assert();
        let coordinate = result.unwrap();
        assert_eq!(coordinate.lat, 10.0);
        assert_eq!(coordinate.lon, 10.0);
    }

    #[tokio::test]
    async fn empty_results_are_a_miss() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/geocode/v1/json");
            then.status(200).json_body(serde_json::json!({"results": []}));
        });

        let result = geocoder(&server).resolve("Escola Z").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn geometry_missing_longitude_is_a_miss() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/geocode/v1/json");
            then.status(200).json_body(serde_json::json!({
                "results": [{"geometry": {"lat": -22.0}}]
            }));
        });

        let result = geocoder(&server).resolve("Escola Y").await.unwrap();
        assert!(result.is_none());
    }
}
