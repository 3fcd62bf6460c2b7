use crate::domain::model::{Cep, Coordinate, GeocodeSource};
use crate::domain::ports::Geocoder;
use crate::utils::error::Result;
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;

pub const DEFAULT_SEARCH_URL: &str = "https://www.google.com/search";
pub const DEFAULT_VIACEP_URL: &str = "https://viacep.com.br";
pub const DEFAULT_CITY_URL: &str = "https://api.api-ninjas.com";

// Plain HTTP clients get blocked by the search engine.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

const CEP_PATTERN: &str = r"\b\d{5}-\d{3}\b";

/// Postal-code secondary path, last in the cascade and reused as the
/// out-of-region recovery step. Three stages:
///
/// 1. search-engine query for the institution name, scanning the result
///    text for the first `DDDDD-DDD` token (no ranking, first match wins);
/// 2. ViaCEP lookup turning the CEP into a city name;
/// 3. keyed city-to-coordinate lookup, taking the first entry that carries
///    both latitude and longitude.
pub struct CepResolver {
    client: Client,
    search_url: String,
    viacep_url: String,
    city_url: String,
    city_api_key: String,
    cep_pattern: Regex,
}

impl CepResolver {
    pub fn new(client: Client, city_api_key: String) -> Self {
        Self::with_endpoints(
            client,
            DEFAULT_SEARCH_URL,
            DEFAULT_VIACEP_URL,
            DEFAULT_CITY_URL,
            city_api_key,
        )
    }

    pub fn with_endpoints(
        client: Client,
        search_url: impl Into<String>,
        viacep_url: impl Into<String>,
        city_url: impl Into<String>,
        city_api_key: String,
    ) -> Self {
        Self {
            client,
            search_url: search_url.into(),
            viacep_url: viacep_url.into(),
            city_url: city_url.into(),
            city_api_key,
            // The pattern is a literal, so compilation cannot fail.
            cep_pattern: Regex::new(CEP_PATTERN).unwrap(),
        }
    }

    async fn find_cep(&self, query: &str) -> Result<Option<Cep>> {
        let response = self
            .client
            .get(&self.search_url)
            .query(&[("q", format!("CEP de {}", query))])
            .header(reqwest::header::USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::debug!("CEP search returned status {}", response.status());
            return Ok(None);
        }

        let body = response.text().await?;
        Ok(self
            .cep_pattern
            .find(&body)
            .and_then(|m| Cep::parse(m.as_str())))
    }

    async fn city_for_cep(&self, cep: &Cep) -> Result<Option<String>> {
        let url = format!("{}/ws/{}/json/", self.viacep_url, cep);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            tracing::debug!("ViaCEP returned status {}", response.status());
            return Ok(None);
        }

        let body: serde_json::Value = response.json().await?;
        // ViaCEP flags unknown codes with an "erro" member instead of a
        // non-200 status.
        if body.get("erro").is_some() {
            tracing::debug!("ViaCEP has no entry for {}", cep);
            return Ok(None);
        }

        Ok(body
            .get("localidade")
            .and_then(|v| v.as_str())
            .map(str::to_owned))
    }

    async fn city_coordinates(&self, city: &str) -> Result<Option<Coordinate>> {
        let url = format!("{}/v1/geocoding", self.city_url);
        let response = self
            .client
            .get(&url)
            .query(&[("city", city)])
            .header("X-Api-Key", self.city_api_key.as_str())
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::debug!("City lookup returned status {}", response.status());
            return Ok(None);
        }

        let body: serde_json::Value = response.json().await?;
        let Some(entries) = body.as_array() else {
            tracing::debug!("Unexpected city lookup response shape for {}", city);
            return Ok(None);
        };

        Ok(entries.iter().find_map(|entry| {
            Coordinate::from_values(entry.get("latitude")?, entry.get("longitude")?)
        }))
    }
}

#[async_trait]
impl Geocoder for CepResolver {
    fn source(&self) -> GeocodeSource {
        GeocodeSource::CepLookup
    }

    async fn resolve(&self, query: &str) -> Result<Option<Coordinate>> {
        let Some(cep) = self.find_cep(query).await? else {
            tracing::debug!("No CEP found for: {}", query);
            return Ok(None);
        };
        tracing::debug!("Found CEP {} for: {}", cep, query);

        let Some(city) = self.city_for_cep(&cep).await? else {
            return Ok(None);
        };

        self.city_coordinates(&city).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn resolver(server: &MockServer) -> CepResolver {
        CepResolver::with_endpoints(
            Client::new(),
            server.url("/search"),
            server.base_url(),
            server.base_url(),
            "test-key".to_string(),
        )
    }

    #[tokio::test]
    async fn full_postal_path_resolves_a_city_coordinate() {
        let server = MockServer::start();
        let search = server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(200)
                .body("<html>Endereço: Rua A, 90000-000, Porto Alegre</html>");
        });
        let viacep = server.mock(|when, then| {
            when.method(GET).path("/ws/90000-000/json/");
            then.status(200).json_body(serde_json::json!({
                "cep": "90000-000",
                "localidade": "Porto Alegre",
                "uf": "RS"
            }));
        });
        let city = server.mock(|when, then| {
            when.method(GET)
                .path("/v1/geocoding")
                .query_param("city", "Porto Alegre")
                .header("X-Api-Key", "test-key");
            then.status(200).json_body(serde_json::json!([
                {"name": "Porto Alegre", "country": "BR"},
                {"name": "Porto Alegre", "latitude": -30.03, "longitude": -51.23}
            ]));
        });

        let result = resolver(&server).resolve("Escola W").await.unwrap();

        search.assert();
        viacep.assert();
        city.assert();
        let coordinate = result.unwrap();
        assert_eq!(coordinate.lat, -30.03);
        assert_eq!(coordinate.lon, -51.23);
    }

    #[tokio::test]
    async fn page_without_cep_token_is_a_miss() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(200).body("<html>no postal codes here 1234-567</html>");
        });

        let result = resolver(&server).resolve("Escola W").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn viacep_erro_marker_stops_the_chain() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(200).body("CEP 99999-999");
        });
        let viacep = server.mock(|when, then| {
            when.method(GET).path("/ws/99999-999/json/");
            then.status(200).json_body(serde_json::json!({"erro": true}));
        });
        let city = server.mock(|when, then| {
            when.method(GET).path("/v1/geocoding");
            then.status(200).json_body(serde_json::json!([]));
        });

        let result = resolver(&server).resolve("Escola W").await.unwrap();

        viacep.assert();
        city.assert_hits(0);
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn city_entries_without_coordinates_are_a_miss() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(200).body("CEP 90000-000");
        });
        server.mock(|when, then| {
            when.method(GET).path("/ws/90000-000/json/");
            then.status(200)
                .json_body(serde_json::json!({"localidade": "Porto Alegre"}));
        });
        server.mock(|when, then| {
            when.method(GET).path("/v1/geocoding");
            then.status(200).json_body(serde_json::json!([
                {"name": "Porto Alegre"},
                {"name": "Porto Alegre", "latitude": "abc", "longitude": "def"}
            ]));
        });

        let result = resolver(&server).resolve("Escola W").await.unwrap();
        assert!(result.is_none());
    }
}
