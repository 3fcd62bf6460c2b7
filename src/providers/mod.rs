// Adapters for the external geocoding services. Each file wraps one
// service behind the `Geocoder` port; base URLs are injectable so tests
// can point them at a mock server.

pub mod cep;
pub mod google;
pub mod here;
pub mod nominatim;
pub mod opencage;

pub use cep::CepResolver;
pub use google::GoogleMaps;
pub use here::Here;
pub use nominatim::Nominatim;
pub use opencage::OpenCage;

use crate::config::GeocodingConfig;
use crate::domain::ports::Geocoder;
use reqwest::Client;
use std::sync::Arc;

/// Builds the production cascade in priority order, plus the postal-code
/// resolver reused as the out-of-region recovery path.
///
/// Keyed services without a configured key are left out of the cascade;
/// the free services always participate.
pub fn standard_cascade(
    config: &GeocodingConfig,
    client: Client,
) -> (Vec<Arc<dyn Geocoder>>, Arc<dyn Geocoder>) {
    let mut cascade: Vec<Arc<dyn Geocoder>> = vec![Arc::new(Nominatim::new(client.clone()))];

    match &config.opencage_key {
        Some(key) => cascade.push(Arc::new(OpenCage::new(client.clone(), key.clone()))),
        None => tracing::warn!("OpenCage key not configured, skipping provider"),
    }
    match &config.google_key {
        Some(key) => cascade.push(Arc::new(GoogleMaps::new(client.clone(), key.clone()))),
        None => tracing::warn!("Google Maps key not configured, skipping provider"),
    }
    match &config.here_key {
        Some(key) => cascade.push(Arc::new(Here::new(client.clone(), key.clone()))),
        None => tracing::warn!("HERE key not configured, skipping provider"),
    }

    let cep = Arc::new(CepResolver::new(
        client,
        config.city_lookup_key.clone().unwrap_or_default(),
    ));
    cascade.push(cep.clone());

    (cascade, cep)
}
