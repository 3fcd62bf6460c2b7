use crate::domain::model::{Coordinate, GeocodeSource};
use crate::utils::error::Result;
use async_trait::async_trait;

/// One external geocoding service.
///
/// `Ok(Some(_))` is a hit, `Ok(None)` a clean miss (the service answered
/// but had nothing usable), `Err(_)` a transport or decode failure. The
/// pipeline collapses the last two into "no result"; implementations never
/// panic on malformed payloads.
#[async_trait]
pub trait Geocoder: Send + Sync {
    fn source(&self) -> GeocodeSource;
    async fn resolve(&self, query: &str) -> Result<Option<Coordinate>>;
}

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}
