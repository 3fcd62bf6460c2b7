pub mod config;
pub mod core;
pub mod domain;
pub mod providers;
pub mod render;
pub mod scrape;
pub mod storage;
pub mod utils;

pub use config::{AppConfig, CliConfig};
pub use core::pipeline::ResolutionPipeline;
pub use core::region::RegionBounds;
pub use core::report::{ReportSummary, ResolutionReport};
pub use domain::model::{Coordinate, GeocodeSource, InstitutionRecord, ResolutionOutcome};
pub use domain::ports::{Geocoder, Storage};
pub use storage::LocalStorage;
pub use utils::error::{GeoError, Result};
