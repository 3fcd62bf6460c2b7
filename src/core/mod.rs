pub mod pipeline;
pub mod region;
pub mod report;

pub use crate::domain::model::{Coordinate, GeocodeSource, InstitutionRecord, ResolutionOutcome};
pub use crate::domain::ports::Geocoder;
pub use crate::utils::error::Result;
