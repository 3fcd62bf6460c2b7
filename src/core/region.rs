use crate::domain::model::Coordinate;
use std::ops::RangeInclusive;

/// The bounding box a coordinate must fall into to count as resolved.
///
/// Containment is a closed-interval test on both axes, so a hit exactly on
/// a boundary value is inside.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionBounds {
    lat: RangeInclusive<f64>,
    lon: RangeInclusive<f64>,
}

impl RegionBounds {
    pub fn new(lat: RangeInclusive<f64>, lon: RangeInclusive<f64>) -> Self {
        Self { lat, lon }
    }

    pub fn contains(&self, coordinate: Coordinate) -> bool {
        self.lat.contains(&coordinate.lat) && self.lon.contains(&coordinate.lon)
    }

    /// Midpoint of the box, used as the map's initial center.
    pub fn center(&self) -> Coordinate {
        Coordinate {
            lat: (self.lat.start() + self.lat.end()) / 2.0,
            lon: (self.lon.start() + self.lon.end()) / 2.0,
        }
    }
}

impl Default for RegionBounds {
    /// Reference region for the target listings.
    fn default() -> Self {
        Self::new(-24.0..=-20.0, -54.0..=-44.0)
    }
}
