use serde::{Deserialize, Serialize};
use std::fmt;

/// One teaching-vacancy listing as handed over by the scraper.
///
/// `id` is the record's unique key (assigned in scrape order); the display
/// name is free text and is used verbatim as the geocoding query, so two
/// records may share a name without colliding anywhere downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstitutionRecord {
    pub id: usize,
    pub name: String,
    pub location: String,
    pub vacancies: String,
    pub deadline: String,
}

/// A latitude/longitude pair in floating-point degrees.
///
/// Only constructed through checked parsing: provider payloads carry
/// coordinates as JSON numbers or as numeric strings, and anything else
/// (missing field, garbage text, NaN) must read as "no result".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Option<Self> {
        if lat.is_finite() && lon.is_finite() {
            Some(Self { lat, lon })
        } else {
            None
        }
    }

    /// Parses a pair out of two JSON values, accepting numbers and numeric
    /// strings (Nominatim returns `"lat": "-29.5"`, the keyed services
    /// return plain numbers).
    pub fn from_values(lat: &serde_json::Value, lon: &serde_json::Value) -> Option<Self> {
        Self::new(parse_component(lat)?, parse_component(lon)?)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lon)
    }
}

fn parse_component(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// A normalized Brazilian postal code (`DDDDD-DDD`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cep(String);

impl Cep {
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let bytes = raw.as_bytes();
        if bytes.len() != 9 || bytes[5] != b'-' {
            return None;
        }
        let digits_ok = bytes[..5].iter().chain(&bytes[6..]).all(u8::is_ascii_digit);
        digits_ok.then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which provider produced a coordinate. Used for counters and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeocodeSource {
    Nominatim,
    OpenCage,
    GoogleMaps,
    Here,
    CepLookup,
}

impl GeocodeSource {
    pub const ALL: [GeocodeSource; 5] = [
        GeocodeSource::Nominatim,
        GeocodeSource::OpenCage,
        GeocodeSource::GoogleMaps,
        GeocodeSource::Here,
        GeocodeSource::CepLookup,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            GeocodeSource::Nominatim => "Nominatim",
            GeocodeSource::OpenCage => "OpenCage",
            GeocodeSource::GoogleMaps => "Google Maps",
            GeocodeSource::Here => "HERE",
            GeocodeSource::CepLookup => "CEP Lookup",
        }
    }
}

impl fmt::Display for GeocodeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Terminal classification of one record. Exactly one per record; an
/// `OutOfRegion` may be revised to `Resolved` by the recovery attempt while
/// the pipeline still owns it, never after it lands in the report.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionOutcome {
    Resolved {
        coordinate: Coordinate,
        source: GeocodeSource,
    },
    OutOfRegion {
        coordinate: Coordinate,
    },
    NotFound,
}
