use crate::config::AppConfig;
use crate::utils::error::Result;
use serde::Deserialize;
use std::path::Path;

/// On-disk configuration. Every field is optional; missing values fall
/// back to the built-in defaults in `AppConfig`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub source: Option<SourceSection>,
    pub geocoding: Option<GeocodingSection>,
    pub region: Option<RegionSection>,
    pub output: Option<OutputSection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceSection {
    pub listing_url: Option<String>,
    pub start_marker: Option<String>,
    pub end_marker: Option<String>,
    pub state_tag: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeocodingSection {
    pub opencage_key: Option<String>,
    pub google_key: Option<String>,
    pub here_key: Option<String>,
    pub city_lookup_key: Option<String>,
    pub request_timeout_seconds: Option<u64>,
    pub politeness_delay_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegionSection {
    pub lat_min: Option<f64>,
    pub lat_max: Option<f64>,
    pub lon_min: Option<f64>,
    pub lon_max: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputSection {
    pub path: Option<String>,
    pub map_filename: Option<String>,
}

impl TomlConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Overlays every present value onto `config`.
    pub fn apply(self, config: &mut AppConfig) {
        if let Some(source) = self.source {
            apply_option(source.listing_url, &mut config.source.listing_url);
            apply_option(source.start_marker, &mut config.source.start_marker);
            apply_option(source.end_marker, &mut config.source.end_marker);
            apply_option(source.state_tag, &mut config.source.state_tag);
        }
        if let Some(geocoding) = self.geocoding {
            if geocoding.opencage_key.is_some() {
                config.geocoding.opencage_key = geocoding.opencage_key;
            }
            if geocoding.google_key.is_some() {
                config.geocoding.google_key = geocoding.google_key;
            }
            if geocoding.here_key.is_some() {
                config.geocoding.here_key = geocoding.here_key;
            }
            if geocoding.city_lookup_key.is_some() {
                config.geocoding.city_lookup_key = geocoding.city_lookup_key;
            }
            apply_option(
                geocoding.request_timeout_seconds,
                &mut config.geocoding.request_timeout_seconds,
            );
            apply_option(
                geocoding.politeness_delay_seconds,
                &mut config.geocoding.politeness_delay_seconds,
            );
        }
        if let Some(region) = self.region {
            apply_option(region.lat_min, &mut config.region.lat_min);
            apply_option(region.lat_max, &mut config.region.lat_max);
            apply_option(region.lon_min, &mut config.region.lon_min);
            apply_option(region.lon_max, &mut config.region.lon_max);
        }
        if let Some(output) = self.output {
            apply_option(output.path, &mut config.output.path);
            apply_option(output.map_filename, &mut config.output.map_filename);
        }
    }
}

fn apply_option<T>(value: Option<T>, target: &mut T) {
    if let Some(value) = value {
        *target = value;
    }
}
