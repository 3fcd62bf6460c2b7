pub mod toml_config;

use crate::core::region::RegionBounds;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_ordered_pair, validate_range, validate_url, Validate,
};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use toml_config::TomlConfig;

#[derive(Debug, Clone, Parser)]
#[command(name = "concurso-map")]
#[command(about = "Maps teaching-vacancy listings onto an interactive map")]
pub struct CliConfig {
    /// TOML config file carrying API keys, region bounds and endpoints.
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub listing_url: Option<String>,

    #[arg(long)]
    pub output_path: Option<String>,

    /// Seconds to wait between institutions; 0 disables the delay.
    #[arg(long)]
    pub politeness_delay: Option<u64>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

/// Fully-merged runtime configuration: TOML file values overlaid with CLI
/// flags, with built-in defaults underneath.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub geocoding: GeocodingConfig,
    pub region: RegionConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub listing_url: String,
    pub start_marker: String,
    pub end_marker: String,
    pub state_tag: String,
}

#[derive(Debug, Clone)]
pub struct GeocodingConfig {
    pub opencage_key: Option<String>,
    pub google_key: Option<String>,
    pub here_key: Option<String>,
    pub city_lookup_key: Option<String>,
    pub request_timeout_seconds: u64,
    pub politeness_delay_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct RegionConfig {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub path: String,
    pub map_filename: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig {
                listing_url: "https://www.pciconcursos.com.br/professores/".to_string(),
                start_marker: "SÃO PAULO".to_string(),
                end_marker: "MINAS GERAIS".to_string(),
                state_tag: "SP".to_string(),
            },
            geocoding: GeocodingConfig {
                opencage_key: None,
                google_key: None,
                here_key: None,
                city_lookup_key: None,
                request_timeout_seconds: 10,
                politeness_delay_seconds: 1,
            },
            region: RegionConfig {
                lat_min: -24.0,
                lat_max: -20.0,
                lon_min: -54.0,
                lon_max: -44.0,
            },
            output: OutputConfig {
                path: "./output".to_string(),
                map_filename: "map_of_institutions.html".to_string(),
            },
        }
    }
}

impl AppConfig {
    /// Defaults, overlaid with the TOML file (when given), overlaid with
    /// CLI flags.
    pub fn load(cli: &CliConfig) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = &cli.config {
            let file = TomlConfig::from_file(path)?;
            file.apply(&mut config);
        }

        if let Some(url) = &cli.listing_url {
            config.source.listing_url = url.clone();
        }
        if let Some(path) = &cli.output_path {
            config.output.path = path.clone();
        }
        if let Some(delay) = cli.politeness_delay {
            config.geocoding.politeness_delay_seconds = delay;
        }

        Ok(config)
    }

    pub fn region_bounds(&self) -> RegionBounds {
        RegionBounds::new(
            self.region.lat_min..=self.region.lat_max,
            self.region.lon_min..=self.region.lon_max,
        )
    }

    pub fn politeness_delay(&self) -> Duration {
        Duration::from_secs(self.geocoding.politeness_delay_seconds)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.geocoding.request_timeout_seconds)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_url("source.listing_url", &self.source.listing_url)?;
        validate_non_empty_string("source.start_marker", &self.source.start_marker)?;
        validate_non_empty_string("source.end_marker", &self.source.end_marker)?;
        validate_non_empty_string("source.state_tag", &self.source.state_tag)?;

        validate_range("region.lat_min", self.region.lat_min, -90.0, 90.0)?;
        validate_range("region.lat_max", self.region.lat_max, -90.0, 90.0)?;
        validate_range("region.lon_min", self.region.lon_min, -180.0, 180.0)?;
        validate_range("region.lon_max", self.region.lon_max, -180.0, 180.0)?;
        validate_ordered_pair("region.lat", self.region.lat_min, self.region.lat_max)?;
        validate_ordered_pair("region.lon", self.region.lon_min, self.region.lon_max)?;

        validate_non_empty_string("output.path", &self.output.path)?;
        validate_non_empty_string("output.map_filename", &self.output.map_filename)?;

        Ok(())
    }
}
