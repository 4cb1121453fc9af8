//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the compass-map.toml file.
//! It provides a centralized way to configure the geocoding endpoint, the default
//! map viewport, the compass sensor and the terminal display size.

use crate::{Coordinate, Region, Span};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default configuration file name, looked up in the working directory
pub const CONFIG_FILE: &str = "compass-map.toml";

/// Application configuration loaded from compass-map.toml
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Geocoding service configuration
    pub geocoder: GeocoderConfig,
    /// Initial viewport and zoom configuration
    pub map: MapConfig,
    /// Heading sensor configuration
    pub compass: CompassConfig,
    /// Terminal rendering configuration
    pub display: DisplayConfig,
}

/// Forward geocoding endpoint (positionstack-compatible)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeocoderConfig {
    /// Endpoint URL without query string
    pub base_url: String,
    /// Access credential sent as the `access_key` query parameter
    pub access_key: String,
}

/// Map viewport configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MapConfig {
    /// Center shown before the first successful lookup
    pub default_center: Coordinate,
    /// Span (degrees) shown before the first successful lookup
    pub default_span: f64,
    /// Span (degrees) applied after a successful lookup
    pub zoom_delta: f64,
    /// Name of the pin placed at the default center on startup
    pub default_pin_name: String,
}

/// Simulated compass configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CompassConfig {
    /// Use the simulated compass; false means no heading sensor at all
    pub simulated: bool,
    /// Milliseconds between samples
    pub interval_ms: u64,
    /// Degrees the simulated heading turns per sample
    pub step_degrees: f64,
}

/// Terminal map grid size
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DisplayConfig {
    /// Grid width in characters (excluding border)
    pub width: usize,
    /// Grid height in characters (excluding border)
    pub height: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            geocoder: GeocoderConfig {
                base_url: "http://api.positionstack.com/v1/forward".to_string(),
                access_key: "Enter your own API_KEY".to_string(),
            },
            map: MapConfig {
                default_center: Coordinate::new(51.507222, -0.1275), // London
                default_span: 5.0,
                zoom_delta: 0.5,
                default_pin_name: "Pin".to_string(),
            },
            compass: CompassConfig {
                simulated: true,
                interval_ms: 500,
                step_degrees: 7.5,
            },
            display: DisplayConfig {
                width: 48,
                height: 16,
            },
        }
    }
}

impl MapConfig {
    /// Viewport shown before any lookup succeeds
    pub fn default_region(&self) -> Region {
        Region {
            center: self.default_center,
            span: Span::uniform(self.default_span),
        }
    }
}

impl Config {
    /// Load configuration from compass-map.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    log::info!(
                        "Loaded configuration from {} (geocoder: {})",
                        path.display(),
                        config.geocoder.base_url
                    );
                    config
                }
                Err(e) => {
                    log::warn!("Invalid config file format: {}", e);
                    log::warn!("Using default configuration");
                    Self::default()
                }
            },
            Err(_) => {
                log::info!(
                    "No config file found at {}, using default configuration",
                    path.display()
                );
                Self::default()
            }
        }
    }

    /// Save current configuration to the given path
    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path.as_ref(), contents)?;
        log::info!("Configuration saved to {}", path.as_ref().display());
        Ok(())
    }
}
