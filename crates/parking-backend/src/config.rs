use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::RwLock;
use url::Url;

use crate::parking::DEFAULT_LOCATION;
use crate::places::LatLng;

const APP_NAME: &str = "parking-spot";
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding [`Config::base_url`]
pub const BASE_URL_ENV: &str = "PARKING_BASE_URL";
/// Environment variable overriding [`Config::places_api_key`]
pub const PLACES_KEY_ENV: &str = "GOOGLE_PLACES_API_KEY";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub places_api_key: Option<String>,
    #[serde(default = "default_places_base_url")]
    pub places_base_url: String,
    #[serde(default = "default_nearby_radius")]
    pub nearby_radius_km: f64,
    #[serde(default = "default_search_radius")]
    pub search_radius_km: f64,
    #[serde(default = "default_spots_limit")]
    pub spots_limit: u32,
    /// ISO country used to restrict address suggestions
    #[serde(default = "default_country_code")]
    pub country_code: String,
    /// Quiet period before a typed query is searched
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Fallback position when the device location is unknown
    #[serde(default = "default_location")]
    pub default_location: LatLng,
}

fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_places_base_url() -> String {
    "https://maps.googleapis.com/maps/api/place".to_string()
}

fn default_nearby_radius() -> f64 {
    5.0
}

fn default_search_radius() -> f64 {
    10.0
}

fn default_spots_limit() -> u32 {
    10
}

fn default_country_code() -> String {
    "BR".to_string()
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_max_results() -> usize {
    5
}

fn default_location() -> LatLng {
    LatLng {
        lat: DEFAULT_LOCATION.latitude,
        lng: DEFAULT_LOCATION.longitude,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            places_api_key: None,
            places_base_url: default_places_base_url(),
            nearby_radius_km: default_nearby_radius(),
            search_radius_km: default_search_radius(),
            spots_limit: default_spots_limit(),
            country_code: default_country_code(),
            debounce_ms: default_debounce_ms(),
            max_results: default_max_results(),
            default_location: default_location(),
        }
    }
}

impl Config {
    /// Applies overrides from a variable lookup (normally `std::env::var`)
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(BASE_URL_ENV).filter(|v| !v.is_empty()) {
            self.base_url = url;
        }
        if let Some(key) = lookup(PLACES_KEY_ENV).filter(|v| !v.is_empty()) {
            self.places_api_key = Some(key);
        }
    }

    /// Parses the backend base URL
    pub fn base_url(&self) -> Result<Url> {
        Url::parse(&self.base_url).with_context(|| format!("Invalid base URL: {}", self.base_url))
    }

    /// Parses the places API base URL
    pub fn places_base_url(&self) -> Result<Url> {
        Url::parse(&self.places_base_url)
            .with_context(|| format!("Invalid places URL: {}", self.places_base_url))
    }
}

/// Configuration manager
pub struct ConfigManager {
    path: PathBuf,
    config: RwLock<Config>,
}

impl ConfigManager {
    /// Loads the config file (if any) and applies environment overrides
    pub fn new() -> Result<Self> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;

        let path = config_dir.join(CONFIG_FILE);
        let mut config = Self::load_from(&path)?;
        config.apply_env(|name| std::env::var(name).ok());

        Ok(Self {
            path,
            config: RwLock::new(config),
        })
    }

    /// Loads the config file at `path` without environment overrides
    pub fn open(path: PathBuf) -> Result<Self> {
        let config = Self::load_from(&path)?;
        Ok(Self {
            path,
            config: RwLock::new(config),
        })
    }

    /// Reads a config file, falling back to defaults when it is missing or malformed
    pub fn load_from(path: &std::path::Path) -> Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let data = std::fs::read_to_string(path).context("Failed to read config file")?;
        Ok(serde_json::from_str(&data).unwrap_or_else(|e| {
            tracing::warn!("Ignoring malformed config file {}: {}", path.display(), e);
            Config::default()
        }))
    }

    /// Gets a copy of the current configuration
    pub fn get(&self) -> Config {
        self.config
            .read()
            .map(|c| c.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Path of the backing config file
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Updates and saves the configuration
    pub fn save(&self, config: Config) -> Result<()> {
        let json = serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
        std::fs::write(&self.path, json).context("Failed to write config file")?;

        match self.config.write() {
            Ok(mut guard) => *guard = config,
            Err(poisoned) => *poisoned.into_inner() = config,
        }

        Ok(())
    }

    /// Returns the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("Could not determine config directory")?
            .join(APP_NAME))
    }
}
