use std::env;
use std::path::PathBuf;

use mapsync::SyncConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    /// Directory holding the administrative GeoJSON files.
    pub geojson_root: PathBuf,
    /// URL prefix the map host fetches the same files from.
    pub data_base_url: String,
    pub maptiler_key: Option<String>,
    pub center: [f64; 2],
    pub zoom: f64,
    pub fit_padding: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    CenterOutOfRange { lon: f64, lat: f64 },
    ZoomOutOfRange(f64),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::CenterOutOfRange { lon, lat } => {
                write!(f, "map center out of range: lon={lon} lat={lat}")
            }
            ConfigError::ZoomOutOfRange(z) => write!(f, "map zoom out of range: {z}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl ViewerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. Unparseable values fall back to
    /// their defaults; parsed values that make no sense on a map are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = SyncConfig::default();
        let lon = env_var_f64(&lookup, "MAP_CENTER_LON", defaults.default_center[0]);
        let lat = env_var_f64(&lookup, "MAP_CENTER_LAT", defaults.default_center[1]);
        let zoom = env_var_f64(&lookup, "MAP_ZOOM", defaults.default_zoom);

        if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
            return Err(ConfigError::CenterOutOfRange { lon, lat });
        }
        if !(0.0..=24.0).contains(&zoom) {
            return Err(ConfigError::ZoomOutOfRange(zoom));
        }

        Ok(Self {
            geojson_root: lookup("GEOJSON_ROOT")
                .unwrap_or_else(|| "public/geojsons".to_string())
                .into(),
            data_base_url: lookup("GEOJSON_BASE_URL").unwrap_or(defaults.data_base_url),
            maptiler_key: lookup("MAPTILER_KEY").filter(|k| !k.trim().is_empty()),
            center: [lon, lat],
            zoom,
            fit_padding: env_var_u32(&lookup, "MAP_FIT_PADDING", defaults.fit_padding),
        })
    }

    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig {
            tile_key: self.maptiler_key.clone(),
            data_base_url: self.data_base_url.clone(),
            default_center: self.center,
            default_zoom: self.zoom,
            fit_padding: self.fit_padding,
        }
    }
}

fn env_var_u32(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u32) -> u32 {
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn env_var_f64(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: f64) -> f64 {
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
