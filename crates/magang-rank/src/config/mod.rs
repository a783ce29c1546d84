//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `MAGANG_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `MAGANG_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Path to the persisted geocode cache document. Default:
    /// `./.data/geo_cache.json`.
    pub geo_cache_path: PathBuf,

    /// Path to the category classifier artifact (JSON).
    pub classifier_path: Option<PathBuf>,

    /// Path to the sentence-embedding model directory (BERT + tokenizer).
    pub embedder_path: Option<PathBuf>,

    /// Geocoding provider base URL. Default: the public Nominatim endpoint.
    pub geocoder_url: String,

    /// Country scope appended to every geocode query. Default: `Indonesia`.
    pub geocoder_country: String,

    /// Apply the resume text-cleaning pass before classification.
    /// Default: `false` (classification only lowercases its input).
    pub clean_before_classify: bool,
}

/// Default geocoder URL used when `MAGANG_GEOCODER_URL` is not set.
pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";

/// Default country scope used when `MAGANG_GEOCODER_COUNTRY` is not set.
pub const DEFAULT_GEOCODER_COUNTRY: &str = "Indonesia";

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            geo_cache_path: PathBuf::from("./.data/geo_cache.json"),
            classifier_path: None,
            embedder_path: None,
            geocoder_url: DEFAULT_GEOCODER_URL.to_string(),
            geocoder_country: DEFAULT_GEOCODER_COUNTRY.to_string(),
            clean_before_classify: false,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "MAGANG_PORT";
    const ENV_BIND_ADDR: &'static str = "MAGANG_BIND_ADDR";
    const ENV_GEO_CACHE_PATH: &'static str = "MAGANG_GEO_CACHE_PATH";
    const ENV_CLASSIFIER_PATH: &'static str = "MAGANG_CLASSIFIER_PATH";
    const ENV_EMBEDDER_PATH: &'static str = "MAGANG_EMBEDDER_PATH";
    const ENV_GEOCODER_URL: &'static str = "MAGANG_GEOCODER_URL";
    const ENV_GEOCODER_COUNTRY: &'static str = "MAGANG_GEOCODER_COUNTRY";
    const ENV_CLEAN_BEFORE_CLASSIFY: &'static str = "MAGANG_CLEAN_BEFORE_CLASSIFY";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let geo_cache_path =
            Self::parse_path_from_env(Self::ENV_GEO_CACHE_PATH, defaults.geo_cache_path);
        let classifier_path = Self::parse_optional_path_from_env(Self::ENV_CLASSIFIER_PATH);
        let embedder_path = Self::parse_optional_path_from_env(Self::ENV_EMBEDDER_PATH);
        let geocoder_url =
            Self::parse_string_from_env(Self::ENV_GEOCODER_URL, defaults.geocoder_url);
        let geocoder_country =
            Self::parse_string_from_env(Self::ENV_GEOCODER_COUNTRY, defaults.geocoder_country);
        let clean_before_classify = Self::parse_bool_from_env(
            Self::ENV_CLEAN_BEFORE_CLASSIFY,
            defaults.clean_before_classify,
        );

        Ok(Self {
            port,
            bind_addr,
            geo_cache_path,
            classifier_path,
            embedder_path,
            geocoder_url,
            geocoder_country,
            clean_before_classify,
        })
    }

    /// Validates paths and basic invariants (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.geo_cache_path.exists() && !self.geo_cache_path.is_file() {
            return Err(ConfigError::NotAFile {
                path: self.geo_cache_path.clone(),
            });
        }

        if let Some(ref path) = self.classifier_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_file() {
                return Err(ConfigError::NotAFile { path: path.clone() });
            }
        }

        if let Some(ref path) = self.embedder_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_bool_from_env(var_name: &str, default: bool) -> bool {
        env::var(var_name)
            .ok()
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(default)
    }
}
