use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub llm: LlmSettings,
    pub earth_engine: EarthEngineSettings,
    #[serde(default)]
    pub extraction: ExtractionSettings,
    #[serde(default)]
    pub layers: LayerSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    pub timeout_secs: Option<u64>,
}

fn default_llm_endpoint() -> String { "https://generativelanguage.googleapis.com/v1beta".to_string() }
fn default_llm_model() -> String { "gemini-1.5-flash".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct EarthEngineSettings {
    #[serde(default = "default_earth_engine_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub access_token: String,
    pub timeout_secs: Option<u64>,
}

fn default_earth_engine_endpoint() -> String { "https://earthengine.googleapis.com/v1".to_string() }

/// Values used when the model leaves a field out
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionSettings {
    #[serde(default = "default_longitude")]
    pub default_longitude: f64,
    #[serde(default = "default_latitude")]
    pub default_latitude: f64,
    #[serde(default = "default_zoom")]
    pub default_zoom: u8,
    #[serde(default = "default_lookback_days")]
    pub lookback_days: i64,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            default_longitude: default_longitude(),
            default_latitude: default_latitude(),
            default_zoom: default_zoom(),
            lookback_days: default_lookback_days(),
        }
    }
}

// Hyderabad
fn default_longitude() -> f64 { 78.4867 }
fn default_latitude() -> f64 { 17.3850 }
fn default_zoom() -> u8 { 11 }
fn default_lookback_days() -> i64 { 3650 }

#[derive(Debug, Clone, Deserialize)]
pub struct LayerSettings {
    #[serde(default = "default_cache_size")]
    pub cache_size: u64,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

impl Default for LayerSettings {
    fn default() -> Self {
        Self {
            cache_size: default_cache_size(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

fn default_cache_size() -> u64 { 256 }
fn default_cache_ttl_secs() -> u64 { 1800 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with LANDUSE_)
    /// 4. Provider credentials (GOOGLE_API_KEY, EARTHENGINE_PROJECT, EARTHENGINE_TOKEN)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            // Local overrides for development
            .add_source(File::with_name("config/local").required(false))
            // e.g., LANDUSE__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("LANDUSE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = apply_credential_overrides(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("LANDUSE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = apply_credential_overrides(settings)?;

        settings.try_deserialize()
    }
}

/// Pick up provider credentials from their conventional variable names
fn apply_credential_overrides(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let overrides = [
        ("llm.api_key", env::var("GOOGLE_API_KEY").ok()),
        ("earth_engine.project", env::var("EARTHENGINE_PROJECT").ok()),
        ("earth_engine.access_token", env::var("EARTHENGINE_TOKEN").ok()),
    ];

    let mut builder = Config::builder().add_source(settings);
    for (key, value) in overrides {
        if let Some(value) = value {
            builder = builder.set_override(key, value)?;
        }
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn test_default_extraction() {
        let extraction = ExtractionSettings::default();
        assert_eq!(extraction.default_longitude, 78.4867);
        assert_eq!(extraction.default_latitude, 17.3850);
        assert_eq!(extraction.default_zoom, 11);
        assert_eq!(extraction.lookback_days, 3650);
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_minimal_config_fills_defaults() {
        let settings: Settings = Config::builder()
            .add_source(File::from_str(
                r#"
                [server]
                host = "127.0.0.1"
                port = 8080

                [llm]
                api_key = "key"

                [earth_engine]
                project = "demo"
                "#,
                FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.llm.model, "gemini-1.5-flash");
        assert_eq!(settings.earth_engine.endpoint, "https://earthengine.googleapis.com/v1");
        assert_eq!(settings.extraction.default_zoom, 11);
        assert_eq!(settings.layers.cache_size, 256);
        assert_eq!(settings.logging.level, "info");
    }
}
