use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Complete mapper configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MapperConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `tracing-subscriber` filter directive, used when `RUST_LOG` is unset
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String {
    "eventmap=info,destination_actions=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Pretty-print mapped payloads
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

fn default_pretty() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: default_pretty(),
        }
    }
}

impl MapperConfig {
    /// Build from env vars, falling back to defaults.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Applies `EVENTMAP_LOG` and `EVENTMAP_PRETTY` over the current values.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = std::env::var("EVENTMAP_LOG") {
            if !v.trim().is_empty() {
                self.logging.filter = v;
            }
        }
        if let Ok(v) = std::env::var("EVENTMAP_PRETTY") {
            if let Ok(b) = v.parse::<bool>() {
                self.output.pretty = b;
            }
        }
        self
    }
}

/// Load configuration from TOML file
pub fn load_config(path: impl AsRef<Path>) -> Result<MapperConfig> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: MapperConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    Ok(config)
}

/// Installs the global tracing subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence over the configured filter.
pub fn init_logging(config: &LoggingConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.filter.as_str().into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
