use clap::Args;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8018";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Connection settings for a [`GatewayClient`](crate::GatewayClient).
///
/// The client copies what it needs at construction; changing a config
/// afterwards has no effect on clients already built from it.
#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Default LLM API key, sent with natural-language queries only if set.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Default LLM model name, sent with natural-language queries only if set.
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            model: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs().max(1);
        self
    }

    /// Per-call timeout, never shorter than one second.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub gateway: ClientConfig,
}

/// Command-line overrides layered on top of file and environment config.
#[derive(Args, Debug, Default, Clone)]
pub struct ConfigOverrides {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Gateway base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Default LLM API key for natural-language queries
    #[arg(long)]
    pub api_key: Option<String>,

    /// Default LLM model for natural-language queries
    #[arg(long)]
    pub model: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,
}

impl AppConfig {
    pub fn new(args: &ConfigOverrides) -> Result<Self, ConfigError> {
        let mut config_builder = Config::builder()
            .set_default("gateway.base_url", DEFAULT_BASE_URL)?
            .set_default("gateway.timeout_secs", DEFAULT_TIMEOUT_SECS as i64)?;

        if let Some(config_path) = &args.config {
            config_builder = config_builder.add_source(File::from(config_path.as_path()));
        } else {
            let default_locations = [
                "doris-agent.toml",
                "config/doris-agent.toml",
                "/etc/doris-agent/config.toml",
            ];

            for location in default_locations {
                if Path::new(location).exists() {
                    config_builder =
                        config_builder.add_source(File::new(location, config::FileFormat::Toml));
                    break;
                }
            }
        }

        // DORIS_AGENT__GATEWAY__API_KEY -> gateway.api_key
        config_builder = config_builder.add_source(
            Environment::with_prefix("DORIS_AGENT")
                .prefix_separator("__")
                .separator("__"),
        );

        let mut config: AppConfig = config_builder.build()?.try_deserialize()?;

        if let Some(base_url) = &args.base_url {
            config.gateway.base_url = base_url.clone();
        }
        if let Some(api_key) = &args.api_key {
            config.gateway.api_key = Some(api_key.clone());
        }
        if let Some(model) = &args.model {
            config.gateway.model = Some(model.clone());
        }
        if let Some(timeout) = args.timeout {
            config.gateway.timeout_secs = timeout;
        }

        Ok(config)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gateway: ClientConfig::default(),
        }
    }
}
