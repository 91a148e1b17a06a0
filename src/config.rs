use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::time::Duration;
use stockscope::models::{parse_date, DEFAULT_END, DEFAULT_START};
use stockscope::services::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

pub type ConfigResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

// YAML-serializable configuration structure
#[derive(Serialize, Deserialize, Debug)]
pub struct ConfigYaml {
    pub node_name: Option<String>,
    pub environment: Option<String>,
    pub port: Option<u16>,
    pub provider_base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub rate_limit_per_second: Option<u64>,
    pub rate_limit_burst: Option<u32>,
    pub default_start: Option<String>,
    pub default_end: Option<String>,
}

// Holds application-wide settings
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub node_name: String,
    pub environment: String,
    pub port: u16,
    pub provider_base_url: String,
    pub request_timeout: Duration,
    pub rate_limit_per_second: u64,
    pub rate_limit_burst: u32,
    /// Used when a request omits `start`
    pub default_start: NaiveDate,
    /// Used when a request omits `end`
    pub default_end: NaiveDate,
}

impl AppConfig {
    // Load configuration from YAML file or environment variables
    pub fn load() -> ConfigResult<Self> {
        if let Ok(config_file) = env::var("CONFIG_FILE") {
            Self::from_yaml(&config_file)
        } else {
            Self::from_env()
        }
    }

    pub fn from_yaml(file_path: &str) -> ConfigResult<Self> {
        let yaml_content = fs::read_to_string(file_path)
            .map_err(|e| format!("Failed to read config file {}: {}", file_path, e))?;
        Self::from_yaml_str(&yaml_content)
    }

    pub fn from_yaml_str(yaml_content: &str) -> ConfigResult<Self> {
        let yaml_config: ConfigYaml = serde_yaml::from_str(yaml_content)?;

        Self::build(
            yaml_config.node_name,
            yaml_config.environment,
            yaml_config.port,
            yaml_config.provider_base_url,
            yaml_config.request_timeout_secs,
            yaml_config.rate_limit_per_second,
            yaml_config.rate_limit_burst,
            yaml_config.default_start,
            yaml_config.default_end,
        )
    }

    // Load all configuration from environment variables
    pub fn from_env() -> ConfigResult<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self::build(
            env::var("NODE_NAME").ok(),
            env::var("ENVIRONMENT").ok(),
            parse_env("PORT")?,
            env::var("PROVIDER_BASE_URL").ok(),
            parse_env("REQUEST_TIMEOUT_SECS")?,
            parse_env("RATE_LIMIT_PER_SECOND")?,
            parse_env("RATE_LIMIT_BURST")?,
            env::var("DEFAULT_START").ok(),
            env::var("DEFAULT_END").ok(),
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn build(
        node_name: Option<String>,
        environment: Option<String>,
        port: Option<u16>,
        provider_base_url: Option<String>,
        request_timeout_secs: Option<u64>,
        rate_limit_per_second: Option<u64>,
        rate_limit_burst: Option<u32>,
        default_start: Option<String>,
        default_end: Option<String>,
    ) -> ConfigResult<Self> {
        let default_start = parse_date(default_start.as_deref().unwrap_or(DEFAULT_START))?;
        let default_end = parse_date(default_end.as_deref().unwrap_or(DEFAULT_END))?;
        if default_start > default_end {
            return Err(format!(
                "default start {} is after default end {}",
                default_start, default_end
            )
            .into());
        }

        let rate_limit_per_second = rate_limit_per_second.unwrap_or(10);
        let rate_limit_burst = rate_limit_burst.unwrap_or(20);
        if rate_limit_per_second == 0 || rate_limit_burst == 0 {
            return Err("rate limit values must be greater than zero".into());
        }

        Ok(Self {
            node_name: node_name.unwrap_or_else(|| "stockscope-server".to_string()),
            environment: environment.unwrap_or_else(|| "development".to_string()),
            port: port.unwrap_or(8888),
            provider_base_url: provider_base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            request_timeout: Duration::from_secs(
                request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            rate_limit_per_second,
            rate_limit_burst,
            default_start,
            default_end,
        })
    }
}

fn parse_env<T>(key: &str) -> ConfigResult<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| format!("Invalid value for {}: {}", key, e).into()),
        Err(_) => Ok(None),
    }
}
