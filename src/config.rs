use anyhow::{Context, Result};

pub const DEFAULT_WEATHER_BASE_URL: &str = "https://api.open-meteo.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Base URL of the Open-Meteo-compatible weather provider.
    pub weather_base_url: String,
    /// Upper bound on a single weather provider call, in seconds.
    pub weather_timeout_secs: u64,
    pub server_host: String,
    pub server_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            weather_base_url: optional("WEATHER_BASE_URL", DEFAULT_WEATHER_BASE_URL),
            weather_timeout_secs: optional("WEATHER_TIMEOUT_SECS", "5")
                .parse()
                .context("WEATHER_TIMEOUT_SECS must be a positive integer")?,
            server_host: optional("SERVER_HOST", "0.0.0.0"),
            server_port: optional("SERVER_PORT", "8080")
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
        })
    }
}

fn required(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("missing required env var: {key}"))
}

fn optional(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}
