use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamConfig {
    #[serde(default = "default_raydium_url")]
    pub raydium_url: String,
    #[serde(default = "default_jupiter_url")]
    pub jupiter_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Records taken per upstream fetch; the stores grow by at most this
    /// many entries per request.
    #[serde(default = "default_fetch_limit")]
    pub fetch_limit: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    5000
}
fn default_raydium_url() -> String {
    "https://api-v3.raydium.io".to_string()
}
fn default_jupiter_url() -> String {
    "https://quote-api.jup.ag/v6".to_string()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_fetch_limit() -> usize {
    10
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            raydium_url: default_raydium_url(),
            jupiter_url: default_jupiter_url(),
            timeout_secs: default_timeout_secs(),
            fetch_limit: default_fetch_limit(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            upstream: UpstreamConfig::default(),
        }
    }
}

impl Config {
    /// Loads config.toml from the working directory; a missing file means
    /// all defaults, a malformed one is a startup error.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        if !Path::new("config.toml").exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string("config.toml")?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 8080
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.upstream.raydium_url, "https://api-v3.raydium.io");
        assert_eq!(config.upstream.fetch_limit, 10);
    }
}
