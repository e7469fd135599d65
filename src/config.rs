use std::env;

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    /// API key forwarded to the upstream rank API as a query parameter
    pub api_key: String,
    /// Base URL of the upstream MMR endpoint (overridable for tests)
    pub upstream_base_url: String,
    pub is_dev: bool,
    /// Rank cache TTL in seconds (default: 300)
    pub cache_ttl_secs: u64,
    /// Total timeout for one upstream call in seconds (default: 10)
    pub upstream_timeout_secs: u64,
}

/// Default upstream endpoint. The third-party API this service proxies.
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://api.henrikdev.xyz/valorant/v2/mmr";

impl Config {
    /// Load configuration from environment variables
    /// In DEV mode, provides sensible defaults. In PROD mode, PORT and the
    /// API key are required.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        // Check if running in dev mode
        let is_dev = env::var("DEV_MODE")
            .unwrap_or_else(|_| "false".to_string())
            .parse()
            .unwrap_or(false);

        // Port: required in prod, defaults to 8080 in dev
        let port = if is_dev {
            env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?
        } else {
            env::var("PORT")
                .map_err(|_| "PORT is required in production")?
                .parse()?
        };

        // API key: required in prod, dummy default in dev
        let api_key = if is_dev {
            env::var("VALORANT_API_KEY").unwrap_or_else(|_| "dev-api-key".to_string())
        } else {
            env::var("VALORANT_API_KEY").map_err(|_| "VALORANT_API_KEY is required in production")?
        };

        // Upstream base URL: fixed third-party endpoint, overridable
        let upstream_base_url = env::var("UPSTREAM_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_UPSTREAM_BASE_URL.to_string());

        let cache_ttl_secs: u64 = env::var("CACHE_TTL_SECS")
            .unwrap_or_else(|_| "300".to_string())
            .parse()
            .unwrap_or(300);

        let upstream_timeout_secs: u64 = env::var("UPSTREAM_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .unwrap_or(10);

        Ok(Config {
            port,
            api_key,
            upstream_base_url,
            is_dev,
            cache_ttl_secs,
            upstream_timeout_secs,
        })
    }
}
