use crate::{cache::RankCache, config::Config, rank::RankFetcher};
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<Config>,
    /// Rank payload cache (shared with the fetcher; exposed for health)
    pub cache: RankCache,
    /// Rank lookup service
    pub fetcher: RankFetcher,
    /// Process start, for the health endpoint's uptime figure
    pub started_at: Instant,
}

impl AppState {
    /// Create a new AppState with the given configuration
    pub fn new(config: Config) -> Self {
        let http_client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        let cache = RankCache::new(Duration::from_secs(config.cache_ttl_secs));

        let fetcher = RankFetcher::new(
            http_client,
            cache.clone(),
            config.upstream_base_url.clone(),
            config.api_key.clone(),
        );

        Self {
            config: Arc::new(config),
            cache,
            fetcher,
            started_at: Instant::now(),
        }
    }
}
