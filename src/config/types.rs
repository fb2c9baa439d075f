use serde::Deserialize;

/// Main configuration structure for medimage
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub resolver: ResolverConfig,
    pub search: SearchConfig,
    pub server: ServerConfig,
}

/// Resolver behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ResolverConfig {
    /// Minimum time between crawl dispatch starts (milliseconds)
    #[serde(rename = "min-dispatch-interval-ms")]
    pub min_dispatch_interval_ms: u64,

    /// How long a cache entry (positive or negative) stays valid (hours)
    #[serde(rename = "cache-ttl-hours")]
    pub cache_ttl_hours: i64,
}

/// Upstream search engine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Base URL of the search engine (overridable so tests can point at a
    /// mock server)
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Qualifying term appended to every item name in the search query
    #[serde(rename = "query-suffix")]
    pub query_suffix: String,

    /// Interface language passed to the search engine (hl parameter)
    pub language: String,
}

/// HTTP API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind the API server to, e.g. "127.0.0.1:8420"
    #[serde(rename = "bind-address")]
    pub bind_address: String,
}
