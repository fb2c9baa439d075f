//! Medimage: a rate-limited product image resolver
//!
//! This crate resolves a representative product image URL for a named item
//! (medicine names in the original deployment) by crawling a search engine's
//! image-search results page, running an ordered pipeline of extraction
//! heuristics over the HTML, and caching the outcome for 24 hours to respect
//! the upstream rate limit.

pub mod api;
pub mod cache;
pub mod config;
pub mod queue;
pub mod resolver;

use thiserror::Error;

/// Main error type for medimage operations
#[derive(Debug, Error)]
pub enum MedImageError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Crawl queue closed: {0}")]
    QueueClosed(String),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for medimage operations
pub type Result<T> = std::result::Result<T, MedImageError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use cache::{CacheSnapshotEntry, ImageCache};
pub use config::Config;
pub use queue::RateLimitedQueue;
pub use resolver::{Resolution, ResolveSource, Resolver};
