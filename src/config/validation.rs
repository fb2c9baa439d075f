use crate::config::types::{Config, ResolverConfig, SearchConfig, ServerConfig};
use crate::ConfigError;
use std::net::SocketAddr;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_resolver_config(&config.resolver)?;
    validate_search_config(&config.search)?;
    validate_server_config(&config.server)?;
    Ok(())
}

/// Validates resolver configuration
fn validate_resolver_config(config: &ResolverConfig) -> Result<(), ConfigError> {
    if config.min_dispatch_interval_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "min_dispatch_interval_ms must be >= 100ms, got {}ms",
            config.min_dispatch_interval_ms
        )));
    }

    if config.cache_ttl_hours < 1 {
        return Err(ConfigError::Validation(format!(
            "cache_ttl_hours must be >= 1, got {}",
            config.cache_ttl_hours
        )));
    }

    Ok(())
}

/// Validates search engine configuration
fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "base_url must use http or https scheme, got '{}'",
            url.scheme()
        )));
    }

    if config.language.is_empty() {
        return Err(ConfigError::Validation(
            "language cannot be empty".to_string(),
        ));
    }

    // An empty query suffix is allowed; the search then uses the bare name.
    Ok(())
}

/// Validates server configuration
fn validate_server_config(config: &ServerConfig) -> Result<(), ConfigError> {
    config
        .bind_address
        .parse::<SocketAddr>()
        .map_err(|e| {
            ConfigError::Validation(format!(
                "bind_address '{}' is not a valid socket address: {}",
                config.bind_address, e
            ))
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            resolver: ResolverConfig {
                min_dispatch_interval_ms: 1000,
                cache_ttl_hours: 24,
            },
            search: SearchConfig {
                base_url: "https://www.google.com".to_string(),
                query_suffix: "약".to_string(),
                language: "ko".to_string(),
            },
            server: ServerConfig {
                bind_address: "127.0.0.1:8420".to_string(),
            },
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_interval_too_small() {
        let mut config = valid_config();
        config.resolver.min_dispatch_interval_ms = 50;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let mut config = valid_config();
        config.resolver.cache_ttl_hours = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_bad_base_url() {
        let mut config = valid_config();
        config.search.base_url = "not a url".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_non_http_base_url() {
        let mut config = valid_config();
        config.search.base_url = "ftp://example.com".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_empty_language_rejected() {
        let mut config = valid_config();
        config.search.language = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_query_suffix_allowed() {
        let mut config = valid_config();
        config.search.query_suffix = String::new();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_bad_bind_address() {
        let mut config = valid_config();
        config.server.bind_address = "not-an-address".to_string();
        assert!(validate(&config).is_err());
    }
}
