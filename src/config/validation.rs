use crate::config::types::{Config, CrawlerConfig, DatabaseConfig, IndexerConfig, SearchConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_database_config(&config.database)?;
    validate_indexer_config(&config.indexer)?;
    validate_search_config(&config.search)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.thread_pool_size < 1 || config.thread_pool_size > 100 {
        return Err(ConfigError::Validation(format!(
            "thread-pool-size must be between 1 and 100, got {}",
            config.thread_pool_size
        )));
    }

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(
            "max-pages must be >= 1".to_string(),
        ));
    }

    if config.request_timeout_ms < 1 {
        return Err(ConfigError::Validation(
            "request-timeout-ms must be >= 1".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates database configuration
fn validate_database_config(config: &DatabaseConfig) -> Result<(), ConfigError> {
    if config.path.is_empty() {
        return Err(ConfigError::Validation(
            "database path cannot be empty".to_string(),
        ));
    }

    if config.connection_pool_size < 1 || config.connection_pool_size > 64 {
        return Err(ConfigError::Validation(format!(
            "connection-pool-size must be between 1 and 64, got {}",
            config.connection_pool_size
        )));
    }

    Ok(())
}

/// Validates text analysis bounds
fn validate_indexer_config(config: &IndexerConfig) -> Result<(), ConfigError> {
    if config.min_word_length < 1 {
        return Err(ConfigError::Validation(
            "min-word-length must be >= 1".to_string(),
        ));
    }

    if config.max_word_length < config.min_word_length {
        return Err(ConfigError::Validation(format!(
            "max-word-length ({}) must be >= min-word-length ({})",
            config.max_word_length, config.min_word_length
        )));
    }

    Ok(())
}

/// Validates search configuration
fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    if config.max_results < 1 {
        return Err(ConfigError::Validation(
            "max-results must be >= 1".to_string(),
        ));
    }

    if config.snippet_length < 20 {
        return Err(ConfigError::Validation(format!(
            "snippet-length must be >= 20, got {}",
            config.snippet_length
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_zero_workers_rejected() {
        let mut config = Config::default();
        config.crawler.thread_pool_size = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_user_agent_rejected() {
        let mut config = Config::default();
        config.crawler.user_agent = "  ".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_database_path_rejected() {
        let mut config = Config::default();
        config.database.path = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_inverted_word_length_bounds_rejected() {
        let mut config = Config::default();
        config.indexer.min_word_length = 10;
        config.indexer.max_word_length = 5;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_tiny_snippet_rejected() {
        let mut config = Config::default();
        config.search.snippet_length = 5;
        assert!(validate(&config).is_err());
    }
}
