use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Metadata URL is set
/// - Pagination limits are non-zero and defaults do not exceed the maximum
/// - Enrichment queue and concurrency are non-zero
/// - Liveness interval and failure threshold are non-zero
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(invalid("server.port cannot be 0"));
    }

    if config.metadata.url.trim().is_empty() {
        return Err(invalid("metadata.url cannot be empty"));
    }
    if config.metadata.timeout_secs == 0 {
        return Err(invalid("metadata.timeout_secs cannot be 0"));
    }

    let pagination = &config.pagination;
    if pagination.max_limit == 0 {
        return Err(invalid("pagination.max_limit cannot be 0"));
    }
    for (name, value) in [
        ("default_songs_limit", pagination.default_songs_limit),
        ("default_verse_limit", pagination.default_verse_limit),
    ] {
        if value == 0 || value > pagination.max_limit {
            return Err(ConfigError::ValidationError(format!(
                "pagination.{} must be between 1 and pagination.max_limit ({})",
                name, pagination.max_limit
            )));
        }
    }

    if config.enrichment.queue_size == 0 {
        return Err(invalid("enrichment.queue_size cannot be 0"));
    }
    if config.enrichment.max_concurrent == 0 {
        return Err(invalid("enrichment.max_concurrent cannot be 0"));
    }

    if config.liveness.interval_secs == 0 {
        return Err(invalid("liveness.interval_secs cannot be 0"));
    }
    if config.liveness.max_failures == 0 {
        return Err(invalid("liveness.max_failures cannot be 0"));
    }

    Ok(())
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::ValidationError(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from_str;

    fn valid_config() -> Config {
        load_config_from_str(
            r#"
[metadata]
url = "http://localhost:9000"
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let mut config = valid_config();
        config.server.port = 0;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_empty_metadata_url_fails() {
        let mut config = valid_config();
        config.metadata.url = "  ".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_default_limit_above_max_fails() {
        let mut config = valid_config();
        config.pagination.max_limit = 5;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("default_songs_limit"));
    }

    #[test]
    fn test_validate_zero_verse_limit_fails() {
        let mut config = valid_config();
        config.pagination.default_verse_limit = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_concurrency_fails() {
        let mut config = valid_config();
        config.enrichment.max_concurrent = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_liveness_threshold_fails() {
        let mut config = valid_config();
        config.liveness.max_failures = 0;
        assert!(validate_config(&config).is_err());
    }
}
