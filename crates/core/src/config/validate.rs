use reqwest::Url;

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Every provider timeout is non-zero
/// - Every configured base URL is an absolute http(s) URL
///
/// Empty URLs are valid: they leave the provider disabled.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    let timeouts = [
        ("external_search.timeout_secs", config.external_search.timeout_secs),
        ("jackett.timeout_secs", config.jackett.timeout_secs),
        ("mdblist.timeout_secs", config.mdblist.timeout_secs),
    ];
    for (field, secs) in timeouts {
        if secs == 0 {
            return Err(ConfigError::ValidationError(format!(
                "{} cannot be 0",
                field
            )));
        }
    }

    validate_url("external_search.base_url", &config.external_search.base_url)?;
    validate_url("jackett.url", &config.jackett.url)?;
    validate_url("mdblist.base_url", &config.mdblist.base_url)?;

    Ok(())
}

fn validate_url(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Ok(());
    }

    let url = Url::parse(value.trim())
        .map_err(|e| ConfigError::ValidationError(format!("{} is not a valid URL: {}", field, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::ValidationError(format!(
            "{} must use http or https, got '{}'",
            field, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let mut config = Config::default();
        config.server.port = 0;
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_zero_timeout_fails() {
        let mut config = Config::default();
        config.jackett.timeout_secs = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("jackett.timeout_secs"));
    }

    #[test]
    fn test_validate_proxy_url_accepted() {
        let mut config = Config::default();
        config.external_search.base_url =
            "https://corsproxy.example/?https://dmm.example".to_string();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_relative_url_fails() {
        let mut config = Config::default();
        config.jackett.url = "localhost:9117/jackett".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_non_http_scheme_fails() {
        let mut config = Config::default();
        config.external_search.base_url = "ftp://dmm.example".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("http or https"));
    }
}
