use figment::{
    providers::{Env, Format, Toml},
    value::Uncased,
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Prefix for structured environment overrides, e.g. `MEDIASEARCH_JACKETT__API_KEY`.
pub const ENV_PREFIX: &str = "MEDIASEARCH_";

/// Flat variable names understood for compatibility with existing deployments.
const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("EXTERNAL_SEARCH_API_HOSTNAME", "external_search.base_url"),
    ("JACKETT", "jackett.url"),
    ("JACKETT_KEY", "jackett.api_key"),
    ("MDBLIST_KEY", "mdblist.api_key"),
];

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    extract(Figment::new().merge(Toml::file(path)))
}

/// Load configuration from the environment alone
pub fn load_config_from_env() -> Result<Config, ConfigError> {
    extract(Figment::new())
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

fn extract(base: Figment) -> Result<Config, ConfigError> {
    base.merge(legacy_env())
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

fn legacy_env() -> Env {
    let names: Vec<&str> = LEGACY_ENV_KEYS.iter().map(|(name, _)| *name).collect();
    Env::raw().only(&names).map(|key| {
        LEGACY_ENV_KEYS
            .iter()
            .find(|(name, _)| key.as_str().eq_ignore_ascii_case(name))
            .map(|(_, path)| Uncased::from(*path))
            .unwrap_or_else(|| Uncased::from(key.as_str().to_string()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProxyMode;
    use figment::Jail;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[server]
port = 9000

[jackett]
url = "http://localhost:9117"
api_key = "key"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.jackett.api_key, "key");
    }

    #[test]
    fn test_load_config_from_str_invalid() {
        let result = load_config_from_str("[server]\nport = \"not a port\"\n");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[server]
host = "127.0.0.1"
port = 3000

[external_search]
base_url = "https://dmm.example"
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host.to_string(), "127.0.0.1");
        assert_eq!(config.external_search.base_url, "https://dmm.example");
    }

    #[test]
    fn test_legacy_env_names() {
        Jail::expect_with(|jail| {
            jail.set_env("EXTERNAL_SEARCH_API_HOSTNAME", "https://proxy.example/?https://dmm.example");
            jail.set_env("JACKETT", "http://jackett:9117");
            jail.set_env("JACKETT_KEY", "abc");
            jail.set_env("MDBLIST_KEY", "mdb");

            let config = load_config_from_env().map_err(|e| e.to_string())?;
            assert_eq!(
                config.external_search.base_url,
                "https://proxy.example/?https://dmm.example"
            );
            assert_eq!(config.jackett.url, "http://jackett:9117");
            assert_eq!(config.jackett.api_key, "abc");
            assert_eq!(config.mdblist.api_key, "mdb");
            Ok(())
        });
    }

    #[test]
    fn test_prefixed_env_overrides_file_and_legacy() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
[jackett]
url = "http://from-file:9117"
api_key = "file-key"
"#,
            )?;
            jail.set_env("JACKETT_KEY", "legacy-key");
            jail.set_env("MEDIASEARCH_JACKETT__API_KEY", "prefixed-key");
            jail.set_env("MEDIASEARCH_EXTERNAL_SEARCH__PROXY_MODE", "direct");

            let config = load_config(Path::new("config.toml")).map_err(|e| e.to_string())?;
            assert_eq!(config.jackett.url, "http://from-file:9117");
            assert_eq!(config.jackett.api_key, "prefixed-key");
            assert_eq!(config.external_search.proxy_mode, ProxyMode::Direct);
            Ok(())
        });
    }
}
