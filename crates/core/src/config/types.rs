use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};

/// Root configuration
///
/// Every provider section is optional: an empty endpoint or key disables
/// that provider without error.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub external_search: ExternalSearchConfig,
    #[serde(default)]
    pub jackett: JackettConfig,
    #[serde(default)]
    pub mdblist: MdbListConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

/// How the external search base URL should be interpreted.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProxyMode {
    /// Proxy mode when the base contains `/?http`, direct otherwise.
    #[default]
    Auto,
    /// The base is the service origin itself.
    Direct,
    /// The base is a forwarding proxy with the target origin after `/?`.
    Proxy,
}

/// Generic JSON search endpoint configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExternalSearchConfig {
    /// Base endpoint, either the service origin (e.g. "https://dmm.example")
    /// or a proxy wrapping it (e.g. "https://corsproxy.example/?https://dmm.example").
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub proxy_mode: ProxyMode,
    /// Request timeout in seconds (default: 20)
    #[serde(default = "default_external_search_timeout")]
    pub timeout_secs: u32,
}

impl Default for ExternalSearchConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            proxy_mode: ProxyMode::default(),
            timeout_secs: default_external_search_timeout(),
        }
    }
}

fn default_external_search_timeout() -> u32 {
    20
}

/// Jackett (Torznab) configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JackettConfig {
    /// Jackett server URL (e.g., "http://localhost:9117")
    #[serde(default)]
    pub url: String,
    /// Jackett API key
    #[serde(default)]
    pub api_key: String,
    /// Request timeout in seconds (default: 15)
    #[serde(default = "default_jackett_timeout")]
    pub timeout_secs: u32,
}

impl Default for JackettConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            timeout_secs: default_jackett_timeout(),
        }
    }
}

fn default_jackett_timeout() -> u32 {
    15
}

/// MDBList (list/metadata provider) configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MdbListConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_mdblist_url")]
    pub base_url: String,
    #[serde(default = "default_mdblist_timeout")]
    pub timeout_secs: u32,
}

impl Default for MdbListConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_mdblist_url(),
            timeout_secs: default_mdblist_timeout(),
        }
    }
}

fn default_mdblist_url() -> String {
    "https://mdblist.com/api".to_string()
}

fn default_mdblist_timeout() -> u32 {
    30
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub external_search: SanitizedExternalSearchConfig,
    pub jackett: SanitizedJackettConfig,
    pub mdblist: SanitizedMdbListConfig,
}

/// Sanitized external search config.
///
/// The base URL is reported as-is since proxy URLs carry no credentials.
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedExternalSearchConfig {
    pub base_url: String,
    pub proxy_mode: ProxyMode,
    pub timeout_secs: u32,
}

/// Sanitized Jackett config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedJackettConfig {
    pub url: String,
    pub api_key_configured: bool,
    pub timeout_secs: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedMdbListConfig {
    pub base_url: String,
    pub api_key_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            external_search: SanitizedExternalSearchConfig {
                base_url: config.external_search.base_url.clone(),
                proxy_mode: config.external_search.proxy_mode,
                timeout_secs: config.external_search.timeout_secs,
            },
            jackett: SanitizedJackettConfig {
                url: config.jackett.url.clone(),
                api_key_configured: !config.jackett.api_key.is_empty(),
                timeout_secs: config.jackett.timeout_secs,
            },
            mdblist: SanitizedMdbListConfig {
                base_url: config.mdblist.base_url.clone(),
                api_key_configured: !config.mdblist.api_key.is_empty(),
            },
        }
    }
}
