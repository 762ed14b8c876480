//! Outbound URL construction for endpoints that may sit behind a forwarding proxy.
//!
//! A proxy base such as `https://corsproxy.example/?https://dmm.example` embeds
//! the real target after its own query marker. Appending `?a=1&b=2` to it would
//! leak the inner query into the proxy's query string, so in proxy mode the
//! whole inner URL is percent-encoded and passed as one opaque token.

use tracing::warn;

use crate::config::ProxyMode;

/// Marker that identifies a proxy base in `ProxyMode::Auto`.
const PROXY_MARKER: &str = "/?http";
/// Separator between the proxy origin and the embedded target origin.
const PROXY_SEPARATOR: &str = "/?";

/// Builds request URLs against a configured base endpoint.
///
/// The proxy decision is made once, at construction.
#[derive(Debug, Clone)]
pub struct ProxyAwareUrlBuilder {
    base: String,
    proxied: bool,
}

impl ProxyAwareUrlBuilder {
    /// Create a builder. The base must be non-empty; unconfigured providers
    /// short-circuit before getting here.
    pub fn new(base: impl Into<String>, mode: ProxyMode) -> Self {
        let base = base.into().trim().to_string();
        let proxied = resolve_proxied(&base, mode);
        Self { base, proxied }
    }

    /// Whether requests will be wrapped for a forwarding proxy.
    pub fn is_proxied(&self) -> bool {
        self.proxied
    }

    /// The mode actually in effect: `Proxy` or `Direct`, never `Auto`.
    pub fn effective_mode(&self) -> ProxyMode {
        if self.proxied {
            ProxyMode::Proxy
        } else {
            ProxyMode::Direct
        }
    }

    /// Build the outbound URL for `path` with the given query parameters.
    ///
    /// Parameters are serialized in slice order.
    pub fn build(&self, path: &str, params: &[(&str, String)]) -> String {
        if self.is_proxied() {
            if let Some((proxy_origin, target_origin)) = split_proxy(&self.base) {
                let target = direct_url(target_origin, path, params);
                return format!("{}{}", proxy_origin, urlencoding::encode(&target));
            }
        }

        direct_url(&self.base, path, params)
    }
}

fn resolve_proxied(base: &str, mode: ProxyMode) -> bool {
    if base.is_empty() {
        return false;
    }
    match mode {
        ProxyMode::Auto => base.contains(PROXY_MARKER),
        ProxyMode::Direct => false,
        ProxyMode::Proxy => {
            if base.contains(PROXY_SEPARATOR) {
                true
            } else {
                warn!(
                    base = %base,
                    "Proxy mode requested but base has no '/?' separator, using direct mode"
                );
                false
            }
        }
    }
}

/// Split a proxy base at the first `/?`, keeping the separator on the proxy side.
fn split_proxy(base: &str) -> Option<(&str, &str)> {
    let idx = base.find(PROXY_SEPARATOR)?;
    Some(base.split_at(idx + PROXY_SEPARATOR.len()))
}

fn direct_url(base: &str, path: &str, params: &[(&str, String)]) -> String {
    let base = base.strip_suffix('/').unwrap_or(base);
    let path = path.trim_start_matches('/');
    let mut url = format!("{}/{}", base, path);

    let query = encode_query(params);
    if !query.is_empty() {
        url.push('?');
        url.push_str(&query);
    }

    url
}

/// Encode parameters as `k=v&k2=v2`, percent-escaping keys and values.
pub fn encode_query(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(value: &str) -> Vec<(&'static str, String)> {
        vec![("q", value.to_string())]
    }

    #[test]
    fn test_direct_mode_strips_trailing_slash() {
        let builder = ProxyAwareUrlBuilder::new("https://target.example/", ProxyMode::Auto);
        assert!(!builder.is_proxied());
        assert_eq!(
            builder.build("api/x", &q("a b")),
            "https://target.example/api/x?q=a%20b"
        );
    }

    #[test]
    fn test_direct_mode_preserves_param_order() {
        let builder = ProxyAwareUrlBuilder::new("https://target.example", ProxyMode::Auto);
        let params = vec![
            ("imdbId", "tt0111161".to_string()),
            ("seasonNum", "2".to_string()),
            ("onlyTrusted", "false".to_string()),
        ];
        assert_eq!(
            builder.build("api/torrents/tv", &params),
            "https://target.example/api/torrents/tv?imdbId=tt0111161&seasonNum=2&onlyTrusted=false"
        );
    }

    #[test]
    fn test_direct_mode_escapes_reserved_characters() {
        let builder = ProxyAwareUrlBuilder::new("https://target.example", ProxyMode::Auto);
        assert_eq!(
            builder.build("search", &q("a&b=c?d/e")),
            "https://target.example/search?q=a%26b%3Dc%3Fd%2Fe"
        );
    }

    #[test]
    fn test_direct_mode_without_params() {
        let builder = ProxyAwareUrlBuilder::new("https://target.example", ProxyMode::Auto);
        assert_eq!(builder.build("/health", &[]), "https://target.example/health");
    }

    #[test]
    fn test_proxy_mode_encodes_inner_url() {
        let builder = ProxyAwareUrlBuilder::new(
            "https://proxy.example/?https://target.example",
            ProxyMode::Auto,
        );
        assert!(builder.is_proxied());

        let url = builder.build("api/x", &q("a b"));
        let (outer, token) = url.split_once("/?").unwrap();
        assert_eq!(outer, "https://proxy.example");

        // The inner URL travels as a single opaque token
        assert!(!token.contains('?'));
        assert!(!token.contains('&'));
        assert!(!token.contains('/'));
        assert_eq!(
            urlencoding::decode(token).unwrap(),
            "https://target.example/api/x?q=a%20b"
        );
    }

    #[test]
    fn test_proxy_mode_multiple_params_stay_inside_token() {
        let builder = ProxyAwareUrlBuilder::new(
            "https://proxy.example/?https://target.example/",
            ProxyMode::Auto,
        );
        let params = vec![("imdbId", "tt1".to_string()), ("seasonNum", "1".to_string())];

        let url = builder.build("api/torrents/tv", &params);
        assert_eq!(
            url,
            "https://proxy.example/?https%3A%2F%2Ftarget.example%2Fapi%2Ftorrents%2Ftv%3FimdbId%3Dtt1%26seasonNum%3D1"
        );
    }

    #[test]
    fn test_explicit_direct_ignores_marker() {
        let builder = ProxyAwareUrlBuilder::new(
            "https://proxy.example/?https://target.example",
            ProxyMode::Direct,
        );
        assert!(!builder.is_proxied());
        assert_eq!(
            builder.build("api/x", &q("1")),
            "https://proxy.example/?https://target.example/api/x?q=1"
        );
    }

    #[test]
    fn test_explicit_proxy_without_http_marker() {
        // Target expressed without a scheme: auto-detection misses it
        let base = "https://proxy.example/?target.example";
        assert!(!ProxyAwareUrlBuilder::new(base, ProxyMode::Auto).is_proxied());

        let builder = ProxyAwareUrlBuilder::new(base, ProxyMode::Proxy);
        assert!(builder.is_proxied());
        assert_eq!(
            builder.build("api/x", &q("1")),
            "https://proxy.example/?target.example%2Fapi%2Fx%3Fq%3D1"
        );
    }

    #[test]
    fn test_explicit_proxy_without_separator_falls_back() {
        let builder = ProxyAwareUrlBuilder::new("https://target.example", ProxyMode::Proxy);
        assert!(!builder.is_proxied());
        assert_eq!(
            builder.build("api/x", &q("1")),
            "https://target.example/api/x?q=1"
        );
    }

    #[test]
    fn test_effective_mode_resolved_at_construction() {
        let fallback = ProxyAwareUrlBuilder::new("https://target.example", ProxyMode::Proxy);
        assert_eq!(fallback.effective_mode(), ProxyMode::Direct);

        // Repeated builds reuse the resolved mode
        for _ in 0..3 {
            assert_eq!(
                fallback.build("api/x", &[]),
                "https://target.example/api/x"
            );
        }
        assert_eq!(fallback.effective_mode(), ProxyMode::Direct);

        let sniffed = ProxyAwareUrlBuilder::new(
            "https://proxy.example/?https://target.example",
            ProxyMode::Auto,
        );
        assert_eq!(sniffed.effective_mode(), ProxyMode::Proxy);

        let forced_direct = ProxyAwareUrlBuilder::new(
            "https://proxy.example/?https://target.example",
            ProxyMode::Direct,
        );
        assert_eq!(forced_direct.effective_mode(), ProxyMode::Direct);
    }

    #[test]
    fn test_build_is_deterministic() {
        let builder = ProxyAwareUrlBuilder::new(
            "https://proxy.example/?https://target.example",
            ProxyMode::Auto,
        );
        let params = vec![("b", "2".to_string()), ("a", "1".to_string())];
        assert_eq!(builder.build("p", &params), builder.build("p", &params));
    }
}
