//! Info-hash extraction from explicit hash fields and magnet URIs.

use once_cell::sync::Lazy;
use regex_lite::Regex;

static BTIH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)xt=urn:btih:([a-z0-9]+)").expect("btih pattern is valid")
});

/// Derive the canonical lowercase info hash for an item.
///
/// An explicit, non-blank hash wins. Otherwise the `xt=urn:btih:<hash>`
/// parameter of the magnet URI is used. Returns `None` when neither source
/// yields a value; callers must then skip the item.
pub fn extract_hash(magnet: Option<&str>, explicit_hash: Option<&str>) -> Option<String> {
    if let Some(hash) = explicit_hash.map(str::trim).filter(|h| !h.is_empty()) {
        return Some(hash.to_lowercase());
    }

    magnet
        .and_then(|m| BTIH.captures(m))
        .and_then(|caps| caps.get(1))
        .map(|hash| hash.as_str().to_lowercase())
}
