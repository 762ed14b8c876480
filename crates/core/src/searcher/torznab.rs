//! Tolerant Torznab/RSS response scanner.
//!
//! Torznab feeds from different indexers disagree on namespace declarations
//! and are sometimes not well-formed at all. Instead of a strict XML parser,
//! which rejects such feeds outright, this module scans the raw text for
//! `<item>` blocks and pulls a fixed set of fields out of each one:
//!
//! | field    | looked up in                                   | fallback      |
//! |----------|------------------------------------------------|---------------|
//! | title    | `<title>`                                      | `"Unknown"`   |
//! | size     | `<size>`, then `attr name="size"`              | `0`           |
//! | magnet   | `attr name="magneturl"`, then `<link>magnet:…` | none          |
//! | infohash | `attr name="infohash"`                         | from magnet   |
//!
//! Attributes are matched on any `*:attr` element (`torznab:attr`,
//! `newznab:attr`, unprefixed `attr`). The price is that well-formedness is
//! never checked: a truncated document simply yields fewer items.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use tracing::debug;

use super::hash::extract_hash;
use super::types::UNKNOWN_TITLE;
use super::ResultRecord;

static ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<item(?:\s[^>]*)?>(.*?)</item>").expect("item pattern"));
static TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<title>(.*?)</title>").expect("title pattern"));
static LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<link>(.*?)</link>").expect("link pattern"));
static SIZE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<size>(.*?)</size>").expect("size pattern"));
static ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<(?:[a-z0-9_-]+:)?attr\b([^>]*)>").expect("attr pattern")
});
static ATTR_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\bname\s*=\s*"([^"]*)""#).expect("attr name pattern"));
static ATTR_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\bvalue\s*=\s*"([^"]*)""#).expect("attr value pattern"));

/// Parse a Torznab response body into normalized records.
///
/// Never fails. Items are returned in document order; items without a
/// resolvable hash are dropped and duplicates are kept.
pub fn parse_torznab(xml: &str) -> Vec<ResultRecord> {
    let mut records = Vec::new();
    let mut skipped = 0usize;

    for caps in ITEM.captures_iter(xml) {
        let item = match caps.get(1) {
            Some(m) => m.as_str(),
            None => continue,
        };

        match parse_item(item) {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!(
            parsed = records.len(),
            skipped = skipped,
            "Skipped Torznab items without an info hash"
        );
    }

    records
}

fn parse_item(item: &str) -> Option<ResultRecord> {
    let title = element_text(&TITLE, item)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| UNKNOWN_TITLE.to_string());

    let size = match element_text(&SIZE, item) {
        Some(raw) => parse_size(&raw),
        None => attr_value(item, "size").map(|v| parse_size(&v)).unwrap_or(0),
    };

    let magnet = attr_value(item, "magneturl")
        .filter(|m| !m.is_empty())
        .or_else(|| element_text(&LINK, item).filter(|l| l.starts_with("magnet:")));
    let info_hash = attr_value(item, "infohash");

    let hash = extract_hash(magnet.as_deref(), info_hash.as_deref())?;

    Some(ResultRecord::single_file(title, hash, size))
}

fn element_text(pattern: &Regex, item: &str) -> Option<String> {
    pattern
        .captures(item)
        .and_then(|caps| caps.get(1))
        .map(|m| clean_text(m.as_str()))
}

/// Find the value of the first `*:attr` whose name matches, ignoring case.
fn attr_value(item: &str, name: &str) -> Option<String> {
    ATTR.captures_iter(item).find_map(|caps| {
        let attrs = caps.get(1)?.as_str();
        let attr_name = ATTR_NAME.captures(attrs)?.get(1)?.as_str();
        if !attr_name.trim().eq_ignore_ascii_case(name) {
            return None;
        }
        let value = ATTR_VALUE.captures(attrs)?.get(1)?.as_str();
        Some(clean_text(value))
    })
}

fn parse_size(raw: &str) -> u64 {
    raw.trim().parse().unwrap_or(0)
}

/// Unwrap CDATA and decode the predefined XML entities.
fn clean_text(raw: &str) -> String {
    let trimmed = raw.trim();
    let inner = trimmed
        .strip_prefix("<![CDATA[")
        .and_then(|s| s.strip_suffix("]]>"))
        .map(str::trim);

    match inner {
        Some(cdata) => cdata.to_string(),
        None => decode_entities(trimmed),
    }
}

fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    // &amp; last so "&amp;lt;" decodes to "&lt;", not "<"
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
