//! External list/metadata catalog integration.
//!
//! The catalog is a plain REST pass-through: callers get the provider's JSON
//! as-is, or an empty default when no API key is configured.

mod mdblist;

pub use mdblist::MdbListClient;

use thiserror::Error;

/// Errors that can occur when interacting with the list provider.
#[derive(Debug, Error)]
pub enum ListProviderError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}
