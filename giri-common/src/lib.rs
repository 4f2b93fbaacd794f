//! Types and utilities shared across the GIRI crates.
//!
//! This crate holds the closed error taxonomy every other crate reports
//! through, and the tracing setup used by the binary and integration tests.
//! It stays dependency-light so that every crate can depend on it.
//!
//! # Overview
//!
//! - [`GiriError`] and [`Result`]: the four failure kinds the UI distinguishes
//! - [`observability`]: centralised tracing/logging initialisation
//!
//! # Examples
//!
//! ```rust
//! use giri_common::GiriError;
//!
//! let err = GiriError::Network("connection refused".into());
//! assert!(err.is_listing_failure());
//! assert_eq!(err.to_string(), "Network error: connection refused");
//! ```
use serde::Serialize;

pub mod observability;

/// Error types used across GIRI.
///
/// The set is closed on purpose: each variant maps to one user-visible
/// degradation (empty listing, or an inline chat error).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum GiriError {
    /// The listing page could not be retrieved.
    #[error("Network error: {0}")]
    Network(String),

    /// Markup, selectors or a response body could not be interpreted.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The provider rejected the supplied credential.
    #[error("Provider rejected the API key: {0}")]
    ProviderAuth(String),

    /// Any other provider failure (network, quota, empty completion).
    #[error("Provider call failed: {0}")]
    ProviderCall(String),
}

impl GiriError {
    /// True for failures on the scrape path.
    pub fn is_listing_failure(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Parse(_))
    }

    /// True for failures on the chat path.
    pub fn is_provider_failure(&self) -> bool {
        matches!(self, Self::ProviderAuth(_) | Self::ProviderCall(_))
    }
}

/// Convenient alias for results that use [`GiriError`].
pub type Result<T> = std::result::Result<T, GiriError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_kinds_split_by_path() {
        assert!(GiriError::Parse("bad selector".into()).is_listing_failure());
        assert!(!GiriError::Parse("bad selector".into()).is_provider_failure());
        assert!(GiriError::ProviderAuth("401".into()).is_provider_failure());
        assert!(GiriError::ProviderCall("quota".into()).is_provider_failure());
    }

    #[test]
    fn serializes_with_kind_tag() {
        let v = serde_json::to_value(GiriError::ProviderCall("quota".into())).unwrap();
        assert_eq!(v["kind"], "provider_call");
        assert_eq!(v["message"], "quota");
    }
}
