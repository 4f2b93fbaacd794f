use std::fmt;

use giri_common::{GiriError, Result};

/// Where the active key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Configuration file or environment.
    Configured,
    /// Typed in during the session.
    Entered,
}

/// A provider API key that passed local validation.
///
/// Only the shape is checked here; the provider decides whether it is
/// actually accepted on the first call.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    key: String,
    source: CredentialSource,
}

impl Credential {
    pub fn parse(raw: &str, source: CredentialSource) -> Result<Self> {
        let key = giri_http::sanitize_api_key(raw)
            .map_err(|e| GiriError::ProviderAuth(e.to_string()))?;
        Ok(Self { key, source })
    }

    pub fn expose(&self) -> &str {
        &self.key
    }

    pub fn source(&self) -> CredentialSource {
        self.source
    }

    /// Last four characters, for status lines.
    pub fn hint(&self) -> String {
        // Sanitised keys are ASCII, so byte slicing is safe.
        let start = self.key.len().saturating_sub(4);
        format!("…{}", &self.key[start..])
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("key", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_never_shows_key() {
        let c = Credential::parse("AIzaSECRET1234", CredentialSource::Entered).unwrap();
        let shown = format!("{c:?}");
        assert!(!shown.contains("SECRET"));
        assert_eq!(c.hint(), "…1234");
    }

    #[test]
    fn malformed_keys_are_auth_errors() {
        for raw in ["", "   ", "\"\"", "ключ"] {
            let err = Credential::parse(raw, CredentialSource::Entered).unwrap_err();
            assert!(matches!(err, GiriError::ProviderAuth(_)), "{raw:?}");
        }
    }
}
