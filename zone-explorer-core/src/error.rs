//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use zone_explorer_provider::ProviderError;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Account not found in the account store
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// The account exists (or not) but no secret could be located for it
    #[error("No credentials found for account: {0}")]
    CredentialsNotFound(String),

    /// Storage layer error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Configuration error (bad settings JSON, account missing provider account id)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Provider error (converting from library)
    #[error("{0}")]
    Provider(#[from] ProviderError),
}

impl CoreError {
    /// Whether it is expected behavior (user input, resource does not exist, etc.) is used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added. **
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::AccountNotFound(_)
            | Self::CredentialsNotFound(_)
            | Self::ValidationError(_)
            | Self::ConfigError(_) => true,
            Self::Provider(e) => e.is_expected(),
            Self::StorageError(_) => false,
        }
    }

    /// Log at `warn` or `error` depending on [`is_expected`](Self::is_expected).
    pub(crate) fn log(&self, action: &str) {
        if self.is_expected() {
            log::warn!("{action}: {self}");
        } else {
            log::error!("{action}: {self}");
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_errors_keep_their_classification() {
        let expected = CoreError::from(ProviderError::InvalidCredentials {
            provider: "cloudflare".to_string(),
            raw_message: None,
        });
        let unexpected = CoreError::from(ProviderError::NetworkError {
            provider: "cloudflare".to_string(),
            detail: "connection reset".to_string(),
        });
        assert!(expected.is_expected());
        assert!(!unexpected.is_expected());
        assert!(!CoreError::StorageError("disk".to_string()).is_expected());
        assert!(CoreError::CredentialsNotFound("a1".to_string()).is_expected());
    }

    #[test]
    fn provider_message_is_passed_through() {
        let err = CoreError::from(ProviderError::Unknown {
            provider: "cloudflare".to_string(),
            raw_code: Some("1000".to_string()),
            raw_message: "first, second".to_string(),
        });
        assert!(err.to_string().contains("first, second"));
    }

    #[test]
    fn serializes_with_code_tag() {
        let json = serde_json::to_value(CoreError::ConfigError("bad".to_string())).unwrap();
        assert_eq!(json["code"], "ConfigError");
        assert_eq!(json["details"], "bad");
    }
}
