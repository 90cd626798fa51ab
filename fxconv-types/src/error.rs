//! Error types for the currency converter.

use std::path::PathBuf;
use std::time::Duration;

use crate::ports::ProviderError;

/// Service-level errors.
///
/// Unknown currencies and unrecognized queries are not errors; they are
/// reported through [`crate::ConversionStatus`]. Only a failing rate
/// provider aborts a request.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Exchange rates are unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Exchange rate request timed out after {0:?}")]
    ProviderTimeout(Duration),
}

impl From<ProviderError> for ConvertError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Timeout(after) => ConvertError::ProviderTimeout(after),
            ProviderError::Unavailable(msg) => ConvertError::ProviderUnavailable(msg),
            ProviderError::InvalidResponse(msg) => ConvertError::ProviderUnavailable(msg),
        }
    }
}

/// Errors that abort the tool before any request is served.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Cannot read API key from {}: {source}", path.display())]
    MissingCredential {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_stays_distinct() {
        let err: ConvertError = ProviderError::Timeout(Duration::from_secs(10)).into();
        assert!(matches!(err, ConvertError::ProviderTimeout(d) if d.as_secs() == 10));
    }

    #[test]
    fn test_malformed_body_is_unavailable() {
        let err: ConvertError = ProviderError::InvalidResponse("not json".into()).into();
        assert!(matches!(err, ConvertError::ProviderUnavailable(msg) if msg == "not json"));
    }

    #[test]
    fn test_missing_credential_names_path() {
        let err = StartupError::MissingCredential {
            path: PathBuf::from("apikey"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert_eq!(err.to_string(), "Cannot read API key from apikey: no such file");
    }
}
