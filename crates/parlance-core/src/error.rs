use thiserror::Error;

/// Top-level error type for the Parlance system.
///
/// Subsystem crates define their own error types where they need finer
/// detail (`RelayError`, `TransportError`) and convert into this one at the
/// composition root.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParlanceError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for ParlanceError {
    fn from(err: toml::de::Error) -> Self {
        ParlanceError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for ParlanceError {
    fn from(err: serde_json::Error) -> Self {
        ParlanceError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Parlance operations.
pub type Result<T> = std::result::Result<T, ParlanceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_all_variants() {
        let cases: Vec<(ParlanceError, &str)> = vec![
            (
                ParlanceError::Config("missing api key".to_string()),
                "Configuration error: missing api key",
            ),
            (
                ParlanceError::Validation("prompt is empty".to_string()),
                "Validation error: prompt is empty",
            ),
            (
                ParlanceError::Upstream("502 Bad Gateway".to_string()),
                "Upstream error: 502 Bad Gateway",
            ),
            (
                ParlanceError::Api("failed to bind".to_string()),
                "API error: failed to bind",
            ),
            (
                ParlanceError::Serialization("invalid json".to_string()),
                "Serialization error: invalid json",
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ParlanceError = io_err.into();
        assert!(matches!(err, ParlanceError::Io(_)));
        assert!(err.to_string().starts_with("I/O error:"));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_error_from_toml_de() {
        let err: std::result::Result<toml::Value, _> = toml::from_str("invalid = [[[");
        let err: ParlanceError = err.unwrap_err().into();
        assert!(matches!(err, ParlanceError::Config(_)));
    }

    #[test]
    fn test_error_from_serde_json() {
        let err: std::result::Result<serde_json::Value, _> = serde_json::from_str("{ nope }");
        let err: ParlanceError = err.unwrap_err().into();
        assert!(matches!(err, ParlanceError::Serialization(_)));
    }

    #[test]
    fn test_result_type_with_question_mark() {
        fn inner() -> Result<u16> {
            let port: u16 = "3030".parse().map_err(|_| ParlanceError::Config("port".into()))?;
            Ok(port)
        }

        assert_eq!(inner().unwrap(), 3030);
    }
}
