/// Error types for the translation pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MtError {
    /// A `\uXXXX` escape could not be turned into a Unicode scalar value
    DecodeError(String),
    /// The translation engine rejected or failed the request
    EngineError(String),
    /// The engine could not be reached
    NetworkError(String),
    /// Invalid configuration (endpoint, locale, credentials)
    ConfigError(String),
    /// Locale code failed validation
    InvalidLocale(String),
}

impl MtError {
    /// Whether the error was caused by the caller's input rather than the engine
    pub fn is_client_error(&self) -> bool {
        matches!(self, MtError::DecodeError(_))
    }
}

impl std::fmt::Display for MtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MtError::DecodeError(msg) => write!(f, "Decode error: {}", msg),
            MtError::EngineError(msg) => write!(f, "{}", msg),
            MtError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            MtError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            MtError::InvalidLocale(msg) => write!(f, "Invalid locale: {}", msg),
        }
    }
}

impl std::error::Error for MtError {}

impl From<reqwest::Error> for MtError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            MtError::EngineError(format!("Failed to parse engine response: {}", err))
        } else {
            MtError::NetworkError(err.to_string())
        }
    }
}

/// Result type for translation operations
pub type MtResult<T> = Result<T, MtError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_error_message_is_verbatim() {
        let err = MtError::EngineError("CUDA out of memory".to_string());
        assert_eq!(err.to_string(), "CUDA out of memory");
    }

    #[test]
    fn test_display_prefixes() {
        assert_eq!(
            MtError::DecodeError("bad".to_string()).to_string(),
            "Decode error: bad"
        );
        assert_eq!(
            MtError::ConfigError("missing".to_string()).to_string(),
            "Configuration error: missing"
        );
    }

    #[test]
    fn test_client_error_classification() {
        assert!(MtError::DecodeError("x".to_string()).is_client_error());
        assert!(!MtError::EngineError("x".to_string()).is_client_error());
        assert!(!MtError::NetworkError("x".to_string()).is_client_error());
    }
}
