//! Darwin client error types.

use std::fmt;

use super::convert::ConversionError;

/// Errors from fetching a board.
#[derive(Debug)]
pub enum DarwinError {
    /// HTTP request failed (network error, timeout, etc.)
    Http(reqwest::Error),

    /// JSON deserialization failed
    Json {
        message: String,
        body: Option<String>,
    },

    /// The board parsed but could not be turned into domain types
    Conversion(ConversionError),

    /// API returned an error status code
    ApiError { status: u16, message: String },

    /// Rate limited by the API
    RateLimited,

    /// Invalid access token
    Unauthorized,

    /// Mock board data missing or unreadable
    MockData(String),
}

impl fmt::Display for DarwinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DarwinError::Http(e) => write!(f, "HTTP error: {e}"),
            DarwinError::Json { message, body } => {
                write!(f, "JSON parse error: {message}")?;
                if let Some(body) = body {
                    write!(f, " (body: {body})")?;
                }
                Ok(())
            }
            DarwinError::Conversion(e) => write!(f, "bad board data: {e}"),
            DarwinError::ApiError { status, message } => {
                write!(f, "API error {status}: {message}")
            }
            DarwinError::RateLimited => write!(f, "rate limited by Darwin API"),
            DarwinError::Unauthorized => write!(f, "unauthorized (check NR_ACCESS_TOKEN)"),
            DarwinError::MockData(msg) => write!(f, "mock data: {msg}"),
        }
    }
}

impl std::error::Error for DarwinError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DarwinError::Http(e) => Some(e),
            DarwinError::Conversion(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for DarwinError {
    fn from(err: reqwest::Error) -> Self {
        DarwinError::Http(err)
    }
}

impl From<ConversionError> for DarwinError {
    fn from(err: ConversionError) -> Self {
        DarwinError::Conversion(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DarwinError::ApiError {
            status: 500,
            message: "Internal Server Error".into(),
        };
        assert_eq!(err.to_string(), "API error 500: Internal Server Error");

        let err = DarwinError::Json {
            message: "expected string".into(),
            body: Some("{}".into()),
        };
        assert_eq!(err.to_string(), "JSON parse error: expected string (body: {})");

        let err = DarwinError::from(ConversionError::MissingField("origin"));
        assert_eq!(
            err.to_string(),
            "bad board data: missing required field: origin"
        );
        assert!(std::error::Error::source(&err).is_some());

        assert_eq!(
            DarwinError::Unauthorized.to_string(),
            "unauthorized (check NR_ACCESS_TOKEN)"
        );
    }
}
