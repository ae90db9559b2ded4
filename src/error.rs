use crate::models::ErrorResponse;
use thiserror::Error;

/// Failures surfaced by the Alby API client and the pagination driver.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found")]
    NotFound,
    #[error("{}", remote_description(.0))]
    Remote(ErrorResponse),
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    /// No usable response: connection failure, timeout or unreadable body.
    #[error("Unknown Alby error")]
    Unknown,
}

impl ApiError {
    /// Status code carried inside a structured API error, if any.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            ApiError::Remote(response) => response.code.and_then(|code| u16::try_from(code).ok()),
            _ => None,
        }
    }
}

fn remote_description(response: &ErrorResponse) -> String {
    match &response.message {
        Some(message) => message.clone(),
        None => format!("Alby error: {}", response.error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ErrorFlag;

    #[test]
    fn test_remote_error_uses_message() {
        let err = ApiError::Remote(ErrorResponse {
            code: Some(401),
            error: ErrorFlag::Flag(true),
            message: Some("Unauthorized".to_string()),
        });
        assert_eq!(err.to_string(), "Unauthorized");
        assert_eq!(err.http_status(), Some(401));
    }

    #[test]
    fn test_remote_error_without_message_falls_back_to_flag() {
        let err = ApiError::Remote(ErrorResponse {
            code: None,
            error: ErrorFlag::Text("rate limited".to_string()),
            message: None,
        });
        assert_eq!(err.to_string(), "Alby error: rate limited");
        assert_eq!(err.http_status(), None);
    }

    #[test]
    fn test_plain_variants() {
        assert_eq!(ApiError::NotFound.to_string(), "Not found");
        assert_eq!(ApiError::Unknown.to_string(), "Unknown Alby error");
        assert_eq!(ApiError::NotFound.http_status(), None);
    }
}
