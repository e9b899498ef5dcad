//! Type-safe error codes for framework-level API responses.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::ValidationError;
//! assert_eq!(code.as_str(), "VALIDATION_ERROR");
//! assert_eq!(code.code(), 1001);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standardized error codes for responses produced by the shared HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000s)
    /// Request body failed `validator` rules
    ValidationError,

    /// Request body is not valid JSON for the target type
    InvalidJson,

    /// No route matched the request
    NotFound,
}

impl ErrorCode {
    /// SCREAMING_SNAKE_CASE identifier for programmatic handling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidJson => "INVALID_JSON",
            Self::NotFound => "NOT_FOUND",
        }
    }

    /// Integer code for logs and dashboards.
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidJson => 1002,
            Self::NotFound => 1004,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::InvalidJson => "Request body is not valid JSON",
            Self::NotFound => "The requested resource was not found",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_unique() {
        let all = [
            ErrorCode::ValidationError,
            ErrorCode::InvalidJson,
            ErrorCode::NotFound,
        ];
        let mut codes: Vec<i32> = all.iter().map(ErrorCode::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }

    #[test]
    fn test_serde_matches_as_str() {
        let json = serde_json::to_string(&ErrorCode::InvalidJson).unwrap();
        assert_eq!(json, "\"INVALID_JSON\"");
    }
}
