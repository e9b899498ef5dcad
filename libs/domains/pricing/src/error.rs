use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_helpers::ValidationRejection;
use serde_json::json;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for pricing operations
pub type PricingResult<T> = Result<T, PricingError>;

/// Errors a quote (or a catalog lookup) can end in
#[derive(Debug, Error)]
pub enum PricingError {
    /// Unknown or inactive service slug
    #[error("Service not found: {0}")]
    ServiceNotFound(String),

    /// No price row matches the attribute selection
    #[error("No pricing rule found for service '{slug}' and the given selection")]
    NoPricingRuleFound { slug: String },

    #[error("Invalid quantity: {0} (must be a positive integer)")]
    InvalidQuantity(i64),

    /// Quantity is smaller than every tier threshold of the row
    #[error("Quantity {qty} is below the minimum tier of {min_tier}")]
    QuantityBelowMinimumTier { qty: i64, min_tier: i64 },

    /// Inconsistent catalog data or arithmetic overflow
    #[error("Unexpected computation error: {0}")]
    UnexpectedComputation(String),

    /// Request failed validation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The catalog collaborator failed
    #[error("Catalog error: {0}")]
    Catalog(String),
}

impl PricingError {
    /// Stable label for metrics and logs
    pub fn reason(&self) -> &'static str {
        match self {
            PricingError::ServiceNotFound(_) => "service_not_found",
            PricingError::NoPricingRuleFound { .. } => "no_pricing_rule",
            PricingError::InvalidQuantity(_) => "invalid_quantity",
            PricingError::QuantityBelowMinimumTier { .. } => "below_minimum_tier",
            PricingError::UnexpectedComputation(_) => "unexpected_computation",
            PricingError::InvalidInput(_) => "invalid_input",
            PricingError::Catalog(_) => "catalog",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            PricingError::ServiceNotFound(_) | PricingError::NoPricingRuleFound { .. } => {
                StatusCode::NOT_FOUND
            }
            PricingError::InvalidQuantity(_)
            | PricingError::QuantityBelowMinimumTier { .. }
            | PricingError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            PricingError::UnexpectedComputation(_) | PricingError::Catalog(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<ValidationRejection> for PricingError {
    fn from(rejection: ValidationRejection) -> Self {
        PricingError::InvalidInput(rejection.to_string())
    }
}

impl IntoResponse for PricingError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status.is_server_error() {
            tracing::error!(reason = self.reason(), "Quote failed: {}", self);
            "Internal error".to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "ok": false,
            "error": message
        }));

        (status, body).into_response()
    }
}

/// Failure to load a catalog snapshot or modifier rule file
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid data: {0}")]
    Invalid(String),
}

impl LoadError {
    pub(crate) fn read_json<T: serde::de::DeserializeOwned>(
        path: &std::path::Path,
    ) -> Result<T, LoadError> {
        let raw = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&raw).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
