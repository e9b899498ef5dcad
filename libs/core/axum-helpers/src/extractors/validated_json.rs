//! JSON extractor with automatic validation using the validator crate.

use crate::errors::{ErrorCode, ErrorResponse};
use axum::{
    extract::{FromRequest, Json, Request, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

/// JSON extractor with automatic validation.
///
/// Deserializes the body and runs the `validator` rules of `T`. Handlers that
/// need their own error envelope can take `Result<ValidatedJson<T>, ValidationRejection>`
/// and map the rejection themselves.
///
/// # Example
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct QuoteRequest {
///     #[validate(length(min = 1))]
///     slug: String,
/// }
///
/// async fn quote(ValidatedJson(body): ValidatedJson<QuoteRequest>) -> String {
///     body.slug
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

/// Why a [`ValidatedJson`] body was rejected.
#[derive(Debug, Error)]
pub enum ValidationRejection {
    #[error("{}", .0.body_text())]
    Json(#[from] JsonRejection),

    #[error("{0}")]
    Invalid(#[from] ValidationErrors),
}

impl IntoResponse for ValidationRejection {
    fn into_response(self) -> Response {
        match self {
            ValidationRejection::Json(e) => {
                tracing::debug!(error_code = ErrorCode::InvalidJson.code(), "JSON rejection: {}", e);
                ErrorResponse::new(ErrorCode::InvalidJson, e.body_text()).into_response_with(e.status())
            }
            ValidationRejection::Invalid(e) => {
                tracing::debug!(error_code = ErrorCode::ValidationError.code(), "Validation failed: {}", e);
                let details = field_errors_json(&e);
                ErrorResponse::new(
                    ErrorCode::ValidationError,
                    ErrorCode::ValidationError.default_message(),
                )
                .with_details(details)
                .into_response_with(StatusCode::BAD_REQUEST)
            }
        }
    }
}

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidationRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state).await?;
        data.validate()?;
        Ok(ValidatedJson(data))
    }
}

fn field_errors_json(errors: &ValidationErrors) -> serde_json::Value {
    let details = errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let messages: Vec<serde_json::Value> = errors
                .iter()
                .map(|err| {
                    serde_json::json!({
                        "code": err.code,
                        "message": err.message,
                        "params": err.params,
                    })
                })
                .collect();
            (field.to_string(), serde_json::Value::Array(messages))
        })
        .collect::<serde_json::Map<_, _>>();

    serde_json::Value::Object(details)
}
