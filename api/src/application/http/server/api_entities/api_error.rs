use axum::{
    Json,
    extract::{FromRequestParts, Query},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use foodcast_core::domain::common::entities::app_errors::CoreError;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("{0}")]
    UnprocessableEntity(String),

    #[error("{0}")]
    InternalServerError(String),

    #[error("{0}")]
    ServiceUnavailable(String),
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    pub code: String,
    pub status: i64,
    pub message: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "E_BAD_REQUEST",
            ApiError::NotFound(_) => "E_NOT_FOUND",
            ApiError::PayloadTooLarge(_) => "E_PAYLOAD_TOO_LARGE",
            ApiError::UnprocessableEntity(_) => "E_UNPROCESSABLE_ENTITY",
            ApiError::InternalServerError(_) => "E_INTERNAL_SERVER_ERROR",
            ApiError::ServiceUnavailable(_) => "E_SERVICE_UNAVAILABLE",
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::InvalidFileExtension(_)
            | CoreError::MalformedUpload(_)
            | CoreError::MissingColumns { .. }
            | CoreError::InvalidDate { .. }
            | CoreError::InvalidQuantity { .. }
            | CoreError::EmptyDataset
            | CoreError::DateSpanTooLong { .. }
            | CoreError::InvalidChartName(_) => ApiError::BadRequest(error.to_string()),
            CoreError::ChartNotFound(_) => ApiError::NotFound(error.to_string()),
            CoreError::Forecast(_) => ApiError::UnprocessableEntity(error.to_string()),
            CoreError::RenderError(_)
            | CoreError::StorageError(_)
            | CoreError::InternalServerError(_) => {
                error!(error = %error, "Request failed with a server error");
                ApiError::InternalServerError("internal server error".to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ApiErrorResponse {
            code: self.code().to_string(),
            status: status.as_u16() as i64,
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Query extractor that runs `validator` rules and answers 400 on failure
#[derive(Debug, Clone)]
pub struct ValidateQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidateQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

        value
            .validate()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;

        Ok(ValidateQuery(value))
    }
}

#[cfg(test)]
mod tests {
    use foodcast_core::domain::forecast::{entities::ForecastMethod, errors::ForecastError};

    use super::*;

    #[test]
    fn test_core_errors_map_to_status_codes() {
        let cases = [
            (CoreError::InvalidFileExtension("a.txt".into()), StatusCode::BAD_REQUEST),
            (CoreError::EmptyDataset, StatusCode::BAD_REQUEST),
            (CoreError::InvalidChartName("../x".into()), StatusCode::BAD_REQUEST),
            (CoreError::ChartNotFound("x.png".into()), StatusCode::NOT_FOUND),
            (
                CoreError::Forecast(ForecastError::NonConvergence {
                    method: ForecastMethod::Sarima,
                    reason: "singular covariance".into(),
                }),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (CoreError::StorageError("disk".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (core, status) in cases {
            assert_eq!(ApiError::from(core).status_code(), status);
        }
    }

    #[test]
    fn test_server_errors_do_not_leak_details() {
        let api = ApiError::from(CoreError::StorageError("/secret/path".into()));
        assert!(!api.to_string().contains("/secret/path"));
    }

    #[test]
    fn test_client_errors_keep_message() {
        let api = ApiError::from(CoreError::MissingColumns {
            required: vec!["Fecha".into()],
            missing: vec!["Fecha".into()],
        });
        assert!(api.to_string().contains("Fecha"));
        assert_eq!(api.code(), "E_BAD_REQUEST");
    }
}
