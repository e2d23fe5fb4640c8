use aerodesk_core::{CoreError, FieldErrors, UpstreamError};
use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

#[derive(Debug)]
pub enum AppError {
    ValidationError { message: String, errors: FieldErrors },
    NotFoundError(String),
    ConflictError(String),
    UpstreamUnavailable(String),
    UpstreamTimeout(String),
    /// An error answer from a collaborating service, relayed as received.
    Upstream { status: StatusCode, body: Value },
    InternalServerError(String),
    Anyhow(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::ValidationError { message, errors } => (
                StatusCode::BAD_REQUEST,
                json!({ "message": message, "errors": errors }),
            ),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, json!({ "message": msg })),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, json!({ "message": msg })),
            AppError::UpstreamUnavailable(msg) => {
                tracing::warn!("Upstream unavailable: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, json!({ "message": msg }))
            }
            AppError::UpstreamTimeout(msg) => {
                tracing::warn!("Upstream timeout: {}", msg);
                (StatusCode::GATEWAY_TIMEOUT, json!({ "message": msg }))
            }
            AppError::Upstream { status, body } => (status, body),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": "Internal Server Error" }),
                )
            }
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": "Internal Server Error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation { message, errors } => AppError::ValidationError { message, errors },
            CoreError::NotFound(msg) => AppError::NotFoundError(msg),
            CoreError::Conflict(msg) => AppError::ConflictError(msg),
            CoreError::UpstreamUnavailable(msg) => AppError::UpstreamUnavailable(msg),
            CoreError::UpstreamTimeout(msg) => AppError::UpstreamTimeout(msg),
            CoreError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl From<UpstreamError> for AppError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Unavailable(msg) => AppError::UpstreamUnavailable(msg),
            UpstreamError::Timeout(msg) => AppError::UpstreamTimeout(msg),
            UpstreamError::Rejected { status, message } => AppError::Upstream {
                status: StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                body: json!({ "message": message }),
            },
            UpstreamError::Malformed(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let mut errors = FieldErrors::new();
        errors.add("body", rejection.body_text());
        AppError::ValidationError {
            message: "invalid request body".to_string(),
            errors,
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        let mut errors = FieldErrors::new();
        errors.add("path", rejection.body_text());
        AppError::ValidationError {
            message: "invalid path parameter".to_string(),
            errors,
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Anyhow(err)
    }
}
