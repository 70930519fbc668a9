use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use serde_json::json;
use thiserror::Error;

use userbase_core::DomainError;
use userbase_infra::StoreError;

pub const INVALID_JSON: &str = "Invalid JSON format";
pub const INVALID_USER_ID: &str = "Invalid user ID";

/// Every failure a handler can answer with.
///
/// Handlers classify locally and return one of these; nothing is written to
/// the response until the variant is known.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Body did not decode, or the id segment is not an integer.
    #[error("{0}")]
    RequestMalformed(&'static str),

    /// The path exists but does not accept this method.
    #[error("Use {0} method only")]
    MethodMismatch(Method),

    /// Lookup by id found no row.
    #[error("User not found")]
    RecordAbsent,

    /// Any error from the store. `context` is what the client sees.
    #[error("{context}")]
    StoreFailure {
        context: &'static str,
        #[source]
        source: StoreError,
    },

    /// No route matches the path.
    #[error("no route for {method} {path}")]
    NoRoute { method: Method, path: String },
}

impl ApiError {
    pub fn store(context: &'static str, source: StoreError) -> Self {
        Self::StoreFailure { context, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::RequestMalformed(_) => StatusCode::BAD_REQUEST,
            Self::MethodMismatch(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::RecordAbsent => StatusCode::NOT_FOUND,
            Self::StoreFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NoRoute { .. } => StatusCode::NOT_FOUND,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::RequestMalformed(_) => "bad_request",
            Self::MethodMismatch(_) => "method_not_allowed",
            Self::RecordAbsent => "not_found",
            Self::StoreFailure { .. } => "store_error",
            Self::NoRoute { .. } => "no_route",
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidId(_) => Self::RequestMalformed(INVALID_USER_ID),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        // Driver detail stays in the logs, never in the response body.
        if let Self::StoreFailure { context, source } = &self {
            tracing::error!(error = %source, "{context}");
        }
        json_error(self.status(), self.code(), self.to_string())
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
