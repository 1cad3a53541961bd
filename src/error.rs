use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;

use crate::models::{ApiResponse, ReportResponse};

/// Every failure a handler can return. The HTTP status depends only on the
/// variant; the body shape depends on which envelope wraps it.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Missing or malformed input.
    #[display(fmt = "{}", _0)]
    Validation(String),

    #[display(fmt = "{}", _0)]
    NotFound(String),

    /// Persistence failure. Holds the client-facing message, already
    /// redacted unless raw store errors are exposed.
    #[display(fmt = "{}", _0)]
    Store(String),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        ApiError::NotFound(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        status_for(self)
    }
}

pub fn status_for(err: &ApiError) -> StatusCode {
    match err {
        ApiError::Validation(_) => StatusCode::BAD_REQUEST,
        ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl std::error::Error for ApiError {}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status()).json(ApiResponse::failure(self.to_string()))
    }
}

/// [`ApiError`] rendered in the `{status: "error"}` report envelope.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
#[display(fmt = "{}", _0)]
pub struct ReportError(pub ApiError);

impl From<ApiError> for ReportError {
    fn from(err: ApiError) -> Self {
        ReportError(err)
    }
}

impl std::error::Error for ReportError {}

impl ResponseError for ReportError {
    fn status_code(&self) -> StatusCode {
        self.0.status()
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.0.status()).json(ReportResponse::failure(self.0.to_string()))
    }
}
