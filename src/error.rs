use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;
use uuid::Uuid;

use crate::export::ExportError;
use crate::session::SessionError;

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("unknown quiz session: {0}")]
    UnknownSession(Uuid),
    #[error("unknown export format: {0}")]
    UnknownFormat(String),
    #[error("quiz {0} has not been submitted yet")]
    NotSubmitted(Uuid),
    #[error("invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl From<&ApiError> for StatusCode {
    fn from(error: &ApiError) -> Self {
        match error {
            ApiError::UnknownSession(_) | ApiError::UnknownFormat(_) => StatusCode::NOT_FOUND,
            ApiError::NotSubmitted(_) => StatusCode::CONFLICT,
            ApiError::Session(_) | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from(&self);
        if status.is_server_error() {
            error!(target: "grammar_quiz", error = %self, "Request failed");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
