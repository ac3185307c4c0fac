use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("task {0} not found")]
    NotFound(Uuid),

    #[error("malformed task id {0:?}")]
    MalformedId(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(id) => {
                tracing::warn!(%id, "task not found");
                not_found()
            }
            AppError::MalformedId(raw) => {
                tracing::warn!(id = %raw, "malformed task id");
                not_found()
            }
            AppError::Database(err) => {
                tracing::error!(error = %err, "database failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(todo_frontend::server_error_page()),
                )
                    .into_response()
            }
        }
    }
}

pub fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Html(todo_frontend::not_found_page())).into_response()
}
