pub mod config;
pub mod error;
pub mod repository;
pub mod routes;

use axum::{
    routing::{get, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::repository::TaskRepository;

pub fn app(repo: TaskRepository, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/", get(routes::list_tasks))
        .route("/tasks/new", get(routes::new_task_form).post(routes::create_task))
        .route("/tasks/bulk-delete", post(routes::bulk_delete))
        .route("/tasks/:id", get(routes::show_task))
        .route(
            "/tasks/:id/edit",
            get(routes::edit_task_form).post(routes::update_task),
        )
        .route(
            "/tasks/:id/delete",
            get(routes::confirm_delete).post(routes::delete_task),
        )
        .route("/tasks/:id/resolve", post(routes::toggle_task))
        .nest_service("/static", ServeDir::new(static_dir.as_ref()))
        .fallback(routes::fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(repo))
}
