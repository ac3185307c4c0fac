use axum::{
    extract::{Path, RawForm, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use std::sync::Arc;
use todo_frontend::{FormPage, BULK_SELECT_FIELD};
use todo_shared::{FormErrors, TaskForm};
use uuid::Uuid;

use crate::error::{self, AppError, AppResult};
use crate::repository::TaskRepository;

pub type Repo = Arc<TaskRepository>;

const LIST_URL: &str = "/";

fn parse_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::MalformedId(raw.to_string()))
}

fn render_form(
    heading: &str,
    action: String,
    submit_label: &str,
    form: &TaskForm,
    errors: &FormErrors,
) -> Response {
    let status = if errors.is_empty() {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };
    let page = todo_frontend::form_page(FormPage {
        heading,
        action,
        submit_label,
        form,
        errors,
    });
    (status, Html(page)).into_response()
}

pub async fn list_tasks(State(repo): State<Repo>) -> AppResult<Html<String>> {
    let tasks = repo.list().await?;
    Ok(Html(todo_frontend::list_page(&tasks)))
}

pub async fn new_task_form() -> Response {
    render_form(
        "New task",
        "/tasks/new".to_string(),
        "Create",
        &TaskForm::default(),
        &FormErrors::default(),
    )
}

pub async fn create_task(
    State(repo): State<Repo>,
    Form(form): Form<TaskForm>,
) -> AppResult<Response> {
    match form.validate() {
        Ok(fields) => {
            repo.create(fields).await?;
            Ok(Redirect::to(LIST_URL).into_response())
        }
        Err(errors) => {
            tracing::debug!(%errors, "create rejected");
            Ok(render_form(
                "New task",
                "/tasks/new".to_string(),
                "Create",
                &form,
                &errors,
            ))
        }
    }
}

pub async fn show_task(
    Path(id): Path<String>,
    State(repo): State<Repo>,
) -> AppResult<Html<String>> {
    let task = repo.get(parse_id(&id)?).await?;
    Ok(Html(todo_frontend::detail_page(&task)))
}

pub async fn edit_task_form(
    Path(id): Path<String>,
    State(repo): State<Repo>,
) -> AppResult<Response> {
    let task = repo.get(parse_id(&id)?).await?;
    Ok(render_form(
        "Edit task",
        format!("/tasks/{}/edit", task.id),
        "Save",
        &TaskForm::from_task(&task),
        &FormErrors::default(),
    ))
}

pub async fn update_task(
    Path(id): Path<String>,
    State(repo): State<Repo>,
    Form(form): Form<TaskForm>,
) -> AppResult<Response> {
    let id = parse_id(&id)?;
    match form.validate() {
        Ok(fields) => {
            repo.update(id, fields).await?;
            Ok(Redirect::to(LIST_URL).into_response())
        }
        Err(errors) => {
            // A missing task is still a 404, even when the form is invalid.
            repo.get(id).await?;
            tracing::debug!(%id, %errors, "edit rejected");
            Ok(render_form(
                "Edit task",
                format!("/tasks/{}/edit", id),
                "Save",
                &form,
                &errors,
            ))
        }
    }
}

pub async fn confirm_delete(
    Path(id): Path<String>,
    State(repo): State<Repo>,
) -> AppResult<Html<String>> {
    let task = repo.get(parse_id(&id)?).await?;
    Ok(Html(todo_frontend::confirm_delete_page(&task)))
}

pub async fn delete_task(
    Path(id): Path<String>,
    State(repo): State<Repo>,
) -> AppResult<Redirect> {
    repo.delete(parse_id(&id)?).await?;
    Ok(Redirect::to(LIST_URL))
}

pub async fn toggle_task(
    Path(id): Path<String>,
    State(repo): State<Repo>,
) -> AppResult<Redirect> {
    repo.toggle_resolved(parse_id(&id)?).await?;
    Ok(Redirect::to(LIST_URL))
}

/// Checkbox values arrive as repeated `selected` fields; anything that is not
/// a task id is dropped.
pub async fn bulk_delete(State(repo): State<Repo>, RawForm(body): RawForm) -> AppResult<Redirect> {
    let ids: Vec<Uuid> = url::form_urlencoded::parse(&body)
        .filter(|(key, _)| key == BULK_SELECT_FIELD)
        .filter_map(|(_, value)| Uuid::parse_str(&value).ok())
        .collect();

    repo.delete_many(&ids).await?;
    Ok(Redirect::to(LIST_URL))
}

pub async fn fallback() -> Response {
    error::not_found()
}
