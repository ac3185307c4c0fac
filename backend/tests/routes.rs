use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use todo_backend::repository::{self, TaskRepository};
use tower::ServiceExt;
use uuid::Uuid;

async fn setup() -> (Router, TaskRepository) {
    let pool = repository::connect("sqlite::memory:", 1).await.unwrap();
    let repo = TaskRepository::new(pool);
    (todo_backend::app(repo.clone(), "static"), repo)
}

async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_form(app: &Router, uri: &str, body: &str) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn assert_redirects_to_list(response: &Response) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");
}

#[tokio::test]
async fn empty_list_renders() {
    let (app, _) = setup().await;
    let response = get(&app, "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("No tasks yet."));
}

#[tokio::test]
async fn create_form_renders() {
    let (app, _) = setup().await;
    let response = get(&app, "/tasks/new").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("New task"));
    assert!(!html.contains("This field is required."));
}

#[tokio::test]
async fn create_with_title_only() {
    let (app, repo) = setup().await;
    let response = post_form(&app, "/tasks/new", "title=My+First+Todo").await;
    assert_redirects_to_list(&response);

    let tasks = repo.list().await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "My First Todo");
    assert_eq!(tasks[0].due_date, None);
    assert!(!tasks[0].resolved);

    let html = body_text(get(&app, "/").await).await;
    assert!(html.contains("My First Todo"));
}

#[tokio::test]
async fn create_without_title_persists_nothing() {
    let (app, repo) = setup().await;
    let response = post_form(&app, "/tasks/new", "title=&description=No+title").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let html = body_text(response).await;
    assert!(html.contains("This field is required."));
    assert!(html.contains("No title"));
    assert!(repo.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_with_missing_title_field() {
    let (app, repo) = setup().await;
    let response = post_form(&app, "/tasks/new", "description=orphan").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(repo.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_with_invalid_date() {
    let (app, repo) = setup().await;
    let response = post_form(&app, "/tasks/new", "title=Task&due_date=invalid-date").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(response).await.contains("Enter a valid date."));
    assert!(repo.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn buy_milk_lifecycle() {
    let (app, repo) = setup().await;

    let response = post_form(&app, "/tasks/new", "title=Buy+milk&due_date=2025-12-01").await;
    assert_redirects_to_list(&response);

    let tasks = repo.list().await.unwrap();
    assert_eq!(tasks.len(), 1);
    let id = tasks[0].id;
    assert_eq!(tasks[0].due_date, NaiveDate::from_ymd_opt(2025, 12, 1));

    let html = body_text(get(&app, "/").await).await;
    assert!(html.contains("Buy milk"));
    assert!(html.contains("Due 2025-12-01"));
    assert!(html.contains("Mark resolved"));

    let response = post_form(&app, &format!("/tasks/{id}/resolve"), "").await;
    assert_redirects_to_list(&response);
    assert!(repo.get(id).await.unwrap().resolved);

    let response = post_form(&app, &format!("/tasks/{id}/delete"), "").await;
    assert_redirects_to_list(&response);
    assert!(repo.list().await.unwrap().is_empty());
    assert!(body_text(get(&app, "/").await).await.contains("No tasks yet."));
}

#[tokio::test]
async fn detail_page_and_missing_task() {
    let (app, repo) = setup().await;
    let task = repo
        .create(
            todo_shared::TaskForm {
                title: "Read book".to_string(),
                description: "Chapter 3".to_string(),
                due_date: String::new(),
            }
            .validate()
            .unwrap(),
        )
        .await
        .unwrap();

    let response = get(&app, &format!("/tasks/{}", task.id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Read book"));
    assert!(html.contains("Chapter 3"));

    let response = get(&app, &format!("/tasks/{}", Uuid::new_v4())).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("Not found"));

    let response = get(&app, "/tasks/not-a-uuid").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn edit_updates_fields() {
    let (app, repo) = setup().await;
    post_form(&app, "/tasks/new", "title=Original+Title&description=Original+Description").await;
    let id = repo.list().await.unwrap()[0].id;

    let html = body_text(get(&app, &format!("/tasks/{id}/edit")).await).await;
    assert!(html.contains("Original Title"));
    assert!(html.contains("Original Description"));

    let response = post_form(
        &app,
        &format!("/tasks/{id}/edit"),
        "title=Updated+Title&description=Updated&due_date=2025-12-25",
    )
    .await;
    assert_redirects_to_list(&response);

    let task = repo.get(id).await.unwrap();
    assert_eq!(task.title, "Updated Title");
    assert_eq!(task.description.as_deref(), Some("Updated"));
    assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2025, 12, 25));
}

#[tokio::test]
async fn invalid_edit_leaves_record_unchanged() {
    let (app, repo) = setup().await;
    post_form(&app, "/tasks/new", "title=Keep+me&due_date=2025-12-01").await;
    let before = repo.list().await.unwrap().remove(0);

    let response = post_form(
        &app,
        &format!("/tasks/{}/edit", before.id),
        "title=Changed&due_date=2025-02-30",
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_text(response).await;
    assert!(html.contains("Enter a valid date."));
    assert!(html.contains("2025-02-30"));

    assert_eq!(repo.get(before.id).await.unwrap(), before);
}

#[tokio::test]
async fn edit_page_escapes_stored_text() {
    let (app, repo) = setup().await;
    post_form(
        &app,
        "/tasks/new",
        "title=%3Cscript%3Ealert(1)%3C%2Fscript%3E&description=%3C%2Ftextarea%3E%3Cb%3Ex%3C%2Fb%3E",
    )
    .await;
    let task = repo.list().await.unwrap().remove(0);
    assert_eq!(task.title, "<script>alert(1)</script>");

    let html = body_text(get(&app, &format!("/tasks/{}/edit", task.id)).await).await;
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(html.contains("&lt;/textarea&gt;&lt;b&gt;x&lt;/b&gt;"));
    assert!(!html.contains("<script>"));
    assert!(!html.contains("<b>x</b>"));

    let html = body_text(get(&app, "/").await).await;
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(!html.contains("<script>"));
}

#[tokio::test]
async fn rejected_form_escapes_submitted_values() {
    let (app, repo) = setup().await;
    let response = post_form(
        &app,
        "/tasks/new",
        "title=%22+onfocus%3D%22alert(1)&due_date=%22%3E%3Cscript%3E",
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let html = body_text(response).await;
    assert!(html.contains("&quot; onfocus=&quot;alert(1)"));
    assert!(!html.contains("onfocus=\"alert"));
    assert!(!html.contains("<script>"));
    assert!(repo.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn edit_missing_task_is_not_found() {
    let (app, _) = setup().await;
    let uri = format!("/tasks/{}/edit", Uuid::new_v4());

    assert_eq!(get(&app, &uri).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        post_form(&app, &uri, "title=Anything").await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        post_form(&app, &uri, "title=").await.status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn delete_confirmation_then_delete() {
    let (app, repo) = setup().await;
    post_form(&app, "/tasks/new", "title=Delete+This").await;
    post_form(&app, "/tasks/new", "title=Keep+This").await;
    let doomed = repo
        .list()
        .await
        .unwrap()
        .into_iter()
        .find(|t| t.title == "Delete This")
        .unwrap();

    let response = get(&app, &format!("/tasks/{}/delete", doomed.id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Delete This"));
    assert_eq!(repo.list().await.unwrap().len(), 2);

    let response = post_form(&app, &format!("/tasks/{}/delete", doomed.id), "").await;
    assert_redirects_to_list(&response);

    let remaining = repo.list().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].title, "Keep This");

    let response = get(&app, &format!("/tasks/{}", doomed.id)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = post_form(&app, &format!("/tasks/{}/delete", doomed.id), "").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn toggle_twice_restores_state() {
    let (app, repo) = setup().await;
    post_form(&app, "/tasks/new", "title=Flip").await;
    post_form(&app, "/tasks/new", "title=Bystander").await;
    let tasks = repo.list().await.unwrap();
    let target = tasks.iter().find(|t| t.title == "Flip").unwrap().id;
    let bystander = tasks.iter().find(|t| t.title == "Bystander").unwrap().id;

    let uri = format!("/tasks/{target}/resolve");
    post_form(&app, &uri, "").await;
    assert!(repo.get(target).await.unwrap().resolved);
    assert!(!repo.get(bystander).await.unwrap().resolved);

    post_form(&app, &uri, "").await;
    assert!(!repo.get(target).await.unwrap().resolved);
}

#[tokio::test]
async fn toggle_requires_post() {
    let (app, repo) = setup().await;
    post_form(&app, "/tasks/new", "title=Flip").await;
    let id = repo.list().await.unwrap()[0].id;

    let response = get(&app, &format!("/tasks/{id}/resolve")).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert!(!repo.get(id).await.unwrap().resolved);
}

#[tokio::test]
async fn toggle_missing_task_is_not_found() {
    let (app, _) = setup().await;
    let response = post_form(&app, &format!("/tasks/{}/resolve", Uuid::new_v4()), "").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn bulk_delete_removes_exactly_selected() {
    let (app, repo) = setup().await;
    for title in ["One", "Two", "Three", "Four"] {
        post_form(&app, "/tasks/new", &format!("title={title}")).await;
    }
    let tasks = repo.list().await.unwrap();
    let pick = |title: &str| tasks.iter().find(|t| t.title == title).unwrap().id;

    let body = format!(
        "selected={}&selected={}&selected=garbage&selected={}",
        pick("One"),
        pick("Three"),
        Uuid::new_v4()
    );
    let response = post_form(&app, "/tasks/bulk-delete", &body).await;
    assert_redirects_to_list(&response);

    let mut remaining: Vec<String> = repo
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.title)
        .collect();
    remaining.sort();
    assert_eq!(remaining, ["Four", "Two"]);
}

#[tokio::test]
async fn bulk_delete_with_nothing_selected() {
    let (app, repo) = setup().await;
    post_form(&app, "/tasks/new", "title=Survivor").await;

    let response = post_form(&app, "/tasks/bulk-delete", "").await;
    assert_redirects_to_list(&response);
    assert_eq!(repo.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let (app, _) = setup().await;
    let response = get(&app, "/nowhere").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
