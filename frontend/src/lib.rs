//! Server-side rendering of every page of the TODO application.
//!
//! Pages are built as `sauron` virtual DOM nodes and rendered to HTML
//! strings; the backend only decides which page to render.
//!
//! The renderer writes text and attribute values verbatim, so every string a
//! user typed goes through [`user_text`] or [`user_value`] first.

use sauron::{
    html::{attributes::*, *},
    prelude::*,
};
use todo_shared::{FormErrors, Task, TaskForm, DATE_FORMAT};

const STYLESHEET: &str = "/static/style.css";

/// Field name carried by each bulk-delete checkbox.
pub const BULK_SELECT_FIELD: &str = "selected";

type View = Node<()>;

fn user_text(raw: &str) -> View {
    text(html_escape::encode_text(raw))
}

fn user_value(raw: &str) -> Attribute<()> {
    value(html_escape::encode_double_quoted_attribute(raw).into_owned())
}

/// What a create or edit form page needs besides the field values.
pub struct FormPage<'a> {
    pub heading: &'a str,
    pub action: String,
    pub submit_label: &'a str,
    pub form: &'a TaskForm,
    pub errors: &'a FormErrors,
}

fn document(page_title: &str, content: View) -> String {
    let body = div(
        [class("page")],
        [
            header(
                [class("site-header")],
                [h1([], [a([href("/")], [text("TODO")])])],
            ),
            content,
        ],
    );
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>{}</title><link rel=\"stylesheet\" href=\"{}\"></head><body>{}</body></html>",
        page_title,
        STYLESHEET,
        body.render_to_string()
    )
}

fn post_button(action: String, label: &str, css: &'static str) -> View {
    button(
        [
            r#type("submit"),
            attr("formaction", action),
            attr("formmethod", "post"),
            class(css),
        ],
        [text(label)],
    )
}

fn due_label(task: &Task) -> String {
    match task.due_date {
        Some(date) => format!("Due {}", date.format(DATE_FORMAT)),
        None => "No due date".to_string(),
    }
}

fn status_label(task: &Task) -> &'static str {
    if task.resolved {
        "Resolved"
    } else {
        "Open"
    }
}

pub fn list_page(tasks: &[Task]) -> String {
    let content = if tasks.is_empty() {
        div(
            [class("task-list empty")],
            [
                p([], [text("No tasks yet.")]),
                a([href("/tasks/new"), class("btn primary")], [text("Add a task")]),
            ],
        )
    } else {
        form(
            [
                class("task-list"),
                attr("method", "post"),
                attr("action", "/tasks/bulk-delete"),
            ],
            [
                div(
                    [class("toolbar")],
                    [
                        a([href("/tasks/new"), class("btn primary")], [text("Add a task")]),
                        button(
                            [r#type("submit"), class("btn danger")],
                            [text("Delete selected")],
                        ),
                    ],
                ),
                ul([class("tasks")], tasks.iter().map(task_row)),
            ],
        )
    };
    document("Tasks", content)
}

fn task_row(task: &Task) -> View {
    let row_class = if task.resolved {
        "task resolved"
    } else {
        "task"
    };
    let toggle_label = if task.resolved {
        "Mark open"
    } else {
        "Mark resolved"
    };
    li(
        [class(row_class)],
        [
            input(
                [
                    r#type("checkbox"),
                    attr("name", BULK_SELECT_FIELD),
                    value(task.id.to_string()),
                ],
                [],
            ),
            a([href(format!("/tasks/{}", task.id)), class("title")], [user_text(&task.title)]),
            span([class("due")], [text(due_label(task))]),
            span([class("status")], [text(status_label(task))]),
            post_button(format!("/tasks/{}/resolve", task.id), toggle_label, "btn"),
            a([href(format!("/tasks/{}/edit", task.id)), class("btn")], [text("Edit")]),
            a(
                [href(format!("/tasks/{}/delete", task.id)), class("btn danger")],
                [text("Delete")],
            ),
        ],
    )
}

fn field_errors(errors: &FormErrors, field: &str) -> View {
    ul(
        [class("errors")],
        errors
            .get(field)
            .iter()
            .map(|message| li([], [text(message)])),
    )
}

pub fn form_page(page: FormPage<'_>) -> String {
    let mut title_attrs = vec![
        r#type("text"),
        attr("name", "title"),
        attr("id", "title"),
        attr("maxlength", todo_shared::TITLE_MAX_LEN.to_string()),
        placeholder("Enter task title"),
        user_value(&page.form.title),
        class("form-control"),
    ];
    if !page.errors.get("title").is_empty() {
        title_attrs.push(attr("aria-invalid", "true"));
    }

    let content = form(
        [
            class("task-form"),
            attr("method", "post"),
            attr("action", page.action),
        ],
        [
            h2([], [text(page.heading)]),
            div(
                [class("field")],
                [
                    label([attr("for", "title")], [text("Title")]),
                    input(title_attrs, []),
                    field_errors(page.errors, "title"),
                ],
            ),
            div(
                [class("field")],
                [
                    label([attr("for", "description")], [text("Description")]),
                    textarea(
                        [
                            attr("name", "description"),
                            attr("id", "description"),
                            attr("rows", "4"),
                            placeholder("Enter task description"),
                            class("form-control"),
                        ],
                        [user_text(&page.form.description)],
                    ),
                    field_errors(page.errors, "description"),
                ],
            ),
            div(
                [class("field")],
                [
                    label([attr("for", "due_date")], [text("Due date")]),
                    input(
                        [
                            r#type("date"),
                            attr("name", "due_date"),
                            attr("id", "due_date"),
                            user_value(&page.form.due_date),
                            class("form-control"),
                        ],
                        [],
                    ),
                    field_errors(page.errors, "due_date"),
                ],
            ),
            div(
                [class("actions")],
                [
                    button([r#type("submit"), class("btn primary")], [text(page.submit_label)]),
                    a([href("/"), class("btn")], [text("Cancel")]),
                ],
            ),
        ],
    );
    document(page.heading, content)
}

pub fn detail_page(task: &Task) -> String {
    let description = task.description.as_deref().unwrap_or("No description.");
    let content = div(
        [class("task-detail")],
        [
            h2([], [user_text(&task.title)]),
            p([class("status")], [text(status_label(task))]),
            p([class("due")], [text(due_label(task))]),
            p([class("description")], [user_text(description)]),
            p(
                [class("meta")],
                [text(format!(
                    "Created {} · Updated {}",
                    task.created_at.format("%Y-%m-%d %H:%M UTC"),
                    task.updated_at.format("%Y-%m-%d %H:%M UTC")
                ))],
            ),
            form(
                [class("actions")],
                [
                    a([href(format!("/tasks/{}/edit", task.id)), class("btn")], [text("Edit")]),
                    post_button(
                        format!("/tasks/{}/resolve", task.id),
                        if task.resolved { "Mark open" } else { "Mark resolved" },
                        "btn",
                    ),
                    a(
                        [href(format!("/tasks/{}/delete", task.id)), class("btn danger")],
                        [text("Delete")],
                    ),
                    a([href("/"), class("btn")], [text("Back")]),
                ],
            ),
        ],
    );
    document("Task", content)
}

pub fn confirm_delete_page(task: &Task) -> String {
    let content = form(
        [
            class("confirm-delete"),
            attr("method", "post"),
            attr("action", format!("/tasks/{}/delete", task.id)),
        ],
        [
            h2([], [text("Delete task")]),
            p(
                [],
                [user_text(&format!(
                    "Are you sure you want to delete \"{}\"? This cannot be undone.",
                    task.title
                ))],
            ),
            div(
                [class("actions")],
                [
                    button([r#type("submit"), class("btn danger")], [text("Delete")]),
                    a([href("/"), class("btn")], [text("Cancel")]),
                ],
            ),
        ],
    );
    document("Delete task", content)
}

pub fn not_found_page() -> String {
    let content = div(
        [class("message")],
        [
            h2([], [text("Not found")]),
            p([], [text("The task you asked for does not exist.")]),
            a([href("/"), class("btn")], [text("Back to tasks")]),
        ],
    );
    document("Not found", content)
}

pub fn server_error_page() -> String {
    let content = div(
        [class("message")],
        [
            h2([], [text("Something went wrong")]),
            p([], [text("The request could not be completed. Please try again.")]),
            a([href("/"), class("btn")], [text("Back to tasks")]),
        ],
    );
    document("Server error", content)
}
