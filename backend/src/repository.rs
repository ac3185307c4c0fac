use std::str::FromStr;

use chrono::Utc;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    QueryBuilder, Row, Sqlite, SqlitePool,
};
use todo_shared::{Task, TaskFields};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Largest number of ids bound into one `DELETE ... IN (...)` statement.
const DELETE_CHUNK: usize = 500;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS tasks (
    id BLOB PRIMARY KEY NOT NULL,
    title TEXT NOT NULL CHECK (length(trim(title)) > 0),
    description TEXT,
    due_date TEXT,
    resolved BOOLEAN NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS tasks_due_date_created_at ON tasks (due_date, created_at);
";

const COLUMNS: &str = "id, title, description, due_date, resolved, created_at, updated_at";

/// Opens the pool and makes sure the `tasks` table exists.
///
/// In-memory databases are private to a single connection, so the pool is
/// pinned to one connection that is never recycled.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");

    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(max_connections.max(1))
    };

    let pool = pool_options.connect_with(options).await?;
    sqlx::raw_sql(SCHEMA).execute(&pool).await?;
    Ok(pool)
}

fn task_from_row(row: &SqliteRow) -> Result<Task, sqlx::Error> {
    Ok(Task {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        due_date: row.try_get("due_date")?,
        resolved: row.try_get("resolved")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[derive(Clone)]
pub struct TaskRepository {
    pool: SqlitePool,
}

impl TaskRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, fields: TaskFields) -> AppResult<Task> {
        let task = Task::new(fields);
        sqlx::query(&format!(
            "INSERT INTO tasks ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?)"
        ))
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.due_date)
        .bind(task.resolved)
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await?;

        tracing::info!(id = %task.id, title = %task.title, "task created");
        Ok(task)
    }

    /// Every task, soonest due date first; undated tasks lead, ties by creation.
    pub async fn list(&self) -> AppResult<Vec<Task>> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM tasks ORDER BY due_date ASC, created_at ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(task_from_row).collect::<Result<Vec<_>, _>>()?)
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Task> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM tasks WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::NotFound(id))?;
        Ok(task_from_row(&row)?)
    }

    /// Replaces the editable fields; `resolved` and `created_at` are kept.
    pub async fn update(&self, id: Uuid, fields: TaskFields) -> AppResult<Task> {
        let row = sqlx::query(&format!(
            "UPDATE tasks SET title = ?, description = ?, due_date = ?, updated_at = ? \
             WHERE id = ? RETURNING {COLUMNS}"
        ))
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(fields.due_date)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound(id))?;

        tracing::info!(%id, "task updated");
        Ok(task_from_row(&row)?)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(id));
        }
        tracing::info!(%id, "task deleted");
        Ok(())
    }

    /// Deletes every listed task in one transaction. Unknown ids are skipped.
    pub async fn delete_many(&self, ids: &[Uuid]) -> AppResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        let mut deleted = 0;
        for chunk in ids.chunks(DELETE_CHUNK) {
            let mut query: QueryBuilder<'_, Sqlite> =
                QueryBuilder::new("DELETE FROM tasks WHERE id IN (");
            let mut separated = query.separated(", ");
            for id in chunk {
                separated.push_bind(*id);
            }
            separated.push_unseparated(")");
            deleted += query.build().execute(&mut *tx).await?.rows_affected();
        }
        tx.commit().await?;

        tracing::info!(requested = ids.len(), deleted, "bulk delete");
        Ok(deleted)
    }

    pub async fn toggle_resolved(&self, id: Uuid) -> AppResult<Task> {
        let row = sqlx::query(&format!(
            "UPDATE tasks SET resolved = NOT resolved, updated_at = ? \
             WHERE id = ? RETURNING {COLUMNS}"
        ))
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound(id))?;

        let task = task_from_row(&row)?;
        tracing::info!(%id, resolved = task.resolved, "task toggled");
        Ok(task)
    }
}
