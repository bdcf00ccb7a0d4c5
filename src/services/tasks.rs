//!
//! # Task Service
//!
//! Ownership-scoped CRUD over the task store. Every operation takes the
//! acting user's id from the request context and never reads or writes a
//! task outside that scope. Listing supports an optional status filter plus
//! sorting and pagination.

use chrono::Utc;
use futures::future::try_join;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::models::{Pagination, Task, TaskInput, TaskPage, TaskQuery, TaskUpdate};

const TASK_COLUMNS: &str =
    "id, title, description, status, due_date, user_id, created_at, updated_at";

/// Creates a new task owned by `owner_id`, with defaults applied.
pub async fn create(pool: &PgPool, owner_id: Uuid, input: TaskInput) -> Result<Task, AppError> {
    let input = input.normalized();
    input.validate()?;

    let task = Task::new(input, owner_id);
    let sql = format!(
        "INSERT INTO tasks (id, title, description, status, due_date, user_id, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         RETURNING {TASK_COLUMNS}"
    );
    let created = sqlx::query_as::<_, Task>(&sql)
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status)
        .bind(task.due_date)
        .bind(task.user_id)
        .bind(task.created_at)
        .bind(task.updated_at)
        .fetch_one(pool)
        .await?;
    Ok(created)
}

/// Returns one page of the owner's tasks plus the pagination block.
///
/// The count and the page fetch are independent reads and run concurrently;
/// under concurrent writes the total and the returned page may disagree,
/// which is accepted for this domain.
pub async fn list(pool: &PgPool, owner_id: Uuid, query: TaskQuery) -> Result<TaskPage, AppError> {
    query.validate()?;

    let mut filter = String::from("WHERE user_id = $1");
    if query.status.is_some() {
        filter.push_str(" AND status = $2");
    }

    // Sort key, direction, and the page window all come from the validated
    // query, never from raw input.
    let offset = (i64::from(query.page) - 1) * i64::from(query.limit);
    let fetch_sql = format!(
        "SELECT {TASK_COLUMNS} FROM tasks {filter} ORDER BY {sort} {order} LIMIT {limit} OFFSET {offset}",
        sort = query.sort_by.column(),
        order = query.order.sql(),
        limit = query.limit,
    );
    let count_sql = format!("SELECT COUNT(*) FROM tasks {filter}");

    let mut fetch = sqlx::query_as::<_, Task>(&fetch_sql).bind(owner_id);
    let mut count = sqlx::query_scalar::<_, i64>(&count_sql).bind(owner_id);
    if let Some(status) = query.status {
        fetch = fetch.bind(status);
        count = count.bind(status);
    }

    let (tasks, total) = try_join(fetch.fetch_all(pool), count.fetch_one(pool)).await?;

    Ok(TaskPage {
        tasks,
        pagination: Pagination::new(total, query.page, query.limit),
    })
}

/// Fetches a single task by id for the given owner.
///
/// Existence is checked before ownership: a foreign task id yields
/// `Forbidden`, a missing one `NotFound`.
pub async fn get_by_id(pool: &PgPool, owner_id: Uuid, task_id: Uuid) -> Result<Task, AppError> {
    fetch_owned(pool, owner_id, task_id).await
}

/// Merges the provided fields onto the stored task and persists the result.
pub async fn update(
    pool: &PgPool,
    owner_id: Uuid,
    task_id: Uuid,
    update: TaskUpdate,
) -> Result<Task, AppError> {
    let update = update.normalized();
    update.validate()?;

    let mut task = fetch_owned(pool, owner_id, task_id).await?;
    task.apply(update);

    let sql = format!(
        "UPDATE tasks
         SET title = $1, description = $2, status = $3, due_date = $4, updated_at = $5
         WHERE id = $6 AND user_id = $7
         RETURNING {TASK_COLUMNS}"
    );
    let updated = sqlx::query_as::<_, Task>(&sql)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status)
        .bind(task.due_date)
        .bind(Utc::now())
        .bind(task.id)
        .bind(owner_id)
        .fetch_one(pool)
        .await?;
    Ok(updated)
}

/// Physically removes the task. No soft-delete.
pub async fn delete(pool: &PgPool, owner_id: Uuid, task_id: Uuid) -> Result<(), AppError> {
    fetch_owned(pool, owner_id, task_id).await?;

    sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
        .bind(task_id)
        .bind(owner_id)
        .execute(pool)
        .await?;
    Ok(())
}

async fn fetch_owned(pool: &PgPool, owner_id: Uuid, task_id: Uuid) -> Result<Task, AppError> {
    let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1");
    let task: Option<Task> = sqlx::query_as(&sql)
        .bind(task_id)
        .fetch_optional(pool)
        .await?;

    let task = task.ok_or_else(|| AppError::NotFound("Task not found".into()))?;
    if task.user_id != owner_id {
        return Err(AppError::Forbidden("Forbidden".into()));
    }
    Ok(task)
}
