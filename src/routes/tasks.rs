use crate::{
    auth::AuthContext,
    error::AppError,
    models::{TaskInput, TaskQuery, TaskUpdate},
    services,
};
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use sqlx::PgPool;
use uuid::Uuid;

/// Creates a new task for the authenticated user.
///
/// The owner of the task is always the authenticated user; the status
/// defaults to `pending` when not provided.
///
/// ## Responses:
/// - `201 Created`: Returns the newly created task as JSON.
/// - `400 Bad Request`: If the input is malformed or violates a constraint.
/// - `401 Unauthorized`: If the request lacks a valid bearer token.
#[post("")]
pub async fn create_task(
    pool: web::Data<PgPool>,
    ctx: AuthContext,
    input: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    let task = services::tasks::create(&pool, ctx.user_id, input.into_inner()).await?;
    Ok(HttpResponse::Created().json(task))
}

/// Retrieves a page of the authenticated user's tasks.
///
/// Only tasks owned by the authenticated user are visible.
///
/// ## Query Parameters:
/// - `status` (optional): filter by status (`pending`, `in-progress`, `done`).
/// - `page` (optional, default 1): 1-based page number.
/// - `limit` (optional, default 10, max 100): page size.
/// - `sortBy` (optional, default `createdAt`): one of `createdAt`, `dueDate`, `title`.
/// - `order` (optional, default `desc`): `asc` or `desc`.
///
/// ## Responses:
/// - `200 OK`: `{tasks, pagination: {total, page, limit, totalPages}}`.
/// - `400 Bad Request`: If a query parameter is out of range or malformed.
/// - `401 Unauthorized`: If the request lacks a valid bearer token.
#[get("")]
pub async fn list_tasks(
    pool: web::Data<PgPool>,
    ctx: AuthContext,
    query: web::Query<TaskQuery>,
) -> Result<impl Responder, AppError> {
    let page = services::tasks::list(&pool, ctx.user_id, query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// Retrieves a specific task by its ID.
///
/// ## Responses:
/// - `200 OK`: Returns the task as JSON.
/// - `400 Bad Request`: If the id is not a well-formed UUID.
/// - `401 Unauthorized`: If the request lacks a valid bearer token.
/// - `403 Forbidden`: If the task exists but belongs to another user.
/// - `404 Not Found`: If no task with the given id exists.
#[get("/{id}")]
pub async fn get_task(
    pool: web::Data<PgPool>,
    ctx: AuthContext,
    id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let task_id: Uuid = id.into_inner().parse()?;
    let task = services::tasks::get_by_id(&pool, ctx.user_id, task_id).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Partially updates a task.
///
/// Only the fields present in the body change; everything else keeps its
/// stored value. Only the owner can update a task.
///
/// ## Responses:
/// - `200 OK`: Returns the updated task as JSON.
/// - `400 Bad Request`: Malformed id or invalid field value.
/// - `401 Unauthorized`: If the request lacks a valid bearer token.
/// - `403 Forbidden`: If the task exists but belongs to another user.
/// - `404 Not Found`: If no task with the given id exists.
#[patch("/{id}")]
pub async fn update_task(
    pool: web::Data<PgPool>,
    ctx: AuthContext,
    id: web::Path<String>,
    input: web::Json<TaskUpdate>,
) -> Result<impl Responder, AppError> {
    let task_id: Uuid = id.into_inner().parse()?;
    let task = services::tasks::update(&pool, ctx.user_id, task_id, input.into_inner()).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task by its ID.
///
/// Deletion is physical and immediate. Only the owner can delete a task.
///
/// ## Responses:
/// - `204 No Content`: On successful deletion.
/// - `400 Bad Request`: If the id is not a well-formed UUID.
/// - `401 Unauthorized`: If the request lacks a valid bearer token.
/// - `403 Forbidden`: If the task exists but belongs to another user.
/// - `404 Not Found`: If no task with the given id exists.
#[delete("/{id}")]
pub async fn delete_task(
    pool: web::Data<PgPool>,
    ctx: AuthContext,
    id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let task_id: Uuid = id.into_inner().parse()?;
    services::tasks::delete(&pool, ctx.user_id, task_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
