//! Task management API endpoints.
//!
//! CRUD plus the completion endpoint that drives the recurrence engine.
//! Handlers only orchestrate: load the caller's task snapshot, apply an
//! engine operation, persist the result. Plain field edits via `PUT` never
//! recompute the schedule.

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppState;
use crate::database::TaskRepository;
use crate::domain::recurrence;
use crate::domain::task::{Frequency, Task};
use crate::gateway::auth::AuthenticatedUser;

/// Task routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/tasks", post(create_task).get(list_tasks))
        .route(
            "/api/v1/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/api/v1/tasks/{id}/complete", post(complete_task))
}

/// Request to create a new task.
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Recurrence frequency (defaults to one-off).
    #[serde(default)]
    pub frequency: Frequency,
    /// Day interval, required for custom frequency.
    pub custom_interval_days: Option<u32>,
    /// Anchor date as `YYYY-MM-DD`; defaults to today (UTC).
    pub start_date: Option<String>,
}

/// Request to update a task.
///
/// Plain field edits only; recurrence fields are fixed at creation.
#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    /// Optional new title.
    pub title: Option<String>,
    /// Optional new description.
    pub description: Option<String>,
    /// Optional completed flag override.
    pub completed: Option<bool>,
}

/// Task response.
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    /// Task ID.
    pub id: String,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Recurrence frequency.
    pub frequency: Frequency,
    /// Configured day interval, if any.
    pub custom_interval_days: Option<u32>,
    /// Anchor date, `YYYY-MM-DD`.
    pub start_date: String,
    /// Next due date, `YYYY-MM-DD` or null.
    pub next_due_at: Option<String>,
    /// Last completion instant.
    pub last_completed_at: Option<DateTime<Utc>>,
    /// Completed flag (one-off tasks only).
    pub completed: bool,
    /// Whether the task currently needs attention.
    pub due: bool,
}

impl TaskResponse {
    fn from_task(task: &Task, now: DateTime<Utc>) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            description: task.description.clone(),
            frequency: task.frequency,
            custom_interval_days: task.custom_interval_days,
            start_date: task.start_date.to_string(),
            next_due_at: task.next_due_at.map(|d| d.to_string()),
            last_completed_at: task.last_completed_at,
            completed: task.completed,
            due: recurrence::is_due(task, now),
        }
    }
}

/// Create a new task.
///
/// # Endpoint
///
/// `POST /api/v1/tasks`
async fn create_task(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if req.title.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Title is required".to_string()));
    }
    if req.custom_interval_days == Some(0) {
        return Err((
            StatusCode::BAD_REQUEST,
            "custom_interval_days must be positive".to_string(),
        ));
    }

    let now = Utc::now();
    let start_date = match req.start_date {
        Some(raw) => parse_date(&raw)?,
        None => now.date_naive(),
    };

    let task = Task {
        id: Uuid::new_v4().to_string(),
        user_id: user.user_id,
        title: req.title,
        description: req.description,
        frequency: req.frequency,
        custom_interval_days: req.custom_interval_days,
        start_date,
        last_completed_at: None,
        next_due_at: None,
        completed: false,
        created_at: now,
        updated_at: now,
    };
    let task = recurrence::initialize_schedule(task);

    state
        .database
        .create_task(&task)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    tracing::info!(task_id = %task.id, frequency = ?task.frequency, "Task created");

    Ok((StatusCode::CREATED, Json(TaskResponse::from_task(&task, now))))
}

/// List the caller's tasks.
///
/// # Endpoint
///
/// `GET /api/v1/tasks`
async fn list_tasks(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let tasks = state
        .database
        .list_tasks(&user.user_id)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let now = Utc::now();
    let responses: Vec<TaskResponse> = tasks
        .iter()
        .map(|t| TaskResponse::from_task(t, now))
        .collect();
    Ok(Json(responses))
}

/// Get a task by ID.
///
/// # Endpoint
///
/// `GET /api/v1/tasks/:id`
async fn get_task(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let task = load_task(&state, &id, &user.user_id).await?;
    Ok(Json(TaskResponse::from_task(&task, Utc::now())))
}

/// Edit a task's plain fields.
///
/// # Endpoint
///
/// `PUT /api/v1/tasks/:id`
async fn update_task(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut task = load_task(&state, &id, &user.user_id).await?;

    if let Some(title) = req.title {
        if title.trim().is_empty() {
            return Err((StatusCode::BAD_REQUEST, "Title is required".to_string()));
        }
        task.title = title;
    }
    if let Some(description) = req.description {
        task.description = Some(description);
    }
    if let Some(completed) = req.completed {
        task.completed = completed;
    }
    let now = Utc::now();
    task.updated_at = now;

    state
        .database
        .update_task(&task)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(TaskResponse::from_task(&task, now)))
}

/// Delete a task.
///
/// # Endpoint
///
/// `DELETE /api/v1/tasks/:id`
async fn delete_task(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let deleted = state
        .database
        .delete_task(&id, &user.user_id)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "Task not found".to_string()))
    }
}

/// Mark a task complete for the current period.
///
/// # Endpoint
///
/// `POST /api/v1/tasks/:id/complete`
async fn complete_task(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let task = load_task(&state, &id, &user.user_id).await?;

    let now = Utc::now();
    let mut task = recurrence::record_completion(task, now);
    task.updated_at = now;

    state
        .database
        .update_task(&task)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    tracing::info!(task_id = %task.id, next_due_at = ?task.next_due_at, "Task completed");

    Ok(Json(TaskResponse::from_task(&task, now)))
}

/// Load a task scoped to its owner, or 404.
async fn load_task(
    state: &AppState,
    id: &str,
    user_id: &str,
) -> Result<Task, (StatusCode, String)> {
    state
        .database
        .get_task(id, user_id)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .ok_or_else(|| (StatusCode::NOT_FOUND, "Task not found".to_string()))
}

fn parse_date(raw: &str) -> Result<NaiveDate, (StatusCode, String)> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            format!("Invalid start_date (expected YYYY-MM-DD): {raw}"),
        )
    })
}
