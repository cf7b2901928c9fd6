//! REST surface for tasks.
//!
//! Every /api/tasks route runs behind auth_middleware, so handlers get the
//! authenticated User as an extension. Ownership failures are reported as
//! 404, so a foreign task id is indistinguishable from an absent one.

use crate::auth::{self, SharedState};
use crate::models::{CreateTaskRequest, Task, UpdateTaskRequest, User};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::Utc;
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;

// Fetch a task and check it belongs to the caller. Missing and foreign
// collapse into the same 404.
fn owned_task(
    state: &SharedState,
    id: Uuid,
    user: &User,
) -> Result<Task, (StatusCode, String)> {
    let task = state
        .db
        .get_task(id)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .ok_or((StatusCode::NOT_FOUND, "Task not found".to_string()))?;

    if task.owner != user.id {
        return Err((StatusCode::NOT_FOUND, "Task not found".to_string()));
    }
    Ok(task)
}

// GET /api/tasks
pub async fn list_tasks(
    State(state): State<SharedState>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<Task>>, (StatusCode, String)> {
    let tasks = state
        .db
        .list_tasks(user.id)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(tasks))
}

// POST /api/tasks
pub async fn create_task(
    State(state): State<SharedState>,
    Extension(user): Extension<User>,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), (StatusCode, String)> {
    if payload.description.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Description is required".to_string()));
    }

    let now = Utc::now();
    let task = Task {
        id: Uuid::new_v4(),
        owner: user.id,
        description: payload.description,
        completed: payload.completed,
        created_at: now,
        updated_at: now,
    };

    state
        .db
        .create_task(&task)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    tracing::info!(task_id = %task.id, owner = %user.username, "task created");

    Ok((StatusCode::CREATED, Json(task)))
}

// GET /api/tasks/:id
pub async fn get_task(
    State(state): State<SharedState>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
) -> Result<Json<Task>, (StatusCode, String)> {
    let task = owned_task(&state, id, &user)?;
    Ok(Json(task))
}

// PUT /api/tasks/:id
pub async fn update_task(
    State(state): State<SharedState>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<Json<Task>, (StatusCode, String)> {
    let mut task = owned_task(&state, id, &user)?;

    // Apply updates
    if let Some(description) = payload.description {
        if description.trim().is_empty() {
            return Err((StatusCode::BAD_REQUEST, "Description is required".to_string()));
        }
        task.description = description;
    }
    if let Some(completed) = payload.completed {
        task.completed = completed;
    }

    task.updated_at = Utc::now();

    state
        .db
        .update_task(&task)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(task))
}

// DELETE /api/tasks/:id
pub async fn delete_task(
    State(state): State<SharedState>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    owned_task(&state, id, &user)?;

    state
        .db
        .delete_task(id)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    tracing::info!(task_id = %id, owner = %user.username, "task deleted");

    Ok(StatusCode::NO_CONTENT)
}

// GET /api/health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// The full application router. Also what the integration tests mount.
pub fn router(state: SharedState) -> Router {
    let tasks = Router::new()
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route(
            "/api/tasks/:id",
            get(get_task).put(update_task).delete(delete_task),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/health", get(health))
        .merge(tasks)
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
