use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{Local, NaiveDate};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    BoardMetadata, DailyWorkload, RedistributionPlan, RescheduleError, RescheduleSuggestion, Task,
    TaskBoard,
};

#[derive(Clone)]
pub struct AppState {
    board: Arc<RwLock<TaskBoard>>,
}

impl AppState {
    pub fn new(board: TaskBoard) -> Self {
        Self {
            board: Arc::new(RwLock::new(board)),
        }
    }

    pub fn with_shared(board: Arc<RwLock<TaskBoard>>) -> Self {
        Self { board }
    }

    fn board(&self) -> Arc<RwLock<TaskBoard>> {
        self.board.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Conflict(String),
    Invalid(String),
    Internal(String),
}

#[derive(Debug, Deserialize)]
struct ReschedulePayload {
    date: String,
}

#[derive(Debug, Deserialize)]
struct TodayQuery {
    today: Option<NaiveDate>,
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }
}

impl From<polars::prelude::PolarsError> for ApiError {
    fn from(value: polars::prelude::PolarsError) -> Self {
        ApiError::Invalid(value.to_string())
    }
}

impl From<RescheduleError> for ApiError {
    fn from(value: RescheduleError) -> Self {
        match value {
            RescheduleError::TaskNotFound { task_id } => {
                ApiError::NotFound(format!("task {task_id} not found"))
            }
            err @ RescheduleError::InvalidDate { .. } => ApiError::Invalid(err.to_string()),
            RescheduleError::Computation(message) => ApiError::Internal(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(message) => {
                let body = Json(ErrorBody {
                    error: "not_found",
                    message,
                });
                (StatusCode::NOT_FOUND, body).into_response()
            }
            ApiError::Conflict(message) => {
                let body = Json(ErrorBody {
                    error: "conflict",
                    message,
                });
                (StatusCode::CONFLICT, body).into_response()
            }
            ApiError::Invalid(message) => {
                let body = Json(ErrorBody {
                    error: "invalid_request",
                    message,
                });
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            ApiError::Internal(message) => {
                let body = Json(ErrorBody {
                    error: "internal_error",
                    message,
                });
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/metadata", get(get_metadata).put(update_metadata))
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/:id",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/tasks/:id/reschedule", post(reschedule_task))
        .route("/workload/:date", get(workload_for_date))
        .route("/reschedule/suggestions", get(reschedule_suggestions))
        .route("/reschedule/overdue", post(redistribute_overdue))
        .route("/bulk/complete_low_priority", post(complete_low_priority))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, board: TaskBoard) -> std::io::Result<()> {
    let state = AppState::new(board);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

fn today_or_now(params: &TodayQuery) -> NaiveDate {
    params.today.unwrap_or_else(|| Local::now().date_naive())
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn get_metadata(State(state): State<AppState>) -> Json<BoardMetadata> {
    let board = state.board();
    let metadata = {
        let guard = board.read();
        guard.metadata().clone()
    };
    Json(metadata)
}

async fn update_metadata(
    State(state): State<AppState>,
    Json(metadata): Json<BoardMetadata>,
) -> Result<Json<BoardMetadata>, ApiError> {
    let board = state.board();
    {
        let mut guard = board.write();
        guard.set_metadata(metadata);
    }
    let current = {
        let guard = board.read();
        guard.metadata().clone()
    };
    Ok(Json(current))
}

async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<Task>>, ApiError> {
    let board = state.board();
    let tasks = {
        let guard = board.read();
        guard.tasks()?
    };
    Ok(Json(tasks))
}

async fn get_task(
    State(state): State<AppState>,
    Path(task_id): Path<i32>,
) -> Result<Json<Task>, ApiError> {
    let board = state.board();
    let result = {
        let guard = board.read();
        guard.find_task(task_id)?
    };
    match result {
        Some(task) => Ok(Json(task)),
        None => Err(ApiError::not_found(format!("task {task_id} not found"))),
    }
}

async fn create_task(
    State(state): State<AppState>,
    Json(task): Json<Task>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let board = state.board();
    {
        let mut guard = board.write();
        if guard.find_task(task.id)?.is_some() {
            return Err(ApiError::Conflict(format!(
                "task {} already exists",
                task.id
            )));
        }
        guard
            .upsert_task_record(task.clone())
            .map_err(ApiError::from)?;
    }
    let created = {
        let guard = board.read();
        guard
            .find_task(task.id)?
            .ok_or_else(|| ApiError::internal("task not found after creation"))?
    };
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_task(
    State(state): State<AppState>,
    Path(task_id): Path<i32>,
    Json(task): Json<Task>,
) -> Result<Json<Task>, ApiError> {
    if task.id != task_id {
        return Err(ApiError::invalid(
            "task id in payload does not match path parameter",
        ));
    }
    let board = state.board();
    {
        let mut guard = board.write();
        if guard.find_task(task_id)?.is_none() {
            return Err(ApiError::not_found(format!("task {task_id} not found")));
        }
        guard
            .upsert_task_record(task.clone())
            .map_err(ApiError::from)?;
    }
    let updated = {
        let guard = board.read();
        guard
            .find_task(task_id)?
            .ok_or_else(|| ApiError::internal("task not found after update"))?
    };
    Ok(Json(updated))
}

async fn delete_task(
    State(state): State<AppState>,
    Path(task_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let board = state.board();
    let removed = {
        let mut guard = board.write();
        guard.delete_task(task_id)?
    };
    if !removed {
        return Err(ApiError::not_found(format!("task {task_id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn reschedule_task(
    State(state): State<AppState>,
    Path(task_id): Path<i32>,
    Json(payload): Json<ReschedulePayload>,
) -> Result<Json<Task>, ApiError> {
    let new_date = TaskBoard::parse_reschedule_date(&payload.date)?;
    let board = state.board();
    let task = {
        let mut guard = board.write();
        guard
            .reschedule_task(task_id, new_date)
            .map_err(ApiError::from)?
    };
    Ok(Json(task))
}

async fn workload_for_date(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<DailyWorkload>, ApiError> {
    let date = TaskBoard::parse_reschedule_date(&date)?;
    let board = state.board();
    let workload = {
        let guard = board.read();
        guard.workload_for_date(date)?
    };
    Ok(Json(workload))
}

async fn reschedule_suggestions(
    State(state): State<AppState>,
    Query(params): Query<TodayQuery>,
) -> Result<Json<Vec<RescheduleSuggestion>>, ApiError> {
    let today = today_or_now(&params);
    let board = state.board();
    let suggestions = {
        let guard = board.read();
        guard.reschedule_suggestions(today)?
    };
    Ok(Json(suggestions))
}

async fn redistribute_overdue(
    State(state): State<AppState>,
    Query(params): Query<TodayQuery>,
) -> Result<Json<RedistributionPlan>, ApiError> {
    let today = today_or_now(&params);
    let board = state.board();
    let plan = {
        let mut guard = board.write();
        guard.redistribute_overdue(today).map_err(ApiError::from)?
    };
    Ok(Json(plan))
}

async fn complete_low_priority(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let board = state.board();
    let marked = {
        let mut guard = board.write();
        guard.complete_low_priority_tasks()?
    };
    Ok(Json(json!({ "marked": marked })))
}

impl ApiError {
    fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }
}
