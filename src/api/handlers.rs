//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use tracing::info;

use super::responses::{
    ApiError, BoardResponse, HealthResponse, RecordResponse, ThemeResponse, TimerResponse,
    ToggleResponse,
};
use crate::{
    error::BoardError,
    state::{
        AppState, BulkReport, CategoryView, CompletedTimer, Confirmation, TimerCommand,
        TimerDraft, TimerId,
    },
};

/// Query string for DELETE /timers/:id
#[derive(Debug, Default, Deserialize)]
pub struct DeleteParams {
    #[serde(default)]
    pub confirm: bool,
}

/// Handle GET /timers - Active timers with their countdowns, plus history
pub async fn list_timers_handler(State(state): State<Arc<AppState>>) -> Json<BoardResponse> {
    Json(BoardResponse {
        board: state.snapshot(),
        theme: state.theme(),
        uptime: state.get_uptime(),
    })
}

/// Handle POST /timers - Create a timer from a draft
pub async fn create_timer_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TimerDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<RecordResponse>), ApiError> {
    let Json(draft) = payload?;
    let timer = state.create(&draft)?;
    Ok((
        StatusCode::CREATED,
        Json(RecordResponse::new("Timer created", timer)),
    ))
}

/// Handle GET /timers/:id - One active timer
pub async fn get_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TimerId>,
) -> Result<Json<TimerResponse>, ApiError> {
    let view = state.timer(id).ok_or(BoardError::NotFound(id))?;
    Ok(Json(TimerResponse::new("Timer found", view)))
}

/// Handle DELETE /timers/:id?confirm=true - Delete an active timer
pub async fn delete_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TimerId>,
    Query(params): Query<DeleteParams>,
) -> Result<Json<RecordResponse>, ApiError> {
    let timer = state.delete(id, Confirmation::from(params.confirm))?;
    Ok(Json(RecordResponse::new("Timer deleted", timer)))
}

fn run_command(
    state: &AppState,
    id: TimerId,
    command: TimerCommand,
    message: &str,
) -> Result<Json<TimerResponse>, ApiError> {
    let view = state.apply(id, command)?;
    Ok(Json(TimerResponse::new(message, view)))
}

/// Handle POST /timers/:id/start - Start or resume one timer
pub async fn start_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TimerId>,
) -> Result<Json<TimerResponse>, ApiError> {
    run_command(&state, id, TimerCommand::Start, "Timer started")
}

/// Handle POST /timers/:id/pause - Pause one timer
pub async fn pause_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TimerId>,
) -> Result<Json<TimerResponse>, ApiError> {
    run_command(&state, id, TimerCommand::Pause, "Timer paused")
}

/// Handle POST /timers/:id/toggle - The play/pause button
pub async fn toggle_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TimerId>,
) -> Result<Json<TimerResponse>, ApiError> {
    run_command(&state, id, TimerCommand::Toggle, "Timer toggled")
}

/// Handle POST /timers/:id/reset - Back to full duration, paused
pub async fn reset_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TimerId>,
) -> Result<Json<TimerResponse>, ApiError> {
    run_command(&state, id, TimerCommand::Reset, "Timer reset")
}

/// Handle GET /history - Completed timers for this session
pub async fn history_handler(State(state): State<Arc<AppState>>) -> Json<Vec<CompletedTimer>> {
    Json(state.history())
}

/// Handle GET /categories - Per-category views
pub async fn categories_handler(State(state): State<Arc<AppState>>) -> Json<Vec<CategoryView>> {
    Json(state.category_views())
}

/// Handle GET /categories/suggestions - Known category names
pub async fn suggestions_handler(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.suggestions())
}

/// Handle POST /categories/:category/start - Start every active timer in a category
pub async fn start_category_handler(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> Json<BulkReport> {
    Json(state.start_all(&category))
}

/// Handle POST /categories/:category/pause - Pause every active timer in a category
pub async fn pause_category_handler(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> Json<BulkReport> {
    Json(state.pause_all(&category))
}

/// Handle POST /categories/:category/reset - Reset every active timer in a category
pub async fn reset_category_handler(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> Json<BulkReport> {
    Json(state.reset_all(&category))
}

/// Handle POST /categories/:category/expand - Collapse or expand a category
pub async fn toggle_category_handler(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> Json<ToggleResponse> {
    let expanded = state.toggle_category_expansion(&category);
    Json(ToggleResponse { category, expanded })
}

/// Handle POST /categories/:category/history - Collapse or expand a category's history
pub async fn toggle_history_handler(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> Json<ToggleResponse> {
    let expanded = state.toggle_history_expansion(&category);
    Json(ToggleResponse { category, expanded })
}

/// Handle GET /theme - Current theme preference
pub async fn theme_handler(State(state): State<Arc<AppState>>) -> Json<ThemeResponse> {
    Json(ThemeResponse {
        theme: state.theme(),
    })
}

/// Handle POST /theme/toggle - Flip and store the theme preference
pub async fn toggle_theme_handler(State(state): State<Arc<AppState>>) -> Json<ThemeResponse> {
    let theme = state.toggle_theme();
    info!("Theme toggle endpoint called - theme is now {}", theme);
    Json(ThemeResponse { theme })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
