//! API response structures

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::BoardError,
    state::{BoardSnapshot, Theme, Timer, TimerView},
};

/// Error body returned for every refused request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(message: String) -> Self {
        Self {
            status: "error".to_string(),
            message,
            timestamp: Utc::now(),
        }
    }
}

/// Refused request mapped to an HTTP status and an [`ErrorResponse`] body
#[derive(Debug)]
pub enum ApiError {
    Board(BoardError),
    /// Body that could not be decoded, including out-of-range clock fields
    Body(JsonRejection),
}

impl From<BoardError> for ApiError {
    fn from(error: BoardError) -> Self {
        Self::Board(error)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Body(rejection)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Board(error) => {
                let status = match &error {
                    BoardError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                    BoardError::NotFound(_) => StatusCode::NOT_FOUND,
                    BoardError::ConfirmationRequired(_) => StatusCode::CONFLICT,
                };
                (status, error.to_string())
            }
            Self::Body(rejection) => (rejection.status(), rejection.body_text()),
        };
        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

/// Response for commands that change a single timer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerResponse {
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerView,
}

impl TimerResponse {
    pub fn new(message: impl Into<String>, timer: TimerView) -> Self {
        Self {
            message: message.into(),
            timestamp: Utc::now(),
            timer,
        }
    }
}

/// Response for create and delete, which only carry the stored record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordResponse {
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: Timer,
}

impl RecordResponse {
    pub fn new(message: impl Into<String>, timer: Timer) -> Self {
        Self {
            message: message.into(),
            timestamp: Utc::now(),
            timer,
        }
    }
}

/// Full board with server metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardResponse {
    #[serde(flatten)]
    pub board: BoardSnapshot,
    pub theme: Theme,
    pub uptime: String,
}

/// Result of a UI expansion toggle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleResponse {
    pub category: String,
    pub expanded: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeResponse {
    pub theme: Theme,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
