//! API 错误响应。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use guess_api_types::ErrorResponse;
use tracing::error;

use crate::service::GameError;

/// API 错误类型。
#[derive(Debug)]
pub struct ApiError {
    message: String,
    code: String,
    status: StatusCode,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<GameError> for ApiError {
    fn from(err: GameError) -> Self {
        match err {
            GameError::UnknownDifficulty(_) => ApiError {
                message: "Unknown difficulty".to_string(),
                code: "UNKNOWN_DIFFICULTY".to_string(),
                status: StatusCode::BAD_REQUEST,
            },
            GameError::NoGames(_) => ApiError {
                message: err.to_string(),
                code: "NO_GAMES".to_string(),
                status: StatusCode::NOT_FOUND,
            },
            GameError::NoImages(_) => ApiError {
                message: err.to_string(),
                code: "NO_IMAGES".to_string(),
                status: StatusCode::INTERNAL_SERVER_ERROR,
            },
            GameError::SearchUnavailable(_) => ApiError {
                message: err.to_string(),
                code: "SEARCH_UNAVAILABLE".to_string(),
                status: StatusCode::BAD_GATEWAY,
            },
            GameError::ImageNotFound(_) => ApiError {
                message: err.to_string(),
                code: "NOT_FOUND".to_string(),
                status: StatusCode::NOT_FOUND,
            },
            GameError::Internal(e) => {
                error!(error = ?e, "internal error while handling request");
                ApiError {
                    message: "Internal server error".to_string(),
                    code: "INTERNAL_ERROR".to_string(),
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            code: self.code,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}
