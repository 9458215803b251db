//! 猜人游戏 API 路由。
//!
//! 列出难度、开始一局游戏、判定提交结果。

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use guess_api_types::{
    AnswerOption, CheckResponse, DifficultiesResponse, DifficultyOption, GameResponse,
};
use guess_core::domain::{AnswerId, ImageId};
use tracing::debug;

use super::client_ip::ClientIp;
use super::error::ApiError;
use super::state::AppState;
use crate::service::GameService;

/// 创建游戏 API 路由。
pub fn create_guess_router() -> Router<Arc<AppState>> {
    Router::new()
        // 列出可选难度
        .route("/guess", get(list_difficulties))
        // 按难度开始一局游戏
        .route("/guess/{difficulty}", get(start_game))
        // 判定图片与答案是否匹配
        .route("/guess/{image_id}/{answer_id}", get(check_answer))
}

/// 列出全部难度。
async fn list_difficulties(State(state): State<Arc<AppState>>) -> Json<DifficultiesResponse> {
    let difficulties: Vec<DifficultyOption> = state
        .game
        .difficulties()
        .iter()
        .map(|difficulty| DifficultyOption {
            code: difficulty.code(),
            label: difficulty.label().to_string(),
        })
        .collect();

    debug!(count = difficulties.len(), "available difficulties");
    Json(DifficultiesResponse { difficulties })
}

/// 开始一局游戏。
async fn start_game(
    State(state): State<Arc<AppState>>,
    Path(difficulty): Path<String>,
    ClientIp(client_ip): ClientIp,
) -> Result<Json<GameResponse>, ApiError> {
    let difficulty = GameService::parse_difficulty(&difficulty)?;
    let round = state.game.start_game(difficulty, client_ip).await?;

    let options = round
        .options
        .into_iter()
        .map(|option| AnswerOption {
            id: option.id.into_inner(),
            name: option.name,
        })
        .collect();

    Ok(Json(GameResponse {
        image_id: round.image.id.into_inner(),
        image_url: format!("/media/images/{}", round.image.id),
        options,
    }))
}

/// 判定提交结果。未知的图片或答案只会判为错误。
async fn check_answer(
    State(state): State<Arc<AppState>>,
    Path((image_id, answer_id)): Path<(i32, i32)>,
) -> Result<Json<CheckResponse>, ApiError> {
    let outcome = state
        .game
        .check(ImageId::new(image_id), AnswerId::new(answer_id))
        .await?;

    Ok(Json(CheckResponse {
        correct: outcome.verdict.is_correct(),
        result: outcome.verdict.message().to_string(),
        difficulty: outcome
            .difficulty
            .map(|difficulty| difficulty.label().to_string()),
    }))
}
