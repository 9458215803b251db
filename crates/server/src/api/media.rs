//! 图片内容路由。

use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    http::header::CONTENT_TYPE,
    response::IntoResponse,
    routing::get,
};
use guess_core::domain::ImageId;

use super::error::ApiError;
use super::state::AppState;
use crate::media::sniff_content_type;

/// 创建图片内容路由。
pub fn create_media_router() -> Router<Arc<AppState>> {
    Router::new().route("/media/images/{image_id}", get(get_image))
}

async fn get_image(
    State(state): State<Arc<AppState>>,
    Path(image_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let bytes = state.game.image_payload(ImageId::new(image_id)).await?;
    let content_type = sniff_content_type(&bytes);

    Ok(([(CONTENT_TYPE, content_type)], bytes))
}
