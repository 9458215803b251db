//! API 路由模块。

pub mod client_ip;
pub mod error;
pub mod guess;
pub mod media;
pub mod state;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    http::{Method, header::CONTENT_TYPE},
    routing::get,
};
use guess_api_types::HealthCheckResponse;
use tower_http::cors::{Any, CorsLayer};

pub use error::ApiError;
pub use guess::create_guess_router;
pub use media::create_media_router;
pub use state::AppState;

/// 组装完整的应用路由。
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/health", get(health))
        .merge(create_guess_router())
        .merge(create_media_router())
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse::ok())
}
