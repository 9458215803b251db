//! 统一的应用状态。

use std::sync::Arc;

use crate::service::GameService;

/// 统一的应用状态，包含所有 handler 共享的数据。
#[derive(Clone)]
pub struct AppState {
    /// 游戏编排服务。
    pub game: Arc<GameService>,
}

impl AppState {
    /// 创建新的应用状态。
    pub fn new(game: Arc<GameService>) -> Self {
        Self { game }
    }
}
