//! 猜人游戏服务端。
//!
//! 玩家选择难度后看到一张照片，从若干名字中猜出照片中的人。
//! 本地没有图片时，从外部图片搜索服务补充并保存。

pub mod api;
pub mod config;
pub mod db;
pub mod entity;
pub mod media;
pub mod repository;
pub mod seed;
pub mod service;
pub mod sourcing;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use guess_core::domain::{GameGenerator, ImageSource};
use sea_orm::DatabaseConnection;
use tokio::net::TcpListener;
use tracing::info;

use crate::api::AppState;
use crate::config::ServerConfig;
use crate::media::MediaStore;
use crate::repository::{SeaOrmAnswerRepository, SeaOrmImageRepository};
use crate::seed::AnswerSeed;
use crate::service::GameService;
use crate::sourcing::GoogleImageSearch;

/// 用给定的数据库连接和图片来源组装应用状态。
pub fn build_state(
    config: &ServerConfig,
    db: DatabaseConnection,
    source: Arc<dyn ImageSource>,
) -> anyhow::Result<Arc<AppState>> {
    let generator =
        GameGenerator::new(config.game.option_count).context("invalid game option count")?;

    let game = GameService::new(
        Arc::new(SeaOrmAnswerRepository::new(db.clone())),
        Arc::new(SeaOrmImageRepository::new(db)),
        source,
        MediaStore::new(config.media_root.clone()),
        generator,
        config.game.difficulty_match,
    );

    Ok(Arc::new(AppState::new(Arc::new(game))))
}

/// 连接数据库、执行迁移与种子数据导入，然后开始监听。
pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let db = db::init_pool_and_migrate(&config.database_url)
        .await
        .context("failed to initialize database")?;

    if let Some(path) = &config.seed_file {
        info!(path = %path.display(), "applying answer seed");
        let seed = AnswerSeed::from_file(path)?;
        seed.apply(&SeaOrmAnswerRepository::new(db.clone()))
            .await
            .context("failed to apply answer seed")?;
    }

    let client = reqwest::Client::builder()
        .user_agent(concat!("guess-server/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("failed to build HTTP client")?;
    let source = Arc::new(GoogleImageSearch::new(client, config.search.clone()));

    let state = build_state(&config, db, source)?;
    let app = api::create_router(state);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!(address = %config.bind_addr, "server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    info!("server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("shutdown signal received, stopping server"),
        _ = terminate => info!("terminate signal received, stopping server"),
    }
}
