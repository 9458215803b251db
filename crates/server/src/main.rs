use anyhow::Context;
use guess_server::config::ServerConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    info!("starting guess server");
    let config = ServerConfig::from_env().context("failed to load server config")?;
    info!(
        bind_addr = %config.bind_addr,
        media_root = %config.media_root.display(),
        option_count = config.game.option_count,
        difficulty_match = ?config.game.difficulty_match,
        search_configured = config.search.credentials.is_some(),
        "server config loaded"
    );

    guess_server::run(config).await
}

fn init_tracing() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}
