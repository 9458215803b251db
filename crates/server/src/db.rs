use guess_migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

pub async fn init_pool_and_migrate(database_url: &str) -> anyhow::Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(database_url);
    options.sqlx_logging(false);
    // 每个 SQLite 内存连接都是独立的数据库。
    if database_url.starts_with("sqlite::memory:") {
        options.max_connections(1);
    }

    let db = Database::connect(options).await?;

    Migrator::up(&db, None).await?;
    info!("database migrations applied");

    Ok(db)
}
