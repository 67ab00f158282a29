use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use sea_orm::ConnectOptions;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "terrenos={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let server_settings = settings.server;

    let mut options = ConnectOptions::new(server_settings.database_url());
    options
        .max_connections(server_settings.max_connections)
        .connect_timeout(Duration::from_secs(server_settings.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(server_settings.acquire_timeout_secs));

    tracing::info!("connecting to database ({})", server_settings.database);
    let db = sea_orm::Database::connect(options).await?;
    Migrator::up(&db, None).await?;

    let engine = engine::Engine::builder().database(db.clone()).build().await?;

    let addr = format!("{}:{}", server_settings.bind, server_settings.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tokio::select! {
        result = server::run_with_listener(engine, db, listener) => {
            if let Err(err) = result {
                tracing::error!("server failed: {err}");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
        }
    }

    Ok(())
}
