use axum::{
    Json,
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
};
use sea_orm::DatabaseConnection;

use std::sync::Arc;

use crate::{admin, parcels, payments, reservations};
use api_types::health::HealthStatus;
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
}

/// Liveness probe: pings the store and reports its reachability.
async fn health(State(state): State<ServerState>) -> (StatusCode, Json<HealthStatus>) {
    match state.db.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthStatus {
                status: "healthy".to_string(),
                database: "connected".to_string(),
            }),
        ),
        Err(err) => {
            tracing::error!("health check failed: {err}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthStatus {
                    status: "unhealthy".to_string(),
                    database: "disconnected".to_string(),
                }),
            )
        }
    }
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/api/parcels", get(parcels::list))
        .route(
            "/api/parcels/{id}",
            get(parcels::get)
                .put(parcels::update)
                .delete(parcels::delete),
        )
        .route(
            "/api/reservations",
            post(reservations::create).get(reservations::list),
        )
        .route("/api/reservations/search", get(reservations::search))
        .route("/api/reservations/{id}", get(reservations::get))
        .route("/api/reservations/{id}/status", put(reservations::cancel))
        .route(
            "/api/reservations/{id}/payments",
            post(payments::record).get(payments::list),
        )
        .route("/api/payments/{id}", get(payments::get))
        .route("/api/admin/login", post(admin::login))
        .route("/health", get(health))
        .with_state(state)
}

pub async fn run(engine: Engine, db: DatabaseConnection) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, db, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        db,
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, db, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
