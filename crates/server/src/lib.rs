use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;
use sea_orm::DbErr;

use serde::Serialize;
pub use server::{run, run_with_listener, spawn_with_listener};

mod admin;
mod parcels;
mod payments;
mod reservations;
mod server;

pub mod types {
    pub mod parcel {
        pub use api_types::parcel::{ParcelUpdate, ParcelView};
    }

    pub mod reservation {
        pub use api_types::reservation::{
            ReservationCreated, ReservationNew, ReservationStatusUpdate, ReservationView,
            SearchQuery,
        };
    }

    pub mod payment {
        pub use api_types::payment::{PaymentCreated, PaymentNew, PaymentView};
    }

    pub mod admin {
        pub use api_types::admin::{AdminLogin, AdminSession};
    }

    pub mod health {
        pub use api_types::health::HealthStatus;
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::NotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Conflict(_) => StatusCode::CONFLICT,
        EngineError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        // Pool exhaustion and acquire timeouts are retryable; everything
        // else from the store is a plain internal error.
        EngineError::Database(DbErr::ConnectionAcquire(_)) => StatusCode::SERVICE_UNAVAILABLE,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(DbErr::ConnectionAcquire(acquire_err)) => {
            tracing::error!("database connection unavailable: {acquire_err:?}");
            "service unavailable, retry later".to_string()
        }
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_validation_maps_to_422() {
        let res = ServerError::from(EngineError::Validation("bad input".to_string()))
            .into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::NotFound("parcel".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_conflict_maps_to_409() {
        let res = ServerError::from(EngineError::Conflict("parcel already reserved".to_string()))
            .into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn engine_unauthorized_maps_to_401() {
        let res = ServerError::from(EngineError::Unauthorized("invalid credentials".to_string()))
            .into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn engine_database_maps_to_500() {
        let res = ServerError::from(EngineError::Database(DbErr::Custom("boom".to_string())))
            .into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
