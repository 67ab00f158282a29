//! Admin login endpoint

use api_types::admin::{AdminLogin, AdminSession};
use axum::{Json, extract::State};

use crate::{ServerError, server::ServerState};

/// Check back-office credentials.
///
/// The engine reports one uniform Unauthorized message whether the
/// username is unknown or the password is wrong.
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<AdminLogin>,
) -> Result<Json<AdminSession>, ServerError> {
    let admin = state
        .engine
        .verify_admin(&payload.username, &payload.password)
        .await?;

    Ok(Json(AdminSession {
        username: admin.username,
    }))
}
