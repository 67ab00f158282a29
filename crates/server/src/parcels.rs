//! Parcel inventory API endpoints

use api_types::ParcelStatus as ApiStatus;
use api_types::parcel::{ParcelUpdate, ParcelView};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState};

fn map_status(status: engine::ParcelStatus) -> ApiStatus {
    match status {
        engine::ParcelStatus::Available => ApiStatus::Available,
        engine::ParcelStatus::Reserved => ApiStatus::Reserved,
        engine::ParcelStatus::Sold => ApiStatus::Sold,
    }
}

fn map_status_back(status: ApiStatus) -> engine::ParcelStatus {
    match status {
        ApiStatus::Available => engine::ParcelStatus::Available,
        ApiStatus::Reserved => engine::ParcelStatus::Reserved,
        ApiStatus::Sold => engine::ParcelStatus::Sold,
    }
}

fn view(parcel: engine::Parcel) -> ParcelView {
    ParcelView {
        id: parcel.id,
        area_m2: parcel.area_m2,
        price: parcel.price,
        status: map_status(parcel.status),
    }
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<ParcelView>>, ServerError> {
    let parcels = state.engine.list_parcels().await?;
    Ok(Json(parcels.into_iter().map(view).collect()))
}

pub async fn get(
    Path(id): Path<String>,
    State(state): State<ServerState>,
) -> Result<Json<ParcelView>, ServerError> {
    let parcel = state.engine.parcel(&id).await?;
    Ok(Json(view(parcel)))
}

pub async fn update(
    Path(id): Path<String>,
    State(state): State<ServerState>,
    Json(payload): Json<ParcelUpdate>,
) -> Result<Json<ParcelView>, ServerError> {
    let parcel = state
        .engine
        .update_parcel(
            &id,
            payload.area_m2,
            payload.price,
            map_status_back(payload.status),
        )
        .await?;
    Ok(Json(view(parcel)))
}

pub async fn delete(
    Path(id): Path<String>,
    State(state): State<ServerState>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_parcel(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
