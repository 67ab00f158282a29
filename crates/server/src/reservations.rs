//! Reservation API endpoints

use api_types::reservation::{
    ReservationCreated, ReservationNew, ReservationStatusUpdate, ReservationView, SearchQuery,
};
use api_types::{DepositType as ApiDeposit, PaymentStatus as ApiPaymentStatus};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState};
use engine::CreateReservationCmd;

fn map_deposit(deposit: engine::DepositType) -> ApiDeposit {
    match deposit {
        engine::DepositType::WithDeposit => ApiDeposit::WithDeposit,
        engine::DepositType::WithoutDeposit => ApiDeposit::WithoutDeposit,
    }
}

fn map_payment_status(status: engine::PaymentStatus) -> ApiPaymentStatus {
    match status {
        engine::PaymentStatus::Pending => ApiPaymentStatus::Pending,
        engine::PaymentStatus::Cancelled => ApiPaymentStatus::Cancelled,
    }
}

fn view(reservation: engine::Reservation) -> ReservationView {
    let payments_pending = reservation.payments_pending();
    ReservationView {
        id: reservation.id,
        parcel_id: reservation.parcel_id,
        customer_name: reservation.customer_name,
        customer_email: reservation.customer_email,
        customer_phone: reservation.customer_phone,
        payment_reference: reservation.payment_reference,
        payment_amount: reservation.payment_amount,
        deposit_type: map_deposit(reservation.deposit_type),
        payment_status: map_payment_status(reservation.payment_status),
        total_amount: reservation.total_amount,
        payments_total: reservation.payments_total,
        payments_made: reservation.payments_made,
        payments_pending,
        created_at: reservation.created_at,
        updated_at: reservation.updated_at,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ReservationNew>,
) -> Result<(StatusCode, Json<ReservationCreated>), ServerError> {
    let mut cmd = CreateReservationCmd::new();
    if let Some(parcel_id) = payload.parcel_id {
        cmd = cmd.parcel_id(parcel_id);
    }
    if let Some(name) = payload.customer_name {
        cmd = cmd.customer_name(name);
    }
    if let Some(email) = payload.customer_email {
        cmd = cmd.customer_email(email);
    }
    if let Some(phone) = payload.customer_phone {
        cmd = cmd.customer_phone(phone);
    }
    if let Some(amount) = payload.payment_amount {
        cmd = cmd.payment_amount(amount);
    }
    if let Some(deposit) = payload.deposit_type {
        cmd = cmd.deposit_type(match deposit {
            ApiDeposit::WithDeposit => engine::DepositType::WithDeposit,
            ApiDeposit::WithoutDeposit => engine::DepositType::WithoutDeposit,
        });
    }
    if let Some(reference) = payload.payment_reference {
        cmd = cmd.payment_reference(reference);
    }

    let id = state.engine.create_reservation(cmd).await?;
    tracing::info!("reservation {id} created");
    Ok((StatusCode::CREATED, Json(ReservationCreated { id })))
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Vec<ReservationView>>, ServerError> {
    let reservations = state.engine.list_reservations().await?;
    Ok(Json(reservations.into_iter().map(view).collect()))
}

pub async fn get(
    Path(id): Path<i32>,
    State(state): State<ServerState>,
) -> Result<Json<ReservationView>, ServerError> {
    let reservation = state.engine.reservation(id).await?;
    Ok(Json(view(reservation)))
}

pub async fn cancel(
    Path(id): Path<i32>,
    State(state): State<ServerState>,
    Json(payload): Json<ReservationStatusUpdate>,
) -> Result<Json<ReservationView>, ServerError> {
    let requested = match payload.status {
        ApiPaymentStatus::Pending => engine::PaymentStatus::Pending,
        ApiPaymentStatus::Cancelled => engine::PaymentStatus::Cancelled,
    };
    state.engine.cancel_reservation(id, requested).await?;
    tracing::info!("reservation {id} cancelled");

    let reservation = state.engine.reservation(id).await?;
    Ok(Json(view(reservation)))
}

pub async fn search(
    Query(params): Query<SearchQuery>,
    State(state): State<ServerState>,
) -> Result<Json<ReservationView>, ServerError> {
    let query = params.query.unwrap_or_default();
    let reservation = state.engine.search_reservation(&query).await?;
    Ok(Json(view(reservation)))
}
