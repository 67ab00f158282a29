//! Payment ledger API endpoints

use api_types::payment::{PaymentCreated, PaymentNew, PaymentView};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState};
use engine::RecordPaymentCmd;

fn view(payment: engine::Payment) -> PaymentView {
    PaymentView {
        id: payment.id,
        reservation_id: payment.reservation_id,
        amount: payment.amount,
        payment_reference: payment.payment_reference,
        created_at: payment.created_at,
    }
}

pub async fn record(
    Path(reservation_id): Path<i32>,
    State(state): State<ServerState>,
    Json(payload): Json<PaymentNew>,
) -> Result<(StatusCode, Json<PaymentCreated>), ServerError> {
    let mut cmd = RecordPaymentCmd::new().reservation_id(reservation_id);
    if let Some(amount) = payload.amount {
        cmd = cmd.amount(amount);
    }
    if let Some(reference) = payload.payment_reference {
        cmd = cmd.payment_reference(reference);
    }

    let id = state.engine.record_payment(cmd).await?;
    tracing::info!("payment {id} recorded for reservation {reservation_id}");
    Ok((StatusCode::CREATED, Json(PaymentCreated { id })))
}

pub async fn list(
    Path(reservation_id): Path<i32>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<PaymentView>>, ServerError> {
    let payments = state.engine.list_payments(reservation_id).await?;
    Ok(Json(payments.into_iter().map(view).collect()))
}

pub async fn get(
    Path(id): Path<i32>,
    State(state): State<ServerState>,
) -> Result<Json<PaymentView>, ServerError> {
    let payment = state.engine.payment(id).await?;
    Ok(Json(view(payment)))
}
