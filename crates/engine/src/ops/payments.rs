use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Expr,
};

use crate::{EngineError, Payment, RecordPaymentCmd, ResultEngine, payments, reservations};

use super::{Engine, normalize_optional_text, validate_money, with_tx};

impl Engine {
    /// Record one installment against a pending reservation and return the
    /// payment id.
    ///
    /// The reservation's `payments_made` counter moves in the same
    /// transaction as the payment row, so the ledger and the counter can
    /// never drift apart.
    pub async fn record_payment(&self, cmd: RecordPaymentCmd) -> ResultEngine<i32> {
        let input = validate_new_payment(cmd)?;

        with_tx!(self, |db_tx| {
            let model = self
                .require_reservation(&db_tx, input.reservation_id)
                .await?;
            if model.payments_made >= model.payments_total {
                return Err(EngineError::Conflict("no pending payments".to_string()));
            }

            let row = payments::ActiveModel {
                id: ActiveValue::NotSet,
                reservation_id: ActiveValue::Set(input.reservation_id),
                amount: ActiveValue::Set(input.amount),
                payment_reference: ActiveValue::Set(input.payment_reference),
                created_at: ActiveValue::Set(Utc::now()),
            };
            let inserted = row.insert(&db_tx).await?;

            // Guarded increment; a racing writer that filled the last slot
            // first leaves zero rows for this one and the insert rolls back.
            let incremented = reservations::Entity::update_many()
                .col_expr(
                    reservations::Column::PaymentsMade,
                    Expr::col(reservations::Column::PaymentsMade).add(1),
                )
                .col_expr(reservations::Column::UpdatedAt, Expr::value(Utc::now()))
                .filter(reservations::Column::Id.eq(input.reservation_id))
                .filter(
                    Expr::col(reservations::Column::PaymentsMade)
                        .lt(Expr::col(reservations::Column::PaymentsTotal)),
                )
                .exec(&db_tx)
                .await?;
            if incremented.rows_affected == 0 {
                return Err(EngineError::Conflict("no pending payments".to_string()));
            }

            Ok(inserted.id)
        })
    }

    /// Return a payment snapshot from DB.
    pub async fn payment(&self, payment_id: i32) -> ResultEngine<Payment> {
        if payment_id <= 0 {
            return Err(EngineError::Validation(
                "payment id must be positive".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            let model = self.require_payment(&db_tx, payment_id).await?;
            Ok(Payment::from(model))
        })
    }

    /// Return the payments recorded against a reservation, newest first.
    ///
    /// An id that matches no reservation yields an empty list, not an error.
    pub async fn list_payments(&self, reservation_id: i32) -> ResultEngine<Vec<Payment>> {
        if reservation_id <= 0 {
            return Err(EngineError::Validation(
                "reservation id must be positive".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            let models = payments::Entity::find()
                .filter(payments::Column::ReservationId.eq(reservation_id))
                .order_by_desc(payments::Column::CreatedAt)
                .order_by_desc(payments::Column::Id)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(Payment::from).collect())
        })
    }
}

#[derive(Debug)]
struct NewPayment {
    reservation_id: i32,
    amount: Decimal,
    payment_reference: String,
}

fn validate_new_payment(cmd: RecordPaymentCmd) -> ResultEngine<NewPayment> {
    let mut missing = Vec::new();

    if cmd.reservation_id.is_none() {
        missing.push("reservation_id");
    }
    if cmd.amount.is_none() {
        missing.push("amount");
    }
    let payment_reference = normalize_optional_text(cmd.payment_reference.as_deref());
    if payment_reference.is_none() {
        missing.push("payment_reference");
    }

    match (cmd.reservation_id, cmd.amount, payment_reference) {
        (Some(reservation_id), Some(amount), Some(payment_reference)) => {
            if reservation_id <= 0 {
                return Err(EngineError::Validation(
                    "reservation id must be positive".to_string(),
                ));
            }
            Ok(NewPayment {
                reservation_id,
                amount: validate_money("amount", amount)?,
                payment_reference,
            })
        }
        _ => Err(EngineError::Validation(format!(
            "missing required fields: {}",
            missing.join(", ")
        ))),
    }
}
