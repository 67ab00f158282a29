use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveValue, Condition, QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Expr,
};

use crate::{
    CreateReservationCmd, DepositType, EngineError, Parcel, ParcelStatus, PaymentStatus,
    Reservation, ResultEngine, payments, reservations,
};

use super::{Engine, normalize_optional_text, normalize_required_text, validate_money, with_tx};

impl Engine {
    /// Reserve a parcel for a customer and return the reservation id.
    ///
    /// The payment schedule (total amount, instalment count, instalments
    /// already covered) is derived from the deposit type and the parcel price
    /// read inside the same transaction; callers cannot override it.
    pub async fn create_reservation(&self, cmd: CreateReservationCmd) -> ResultEngine<i32> {
        let input = validate_new_reservation(cmd)?;

        with_tx!(self, |db_tx| {
            let parcel_model = self.require_parcel(&db_tx, &input.parcel_id).await?;
            let parcel = Parcel::try_from(parcel_model)?;
            match parcel.status {
                ParcelStatus::Available => {}
                ParcelStatus::Reserved => {
                    return Err(EngineError::Conflict("parcel already reserved".to_string()));
                }
                ParcelStatus::Sold => {
                    return Err(EngineError::Conflict("parcel already sold".to_string()));
                }
            }

            // The claim is a conditional flip; a writer that lost the race
            // sees zero rows touched and backs off.
            let claimed = self
                .set_parcel_status(
                    &db_tx,
                    &parcel.id,
                    Some(ParcelStatus::Available),
                    ParcelStatus::Reserved,
                )
                .await?;
            if !claimed {
                return Err(EngineError::Conflict("parcel already reserved".to_string()));
            }

            let plan = input.deposit_type;
            let now = Utc::now();
            let row = reservations::ActiveModel {
                id: ActiveValue::NotSet,
                parcel_id: ActiveValue::Set(parcel.id.clone()),
                customer_name: ActiveValue::Set(input.customer_name),
                customer_email: ActiveValue::Set(input.customer_email),
                customer_phone: ActiveValue::Set(input.customer_phone),
                payment_reference: ActiveValue::Set(input.payment_reference),
                payment_amount: ActiveValue::Set(input.payment_amount),
                deposit_type: ActiveValue::Set(plan.as_str().to_string()),
                payment_status: ActiveValue::Set(PaymentStatus::Pending.as_str().to_string()),
                total_amount: ActiveValue::Set(plan.total_amount(parcel.price)),
                payments_total: ActiveValue::Set(plan.payments_total()),
                payments_made: ActiveValue::Set(plan.initial_payments_made()),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            };
            let inserted = row.insert(&db_tx).await?;

            Ok(inserted.id)
        })
    }

    /// Cancel a pending reservation and release its parcel.
    pub async fn cancel_reservation(
        &self,
        reservation_id: i32,
        requested: PaymentStatus,
    ) -> ResultEngine<()> {
        if requested != PaymentStatus::Cancelled {
            return Err(EngineError::Validation(
                "payment_status must be cancelled".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            let model = self.require_reservation(&db_tx, reservation_id).await?;
            if model.payment_status == PaymentStatus::Cancelled.as_str() {
                return Err(EngineError::Conflict(
                    "reservation already cancelled".to_string(),
                ));
            }

            // Conditional on `pending` so concurrent cancels settle to one
            // winner; the loser never reaches the parcel write below.
            let cancelled = reservations::Entity::update_many()
                .col_expr(
                    reservations::Column::PaymentStatus,
                    Expr::value(PaymentStatus::Cancelled.as_str()),
                )
                .col_expr(reservations::Column::UpdatedAt, Expr::value(Utc::now()))
                .filter(reservations::Column::Id.eq(reservation_id))
                .filter(reservations::Column::PaymentStatus.eq(PaymentStatus::Pending.as_str()))
                .exec(&db_tx)
                .await?;
            if cancelled.rows_affected == 0 {
                return Err(EngineError::Conflict(
                    "reservation already cancelled".to_string(),
                ));
            }

            self.set_parcel_status(&db_tx, &model.parcel_id, None, ParcelStatus::Available)
                .await?;
            Ok(())
        })
    }

    /// Return a reservation snapshot from DB.
    pub async fn reservation(&self, reservation_id: i32) -> ResultEngine<Reservation> {
        with_tx!(self, |db_tx| {
            let model = self.require_reservation(&db_tx, reservation_id).await?;
            Reservation::try_from(model)
        })
    }

    /// Return every reservation, newest first.
    pub async fn list_reservations(&self) -> ResultEngine<Vec<Reservation>> {
        with_tx!(self, |db_tx| {
            let models = reservations::Entity::find()
                .order_by_desc(reservations::Column::CreatedAt)
                .order_by_desc(reservations::Column::Id)
                .all(&db_tx)
                .await?;
            let reservations: Vec<Reservation> = models
                .into_iter()
                .map(Reservation::try_from)
                .collect::<ResultEngine<_>>()?;
            Ok(reservations)
        })
    }

    /// Find one reservation by payment reference or customer email.
    ///
    /// Reservation fields are matched first, then references on individual
    /// payment rows; within each group the newest match wins.
    pub async fn search_reservation(&self, query: &str) -> ResultEngine<Reservation> {
        let query = normalize_required_text(query, "query")?;

        with_tx!(self, |db_tx| {
            let direct = reservations::Entity::find()
                .filter(
                    Condition::any()
                        .add(reservations::Column::PaymentReference.eq(query.clone()))
                        .add(reservations::Column::CustomerEmail.eq(query.clone())),
                )
                .order_by_desc(reservations::Column::CreatedAt)
                .order_by_desc(reservations::Column::Id)
                .one(&db_tx)
                .await?;

            let found = match direct {
                Some(model) => Some(model),
                None => payments::Entity::find()
                    .filter(payments::Column::PaymentReference.eq(query.clone()))
                    .find_also_related(reservations::Entity)
                    .order_by_desc(payments::Column::CreatedAt)
                    .order_by_desc(payments::Column::Id)
                    .one(&db_tx)
                    .await?
                    .and_then(|(_, reservation)| reservation),
            };

            match found {
                Some(model) => Reservation::try_from(model),
                None => Err(EngineError::NotFound("reservation".to_string())),
            }
        })
    }
}

#[derive(Debug)]
struct NewReservation {
    parcel_id: String,
    customer_name: String,
    customer_email: String,
    customer_phone: String,
    payment_amount: Decimal,
    deposit_type: DepositType,
    payment_reference: Option<String>,
}

/// Reject a create command with any required field missing or malformed.
///
/// Missing fields are reported together so a caller can fix the whole
/// request in one round.
fn validate_new_reservation(cmd: CreateReservationCmd) -> ResultEngine<NewReservation> {
    let mut missing = Vec::new();

    let parcel_id = normalize_optional_text(cmd.parcel_id.as_deref());
    if parcel_id.is_none() {
        missing.push("parcel_id");
    }
    let customer_name = normalize_optional_text(cmd.customer_name.as_deref());
    if customer_name.is_none() {
        missing.push("customer_name");
    }
    let customer_email = normalize_optional_text(cmd.customer_email.as_deref());
    if customer_email.is_none() {
        missing.push("customer_email");
    }
    let customer_phone = normalize_optional_text(cmd.customer_phone.as_deref());
    if customer_phone.is_none() {
        missing.push("customer_phone");
    }
    if cmd.payment_amount.is_none() {
        missing.push("payment_amount");
    }
    if cmd.deposit_type.is_none() {
        missing.push("deposit_type");
    }

    match (
        parcel_id,
        customer_name,
        customer_email,
        customer_phone,
        cmd.payment_amount,
        cmd.deposit_type,
    ) {
        (
            Some(parcel_id),
            Some(customer_name),
            Some(customer_email),
            Some(customer_phone),
            Some(amount),
            Some(deposit_type),
        ) => Ok(NewReservation {
            parcel_id,
            customer_name,
            customer_email,
            customer_phone,
            payment_amount: validate_money("payment_amount", amount)?,
            deposit_type,
            payment_reference: normalize_optional_text(cmd.payment_reference.as_deref()),
        }),
        _ => Err(EngineError::Validation(format!(
            "missing required fields: {}",
            missing.join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use crate::{CreateReservationCmd, DepositType, EngineError};

    use super::validate_new_reservation;

    #[test]
    fn missing_fields_are_reported_together() {
        let cmd = CreateReservationCmd::new().customer_name("Ana Suarez");
        let err = validate_new_reservation(cmd).expect_err("must be rejected");
        match err {
            EngineError::Validation(msg) => {
                assert!(msg.contains("parcel_id"));
                assert!(msg.contains("customer_email"));
                assert!(msg.contains("payment_amount"));
                assert!(msg.contains("deposit_type"));
                assert!(!msg.contains("customer_name"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn blank_text_counts_as_missing() {
        let cmd = CreateReservationCmd::new()
            .parcel_id("  ")
            .customer_name("Ana Suarez")
            .customer_email("ana@example.com")
            .customer_phone("+34911222333")
            .payment_amount(dec!(100.00))
            .deposit_type(DepositType::WithoutDeposit);
        let err = validate_new_reservation(cmd).expect_err("must be rejected");
        match err {
            EngineError::Validation(msg) => assert!(msg.contains("parcel_id")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_positive_amount_is_rejected() {
        let cmd = CreateReservationCmd::new()
            .parcel_id("P-001")
            .customer_name("Ana Suarez")
            .customer_email("ana@example.com")
            .customer_phone("+34911222333")
            .payment_amount(dec!(0))
            .deposit_type(DepositType::WithoutDeposit);
        assert!(matches!(
            validate_new_reservation(cmd),
            Err(EngineError::Validation(_))
        ));
    }

    #[test]
    fn sub_cent_amount_is_rejected() {
        let cmd = CreateReservationCmd::new()
            .parcel_id("P-001")
            .customer_name("Ana Suarez")
            .customer_email("ana@example.com")
            .customer_phone("+34911222333")
            .payment_amount(dec!(740.741))
            .deposit_type(DepositType::WithDeposit);
        assert!(matches!(
            validate_new_reservation(cmd),
            Err(EngineError::Validation(_))
        ));
    }

    #[test]
    fn reference_is_trimmed_and_optional() {
        let cmd = CreateReservationCmd::new()
            .parcel_id("P-001")
            .customer_name("Ana Suarez")
            .customer_email("ana@example.com")
            .customer_phone("+34911222333")
            .payment_amount(dec!(740.74))
            .deposit_type(DepositType::WithoutDeposit)
            .payment_reference(" TRX-001 ");
        let input = validate_new_reservation(cmd).expect("valid command");
        assert_eq!(input.payment_reference.as_deref(), Some("TRX-001"));

        let cmd = CreateReservationCmd::new()
            .parcel_id("P-001")
            .customer_name("Ana Suarez")
            .customer_email("ana@example.com")
            .customer_phone("+34911222333")
            .payment_amount(dec!(740.74))
            .deposit_type(DepositType::WithoutDeposit)
            .payment_reference("   ");
        let input = validate_new_reservation(cmd).expect("valid command");
        assert_eq!(input.payment_reference, None);
    }
}
