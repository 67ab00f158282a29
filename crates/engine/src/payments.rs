//! The payment ledger: one row per recorded installment.
//!
//! Payments are immutable once written. The running `payments_made`
//! counter on the reservation is incremented in the same transaction that
//! inserts the row, so ledger and counter cannot drift.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

/// One recorded installment against a reservation.
#[derive(Clone, Debug, PartialEq)]
pub struct Payment {
    pub id: i32,
    pub reservation_id: i32,
    pub amount: Decimal,
    pub payment_reference: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub reservation_id: i32,
    pub amount: Decimal,
    pub payment_reference: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::reservations::Entity",
        from = "Column::ReservationId",
        to = "super::reservations::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Reservations,
}

impl Related<super::reservations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reservations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Payment {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            reservation_id: model.reservation_id,
            amount: model.amount,
            payment_reference: model.payment_reference,
            created_at: model.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn model_conversion() {
        let created = Utc.timestamp_opt(0, 0).unwrap();
        let model = Model {
            id: 7,
            reservation_id: 3,
            amount: dec!(740.74),
            payment_reference: "MP-123".to_string(),
            created_at: created,
        };
        let payment = Payment::from(model);

        assert_eq!(payment.id, 7);
        assert_eq!(payment.reservation_id, 3);
        assert_eq!(payment.amount, dec!(740.74));
        assert_eq!(payment.payment_reference, "MP-123");
        assert_eq!(payment.created_at, created);
    }
}
