//! Reservation records and the installment schedule.
//!
//! A `Reservation` is a customer's claim on a parcel pending full payment.
//! The schedule is derived from `DepositType` alone, server-side, at
//! creation time: the deposit variant fixes the installment count, the
//! inaugural payments already counted, and the total owed.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::entity::prelude::*;

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DepositType {
    WithDeposit,
    WithoutDeposit,
}

impl DepositType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WithDeposit => "with_deposit",
            Self::WithoutDeposit => "without_deposit",
        }
    }

    /// Total number of installments in the plan.
    pub fn payments_total(self) -> i32 {
        match self {
            Self::WithDeposit => 137,
            Self::WithoutDeposit => 135,
        }
    }

    /// Installments already counted when the reservation is created.
    pub fn initial_payments_made(self) -> i32 {
        match self {
            Self::WithDeposit => 2,
            Self::WithoutDeposit => 1,
        }
    }

    /// Total owed for a parcel at `price`. The deposit plan buys a 5%
    /// discount.
    pub fn total_amount(self, price: Decimal) -> Decimal {
        match self {
            Self::WithDeposit => (price * dec!(0.95)).round_dp(2),
            Self::WithoutDeposit => price,
        }
    }
}

impl TryFrom<&str> for DepositType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "with_deposit" => Ok(Self::WithDeposit),
            "without_deposit" => Ok(Self::WithoutDeposit),
            other => Err(EngineError::Validation(format!(
                "invalid deposit type: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Cancelled,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Cancelled => "cancelled",
        }
    }
}

impl TryFrom<&str> for PaymentStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(EngineError::Validation(format!(
                "invalid payment status: {other}"
            ))),
        }
    }
}

/// A reservation of one parcel by one customer.
///
/// While `payment_status` is `Pending` the referenced parcel must be
/// `reserved`; cancelling flips it back to `available`. Reservations are
/// never deleted, so a parcel's history survives cancellation.
#[derive(Clone, Debug, PartialEq)]
pub struct Reservation {
    pub id: i32,
    pub parcel_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub payment_reference: Option<String>,
    /// The inaugural transfer submitted with the request. Stored for the
    /// record; it never enters the payment ledger.
    pub payment_amount: Decimal,
    pub deposit_type: DepositType,
    pub payment_status: PaymentStatus,
    pub total_amount: Decimal,
    pub payments_total: i32,
    pub payments_made: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// Installments still owed.
    pub fn payments_pending(&self) -> i32 {
        self.payments_total - self.payments_made
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "reservations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub parcel_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub payment_reference: Option<String>,
    pub payment_amount: Decimal,
    pub deposit_type: String,
    pub payment_status: String,
    pub total_amount: Decimal,
    pub payments_total: i32,
    pub payments_made: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::payments::Entity")]
    Payments,
    #[sea_orm(
        belongs_to = "super::parcels::Entity",
        from = "Column::ParcelId",
        to = "super::parcels::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Parcels,
}

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl Related<super::parcels::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Parcels.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Reservation {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            parcel_id: model.parcel_id,
            customer_name: model.customer_name,
            customer_email: model.customer_email,
            customer_phone: model.customer_phone,
            payment_reference: model.payment_reference,
            payment_amount: model.payment_amount,
            deposit_type: DepositType::try_from(model.deposit_type.as_str())?,
            payment_status: PaymentStatus::try_from(model.payment_status.as_str())?,
            total_amount: model.total_amount,
            payments_total: model.payments_total,
            payments_made: model.payments_made,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
