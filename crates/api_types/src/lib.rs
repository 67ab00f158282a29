use serde::{Deserialize, Serialize};

/// Sale status of a parcel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParcelStatus {
    Available,
    Reserved,
    Sold,
}

/// Installment plan variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepositType {
    WithDeposit,
    WithoutDeposit,
}

/// Payment status of a reservation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Cancelled,
}

pub mod parcel {
    use rust_decimal::Decimal;

    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ParcelView {
        pub id: String,
        pub area_m2: Decimal,
        pub price: Decimal,
        pub status: ParcelStatus,
    }

    /// Body for `PUT /api/parcels/{id}`; every field is overwritten.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ParcelUpdate {
        pub area_m2: Decimal,
        pub price: Decimal,
        pub status: ParcelStatus,
    }
}

pub mod reservation {
    use chrono::{DateTime, Utc};
    use rust_decimal::Decimal;

    use super::*;

    /// Body for `POST /api/reservations`.
    ///
    /// Everything is optional at the wire level; the engine reports all
    /// missing required fields in one validation error.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ReservationNew {
        pub parcel_id: Option<String>,
        pub customer_name: Option<String>,
        pub customer_email: Option<String>,
        pub customer_phone: Option<String>,
        pub payment_amount: Option<Decimal>,
        pub deposit_type: Option<DepositType>,
        pub payment_reference: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReservationCreated {
        pub id: i32,
    }

    /// Body for `PUT /api/reservations/{id}/status`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReservationStatusUpdate {
        pub status: PaymentStatus,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReservationView {
        pub id: i32,
        pub parcel_id: String,
        pub customer_name: String,
        pub customer_email: String,
        pub customer_phone: String,
        pub payment_reference: Option<String>,
        pub payment_amount: Decimal,
        pub deposit_type: DepositType,
        pub payment_status: PaymentStatus,
        pub total_amount: Decimal,
        pub payments_total: i32,
        pub payments_made: i32,
        /// Derived: `payments_total - payments_made`.
        pub payments_pending: i32,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    /// Query string for `GET /api/reservations/search`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SearchQuery {
        pub query: Option<String>,
    }
}

pub mod payment {
    use chrono::{DateTime, Utc};
    use rust_decimal::Decimal;

    use super::*;

    /// Body for `POST /api/reservations/{id}/payments`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct PaymentNew {
        pub amount: Option<Decimal>,
        pub payment_reference: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentCreated {
        pub id: i32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentView {
        pub id: i32,
        pub reservation_id: i32,
        pub amount: Decimal,
        pub payment_reference: String,
        pub created_at: DateTime<Utc>,
    }
}

pub mod admin {
    use super::*;

    /// Body for `POST /api/admin/login`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct AdminLogin {
        pub username: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AdminSession {
        pub username: String,
    }
}

pub mod health {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct HealthStatus {
        pub status: String,
        pub database: String,
    }
}
