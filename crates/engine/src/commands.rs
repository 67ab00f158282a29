//! Command structs for engine write operations.
//!
//! These types group caller input for the multi-field writes, keeping call
//! sites readable and letting validation report every missing field in a
//! single error instead of failing on the first one.

use rust_decimal::Decimal;

use crate::DepositType;

/// Create a reservation for a parcel.
///
/// Every field is optional at the type level; `Engine::create_reservation`
/// checks presence and lists all missing required fields at once.
#[derive(Clone, Debug, Default)]
pub struct CreateReservationCmd {
    pub parcel_id: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub payment_amount: Option<Decimal>,
    pub deposit_type: Option<DepositType>,
    pub payment_reference: Option<String>,
}

impl CreateReservationCmd {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn parcel_id(mut self, parcel_id: impl Into<String>) -> Self {
        self.parcel_id = Some(parcel_id.into());
        self
    }

    #[must_use]
    pub fn customer_name(mut self, name: impl Into<String>) -> Self {
        self.customer_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn customer_email(mut self, email: impl Into<String>) -> Self {
        self.customer_email = Some(email.into());
        self
    }

    #[must_use]
    pub fn customer_phone(mut self, phone: impl Into<String>) -> Self {
        self.customer_phone = Some(phone.into());
        self
    }

    #[must_use]
    pub fn payment_amount(mut self, amount: Decimal) -> Self {
        self.payment_amount = Some(amount);
        self
    }

    #[must_use]
    pub fn deposit_type(mut self, deposit_type: DepositType) -> Self {
        self.deposit_type = Some(deposit_type);
        self
    }

    #[must_use]
    pub fn payment_reference(mut self, reference: impl Into<String>) -> Self {
        self.payment_reference = Some(reference.into());
        self
    }
}

/// Record one installment against a reservation.
#[derive(Clone, Debug, Default)]
pub struct RecordPaymentCmd {
    pub reservation_id: Option<i32>,
    pub amount: Option<Decimal>,
    pub payment_reference: Option<String>,
}

impl RecordPaymentCmd {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn reservation_id(mut self, reservation_id: i32) -> Self {
        self.reservation_id = Some(reservation_id);
        self
    }

    #[must_use]
    pub fn amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn payment_reference(mut self, reference: impl Into<String>) -> Self {
        self.payment_reference = Some(reference.into());
        self
    }
}
