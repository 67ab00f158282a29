pub use admins::Admin;
pub use commands::{CreateReservationCmd, RecordPaymentCmd};
pub use error::EngineError;
pub use ops::{Engine, EngineBuilder};
pub use parcels::{Parcel, ParcelStatus};
pub use payments::Payment;
pub use reservations::{DepositType, PaymentStatus, Reservation};

mod admins;
mod commands;
mod error;
mod ops;
mod parcels;
mod payments;
mod reservations;

type ResultEngine<T> = Result<T, EngineError>;
