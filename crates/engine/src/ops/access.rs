use sea_orm::{DatabaseTransaction, prelude::*};

use crate::{EngineError, ResultEngine, parcels, payments, reservations};

use super::Engine;

impl Engine {
    pub(super) async fn require_parcel(
        &self,
        db: &DatabaseTransaction,
        parcel_id: &str,
    ) -> ResultEngine<parcels::Model> {
        parcels::Entity::find_by_id(parcel_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::NotFound("parcel".to_string()))
    }

    pub(super) async fn require_reservation(
        &self,
        db: &DatabaseTransaction,
        reservation_id: i32,
    ) -> ResultEngine<reservations::Model> {
        reservations::Entity::find_by_id(reservation_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::NotFound("reservation".to_string()))
    }

    pub(super) async fn require_payment(
        &self,
        db: &DatabaseTransaction,
        payment_id: i32,
    ) -> ResultEngine<payments::Model> {
        payments::Entity::find_by_id(payment_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::NotFound("payment".to_string()))
    }
}
