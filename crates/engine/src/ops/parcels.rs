use rust_decimal::Decimal;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::Expr,
};

use crate::{EngineError, Parcel, ParcelStatus, PaymentStatus, ResultEngine, parcels, reservations};

use super::{Engine, normalize_required_text, validate_money, with_tx};

impl Engine {
    /// Return a parcel snapshot from DB.
    pub async fn parcel(&self, parcel_id: &str) -> ResultEngine<Parcel> {
        with_tx!(self, |db_tx| {
            let model = self.require_parcel(&db_tx, parcel_id).await?;
            Parcel::try_from(model)
        })
    }

    /// Return the full inventory, ordered by parcel id.
    pub async fn list_parcels(&self) -> ResultEngine<Vec<Parcel>> {
        with_tx!(self, |db_tx| {
            let models = parcels::Entity::find()
                .order_by_asc(parcels::Column::Id)
                .all(&db_tx)
                .await?;
            let parcels: Vec<Parcel> = models
                .into_iter()
                .map(Parcel::try_from)
                .collect::<ResultEngine<_>>()?;
            Ok(parcels)
        })
    }

    /// Add a new parcel to the inventory as `available`.
    pub async fn create_parcel(
        &self,
        parcel_id: &str,
        area_m2: Decimal,
        price: Decimal,
    ) -> ResultEngine<Parcel> {
        let parcel_id = normalize_required_text(parcel_id, "parcel id")?;
        let area_m2 = validate_money("area_m2", area_m2)?;
        let price = validate_money("price", price)?;
        let parcel = Parcel {
            id: parcel_id,
            area_m2,
            price,
            status: ParcelStatus::Available,
        };

        with_tx!(self, |db_tx| {
            let exists = parcels::Entity::find_by_id(parcel.id.clone())
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::Conflict(format!(
                    "parcel {} already exists",
                    parcel.id
                )));
            }

            parcels::ActiveModel::from(&parcel).insert(&db_tx).await?;
            Ok(parcel)
        })
    }

    /// Overwrite a parcel's area, price and status.
    pub async fn update_parcel(
        &self,
        parcel_id: &str,
        area_m2: Decimal,
        price: Decimal,
        status: ParcelStatus,
    ) -> ResultEngine<Parcel> {
        let area_m2 = validate_money("area_m2", area_m2)?;
        let price = validate_money("price", price)?;

        with_tx!(self, |db_tx| {
            let model = self.require_parcel(&db_tx, parcel_id).await?;

            let mut active: parcels::ActiveModel = model.into();
            active.area_m2 = ActiveValue::Set(area_m2);
            active.price = ActiveValue::Set(price);
            active.status = ActiveValue::Set(status.as_str().to_string());
            let updated = active.update(&db_tx).await?;

            Parcel::try_from(updated)
        })
    }

    /// Remove a parcel from the inventory.
    ///
    /// Refused while the parcel still has a pending reservation; cancelled
    /// reservations keep their rows and do not block deletion.
    pub async fn delete_parcel(&self, parcel_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_parcel(&db_tx, parcel_id).await?;

            let pending = reservations::Entity::find()
                .filter(reservations::Column::ParcelId.eq(model.id.clone()))
                .filter(reservations::Column::PaymentStatus.eq(PaymentStatus::Pending.as_str()))
                .one(&db_tx)
                .await?
                .is_some();
            if pending {
                return Err(EngineError::Conflict(
                    "parcel has a pending reservation".to_string(),
                ));
            }

            parcels::Entity::delete_by_id(model.id).exec(&db_tx).await?;
            Ok(())
        })
    }

    /// Flip a parcel's status inside the caller's transaction.
    ///
    /// When `expected` is given the flip only happens while the parcel still
    /// holds that status; returns whether a row was written.
    pub(super) async fn set_parcel_status(
        &self,
        db: &DatabaseTransaction,
        parcel_id: &str,
        expected: Option<ParcelStatus>,
        new_status: ParcelStatus,
    ) -> ResultEngine<bool> {
        let mut update = parcels::Entity::update_many()
            .col_expr(parcels::Column::Status, Expr::value(new_status.as_str()))
            .filter(parcels::Column::Id.eq(parcel_id.to_string()));
        if let Some(expected) = expected {
            update = update.filter(parcels::Column::Status.eq(expected.as_str()));
        }

        let result = update.exec(db).await?;
        Ok(result.rows_affected == 1)
    }
}
