//! Land parcel inventory.
//!
//! A `Parcel` is one unit of sellable land. Its `status` field is the
//! anchor of the reservation state machine: `available` parcels can be
//! reserved, `reserved` parcels carry exactly one pending reservation,
//! `sold` is terminal and set by an external process.

use rust_decimal::Decimal;
use sea_orm::{ActiveValue, entity::prelude::*};

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParcelStatus {
    Available,
    Reserved,
    Sold,
}

impl ParcelStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Reserved => "reserved",
            Self::Sold => "sold",
        }
    }
}

impl TryFrom<&str> for ParcelStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "available" => Ok(Self::Available),
            "reserved" => Ok(Self::Reserved),
            "sold" => Ok(Self::Sold),
            other => Err(EngineError::Validation(format!(
                "invalid parcel status: {other}"
            ))),
        }
    }
}

/// A land parcel.
///
/// Parcel ids are caller-assigned lot codes (for example `"A1"`), not
/// generated keys; the inventory is seeded externally and referenced by
/// these codes everywhere.
#[derive(Clone, Debug, PartialEq)]
pub struct Parcel {
    pub id: String,
    pub area_m2: Decimal,
    pub price: Decimal,
    pub status: ParcelStatus,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "parcels")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub area_m2: Decimal,
    pub price: Decimal,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::reservations::Entity")]
    Reservations,
}

impl Related<super::reservations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reservations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Parcel> for ActiveModel {
    fn from(parcel: &Parcel) -> Self {
        Self {
            id: ActiveValue::Set(parcel.id.clone()),
            area_m2: ActiveValue::Set(parcel.area_m2),
            price: ActiveValue::Set(parcel.price),
            status: ActiveValue::Set(parcel.status.as_str().to_string()),
        }
    }
}

impl TryFrom<Model> for Parcel {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            area_m2: model.area_m2,
            price: model.price,
            status: ParcelStatus::try_from(model.status.as_str())?,
        })
    }
}
