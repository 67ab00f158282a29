use rust_decimal_macros::dec;
use sea_orm::{Database, DatabaseConnection};

use engine::{
    CreateReservationCmd, DepositType, Engine, EngineError, ParcelStatus, PaymentStatus,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db.clone()).build().await.unwrap();
    (engine, db)
}

fn reservation_cmd(parcel_id: &str) -> CreateReservationCmd {
    CreateReservationCmd::new()
        .parcel_id(parcel_id)
        .customer_name("Ana Suarez")
        .customer_email("ana@example.com")
        .customer_phone("+34911222333")
        .payment_amount(dec!(740.74))
        .deposit_type(DepositType::WithoutDeposit)
}

#[tokio::test]
async fn create_and_get_parcel() {
    let (engine, _db) = engine_with_db().await;

    let created = engine
        .create_parcel("A1", dec!(500), dec!(100000))
        .await
        .unwrap();
    assert_eq!(created.status, ParcelStatus::Available);

    let parcel = engine.parcel("A1").await.unwrap();
    assert_eq!(parcel, created);
}

#[tokio::test]
async fn duplicate_parcel_id_conflicts() {
    let (engine, _db) = engine_with_db().await;
    engine
        .create_parcel("A1", dec!(500), dec!(100000))
        .await
        .unwrap();

    let err = engine
        .create_parcel("A1", dec!(350), dec!(70000))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Conflict("parcel A1 already exists".to_string())
    );
}

#[tokio::test]
async fn get_unknown_parcel_is_not_found() {
    let (engine, _db) = engine_with_db().await;

    let err = engine.parcel("Z9").await.unwrap_err();
    assert_eq!(err, EngineError::NotFound("parcel".to_string()));
}

#[tokio::test]
async fn list_parcels_is_ordered_by_id() {
    let (engine, _db) = engine_with_db().await;
    engine
        .create_parcel("B2", dec!(350), dec!(70000))
        .await
        .unwrap();
    engine
        .create_parcel("A1", dec!(500), dec!(100000))
        .await
        .unwrap();
    engine
        .create_parcel("A10", dec!(420), dec!(84000))
        .await
        .unwrap();

    let parcels = engine.list_parcels().await.unwrap();
    let ids: Vec<&str> = parcels.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["A1", "A10", "B2"]);
}

#[tokio::test]
async fn update_overwrites_all_fields() {
    let (engine, _db) = engine_with_db().await;
    engine
        .create_parcel("A1", dec!(500), dec!(100000))
        .await
        .unwrap();

    let updated = engine
        .update_parcel("A1", dec!(505.5), dec!(101100.25), ParcelStatus::Sold)
        .await
        .unwrap();
    assert_eq!(updated.area_m2, dec!(505.5));
    assert_eq!(updated.price, dec!(101100.25));
    assert_eq!(updated.status, ParcelStatus::Sold);

    let parcel = engine.parcel("A1").await.unwrap();
    assert_eq!(parcel, updated);
}

#[tokio::test]
async fn update_unknown_parcel_is_not_found() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .update_parcel("Z9", dec!(500), dec!(100000), ParcelStatus::Available)
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound("parcel".to_string()));
}

#[tokio::test]
async fn non_positive_and_sub_cent_numbers_are_rejected() {
    let (engine, _db) = engine_with_db().await;
    engine
        .create_parcel("A1", dec!(500), dec!(100000))
        .await
        .unwrap();

    for (area, price) in [
        (dec!(0), dec!(100000)),
        (dec!(-500), dec!(100000)),
        (dec!(500), dec!(0)),
        (dec!(500.123), dec!(100000)),
        (dec!(500), dec!(100000.005)),
    ] {
        let err = engine
            .update_parcel("A1", area, price, ParcelStatus::Available)
            .await
            .unwrap_err();
        assert!(
            matches!(err, EngineError::Validation(_)),
            "{area}/{price} must be rejected, got {err:?}"
        );
    }
}

#[tokio::test]
async fn delete_parcel_blocked_by_pending_reservation() {
    let (engine, _db) = engine_with_db().await;
    engine
        .create_parcel("A1", dec!(500), dec!(100000))
        .await
        .unwrap();
    let reservation_id = engine
        .create_reservation(reservation_cmd("A1"))
        .await
        .unwrap();

    let err = engine.delete_parcel("A1").await.unwrap_err();
    assert_eq!(
        err,
        EngineError::Conflict("parcel has a pending reservation".to_string())
    );

    // Once the reservation is cancelled the parcel can go, and its
    // reservation history stays behind.
    engine
        .cancel_reservation(reservation_id, PaymentStatus::Cancelled)
        .await
        .unwrap();
    engine.delete_parcel("A1").await.unwrap();

    let err = engine.parcel("A1").await.unwrap_err();
    assert_eq!(err, EngineError::NotFound("parcel".to_string()));
    let reservations = engine.list_reservations().await.unwrap();
    assert_eq!(reservations.len(), 1);
}

#[tokio::test]
async fn delete_unknown_parcel_is_not_found() {
    let (engine, _db) = engine_with_db().await;

    let err = engine.delete_parcel("Z9").await.unwrap_err();
    assert_eq!(err, EngineError::NotFound("parcel".to_string()));
}
