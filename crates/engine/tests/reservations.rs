use rust_decimal_macros::dec;
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

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

async fn engine_with_file_db() -> (Engine, DatabaseConnection, std::path::PathBuf) {
    let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../target/test_dbs");
    std::fs::create_dir_all(&root).unwrap();

    let path = root.join(format!("engine_{}.db", Uuid::new_v4()));
    let url = format!("sqlite:{}?mode=rwc", path.display());

    let db = Database::connect(&url).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db.clone()).build().await.unwrap();

    (engine, db, path)
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
async fn create_without_deposit_derives_schedule_and_reserves_parcel() {
    let (engine, _db) = engine_with_db().await;
    engine
        .create_parcel("A1", dec!(500), dec!(100000))
        .await
        .unwrap();

    let id = engine
        .create_reservation(reservation_cmd("A1"))
        .await
        .unwrap();

    let reservation = engine.reservation(id).await.unwrap();
    assert_eq!(reservation.parcel_id, "A1");
    assert_eq!(reservation.deposit_type, DepositType::WithoutDeposit);
    assert_eq!(reservation.payment_status, PaymentStatus::Pending);
    assert_eq!(reservation.total_amount, dec!(100000));
    assert_eq!(reservation.payments_total, 135);
    assert_eq!(reservation.payments_made, 1);
    assert_eq!(reservation.payments_pending(), 134);
    assert_eq!(reservation.payment_amount, dec!(740.74));

    let parcel = engine.parcel("A1").await.unwrap();
    assert_eq!(parcel.status, ParcelStatus::Reserved);
}

#[tokio::test]
async fn create_with_deposit_discounts_total() {
    let (engine, _db) = engine_with_db().await;
    engine
        .create_parcel("B2", dec!(350), dec!(80000))
        .await
        .unwrap();

    let id = engine
        .create_reservation(reservation_cmd("B2").deposit_type(DepositType::WithDeposit))
        .await
        .unwrap();

    let reservation = engine.reservation(id).await.unwrap();
    assert_eq!(reservation.total_amount, dec!(76000));
    assert_eq!(reservation.payments_total, 137);
    assert_eq!(reservation.payments_made, 2);
}

#[tokio::test]
async fn create_on_unknown_parcel_is_not_found() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .create_reservation(reservation_cmd("Z9"))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound("parcel".to_string()));
}

#[tokio::test]
async fn create_on_reserved_parcel_conflicts_without_writes() {
    let (engine, _db) = engine_with_db().await;
    engine
        .create_parcel("A1", dec!(500), dec!(100000))
        .await
        .unwrap();
    engine
        .create_reservation(reservation_cmd("A1"))
        .await
        .unwrap();

    let err = engine
        .create_reservation(reservation_cmd("A1"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Conflict("parcel already reserved".to_string())
    );

    let reservations = engine.list_reservations().await.unwrap();
    assert_eq!(reservations.len(), 1);
}

#[tokio::test]
async fn create_on_sold_parcel_conflicts() {
    let (engine, _db) = engine_with_db().await;
    engine
        .create_parcel("A1", dec!(500), dec!(100000))
        .await
        .unwrap();
    engine
        .update_parcel("A1", dec!(500), dec!(100000), ParcelStatus::Sold)
        .await
        .unwrap();

    let err = engine
        .create_reservation(reservation_cmd("A1"))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::Conflict("parcel already sold".to_string()));
}

#[tokio::test]
async fn cancel_releases_parcel_and_is_conflict_the_second_time() {
    let (engine, _db) = engine_with_db().await;
    engine
        .create_parcel("A1", dec!(500), dec!(100000))
        .await
        .unwrap();
    let id = engine
        .create_reservation(reservation_cmd("A1"))
        .await
        .unwrap();

    engine
        .cancel_reservation(id, PaymentStatus::Cancelled)
        .await
        .unwrap();

    let parcel = engine.parcel("A1").await.unwrap();
    assert_eq!(parcel.status, ParcelStatus::Available);
    let reservation = engine.reservation(id).await.unwrap();
    assert_eq!(reservation.payment_status, PaymentStatus::Cancelled);

    let err = engine
        .cancel_reservation(id, PaymentStatus::Cancelled)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Conflict("reservation already cancelled".to_string())
    );
}

#[tokio::test]
async fn stale_cancel_does_not_release_a_reclaimed_parcel() {
    let (engine, _db) = engine_with_db().await;
    engine
        .create_parcel("A1", dec!(500), dec!(100000))
        .await
        .unwrap();
    let first = engine
        .create_reservation(reservation_cmd("A1"))
        .await
        .unwrap();
    engine
        .cancel_reservation(first, PaymentStatus::Cancelled)
        .await
        .unwrap();

    // A new customer reserves the same parcel.
    engine
        .create_reservation(reservation_cmd("A1").customer_email("bruno@example.com"))
        .await
        .unwrap();

    let err = engine
        .cancel_reservation(first, PaymentStatus::Cancelled)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Conflict("reservation already cancelled".to_string())
    );
    let parcel = engine.parcel("A1").await.unwrap();
    assert_eq!(parcel.status, ParcelStatus::Reserved);
}

#[tokio::test]
async fn cancel_only_accepts_cancelled() {
    let (engine, _db) = engine_with_db().await;
    engine
        .create_parcel("A1", dec!(500), dec!(100000))
        .await
        .unwrap();
    let id = engine
        .create_reservation(reservation_cmd("A1"))
        .await
        .unwrap();

    let err = engine
        .cancel_reservation(id, PaymentStatus::Pending)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Validation("payment_status must be cancelled".to_string())
    );
}

#[tokio::test]
async fn cancel_unknown_reservation_is_not_found() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .cancel_reservation(99, PaymentStatus::Cancelled)
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound("reservation".to_string()));
}

#[tokio::test]
async fn list_reservations_is_newest_first() {
    let (engine, _db) = engine_with_db().await;
    for id in ["A1", "B2", "C3"] {
        engine
            .create_parcel(id, dec!(500), dec!(100000))
            .await
            .unwrap();
        engine.create_reservation(reservation_cmd(id)).await.unwrap();
    }

    let reservations = engine.list_reservations().await.unwrap();
    let parcels: Vec<&str> = reservations.iter().map(|r| r.parcel_id.as_str()).collect();
    assert_eq!(parcels, vec!["C3", "B2", "A1"]);
}

#[tokio::test]
async fn search_matches_reference_and_email() {
    let (engine, _db) = engine_with_db().await;
    engine
        .create_parcel("A1", dec!(500), dec!(100000))
        .await
        .unwrap();
    let id = engine
        .create_reservation(reservation_cmd("A1").payment_reference("TRX-001"))
        .await
        .unwrap();

    let by_reference = engine.search_reservation("TRX-001").await.unwrap();
    assert_eq!(by_reference.id, id);

    let by_email = engine.search_reservation("ana@example.com").await.unwrap();
    assert_eq!(by_email.id, id);

    let err = engine.search_reservation("nope").await.unwrap_err();
    assert_eq!(err, EngineError::NotFound("reservation".to_string()));

    let err = engine.search_reservation("  ").await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn search_finds_reservation_through_ledgered_payment() {
    let (engine, _db) = engine_with_db().await;
    engine
        .create_parcel("A1", dec!(500), dec!(100000))
        .await
        .unwrap();
    let id = engine
        .create_reservation(reservation_cmd("A1"))
        .await
        .unwrap();
    engine
        .record_payment(
            engine::RecordPaymentCmd::new()
                .reservation_id(id)
                .amount(dec!(740.74))
                .payment_reference("MP-77"),
        )
        .await
        .unwrap();

    let found = engine.search_reservation("MP-77").await.unwrap();
    assert_eq!(found.id, id);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_creates_on_one_parcel_settle_to_one_reservation() {
    let (engine, _db, path) = engine_with_file_db().await;
    engine
        .create_parcel("A1", dec!(500), dec!(100000))
        .await
        .unwrap();

    let engine = std::sync::Arc::new(engine);
    let first = {
        let engine = engine.clone();
        tokio::spawn(async move { engine.create_reservation(reservation_cmd("A1")).await })
    };
    let second = {
        let engine = engine.clone();
        tokio::spawn(async move {
            engine
                .create_reservation(reservation_cmd("A1").customer_email("bruno@example.com"))
                .await
        })
    };

    let results = [first.await.unwrap(), second.await.unwrap()];
    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1, "exactly one create must win: {results:?}");
    // The loser reports a state conflict, or a store-level error if the
    // backend refused the competing transaction outright.
    let loser = results.iter().find(|r| r.is_err()).unwrap();
    assert!(matches!(
        loser,
        Err(EngineError::Conflict(_)) | Err(EngineError::Database(_))
    ));

    let parcel = engine.parcel("A1").await.unwrap();
    assert_eq!(parcel.status, ParcelStatus::Reserved);
    let pending = engine
        .list_reservations()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.payment_status == PaymentStatus::Pending)
        .count();
    assert_eq!(pending, 1);

    drop(engine);
    let _ = std::fs::remove_file(path);
}
