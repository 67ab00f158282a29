//! Initial schema migration - creates all tables from scratch.
//!
//! The complete schema for Terrenos:
//!
//! - `parcels`: the land inventory and its sale status
//! - `reservations`: customer claims on parcels with their payment plan
//! - `payments`: the installment ledger, one row per recorded payment
//! - `admins`: back-office credentials (salted digests, never plaintext)

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Parcels {
    Table,
    Id,
    AreaM2,
    Price,
    Status,
}

#[derive(Iden)]
enum Reservations {
    Table,
    Id,
    ParcelId,
    CustomerName,
    CustomerEmail,
    CustomerPhone,
    PaymentReference,
    PaymentAmount,
    DepositType,
    PaymentStatus,
    TotalAmount,
    PaymentsTotal,
    PaymentsMade,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Payments {
    Table,
    Id,
    ReservationId,
    Amount,
    PaymentReference,
    CreatedAt,
}

#[derive(Iden)]
enum Admins {
    Table,
    Username,
    Salt,
    PasswordHash,
    CreatedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Parcels
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Parcels::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Parcels::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Parcels::AreaM2)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Parcels::Price)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Parcels::Status)
                            .string()
                            .not_null()
                            .default("available"),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Reservations
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Reservations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reservations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reservations::ParcelId).string().not_null())
                    .col(
                        ColumnDef::new(Reservations::CustomerName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::CustomerEmail)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::CustomerPhone)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Reservations::PaymentReference).string())
                    .col(
                        ColumnDef::new(Reservations::PaymentAmount)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::DepositType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::PaymentStatus)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Reservations::TotalAmount)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::PaymentsTotal)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::PaymentsMade)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-reservations-parcel_id")
                            .from(Reservations::Table, Reservations::ParcelId)
                            .to(Parcels::Table, Parcels::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-reservations-parcel_id-payment_status")
                    .table(Reservations::Table)
                    .col(Reservations::ParcelId)
                    .col(Reservations::PaymentStatus)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-reservations-payment_reference")
                    .table(Reservations::Table)
                    .col(Reservations::PaymentReference)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-reservations-customer_email")
                    .table(Reservations::Table)
                    .col(Reservations::CustomerEmail)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Payments
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Payments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Payments::ReservationId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Payments::Amount)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Payments::PaymentReference)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Payments::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-payments-reservation_id")
                            .from(Payments::Table, Payments::ReservationId)
                            .to(Reservations::Table, Reservations::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-payments-reservation_id")
                    .table(Payments::Table)
                    .col(Payments::ReservationId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-payments-payment_reference")
                    .table(Payments::Table)
                    .col(Payments::PaymentReference)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Admins
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Admins::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Admins::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Admins::Salt).string().not_null())
                    .col(ColumnDef::new(Admins::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Admins::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(Admins::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Reservations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Parcels::Table).to_owned())
            .await?;
        Ok(())
    }
}
