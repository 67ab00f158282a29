use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

use crate::{EngineError, ResultEngine};

mod access;
mod admins;
mod parcels;
mod payments;
mod reservations;

/// Run a block inside a DB transaction, committing on success and rolling
/// back on error. Exactly one of commit/rollback runs on every exit path.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => {
                let _ = $tx.rollback().await;
                Err(err)
            }
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

fn normalize_required_text(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Money and area fields must be positive and carry at most two decimal
/// places. Values are rejected rather than rounded.
fn validate_money(label: &str, value: Decimal) -> ResultEngine<Decimal> {
    if value <= Decimal::ZERO {
        return Err(EngineError::Validation(format!(
            "{label} must be positive"
        )));
    }
    if value.round_dp(2) != value {
        return Err(EngineError::Validation(format!(
            "{label} must have at most two decimal places"
        )));
    }
    Ok(value)
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct the `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}
