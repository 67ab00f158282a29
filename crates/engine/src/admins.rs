//! Admin accounts (minimal entity).
//!
//! Passwords are stored as a per-user random salt plus an HMAC-SHA-256
//! digest keyed by that salt, both base64-encoded. Verification is
//! constant-time via `Mac::verify_slice`.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sea_orm::entity::prelude::*;
use sha2::Sha256;

use crate::{EngineError, ResultEngine};

type HmacSha256 = Hmac<Sha256>;

/// Public view of an admin account. Credential material stays inside the
/// engine.
#[derive(Clone, Debug, PartialEq)]
pub struct Admin {
    pub username: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "admins")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub username: String,
    pub salt: String,
    pub password_hash: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Admin {
    fn from(model: Model) -> Self {
        Self {
            username: model.username,
            created_at: model.created_at,
        }
    }
}

/// HMAC-SHA-256 digest of `password` keyed by `salt`.
pub(crate) fn password_digest(salt: &[u8], password: &str) -> ResultEngine<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(salt)
        .map_err(|_| EngineError::Validation("invalid credential salt".to_string()))?;
    mac.update(password.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Constant-time check of `password` against a stored digest.
pub(crate) fn verify_password(salt: &[u8], password: &str, digest: &[u8]) -> bool {
    let Ok(mut mac) = HmacSha256::new_from_slice(salt) else {
        return false;
    };
    mac.update(password.as_bytes());
    mac.verify_slice(digest).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_verifies_with_same_salt() {
        let salt = b"0123456789abcdef";
        let digest = password_digest(salt, "hunter2").unwrap();

        assert!(verify_password(salt, "hunter2", &digest));
    }

    #[test]
    fn wrong_password_fails() {
        let salt = b"0123456789abcdef";
        let digest = password_digest(salt, "hunter2").unwrap();

        assert!(!verify_password(salt, "hunter3", &digest));
    }

    #[test]
    fn wrong_salt_fails() {
        let digest = password_digest(b"0123456789abcdef", "hunter2").unwrap();

        assert!(!verify_password(b"fedcba9876543210", "hunter2", &digest));
    }
}
