use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::Utc;
use sea_orm::{ActiveValue, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{Admin, EngineError, ResultEngine, admins};

use super::{Engine, normalize_required_text, with_tx};

impl Engine {
    /// Register an admin account with a fresh random salt.
    pub async fn create_admin(&self, username: &str, password: &str) -> ResultEngine<Admin> {
        let username = normalize_required_text(username, "username")?;
        if password.is_empty() {
            return Err(EngineError::Validation(
                "password must not be empty".to_string(),
            ));
        }

        let salt = Uuid::new_v4().into_bytes();
        let digest = admins::password_digest(&salt, password)?;
        let row = admins::ActiveModel {
            username: ActiveValue::Set(username.clone()),
            salt: ActiveValue::Set(STANDARD.encode(salt)),
            password_hash: ActiveValue::Set(STANDARD.encode(&digest)),
            created_at: ActiveValue::Set(Utc::now()),
        };

        with_tx!(self, |db_tx| {
            let exists = admins::Entity::find_by_id(username.clone())
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::Conflict(format!(
                    "admin {username} already exists"
                )));
            }

            let inserted = row.insert(&db_tx).await?;
            Ok(Admin::from(inserted))
        })
    }

    /// Check a username/password pair against the stored digest.
    ///
    /// Every failure path reports the same message so callers cannot probe
    /// which usernames exist.
    pub async fn verify_admin(&self, username: &str, password: &str) -> ResultEngine<Admin> {
        let username = normalize_required_text(username, "username")
            .map_err(|_| unauthorized())?;

        with_tx!(self, |db_tx| {
            let model = admins::Entity::find_by_id(username.clone())
                .one(&db_tx)
                .await?
                .ok_or_else(unauthorized)?;

            let salt = STANDARD.decode(&model.salt).map_err(|_| unauthorized())?;
            let digest = STANDARD
                .decode(&model.password_hash)
                .map_err(|_| unauthorized())?;
            if !admins::verify_password(&salt, password, &digest) {
                return Err(unauthorized());
            }

            Ok(Admin::from(model))
        })
    }
}

fn unauthorized() -> EngineError {
    EngineError::Unauthorized("invalid credentials".to_string())
}
