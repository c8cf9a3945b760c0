//! User provisioning.

use chrono::Utc;
use uuid::Uuid;

use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};

use crate::{
    Currency, EngineError, NewUser, ResultEngine, User, Wallet, hash_password, normalize_phone,
    users, wallets,
};

use super::{Engine, with_tx};

impl Engine {
    /// Create a user together with their (empty) wallet, atomically.
    ///
    /// The phone is stored normalized so transfers and reversals can match
    /// recipients with a plain equality lookup. Duplicate email or phone is
    /// rejected before hitting the unique index, so the caller gets a typed
    /// error instead of a database one.
    pub async fn create_user(&self, new_user: NewUser) -> ResultEngine<User> {
        let name = new_user.name.trim().to_string();
        let email = new_user.email.trim().to_ascii_lowercase();
        if name.is_empty() || email.is_empty() {
            return Err(EngineError::InvalidAmount(
                "name and email must not be empty".to_string(),
            ));
        }
        let phone = normalize_phone(&new_user.phone);
        let password_hash = hash_password(&new_user.password)?;

        with_tx!(self, |db_tx| {
            let clash = users::Entity::find()
                .filter(
                    users::Column::Email
                        .eq(email.clone())
                        .or(users::Column::Phone.eq(phone.clone())),
                )
                .one(&db_tx)
                .await?;
            if clash.is_some() {
                return Err(EngineError::AlreadyExists(email));
            }

            let user = User {
                id: Uuid::new_v4(),
                name,
                email,
                phone,
                role: new_user.role,
                created_at: Utc::now(),
            };
            let mut model: users::ActiveModel = (&user).into();
            model.password = ActiveValue::Set(password_hash);
            model.insert(&db_tx).await?;

            let wallet = Wallet::new(user.id, Currency::default());
            wallets::ActiveModel::from(&wallet).insert(&db_tx).await?;

            Ok(user)
        })
    }

    /// Look up a user by id.
    pub async fn find_user(&self, user_id: Uuid) -> ResultEngine<User> {
        with_tx!(self, |db_tx| {
            let model = users::Entity::find_by_id(user_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::UserNotFound("user not exists".to_string()))?;
            User::try_from(model)
        })
    }
}
