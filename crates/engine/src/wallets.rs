//! Wallets table and the `Wallet` domain type.
//!
//! A wallet is the single cash balance owned by a user (one-to-one). Its
//! `balance_minor` is **only** mutated by the wallet operations in
//! `ops::wallets`; workflow code never assigns it directly, which keeps the
//! non-negative invariant enforceable in one place.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Currency, EngineError, Money};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub id: Uuid,
    pub user_id: Uuid,
    pub balance_minor: i64,
    pub currency: Currency,
}

impl Wallet {
    pub fn new(user_id: Uuid, currency: Currency) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            balance_minor: 0,
            currency,
        }
    }

    /// Balance as a typed amount.
    #[must_use]
    pub fn balance(&self) -> Money {
        Money::new(self.balance_minor)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "wallets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub user_id: String,
    pub balance_minor: i64,
    pub currency: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Wallet> for ActiveModel {
    fn from(wallet: &Wallet) -> Self {
        Self {
            id: ActiveValue::Set(wallet.id.to_string()),
            user_id: ActiveValue::Set(wallet.user_id.to_string()),
            balance_minor: ActiveValue::Set(wallet.balance_minor),
            currency: ActiveValue::Set(wallet.currency.code().to_string()),
        }
    }
}

impl TryFrom<Model> for Wallet {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::WalletNotFound("invalid wallet id".to_string()))?,
            user_id: Uuid::parse_str(&model.user_id)
                .map_err(|_| EngineError::WalletNotFound("invalid wallet owner".to_string()))?,
            balance_minor: model.balance_minor,
            currency: Currency::try_from(model.currency.as_str()).unwrap_or_default(),
        })
    }
}
