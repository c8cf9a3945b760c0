//! Admin audit operations.
//!
//! Authorization (the caller must be an admin) is enforced by the transport
//! layer; the engine trusts the authenticated identity it is handed.

use uuid::Uuid;

use sea_orm::{
    ActiveValue, PaginatorTrait, QueryOrder, QuerySelect, TransactionTrait, prelude::*,
    sea_query::Expr,
};

use crate::{
    EngineError, LedgerEntry, ResultEngine, Role, SystemStats, User, transactions, users, wallets,
};

use super::{Engine, with_tx};

impl Engine {
    pub async fn list_users(&self) -> ResultEngine<Vec<User>> {
        with_tx!(self, |db_tx| {
            let models = users::Entity::find()
                .order_by_asc(users::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            models.into_iter().map(User::try_from).collect()
        })
    }

    /// Change a user's role.
    ///
    /// Promoting to `admin` is reserved for the bootstrap CLI; the API layer
    /// only ever passes `user` or `deactivated` here.
    pub async fn set_user_role(&self, user_id: Uuid, role: Role) -> ResultEngine<User> {
        with_tx!(self, |db_tx| {
            let model = users::Entity::find_by_id(user_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::UserNotFound("user not exists".to_string()))?;

            let active = users::ActiveModel {
                id: ActiveValue::Set(model.id),
                role: ActiveValue::Set(role.as_str().to_string()),
                ..Default::default()
            };
            let updated = active.update(&db_tx).await?;
            User::try_from(updated)
        })
    }

    /// Every ledger entry in the system, newest first.
    pub async fn list_all_transactions(&self) -> ResultEngine<Vec<LedgerEntry>> {
        with_tx!(self, |db_tx| {
            let models = transactions::Entity::find()
                .order_by_desc(transactions::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            models.into_iter().map(LedgerEntry::try_from).collect()
        })
    }

    pub async fn system_stats(&self) -> ResultEngine<SystemStats> {
        with_tx!(self, |db_tx| {
            let total_users = users::Entity::find().count(&db_tx).await?;
            let total_wallets = wallets::Entity::find().count(&db_tx).await?;
            let total_transactions = transactions::Entity::find().count(&db_tx).await?;

            // SUM over zero rows yields NULL, hence the nested Option.
            let total_balance_minor: Option<Option<i64>> = wallets::Entity::find()
                .select_only()
                .column_as(Expr::col(wallets::Column::BalanceMinor).sum(), "total")
                .into_tuple()
                .one(&db_tx)
                .await?;
            let total_balance_minor = total_balance_minor.flatten();

            Ok(SystemStats {
                total_users,
                total_wallets,
                total_transactions,
                total_balance_minor: total_balance_minor.unwrap_or(0),
            })
        })
    }
}
