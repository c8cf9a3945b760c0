//! Ledger queries.

use uuid::Uuid;

use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{EngineError, LedgerEntry, ResultEngine, transactions};

use super::{Engine, with_tx};

impl Engine {
    /// All entries of one user's ledger, newest first.
    pub async fn list_transactions(&self, user_id: Uuid) -> ResultEngine<Vec<LedgerEntry>> {
        with_tx!(self, |db_tx| {
            let models = transactions::Entity::find()
                .filter(transactions::Column::UserId.eq(user_id.to_string()))
                .order_by_desc(transactions::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            models.into_iter().map(LedgerEntry::try_from).collect()
        })
    }

    /// Single entry by id.
    pub async fn transaction(&self, transaction_id: Uuid) -> ResultEngine<LedgerEntry> {
        with_tx!(self, |db_tx| {
            let model = transactions::Entity::find_by_id(transaction_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| {
                    EngineError::TransactionNotFound("transaction not exists".to_string())
                })?;
            LedgerEntry::try_from(model)
        })
    }
}
