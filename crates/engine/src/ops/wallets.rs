//! Wallet balance mutation.
//!
//! `debit_wallet` and `credit_wallet` are the only code paths that change
//! `wallets.balance_minor`. Both are single conditional UPDATE statements,
//! so the insufficient-funds check and the subtraction are one atomic step
//! per wallet row: two concurrent debits on the same wallet serialize on the
//! row and the balance can never go negative. Neither writes ledger rows —
//! that belongs to the calling workflow.

use uuid::Uuid;

use sea_orm::{
    DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*, sea_query::Expr,
};

use crate::{EngineError, Money, ResultEngine, Wallet, wallets};

use super::{Engine, with_tx};

impl Engine {
    /// Return the wallet owned by `user_id`.
    pub async fn wallet_balance(&self, user_id: Uuid) -> ResultEngine<Wallet> {
        with_tx!(self, |db_tx| {
            let wallet = Self::require_wallet_for_user(&db_tx, user_id).await?;
            Ok(wallet)
        })
    }

    pub(super) async fn require_wallet_for_user(
        db_tx: &DatabaseTransaction,
        user_id: Uuid,
    ) -> ResultEngine<Wallet> {
        Self::find_wallet_for_user(db_tx, user_id)
            .await?
            .ok_or_else(|| EngineError::WalletNotFound("wallet not exists".to_string()))
    }

    pub(super) async fn find_wallet_for_user(
        db_tx: &DatabaseTransaction,
        user_id: Uuid,
    ) -> ResultEngine<Option<Wallet>> {
        let model = wallets::Entity::find()
            .filter(wallets::Column::UserId.eq(user_id.to_string()))
            .one(db_tx)
            .await?;
        model.map(Wallet::try_from).transpose()
    }

    /// Atomically decrease a wallet balance.
    ///
    /// Fails with `InsufficientFunds` when the balance is below `amount`;
    /// the guard and the subtraction are one statement. Returns the new
    /// balance.
    pub(super) async fn debit_wallet(
        db_tx: &DatabaseTransaction,
        wallet_id: Uuid,
        amount: Money,
    ) -> ResultEngine<i64> {
        let result = wallets::Entity::update_many()
            .col_expr(
                wallets::Column::BalanceMinor,
                Expr::col(wallets::Column::BalanceMinor).sub(amount.minor()),
            )
            .filter(wallets::Column::Id.eq(wallet_id.to_string()))
            .filter(wallets::Column::BalanceMinor.gte(amount.minor()))
            .exec(db_tx)
            .await?;

        if result.rows_affected == 0 {
            let existing = wallets::Entity::find_by_id(wallet_id.to_string())
                .one(db_tx)
                .await?;
            return match existing {
                Some(model) => Err(EngineError::InsufficientFunds(format!(
                    "balance {} is less than {}",
                    Money::new(model.balance_minor),
                    amount
                ))),
                None => Err(EngineError::WalletNotFound("wallet not exists".to_string())),
            };
        }

        Self::read_balance(db_tx, wallet_id).await
    }

    /// Atomically increase a wallet balance. Returns the new balance.
    pub(super) async fn credit_wallet(
        db_tx: &DatabaseTransaction,
        wallet_id: Uuid,
        amount: Money,
    ) -> ResultEngine<i64> {
        let result = wallets::Entity::update_many()
            .col_expr(
                wallets::Column::BalanceMinor,
                Expr::col(wallets::Column::BalanceMinor).add(amount.minor()),
            )
            .filter(wallets::Column::Id.eq(wallet_id.to_string()))
            .exec(db_tx)
            .await?;

        if result.rows_affected == 0 {
            return Err(EngineError::WalletNotFound("wallet not exists".to_string()));
        }

        Self::read_balance(db_tx, wallet_id).await
    }

    async fn read_balance(db_tx: &DatabaseTransaction, wallet_id: Uuid) -> ResultEngine<i64> {
        let model = wallets::Entity::find_by_id(wallet_id.to_string())
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::WalletNotFound("wallet not exists".to_string()))?;
        Ok(model.balance_minor)
    }
}
