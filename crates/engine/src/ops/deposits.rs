//! Mobile-money deposit workflow.
//!
//! State machine per deposit entry: `pending -> completed | failed`. A
//! completed deposit is never re-opened. Initiation talks to the gateway
//! **before** any database transaction is opened, so no wallet row is locked
//! while the network call is in flight; the wallet is only credited during
//! reconciliation, after the provider confirms the payment.

use uuid::Uuid;

use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Expr};

use crate::{
    DepositInit, EngineError, EntryKind, EntryStatus, ExternalRef, LedgerEntry, Money,
    ResultEngine, StkCallback, StkPushRequest, normalize_phone, transactions,
};

use super::{Engine, with_tx};

impl Engine {
    /// Start an STK push and persist the matching `pending` ledger entry.
    ///
    /// No wallet mutation happens here: the funds are not guaranteed until
    /// the callback confirms them.
    pub async fn initiate_deposit(
        &self,
        user_id: Uuid,
        phone: &str,
        amount: Money,
    ) -> ResultEngine<DepositInit> {
        if amount.minor() < 100 {
            return Err(EngineError::InvalidAmount(
                "deposit must be at least 1 KES".to_string(),
            ));
        }

        // Wallet existence is checked up front so a user without a wallet
        // never triggers a push prompt on their phone.
        let wallet = with_tx!(self, |db_tx| {
            Self::require_wallet_for_user(&db_tx, user_id).await
        })?;

        let response = self
            .gateway
            .initiate_push(StkPushRequest {
                phone: normalize_phone(phone),
                amount,
                account_reference: user_id.to_string(),
                description: "Wallet top-up".to_string(),
            })
            .await?;

        with_tx!(self, |db_tx| {
            let entry = LedgerEntry::new(
                user_id,
                EntryKind::Deposit,
                amount,
                Money::ZERO,
                EntryStatus::Pending,
                wallet.currency,
                Some("Wallet top-up".to_string()),
            )?
            .with_external(ExternalRef {
                checkout_request_id: response.checkout_request_id.clone(),
                merchant_request_id: Some(response.merchant_request_id.clone()),
                receipt: None,
                phone: None,
            });
            transactions::ActiveModel::from(&entry).insert(&db_tx).await?;

            Ok(DepositInit {
                transaction_id: entry.id,
                checkout_request_id: response.checkout_request_id,
                merchant_request_id: response.merchant_request_id,
                customer_message: response.customer_message,
            })
        })
    }

    /// Reconcile an asynchronous gateway callback.
    ///
    /// Idempotent per checkout id: callbacks for unknown or already-settled
    /// deposits return `Ok(None)` so the HTTP layer can acknowledge them and
    /// stop the provider's retries. Returns the settled entry otherwise.
    pub async fn handle_deposit_callback(
        &self,
        callback: StkCallback,
    ) -> ResultEngine<Option<LedgerEntry>> {
        with_tx!(self, |db_tx| {
            let Some(model) = Self::find_pending_deposit(&db_tx, &callback).await? else {
                return Ok(None);
            };
            let entry = LedgerEntry::try_from(model)?;
            if entry.status != EntryStatus::Pending {
                // Duplicate delivery; the first one already settled it.
                return Ok(None);
            }

            // Status flips carry a `status = pending` guard so the check
            // and the transition are one atomic statement, mirroring the
            // conditional wallet debit. A second delivery racing past the
            // read above affects zero rows and settles nothing twice.
            if callback.result_code != 0 {
                let flipped = transactions::Entity::update_many()
                    .col_expr(
                        transactions::Column::Status,
                        Expr::value(EntryStatus::Failed.as_str()),
                    )
                    .col_expr(
                        transactions::Column::Description,
                        Expr::value(callback.result_desc.clone()),
                    )
                    .filter(transactions::Column::Id.eq(entry.id.to_string()))
                    .filter(transactions::Column::Status.eq(EntryStatus::Pending.as_str()))
                    .exec(&db_tx)
                    .await?;
                if flipped.rows_affected == 0 {
                    return Ok(None);
                }
                return Self::reload_entry(&db_tx, entry.id).await.map(Some);
            }

            // The provider's confirmed amount is authoritative and may
            // differ from the requested one.
            let confirmed = callback.confirmed_amount().ok_or_else(|| {
                EngineError::MalformedCallback("success callback without Amount".to_string())
            })?;

            let flipped = transactions::Entity::update_many()
                .col_expr(
                    transactions::Column::Status,
                    Expr::value(EntryStatus::Completed.as_str()),
                )
                .col_expr(
                    transactions::Column::AmountMinor,
                    Expr::value(confirmed.minor()),
                )
                .col_expr(
                    transactions::Column::MpesaReceipt,
                    Expr::value(callback.receipt()),
                )
                .col_expr(
                    transactions::Column::PayerPhone,
                    Expr::value(callback.payer_phone()),
                )
                .filter(transactions::Column::Id.eq(entry.id.to_string()))
                .filter(transactions::Column::Status.eq(EntryStatus::Pending.as_str()))
                .exec(&db_tx)
                .await?;
            if flipped.rows_affected == 0 {
                return Ok(None);
            }

            let wallet = Self::require_wallet_for_user(&db_tx, entry.user_id).await?;
            Self::credit_wallet(&db_tx, wallet.id, confirmed).await?;

            Self::reload_entry(&db_tx, entry.id).await.map(Some)
        })
    }

    async fn reload_entry(
        db_tx: &sea_orm::DatabaseTransaction,
        id: Uuid,
    ) -> ResultEngine<LedgerEntry> {
        let model = transactions::Entity::find_by_id(id.to_string())
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::TransactionNotFound("deposit not exists".to_string()))?;
        LedgerEntry::try_from(model)
    }

    /// Read-only deposit lookup by checkout id, for client polling.
    pub async fn deposit_status(&self, checkout_request_id: &str) -> ResultEngine<LedgerEntry> {
        with_tx!(self, |db_tx| {
            let model = transactions::Entity::find()
                .filter(transactions::Column::CheckoutRequestId.eq(checkout_request_id))
                .one(&db_tx)
                .await?
                .ok_or_else(|| {
                    EngineError::TransactionNotFound("deposit not exists".to_string())
                })?;
            LedgerEntry::try_from(model)
        })
    }

    /// Locate the deposit a callback refers to.
    ///
    /// Primary path: the stored checkout id. Fallback for gateways that omit
    /// it: the most recent pending deposit of the user named by the account
    /// reference. This is a compatibility shim, not the normal path.
    async fn find_pending_deposit(
        db_tx: &sea_orm::DatabaseTransaction,
        callback: &StkCallback,
    ) -> ResultEngine<Option<transactions::Model>> {
        if let Some(checkout_id) = callback.checkout_request_id.as_deref() {
            let found = transactions::Entity::find()
                .filter(transactions::Column::Kind.eq(EntryKind::Deposit.as_str()))
                .filter(transactions::Column::CheckoutRequestId.eq(checkout_id))
                .one(db_tx)
                .await?;
            if found.is_some() {
                return Ok(found);
            }
        }

        let Some(reference) = callback.account_reference.as_deref() else {
            return Ok(None);
        };
        let Ok(user_id) = Uuid::parse_str(reference) else {
            return Ok(None);
        };
        let found = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id.to_string()))
            .filter(transactions::Column::Kind.eq(EntryKind::Deposit.as_str()))
            .filter(transactions::Column::Status.eq(EntryStatus::Pending.as_str()))
            .order_by_desc(transactions::Column::CreatedAt)
            .one(db_tx)
            .await?;
        Ok(found)
    }
}
