//! Admin reversal: a compensating transaction that undoes a completed
//! transfer without deleting anything.
//!
//! Intentionally asymmetric with the forward transfer: the sender is made
//! fully whole (`amount + fee`) while only the principal is reclaimed from
//! the recipient — the fee was never theirs. All balance changes and status
//! flips commit as one unit.

use uuid::Uuid;

use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    EngineError, EntryKind, EntryStatus, LedgerEntry, Money, ResultEngine, ReversalOutcome, User,
    normalize_phone, transactions, users,
};

use super::{Engine, with_tx};

impl Engine {
    pub async fn reverse_transaction(&self, transaction_id: Uuid) -> ResultEngine<ReversalOutcome> {
        with_tx!(self, |db_tx| {
            let model = transactions::Entity::find_by_id(transaction_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| {
                    EngineError::TransactionNotFound("transaction not exists".to_string())
                })?;
            let original = LedgerEntry::try_from(model)?;

            if original.status == EntryStatus::Reversed {
                return Err(EngineError::AlreadyReversed(original.id.to_string()));
            }
            if original.kind != EntryKind::Send || original.status != EntryStatus::Completed {
                return Err(EngineError::NotReversible(format!(
                    "only completed send transactions can be reversed, got {} {}",
                    original.status.as_str(),
                    original.kind.as_str()
                )));
            }

            let amount = original.amount();
            let refund_total = amount
                .checked_add(original.fee())
                .ok_or_else(|| EngineError::InvalidAmount("amount too large".to_string()))?;

            // The recipient phone recorded on the send entry, normalized the
            // same way transfers normalize it (tolerates a leading `+`).
            let recipient_phone = original.recipient_phone.as_deref().ok_or_else(|| {
                EngineError::RecipientNotFound("transaction has no recipient phone".to_string())
            })?;
            let recipient = users::Entity::find()
                .filter(users::Column::Phone.eq(normalize_phone(recipient_phone)))
                .one(&db_tx)
                .await?
                .ok_or_else(|| {
                    EngineError::RecipientNotFound("recipient is not a registered user".to_string())
                })?;
            let recipient = User::try_from(recipient)?;

            // Reclaim the principal; the conditional debit refuses to drive
            // the recipient negative.
            let recipient_wallet = Self::require_wallet_for_user(&db_tx, recipient.id).await?;
            Self::debit_wallet(&db_tx, recipient_wallet.id, amount).await?;

            // Best-effort: flip the matching receive entry. The recipient
            // may not have been registered at transfer time, so absence is
            // tolerated.
            let recipient_entry_reversed = Self::reverse_matching_receive(
                &db_tx,
                recipient.id,
                original.amount_minor,
            )
            .await?;

            let sender_wallet =
                Self::require_wallet_for_user(&db_tx, original.user_id).await?;
            Self::credit_wallet(&db_tx, sender_wallet.id, refund_total).await?;

            let flip = transactions::ActiveModel {
                id: ActiveValue::Set(original.id.to_string()),
                status: ActiveValue::Set(EntryStatus::Reversed.as_str().to_string()),
                ..Default::default()
            };
            flip.update(&db_tx).await?;

            let refund = LedgerEntry::new(
                original.user_id,
                EntryKind::Refund,
                amount,
                Money::ZERO,
                EntryStatus::Completed,
                original.currency,
                Some(format!("reversal of transaction {}", original.id)),
            )?
            .with_counterparty(&recipient.name, &recipient.phone);
            transactions::ActiveModel::from(&refund).insert(&db_tx).await?;

            let mut original = original;
            original.status = EntryStatus::Reversed;

            Ok(ReversalOutcome {
                original,
                refund,
                recipient_entry_reversed,
            })
        })
    }

    /// Mark the recipient's most recent matching completed `receive` entry
    /// as reversed. Returns whether one was found.
    async fn reverse_matching_receive(
        db_tx: &sea_orm::DatabaseTransaction,
        recipient_id: Uuid,
        amount_minor: i64,
    ) -> ResultEngine<bool> {
        let found = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(recipient_id.to_string()))
            .filter(transactions::Column::Kind.eq(EntryKind::Receive.as_str()))
            .filter(transactions::Column::Status.eq(EntryStatus::Completed.as_str()))
            .filter(transactions::Column::AmountMinor.eq(amount_minor))
            .order_by_desc(transactions::Column::CreatedAt)
            .one(db_tx)
            .await?;

        match found {
            Some(model) => {
                let flip = transactions::ActiveModel {
                    id: ActiveValue::Set(model.id),
                    status: ActiveValue::Set(EntryStatus::Reversed.as_str().to_string()),
                    ..Default::default()
                };
                flip.update(db_tx).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
