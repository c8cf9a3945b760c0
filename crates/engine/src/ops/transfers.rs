//! Transfer workflow: send money to a beneficiary.
//!
//! A transfer debits the sender `amount + fee` and, when the beneficiary's
//! phone belongs to a registered user with a wallet, credits that user
//! `amount` (the sender bears the whole fee). Each side gets its own ledger
//! row; both rows and both balance changes commit as one unit, so no reader
//! ever observes a credited recipient without the matching debited sender.

use sea_orm::{QueryFilter, TransactionTrait, prelude::*};

use crate::{
    EngineError, EntryKind, EntryStatus, LedgerEntry, Money, ResultEngine, SendMoneyCmd,
    TransferResult, User, beneficiaries, normalize_phone, transactions, transfer_fee, users,
};

use super::{Engine, with_tx};

impl Engine {
    pub async fn send_money(&self, cmd: SendMoneyCmd) -> ResultEngine<TransferResult> {
        if !cmd.amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }
        let fee = transfer_fee(cmd.amount);
        let total = cmd
            .amount
            .checked_add(fee)
            .ok_or_else(|| EngineError::InvalidAmount("amount too large".to_string()))?;

        with_tx!(self, |db_tx| {
            let sender_wallet = Self::require_wallet_for_user(&db_tx, cmd.user_id).await?;
            let sender = users::Entity::find_by_id(cmd.user_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::UserNotFound("user not exists".to_string()))?;
            let sender = User::try_from(sender)?;

            let beneficiary = beneficiaries::Entity::find_by_id(cmd.beneficiary_id.to_string())
                .filter(beneficiaries::Column::UserId.eq(cmd.user_id.to_string()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| {
                    EngineError::BeneficiaryNotFound("beneficiary not exists".to_string())
                })?;

            let sender_balance_minor =
                Self::debit_wallet(&db_tx, sender_wallet.id, total).await?;

            let sender_entry = LedgerEntry::new(
                cmd.user_id,
                EntryKind::Send,
                cmd.amount,
                fee,
                EntryStatus::Completed,
                sender_wallet.currency,
                cmd.description.clone(),
            )?
            .with_counterparty(&beneficiary.name, &beneficiary.phone);
            transactions::ActiveModel::from(&sender_entry)
                .insert(&db_tx)
                .await?;

            // On-ledger credit only when the beneficiary phone resolves to a
            // registered user with a wallet; otherwise the send stands alone
            // and the money leaves the ledger.
            let recipient_phone = normalize_phone(&beneficiary.phone);
            let recipient = users::Entity::find()
                .filter(users::Column::Phone.eq(recipient_phone))
                .one(&db_tx)
                .await?;

            let recipient_wallet = match recipient {
                Some(recipient_model) => {
                    let recipient = User::try_from(recipient_model)?;
                    Self::find_wallet_for_user(&db_tx, recipient.id)
                        .await?
                        .map(|wallet| (recipient, wallet))
                }
                None => None,
            };

            let recipient_entry = match recipient_wallet {
                Some((recipient, recipient_wallet)) => {
                    Self::credit_wallet(&db_tx, recipient_wallet.id, cmd.amount).await?;

                    let entry = LedgerEntry::new(
                        recipient.id,
                        EntryKind::Receive,
                        cmd.amount,
                        Money::ZERO,
                        EntryStatus::Completed,
                        recipient_wallet.currency,
                        cmd.description.clone(),
                    )?
                    .with_counterparty(&sender.name, &sender.phone);
                    transactions::ActiveModel::from(&entry).insert(&db_tx).await?;
                    Some(entry)
                }
                None => None,
            };

            Ok(TransferResult {
                sender_entry,
                recipient_entry,
                sender_balance_minor,
            })
        })
    }
}
