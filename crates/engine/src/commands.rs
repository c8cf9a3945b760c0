//! Command and result types for the engine's public operations.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{LedgerEntry, Money, Role};

/// Input for [`crate::Engine::create_user`].
#[derive(Clone, Debug)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    /// Any dialable form; stored normalized.
    pub phone: String,
    pub password: String,
    pub role: Role,
}

/// Input for [`crate::Engine::add_beneficiary`].
#[derive(Clone, Debug)]
pub struct NewBeneficiary {
    pub user_id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub account_number: Option<String>,
    pub bank_name: Option<String>,
    pub relationship: Option<String>,
}

/// Input for [`crate::Engine::send_money`].
#[derive(Clone, Debug)]
pub struct SendMoneyCmd {
    pub user_id: Uuid,
    pub beneficiary_id: Uuid,
    pub amount: Money,
    pub description: Option<String>,
}

/// Outcome of a transfer.
///
/// `recipient_entry` is `None` when the beneficiary's phone does not belong
/// to a registered user: the money left the ledger and only the sender's
/// `send` entry exists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferResult {
    pub sender_entry: LedgerEntry,
    pub recipient_entry: Option<LedgerEntry>,
    /// Sender balance after debiting amount + fee, in minor units.
    pub sender_balance_minor: i64,
}

/// Correlation identifiers returned by [`crate::Engine::initiate_deposit`]
/// for client-side polling.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositInit {
    pub transaction_id: Uuid,
    pub checkout_request_id: String,
    pub merchant_request_id: String,
    pub customer_message: Option<String>,
}

/// Outcome of [`crate::Engine::reverse_transaction`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReversalOutcome {
    /// The original `send` entry, now `reversed`.
    pub original: LedgerEntry,
    /// Audit-trail `refund` entry appended to the sender's ledger.
    pub refund: LedgerEntry,
    /// Whether a matching recipient `receive` entry was found and reversed.
    pub recipient_entry_reversed: bool,
}

/// Aggregates for the admin dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemStats {
    pub total_users: u64,
    pub total_wallets: u64,
    pub total_transactions: u64,
    pub total_balance_minor: i64,
}
