//! TumaPesa ledger engine.
//!
//! All money movement goes through [`Engine`]: wallet debits/credits,
//! transfers between users, mobile-money deposits and admin reversals. The
//! engine owns the database connection and an injected [`PushGateway`];
//! everything above it (HTTP, CLI) is a thin adapter.

pub use beneficiaries::Beneficiary;
pub use commands::{
    DepositInit, NewBeneficiary, NewUser, ReversalOutcome, SendMoneyCmd, SystemStats,
    TransferResult,
};
pub use currency::Currency;
pub use error::EngineError;
pub use fee::transfer_fee;
pub use gateway::{CallbackItem, PushGateway, StkCallback, StkPushRequest, StkPushResponse};
pub use money::Money;
pub use ops::{Engine, EngineBuilder};
pub use password::{hash_password, verify_password};
pub use phone::normalize_phone;
pub use transactions::{EntryKind, EntryStatus, ExternalRef, LedgerEntry};
pub use users::{Role, User};
pub use wallets::Wallet;

mod beneficiaries;
mod commands;
mod currency;
mod error;
mod fee;
mod gateway;
mod money;
mod ops;
mod password;
mod phone;
mod transactions;
mod users;
mod wallets;

type ResultEngine<T> = Result<T, EngineError>;
