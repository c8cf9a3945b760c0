//! The module contains the errors the engine can throw.
//!
//! Every business-rule failure gets its own variant so the server layer can
//! map it to a precise status code and tests can assert on it. `Database`
//! wraps any storage fault and is never shown verbatim to callers.

use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("wallet not found: {0}")]
    WalletNotFound(String),
    #[error("beneficiary not found: {0}")]
    BeneficiaryNotFound(String),
    #[error("transaction not found: {0}")]
    TransactionNotFound(String),
    #[error("recipient not found: {0}")]
    RecipientNotFound(String),
    #[error("user not found: {0}")]
    UserNotFound(String),
    #[error("insufficient funds: {0}")]
    InsufficientFunds(String),
    #[error("transaction already reversed: {0}")]
    AlreadyReversed(String),
    #[error("transaction not reversible: {0}")]
    NotReversible(String),
    #[error("\"{0}\" already present!")]
    AlreadyExists(String),
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("mobile-money gateway error: {0}")]
    Gateway(String),
    #[error("malformed callback: {0}")]
    MalformedCallback(String),
    #[error("internal error: {0}")]
    Internal(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::WalletNotFound(a), Self::WalletNotFound(b)) => a == b,
            (Self::BeneficiaryNotFound(a), Self::BeneficiaryNotFound(b)) => a == b,
            (Self::TransactionNotFound(a), Self::TransactionNotFound(b)) => a == b,
            (Self::RecipientNotFound(a), Self::RecipientNotFound(b)) => a == b,
            (Self::UserNotFound(a), Self::UserNotFound(b)) => a == b,
            (Self::InsufficientFunds(a), Self::InsufficientFunds(b)) => a == b,
            (Self::AlreadyReversed(a), Self::AlreadyReversed(b)) => a == b,
            (Self::NotReversible(a), Self::NotReversible(b)) => a == b,
            (Self::AlreadyExists(a), Self::AlreadyExists(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::Gateway(a), Self::Gateway(b)) => a == b,
            (Self::MalformedCallback(a), Self::MalformedCallback(b)) => a == b,
            (Self::Internal(a), Self::Internal(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
