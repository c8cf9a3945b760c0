//! Engine domain types rendered as wire views.

use api_types::{
    Currency as ApiCurrency,
    beneficiary::BeneficiaryView,
    transaction::{TransactionKind, TransactionStatus, TransactionView},
    user::{UserRole, UserView},
};
use engine::{Beneficiary, Currency, EntryKind, EntryStatus, LedgerEntry, Role, User};

pub fn role_view(role: Role) -> UserRole {
    match role {
        Role::User => UserRole::User,
        Role::Admin => UserRole::Admin,
        Role::Deactivated => UserRole::Deactivated,
    }
}

pub fn role_from_view(role: UserRole) -> Role {
    match role {
        UserRole::User => Role::User,
        UserRole::Admin => Role::Admin,
        UserRole::Deactivated => Role::Deactivated,
    }
}

pub fn currency_view(currency: Currency) -> ApiCurrency {
    match currency {
        Currency::Kes => ApiCurrency::Kes,
    }
}

pub fn user_view(user: User) -> UserView {
    UserView {
        id: user.id,
        name: user.name,
        email: user.email,
        phone: user.phone,
        role: role_view(user.role),
        created_at: user.created_at,
    }
}

pub fn transaction_view(entry: LedgerEntry) -> TransactionView {
    TransactionView {
        id: entry.id,
        kind: match entry.kind {
            EntryKind::Send => TransactionKind::Send,
            EntryKind::Receive => TransactionKind::Receive,
            EntryKind::Deposit => TransactionKind::Deposit,
            EntryKind::Refund => TransactionKind::Refund,
        },
        amount_minor: entry.amount_minor,
        fee_minor: entry.fee_minor,
        status: match entry.status {
            EntryStatus::Pending => TransactionStatus::Pending,
            EntryStatus::Completed => TransactionStatus::Completed,
            EntryStatus::Failed => TransactionStatus::Failed,
            EntryStatus::Reversed => TransactionStatus::Reversed,
        },
        currency: currency_view(entry.currency),
        description: entry.description,
        recipient_name: entry.recipient_name,
        recipient_phone: entry.recipient_phone,
        receipt: entry.external.and_then(|external| external.receipt),
        created_at: entry.created_at,
    }
}

pub fn beneficiary_view(beneficiary: Beneficiary) -> BeneficiaryView {
    BeneficiaryView {
        id: beneficiary.id,
        name: beneficiary.name,
        phone: beneficiary.phone,
        email: beneficiary.email,
        account_number: beneficiary.account_number,
        bank_name: beneficiary.bank_name,
        relationship: beneficiary.relationship,
    }
}
