//! Ledger entry primitives.
//!
//! A `LedgerEntry` is one row of a user's self-contained ledger. A single
//! logical transfer to a registered recipient produces **two** entries (the
//! sender's `send` and the recipient's `receive`), each owned by its user, so
//! either ledger can be read without joins.
//!
//! Entries are append-only: after creation only the `status` column (plus the
//! mobile-money receipt on deposit completion) is ever mutated, and only
//! along the allowed transitions `pending -> completed | failed` and
//! `completed -> reversed`.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Currency, EngineError, Money, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Send,
    Receive,
    Deposit,
    Refund,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Send => "send",
            Self::Receive => "receive",
            Self::Deposit => "deposit",
            Self::Refund => "refund",
        }
    }
}

impl TryFrom<&str> for EntryKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "send" => Ok(Self::Send),
            "receive" => Ok(Self::Receive),
            "deposit" => Ok(Self::Deposit),
            "refund" => Ok(Self::Refund),
            other => Err(EngineError::TransactionNotFound(format!(
                "invalid entry kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    Pending,
    Completed,
    Failed,
    Reversed,
}

impl EntryStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Reversed => "reversed",
        }
    }
}

impl TryFrom<&str> for EntryStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "reversed" => Ok(Self::Reversed),
            other => Err(EngineError::TransactionNotFound(format!(
                "invalid entry status: {other}"
            ))),
        }
    }
}

/// Mobile-money correlation identifiers attached to a deposit entry.
///
/// Modeled as one optional struct instead of four independently nullable
/// fields: an entry either references an external payment or it does not.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalRef {
    pub checkout_request_id: String,
    pub merchant_request_id: Option<String>,
    pub receipt: Option<String>,
    /// Payer phone as confirmed by the provider.
    pub phone: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: EntryKind,
    pub amount_minor: i64,
    pub fee_minor: i64,
    pub status: EntryStatus,
    pub currency: Currency,
    pub description: Option<String>,
    /// Counterparty as seen from this ledger: the beneficiary for a `send`,
    /// the sender for a `receive`.
    pub recipient_name: Option<String>,
    pub recipient_phone: Option<String>,
    pub external: Option<ExternalRef>,
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: Uuid,
        kind: EntryKind,
        amount: Money,
        fee: Money,
        status: EntryStatus,
        currency: Currency,
        description: Option<String>,
    ) -> ResultEngine<Self> {
        if !amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }
        if fee.is_negative() {
            return Err(EngineError::InvalidAmount(
                "fee_minor must be >= 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            kind,
            amount_minor: amount.minor(),
            fee_minor: fee.minor(),
            status,
            currency,
            description,
            recipient_name: None,
            recipient_phone: None,
            external: None,
            created_at: Utc::now(),
        })
    }

    pub fn with_counterparty(mut self, name: &str, phone: &str) -> Self {
        self.recipient_name = Some(name.to_string());
        self.recipient_phone = Some(phone.to_string());
        self
    }

    pub fn with_external(mut self, external: ExternalRef) -> Self {
        self.external = Some(external);
        self
    }

    /// Amount as a typed value.
    #[must_use]
    pub fn amount(&self) -> Money {
        Money::new(self.amount_minor)
    }

    /// Fee as a typed value.
    #[must_use]
    pub fn fee(&self) -> Money {
        Money::new(self.fee_minor)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub kind: String,
    pub amount_minor: i64,
    pub fee_minor: i64,
    pub status: String,
    pub currency: String,
    pub description: Option<String>,
    pub recipient_name: Option<String>,
    pub recipient_phone: Option<String>,
    pub checkout_request_id: Option<String>,
    pub merchant_request_id: Option<String>,
    pub mpesa_receipt: Option<String>,
    pub payer_phone: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&LedgerEntry> for ActiveModel {
    fn from(entry: &LedgerEntry) -> Self {
        let external = entry.external.as_ref();
        Self {
            id: ActiveValue::Set(entry.id.to_string()),
            user_id: ActiveValue::Set(entry.user_id.to_string()),
            kind: ActiveValue::Set(entry.kind.as_str().to_string()),
            amount_minor: ActiveValue::Set(entry.amount_minor),
            fee_minor: ActiveValue::Set(entry.fee_minor),
            status: ActiveValue::Set(entry.status.as_str().to_string()),
            currency: ActiveValue::Set(entry.currency.code().to_string()),
            description: ActiveValue::Set(entry.description.clone()),
            recipient_name: ActiveValue::Set(entry.recipient_name.clone()),
            recipient_phone: ActiveValue::Set(entry.recipient_phone.clone()),
            checkout_request_id: ActiveValue::Set(
                external.map(|e| e.checkout_request_id.clone()),
            ),
            merchant_request_id: ActiveValue::Set(
                external.and_then(|e| e.merchant_request_id.clone()),
            ),
            mpesa_receipt: ActiveValue::Set(external.and_then(|e| e.receipt.clone())),
            payer_phone: ActiveValue::Set(external.and_then(|e| e.phone.clone())),
            created_at: ActiveValue::Set(entry.created_at),
        }
    }
}

impl TryFrom<Model> for LedgerEntry {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let external = model
            .checkout_request_id
            .map(|checkout_request_id| ExternalRef {
                checkout_request_id,
                merchant_request_id: model.merchant_request_id,
                receipt: model.mpesa_receipt,
                phone: model.payer_phone,
            });
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::TransactionNotFound("invalid entry id".to_string()))?,
            user_id: Uuid::parse_str(&model.user_id)
                .map_err(|_| EngineError::TransactionNotFound("invalid entry owner".to_string()))?,
            kind: EntryKind::try_from(model.kind.as_str())?,
            amount_minor: model.amount_minor,
            fee_minor: model.fee_minor,
            status: EntryStatus::try_from(model.status.as_str())?,
            currency: Currency::try_from(model.currency.as_str()).unwrap_or_default(),
            description: model.description,
            recipient_name: model.recipient_name,
            recipient_phone: model.recipient_phone,
            external,
            created_at: model.created_at,
        })
    }
}
