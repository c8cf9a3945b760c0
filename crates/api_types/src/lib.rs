//! Request and response bodies shared by the HTTP server and its clients.
//!
//! Everything here is plain serde data. Amounts always travel as integer
//! minor units (`amount_minor`), never as floats.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Kes,
}

pub mod user {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum UserRole {
        User,
        Admin,
        Deactivated,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SignupNew {
        pub name: String,
        pub email: String,
        /// Any dialable form; the server normalizes it.
        pub phone: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: Uuid,
        pub name: String,
        pub email: String,
        pub phone: String,
        pub role: UserRole,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SignupResponse {
        pub user: UserView,
        pub balance_minor: i64,
    }
}

pub mod wallet {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceResponse {
        pub balance_minor: i64,
        pub currency: Currency,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DepositNew {
        pub amount_minor: i64,
        /// Phone to prompt; defaults to the account phone.
        pub phone: Option<String>,
    }

    /// Correlation ids for polling the deposit until the payer confirms.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct DepositInitiated {
        pub transaction_id: Uuid,
        pub checkout_request_id: String,
        pub merchant_request_id: String,
        pub customer_message: Option<String>,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Send,
        Receive,
        Deposit,
        Refund,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionStatus {
        Pending,
        Completed,
        Failed,
        Reversed,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub kind: TransactionKind,
        pub amount_minor: i64,
        pub fee_minor: i64,
        pub status: TransactionStatus,
        pub currency: Currency,
        pub description: Option<String>,
        pub recipient_name: Option<String>,
        pub recipient_phone: Option<String>,
        /// Mobile-money receipt, present on confirmed deposits.
        pub receipt: Option<String>,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SendMoneyNew {
        pub beneficiary_id: Uuid,
        pub amount_minor: i64,
        pub description: Option<String>,
    }

    /// `recipient_transaction` is absent when the beneficiary's phone does
    /// not belong to a registered account.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransferResponse {
        pub transaction: TransactionView,
        pub recipient_transaction: Option<TransactionView>,
        pub balance_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
    }
}

pub mod beneficiary {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BeneficiaryNew {
        pub name: String,
        pub phone: String,
        pub email: Option<String>,
        pub account_number: Option<String>,
        pub bank_name: Option<String>,
        pub relationship: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BeneficiaryView {
        pub id: Uuid,
        pub name: String,
        pub phone: String,
        pub email: Option<String>,
        pub account_number: Option<String>,
        pub bank_name: Option<String>,
        pub relationship: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BeneficiariesResponse {
        pub beneficiaries: Vec<BeneficiaryView>,
    }
}

pub mod admin {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UsersResponse {
        pub users: Vec<user::UserView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RoleUpdate {
        pub role: user::UserRole,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StatsResponse {
        pub total_users: u64,
        pub total_wallets: u64,
        pub total_transactions: u64,
        pub total_balance_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReversalResponse {
        pub transaction: transaction::TransactionView,
        pub refund: transaction::TransactionView,
        pub recipient_transaction_reversed: bool,
    }
}

/// Daraja's STK callback envelope, verbatim wire shape.
///
/// The provider posts `{"Body": {"stkCallback": {...}}}` with PascalCase
/// keys and metadata as a list of `{Name, Value}` pairs.
pub mod mpesa {
    use super::*;
    use serde_json::Value;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CallbackEnvelope {
        #[serde(rename = "Body", default)]
        pub body: CallbackBody,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CallbackBody {
        #[serde(rename = "stkCallback", default)]
        pub stk_callback: StkCallbackWire,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct StkCallbackWire {
        #[serde(rename = "MerchantRequestID")]
        pub merchant_request_id: Option<String>,
        #[serde(rename = "CheckoutRequestID")]
        pub checkout_request_id: Option<String>,
        #[serde(rename = "ResultCode", default)]
        pub result_code: i64,
        #[serde(rename = "ResultDesc")]
        pub result_desc: Option<String>,
        /// Some simulators echo the initiate-time reference here.
        #[serde(rename = "AccountReference")]
        pub account_reference: Option<String>,
        #[serde(rename = "CallbackMetadata")]
        pub callback_metadata: Option<CallbackMetadata>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CallbackMetadata {
        #[serde(rename = "Item", default)]
        pub item: Vec<MetadataItem>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MetadataItem {
        #[serde(rename = "Name")]
        pub name: String,
        #[serde(rename = "Value", default)]
        pub value: Value,
    }

    /// Acknowledgment the provider expects back, regardless of outcome.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CallbackAck {
        #[serde(rename = "ResultCode")]
        pub result_code: i64,
        #[serde(rename = "ResultDesc")]
        pub result_desc: String,
    }

    impl CallbackAck {
        #[must_use]
        pub fn accepted() -> Self {
            Self {
                result_code: 0,
                result_desc: "Accepted".to_string(),
            }
        }
    }
}
