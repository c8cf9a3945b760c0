//! Mobile-money gateway seam.
//!
//! The deposit workflow talks to the provider through the [`PushGateway`]
//! trait so the engine never embeds HTTP details: production injects the
//! Daraja client, tests inject a mock. The callback types mirror the
//! provider's STK callback contract (result code 0 means the payer
//! authorized the payment).

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{EngineError, Money};

/// Outbound push-payment request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StkPushRequest {
    /// Payer phone in normalized `2547xxxxxxxx` form.
    pub phone: String,
    pub amount: Money,
    /// Opaque reference echoed back in the callback; the engine sets it to
    /// the depositing user's id.
    pub account_reference: String,
    pub description: String,
}

/// Provider acknowledgment of an accepted push request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StkPushResponse {
    pub merchant_request_id: String,
    pub checkout_request_id: String,
    pub customer_message: Option<String>,
}

/// One `{Name, Value}` pair from the callback metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CallbackItem {
    pub name: String,
    pub value: Value,
}

/// Parsed asynchronous STK callback.
///
/// Delivered at-least-once; the reconciliation logic must treat duplicates
/// as no-ops.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StkCallback {
    pub merchant_request_id: Option<String>,
    pub checkout_request_id: Option<String>,
    pub result_code: i64,
    pub result_desc: Option<String>,
    /// Echo of the reference passed on initiate; used as a lookup fallback
    /// for gateways that omit the checkout id.
    pub account_reference: Option<String>,
    pub items: Vec<CallbackItem>,
}

impl StkCallback {
    fn item(&self, name: &str) -> Option<&Value> {
        self.items
            .iter()
            .find(|item| item.name == name)
            .map(|item| &item.value)
    }

    /// Confirmed amount from the metadata, converted to minor units.
    ///
    /// The provider sends whole shillings, occasionally with a decimal
    /// point, so both integer and float JSON numbers are accepted.
    #[must_use]
    pub fn confirmed_amount(&self) -> Option<Money> {
        let value = self.item("Amount")?;
        if let Some(n) = value.as_i64() {
            return Some(Money::from_major(n));
        }
        value.as_f64().map(|f| Money::new((f * 100.0).round() as i64))
    }

    /// Provider receipt number (`MpesaReceiptNumber`).
    #[must_use]
    pub fn receipt(&self) -> Option<String> {
        match self.item("MpesaReceiptNumber")? {
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Payer phone as confirmed by the provider (`PhoneNumber`).
    #[must_use]
    pub fn payer_phone(&self) -> Option<String> {
        match self.item("PhoneNumber")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Outbound side of the mobile-money integration.
///
/// Implementations must not hold any engine lock: the deposit workflow calls
/// this **before** opening its database transaction.
#[async_trait]
pub trait PushGateway: Send + Sync + fmt::Debug {
    async fn initiate_push(&self, request: StkPushRequest)
    -> Result<StkPushResponse, EngineError>;
}
