//! Safaricom Daraja STK Push client.
//!
//! Implements the engine's [`PushGateway`] seam: OAuth client-credentials
//! token fetch, then `stkpush/v1/processrequest` against the sandbox or
//! production API. The engine never sees any of this; it only observes the
//! correlation ids coming back.

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use chrono::Local;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use engine::{EngineError, PushGateway, StkPushRequest, StkPushResponse};

#[derive(Error, Debug)]
pub enum MpesaError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("gateway rejected the request: {code} {description}")]
    Rejected { code: String, description: String },
    #[error("gateway response missing {0}")]
    MissingField(&'static str),
}

impl From<MpesaError> for EngineError {
    fn from(err: MpesaError) -> Self {
        EngineError::Gateway(err.to_string())
    }
}

/// Which Daraja deployment to talk to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MpesaEnvironment {
    #[default]
    Sandbox,
    Production,
}

impl MpesaEnvironment {
    fn base_url(self) -> &'static str {
        match self {
            Self::Sandbox => "https://sandbox.safaricom.co.ke",
            Self::Production => "https://api.safaricom.co.ke",
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct MpesaConfig {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub shortcode: String,
    pub passkey: String,
    pub callback_url: String,
    #[serde(default)]
    pub environment: MpesaEnvironment,
}

pub struct MpesaClient {
    config: MpesaConfig,
    http: reqwest::Client,
}

// Credentials stay out of logs.
impl std::fmt::Debug for MpesaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MpesaClient")
            .field("shortcode", &self.config.shortcode)
            .field("environment", &self.config.environment)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PushResponse {
    #[serde(rename = "MerchantRequestID")]
    merchant_request_id: Option<String>,
    #[serde(rename = "CheckoutRequestID")]
    checkout_request_id: Option<String>,
    response_code: Option<String>,
    response_description: Option<String>,
    customer_message: Option<String>,
}

impl MpesaClient {
    #[must_use]
    pub fn new(config: MpesaConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.environment.base_url())
    }

    /// `base64(shortcode + passkey + timestamp)`, as Daraja requires.
    fn password(shortcode: &str, passkey: &str, timestamp: &str) -> String {
        BASE64.encode(format!("{shortcode}{passkey}{timestamp}"))
    }

    fn timestamp() -> String {
        Local::now().format("%Y%m%d%H%M%S").to_string()
    }

    async fn access_token(&self) -> Result<String, MpesaError> {
        let response: TokenResponse = self
            .http
            .get(self.url("/oauth/v1/generate?grant_type=client_credentials"))
            .basic_auth(&self.config.consumer_key, Some(&self.config.consumer_secret))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response.access_token)
    }

    async fn stk_push(&self, request: &StkPushRequest) -> Result<StkPushResponse, MpesaError> {
        let timestamp = Self::timestamp();
        let password = Self::password(&self.config.shortcode, &self.config.passkey, &timestamp);
        let token = self.access_token().await?;

        // Daraja only accepts whole shillings.
        let payload = json!({
            "BusinessShortCode": self.config.shortcode,
            "Password": password,
            "Timestamp": timestamp,
            "TransactionType": "CustomerPayBillOnline",
            "Amount": request.amount.major_trunc(),
            "PartyA": request.phone,
            "PartyB": self.config.shortcode,
            "PhoneNumber": request.phone,
            "CallBackURL": self.config.callback_url,
            "AccountReference": request.account_reference,
            "TransactionDesc": request.description,
        });

        let response: PushResponse = self
            .http
            .post(self.url("/mpesa/stkpush/v1/processrequest"))
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(code) = response.response_code.as_deref()
            && code != "0"
        {
            return Err(MpesaError::Rejected {
                code: code.to_string(),
                description: response.response_description.unwrap_or_default(),
            });
        }

        Ok(StkPushResponse {
            merchant_request_id: response
                .merchant_request_id
                .ok_or(MpesaError::MissingField("MerchantRequestID"))?,
            checkout_request_id: response
                .checkout_request_id
                .ok_or(MpesaError::MissingField("CheckoutRequestID"))?,
            customer_message: response.customer_message,
        })
    }
}

#[async_trait]
impl PushGateway for MpesaClient {
    async fn initiate_push(
        &self,
        request: StkPushRequest,
    ) -> Result<StkPushResponse, EngineError> {
        tracing::debug!(
            phone = %request.phone,
            amount = %request.amount,
            "initiating STK push"
        );
        let response = self.stk_push(&request).await.map_err(|err| {
            tracing::warn!("STK push failed: {err}");
            EngineError::from(err)
        })?;
        Ok(response)
    }
}
