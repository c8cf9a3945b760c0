//! Wallet endpoints: balance, mobile-money deposits and the gateway
//! callback.

use api_types::{
    mpesa::{CallbackAck, CallbackEnvelope},
    wallet::{BalanceResponse, DepositInitiated, DepositNew},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState, user, views};
use engine::{CallbackItem, Money, StkCallback};

pub async fn balance(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<BalanceResponse>, ServerError> {
    let wallet = state.engine.wallet_balance(user::user_uuid(&user)?).await?;

    Ok(Json(BalanceResponse {
        balance_minor: wallet.balance_minor,
        currency: views::currency_view(wallet.currency),
    }))
}

pub async fn deposit_new(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<DepositNew>,
) -> Result<(StatusCode, Json<DepositInitiated>), ServerError> {
    let phone = payload.phone.unwrap_or_else(|| user.phone.clone());
    let init = state
        .engine
        .initiate_deposit(
            user::user_uuid(&user)?,
            &phone,
            Money::new(payload.amount_minor),
        )
        .await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(DepositInitiated {
            transaction_id: init.transaction_id,
            checkout_request_id: init.checkout_request_id,
            merchant_request_id: init.merchant_request_id,
            customer_message: init.customer_message,
        }),
    ))
}

pub async fn deposit_status(
    Extension(_user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(checkout_id): Path<String>,
) -> Result<Json<api_types::transaction::TransactionView>, ServerError> {
    let entry = state.engine.deposit_status(&checkout_id).await?;
    Ok(Json(views::transaction_view(entry)))
}

/// Gateway callback sink.
///
/// The provider retries until it sees a zero `ResultCode`, so this endpoint
/// acknowledges every well-formed envelope. Reconciliation failures are
/// logged and swallowed; the engine is idempotent per checkout id and a
/// later retry changes nothing.
pub async fn mpesa_callback(
    State(state): State<ServerState>,
    Json(envelope): Json<CallbackEnvelope>,
) -> Json<CallbackAck> {
    let wire = envelope.body.stk_callback;
    let callback = StkCallback {
        merchant_request_id: wire.merchant_request_id,
        checkout_request_id: wire.checkout_request_id,
        result_code: wire.result_code,
        result_desc: wire.result_desc,
        account_reference: wire.account_reference,
        items: wire
            .callback_metadata
            .map(|metadata| {
                metadata
                    .item
                    .into_iter()
                    .map(|item| CallbackItem {
                        name: item.name,
                        value: item.value,
                    })
                    .collect()
            })
            .unwrap_or_default(),
    };

    match state.engine.handle_deposit_callback(callback).await {
        Ok(Some(entry)) => {
            tracing::info!(transaction = %entry.id, status = ?entry.status, "deposit settled");
        }
        Ok(None) => {
            tracing::debug!("callback ignored: unknown or already settled deposit");
        }
        Err(err) => {
            tracing::error!("deposit callback failed: {err}");
        }
    }

    Json(CallbackAck::accepted())
}
