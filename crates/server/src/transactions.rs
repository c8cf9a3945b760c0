//! Transfer and ledger endpoints.

use api_types::transaction::{
    SendMoneyNew, TransactionListResponse, TransferResponse,
};
use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::{ServerError, server::ServerState, user, views};
use engine::{Money, SendMoneyCmd};

pub async fn send(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<SendMoneyNew>,
) -> Result<(StatusCode, Json<TransferResponse>), ServerError> {
    let result = state
        .engine
        .send_money(SendMoneyCmd {
            user_id: user::user_uuid(&user)?,
            beneficiary_id: payload.beneficiary_id,
            amount: Money::new(payload.amount_minor),
            description: payload.description,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TransferResponse {
            transaction: views::transaction_view(result.sender_entry),
            recipient_transaction: result.recipient_entry.map(views::transaction_view),
            balance_minor: result.sender_balance_minor,
        }),
    ))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let entries = state
        .engine
        .list_transactions(user::user_uuid(&user)?)
        .await?;

    Ok(Json(TransactionListResponse {
        transactions: entries.into_iter().map(views::transaction_view).collect(),
    }))
}
