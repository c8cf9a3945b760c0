//! Back-office endpoints. Every handler checks the caller's role first.

use api_types::{
    admin::{ReversalResponse, RoleUpdate, StatsResponse, UsersResponse},
    transaction::TransactionListResponse,
    user::UserRole,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user, views};
use engine::EngineError;

fn require_admin(user: &user::Model) -> Result<(), ServerError> {
    if user.role == "admin" {
        Ok(())
    } else {
        Err(ServerError::Engine(EngineError::Forbidden(
            "admin role required".to_string(),
        )))
    }
}

pub async fn list_users(
    Extension(caller): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<UsersResponse>, ServerError> {
    require_admin(&caller)?;

    let users = state.engine.list_users().await?;
    Ok(Json(UsersResponse {
        users: users.into_iter().map(views::user_view).collect(),
    }))
}

/// Promote-to-admin is deliberately out of band (see the admin CLI); the
/// HTTP surface only toggles between `user` and `deactivated`.
pub async fn set_role(
    Extension(caller): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<RoleUpdate>,
) -> Result<Json<api_types::user::UserView>, ServerError> {
    require_admin(&caller)?;

    if payload.role == UserRole::Admin {
        return Err(ServerError::Engine(EngineError::Forbidden(
            "cannot grant admin over HTTP".to_string(),
        )));
    }

    let updated = state
        .engine
        .set_user_role(user_id, views::role_from_view(payload.role))
        .await?;
    Ok(Json(views::user_view(updated)))
}

pub async fn list_transactions(
    Extension(caller): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    require_admin(&caller)?;

    let entries = state.engine.list_all_transactions().await?;
    Ok(Json(TransactionListResponse {
        transactions: entries.into_iter().map(views::transaction_view).collect(),
    }))
}

pub async fn reverse(
    Extension(caller): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(transaction_id): Path<Uuid>,
) -> Result<Json<ReversalResponse>, ServerError> {
    require_admin(&caller)?;

    let outcome = state.engine.reverse_transaction(transaction_id).await?;
    Ok(Json(ReversalResponse {
        transaction: views::transaction_view(outcome.original),
        refund: views::transaction_view(outcome.refund),
        recipient_transaction_reversed: outcome.recipient_entry_reversed,
    }))
}

pub async fn stats(
    Extension(caller): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<StatsResponse>, ServerError> {
    require_admin(&caller)?;

    let stats = state.engine.system_stats().await?;
    Ok(Json(StatsResponse {
        total_users: stats.total_users,
        total_wallets: stats.total_wallets,
        total_transactions: stats.total_transactions,
        total_balance_minor: stats.total_balance_minor,
    }))
}
