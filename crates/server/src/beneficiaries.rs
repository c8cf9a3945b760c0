//! Saved transfer targets, scoped to the authenticated user.

use api_types::beneficiary::{BeneficiariesResponse, BeneficiaryNew, BeneficiaryView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user, views};
use engine::NewBeneficiary;

pub async fn add(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<BeneficiaryNew>,
) -> Result<(StatusCode, Json<BeneficiaryView>), ServerError> {
    let beneficiary = state
        .engine
        .add_beneficiary(NewBeneficiary {
            user_id: user::user_uuid(&user)?,
            name: payload.name,
            phone: payload.phone,
            email: payload.email,
            account_number: payload.account_number,
            bank_name: payload.bank_name,
            relationship: payload.relationship,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(views::beneficiary_view(beneficiary)),
    ))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<BeneficiariesResponse>, ServerError> {
    let beneficiaries = state
        .engine
        .list_beneficiaries(user::user_uuid(&user)?)
        .await?;

    Ok(Json(BeneficiariesResponse {
        beneficiaries: beneficiaries
            .into_iter()
            .map(views::beneficiary_view)
            .collect(),
    }))
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(beneficiary_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .remove_beneficiary(user::user_uuid(&user)?, beneficiary_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
