//! Accounts: the server-side `users` entity and the signup endpoint.

use api_types::user::{SignupNew, SignupResponse};
use axum::{Json, extract::State, http::StatusCode};
use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::{ServerError, server::ServerState, views};
use engine::{NewUser, Role};

/// Read-only mirror of the engine's `users` table, used by the auth
/// middleware and carried through requests as an extension.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub role: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Authenticated user id as a typed UUID.
pub fn user_uuid(user: &Model) -> Result<Uuid, ServerError> {
    Uuid::parse_str(&user.id)
        .map_err(|_| ServerError::Generic("malformed user id".to_string()))
}

pub async fn signup(
    State(state): State<ServerState>,
    Json(payload): Json<SignupNew>,
) -> Result<(StatusCode, Json<SignupResponse>), ServerError> {
    if payload.password.trim().is_empty() {
        return Err(ServerError::Generic(
            "password must not be empty".to_string(),
        ));
    }

    let user = state
        .engine
        .create_user(NewUser {
            name: payload.name,
            email: payload.email,
            phone: payload.phone,
            password: payload.password,
            role: Role::User,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            user: views::user_view(user),
            balance_minor: 0,
        }),
    ))
}
