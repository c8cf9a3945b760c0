use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{run, run_with_listener, spawn_with_listener};

mod admin;
mod beneficiaries;
mod server;
mod transactions;
mod user;
mod views;
mod wallet;

pub mod types {
    pub mod user {
        pub use api_types::user::{SignupNew, SignupResponse, UserRole, UserView};
    }

    pub mod wallet {
        pub use api_types::wallet::{BalanceResponse, DepositInitiated, DepositNew};
    }

    pub mod transaction {
        pub use api_types::transaction::{
            SendMoneyNew, TransactionListResponse, TransactionView, TransferResponse,
        };
    }

    pub mod beneficiary {
        pub use api_types::beneficiary::{BeneficiariesResponse, BeneficiaryNew, BeneficiaryView};
    }

    pub mod admin {
        pub use api_types::admin::{ReversalResponse, RoleUpdate, StatsResponse, UsersResponse};
    }

    pub mod mpesa {
        pub use api_types::mpesa::{CallbackAck, CallbackEnvelope};
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
        EngineError::WalletNotFound(_)
        | EngineError::BeneficiaryNotFound(_)
        | EngineError::TransactionNotFound(_)
        | EngineError::RecipientNotFound(_)
        | EngineError::UserNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::AlreadyExists(_) => StatusCode::CONFLICT,
        EngineError::Gateway(_) => StatusCode::BAD_GATEWAY,
        EngineError::Database(_) | EngineError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InsufficientFunds(_)
        | EngineError::InvalidAmount(_)
        | EngineError::AlreadyReversed(_)
        | EngineError::NotReversible(_)
        | EngineError::MalformedCallback(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        EngineError::Internal(detail) => {
            tracing::error!("internal error: {detail}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_forbidden_maps_to_403() {
        let res = ServerError::from(EngineError::Forbidden("forbidden".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::WalletNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_conflict_maps_to_409() {
        let res = ServerError::from(EngineError::AlreadyExists("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn engine_validation_maps_to_422() {
        for err in [
            EngineError::InsufficientFunds("x".to_string()),
            EngineError::InvalidAmount("x".to_string()),
            EngineError::AlreadyReversed("x".to_string()),
            EngineError::NotReversible("x".to_string()),
        ] {
            let res = ServerError::from(err).into_response();
            assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        }
    }

    #[test]
    fn engine_internal_maps_to_opaque_500() {
        let res = ServerError::from(EngineError::Internal("hash".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn engine_gateway_maps_to_502() {
        let res = ServerError::from(EngineError::Gateway("timeout".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
