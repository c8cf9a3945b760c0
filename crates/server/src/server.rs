use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, patch, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use std::sync::Arc;

use crate::{admin, beneficiaries, transactions, user, wallet};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
}

/// Basic-auth guard: email + password, case-insensitive on the email.
///
/// Deactivated accounts keep their data but every authenticated route
/// rejects them.
async fn auth(
    auth_header: TypedHeader<Authorization<Basic>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let email = auth_header.username().trim().to_ascii_lowercase();
    let found: Option<user::Model> = user::Entity::find()
        .filter(user::Column::Email.eq(email))
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let Some(found) = found else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    if !engine::verify_password(auth_header.password(), &found.password) {
        return Err(StatusCode::UNAUTHORIZED);
    }

    if found.role == "deactivated" {
        return Err(StatusCode::FORBIDDEN);
    }

    request.extensions_mut().insert(found);
    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    let authed = Router::new()
        .route("/wallet/balance", get(wallet::balance))
        .route("/wallet/deposit", post(wallet::deposit_new))
        .route(
            "/wallet/deposit/{checkout_id}",
            get(wallet::deposit_status),
        )
        .route("/transfers", post(transactions::send))
        .route("/transactions", get(transactions::list))
        .route(
            "/beneficiaries",
            get(beneficiaries::list).post(beneficiaries::add),
        )
        .route("/beneficiaries/{id}", delete(beneficiaries::remove))
        .route("/admin/users", get(admin::list_users))
        .route("/admin/users/{id}/role", patch(admin::set_role))
        .route("/admin/transactions", get(admin::list_transactions))
        .route(
            "/admin/transactions/{id}/reverse",
            post(admin::reverse),
        )
        .route("/admin/stats", get(admin::stats))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth));

    // Signup and the gateway callback carry no credentials.
    Router::new()
        .route("/signup", post(user::signup))
        .route("/mpesa/callback", post(wallet::mpesa_callback))
        .merge(authed)
        .with_state(state)
}

pub async fn run(engine: Engine, db: DatabaseConnection) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, db, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        db,
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, db, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
    use engine::{EngineError, PushGateway, StkPushRequest, StkPushResponse};
    use http_body_util::BodyExt;
    use migration::MigratorTrait;
    use sea_orm::{ConnectionTrait, Database, Statement};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    #[derive(Debug)]
    struct StubGateway;

    #[async_trait]
    impl PushGateway for StubGateway {
        async fn initiate_push(
            &self,
            _request: StkPushRequest,
        ) -> Result<StkPushResponse, EngineError> {
            Ok(StkPushResponse {
                merchant_request_id: "mr-1".to_string(),
                checkout_request_id: "ws_CO_1".to_string(),
                customer_message: Some("Success. Request accepted".to_string()),
            })
        }
    }

    async fn test_router() -> (Router, DatabaseConnection) {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("connect in-memory db");
        migration::Migrator::up(&db, None).await.expect("migrate");
        let engine = Engine::builder()
            .database(db.clone())
            .gateway(Arc::new(StubGateway))
            .build()
            .await
            .expect("build engine");
        let state = ServerState {
            engine: Arc::new(engine),
            db: db.clone(),
        };
        (router(state), db)
    }

    fn basic_auth(email: &str, password: &str) -> String {
        format!("Basic {}", BASE64.encode(format!("{email}:{password}")))
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.expect("body").to_bytes();
        serde_json::from_slice(&bytes).expect("json body")
    }

    async fn signup(router: &Router, name: &str, email: &str, phone: &str) -> Value {
        let response = router
            .clone()
            .oneshot(json_request(
                "POST",
                "/signup",
                json!({
                    "name": name,
                    "email": email,
                    "phone": phone,
                    "password": "s3cret",
                }),
            ))
            .await
            .expect("signup response");
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await
    }

    async fn fund_wallet(db: &DatabaseConnection, user_id: &str, balance_minor: i64) {
        db.execute(Statement::from_sql_and_values(
            db.get_database_backend(),
            "UPDATE wallets SET balance_minor = ? WHERE user_id = ?",
            [balance_minor.into(), user_id.into()],
        ))
        .await
        .expect("fund wallet");
    }

    #[tokio::test]
    async fn signup_then_balance_is_zero() {
        let (router, _db) = test_router().await;
        signup(&router, "Amina", "amina@example.com", "0712345678").await;

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/wallet/balance")
                    .header(
                        header::AUTHORIZATION,
                        basic_auth("amina@example.com", "s3cret"),
                    )
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["balance_minor"], 0);
        assert_eq!(body["currency"], "KES");
    }

    #[tokio::test]
    async fn signup_stores_a_password_hash() {
        let (router, db) = test_router().await;
        signup(&router, "Amina", "amina@example.com", "0712345678").await;

        let row = db
            .query_one(Statement::from_sql_and_values(
                db.get_database_backend(),
                "SELECT password FROM users WHERE email = ?",
                ["amina@example.com".into()],
            ))
            .await
            .expect("query")
            .expect("user row");
        let stored: String = row.try_get("", "password").expect("password column");
        assert_ne!(stored, "s3cret");
        assert!(stored.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn wrong_credentials_are_rejected() {
        let (router, _db) = test_router().await;
        signup(&router, "Amina", "amina@example.com", "0712345678").await;

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/wallet/balance")
                    .header(
                        header::AUTHORIZATION,
                        basic_auth("amina@example.com", "wrong"),
                    )
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn duplicate_signup_conflicts() {
        let (router, _db) = test_router().await;
        signup(&router, "Amina", "amina@example.com", "0712345678").await;

        let response = router
            .clone()
            .oneshot(json_request(
                "POST",
                "/signup",
                json!({
                    "name": "Amina again",
                    "email": "amina@example.com",
                    "phone": "0798765432",
                    "password": "s3cret",
                }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn transfer_debits_amount_plus_fee() {
        let (router, db) = test_router().await;
        let sender = signup(&router, "Amina", "amina@example.com", "0712345678").await;
        signup(&router, "Brian", "brian@example.com", "0798765432").await;
        fund_wallet(&db, sender["user"]["id"].as_str().expect("id"), 100_000).await;

        let auth = basic_auth("amina@example.com", "s3cret");
        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/beneficiaries")
                    .header(header::AUTHORIZATION, &auth)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({"name": "Brian", "phone": "0798765432"}).to_string(),
                    ))
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::CREATED);
        let beneficiary = body_json(response).await;

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/transfers")
                    .header(header::AUTHORIZATION, &auth)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({
                            "beneficiary_id": beneficiary["id"],
                            "amount_minor": 50_000,
                            "description": "rent",
                        })
                        .to_string(),
                    ))
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        // 500.00 sent, 1% fee of 5.00, from a 1000.00 balance.
        assert_eq!(body["transaction"]["fee_minor"], 500);
        assert_eq!(body["balance_minor"], 49_500);
        assert_eq!(
            body["recipient_transaction"]["amount_minor"],
            50_000
        );
    }

    #[tokio::test]
    async fn insufficient_funds_is_unprocessable() {
        let (router, _db) = test_router().await;
        signup(&router, "Amina", "amina@example.com", "0712345678").await;

        let auth = basic_auth("amina@example.com", "s3cret");
        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/beneficiaries")
                    .header(header::AUTHORIZATION, &auth)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({"name": "Brian", "phone": "0798765432"}).to_string(),
                    ))
                    .expect("request"),
            )
            .await
            .expect("response");
        let beneficiary = body_json(response).await;

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/transfers")
                    .header(header::AUTHORIZATION, &auth)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({"beneficiary_id": beneficiary["id"], "amount_minor": 50_000})
                            .to_string(),
                    ))
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn deposit_callback_credits_wallet_and_acks() {
        let (router, _db) = test_router().await;
        signup(&router, "Amina", "amina@example.com", "0712345678").await;
        let auth = basic_auth("amina@example.com", "s3cret");

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/wallet/deposit")
                    .header(header::AUTHORIZATION, &auth)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json!({"amount_minor": 20_000}).to_string()))
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let init = body_json(response).await;
        assert_eq!(init["checkout_request_id"], "ws_CO_1");

        let response = router
            .clone()
            .oneshot(json_request(
                "POST",
                "/mpesa/callback",
                json!({
                    "Body": {
                        "stkCallback": {
                            "MerchantRequestID": "mr-1",
                            "CheckoutRequestID": "ws_CO_1",
                            "ResultCode": 0,
                            "ResultDesc": "The service request is processed successfully.",
                            "CallbackMetadata": {
                                "Item": [
                                    {"Name": "Amount", "Value": 200},
                                    {"Name": "MpesaReceiptNumber", "Value": "QK12XYZ"},
                                    {"Name": "PhoneNumber", "Value": 254712345678u64},
                                ]
                            }
                        }
                    }
                }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let ack = body_json(response).await;
        assert_eq!(ack["ResultCode"], 0);

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/wallet/balance")
                    .header(header::AUTHORIZATION, &auth)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        let body = body_json(response).await;
        assert_eq!(body["balance_minor"], 20_000);
    }

    #[tokio::test]
    async fn callback_for_unknown_checkout_still_acks() {
        let (router, _db) = test_router().await;

        let response = router
            .clone()
            .oneshot(json_request(
                "POST",
                "/mpesa/callback",
                json!({
                    "Body": {
                        "stkCallback": {
                            "CheckoutRequestID": "ws_CO_unknown",
                            "ResultCode": 0,
                        }
                    }
                }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let ack = body_json(response).await;
        assert_eq!(ack["ResultCode"], 0);
    }

    #[tokio::test]
    async fn admin_routes_reject_regular_users() {
        let (router, _db) = test_router().await;
        signup(&router, "Amina", "amina@example.com", "0712345678").await;

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/admin/stats")
                    .header(
                        header::AUTHORIZATION,
                        basic_auth("amina@example.com", "s3cret"),
                    )
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
