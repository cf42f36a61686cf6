// REST API with Axum
//
// Thin adapters: validate request shape, call the store or the transaction
// service, and translate results/errors into HTTP responses.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::account::Account;
use crate::db::SqliteAccountStore;
use crate::error::StoreError;
use crate::request::{AccountRequest, FieldErrors, TransactionRequest};
use crate::service::{TransactionOutcome, TransactionService};
use crate::store::AccountStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub transactions: Arc<TransactionService>,
}

impl AppState {
    pub fn new(conn: Connection, transactions: TransactionService) -> Self {
        AppState {
            db: Arc::new(Mutex::new(conn)),
            transactions: Arc::new(transactions),
        }
    }

    fn lock_db(&self) -> Result<MutexGuard<'_, Connection>, ApiError> {
        self.db
            .lock()
            .map_err(|_| ApiError::Internal(StoreError::LockPoisoned.to_string()))
    }
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    #[error("malformed request body: {0}")]
    MalformedBody(String),

    #[error("account not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("An unexpected error occurred: {0}")]
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateAccountNumber(_) => ApiError::Conflict(err.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedBody(rejection.body_text())
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError::Validation(errors)
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => (StatusCode::BAD_REQUEST, Json(errors)).into_response(),
            ApiError::MalformedBody(message) => {
                (StatusCode::BAD_REQUEST, Json(serde_json::json!({ "body": message }))).into_response()
            }
            ApiError::NotFound(_) => {
                (StatusCode::NOT_FOUND, Json(ErrorResponse { error: self.to_string() })).into_response()
            }
            ApiError::Conflict(_) => {
                (StatusCode::CONFLICT, Json(ErrorResponse { error: self.to_string() })).into_response()
            }
            ApiError::Internal(_) => {
                error!(error = %self, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse { error: self.to_string() }),
                )
                    .into_response()
            }
        }
    }
}

// ============================================================================
// RESPONSES
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: i64,
    pub account_number: String,
    pub account_type: String,
    pub balance: Decimal,
    pub owner_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            account_number: account.account_number,
            account_type: account.account_type,
            balance: account.balance,
            owner_name: account.owner_name,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// POST /api/accounts - Create an account
async fn create_account(
    State(state): State<AppState>,
    payload: Result<Json<AccountRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AccountResponse>), ApiError> {
    let Json(request) = payload?;
    let new_account = request.validate()?;

    let conn = state.lock_db()?;
    let account = SqliteAccountStore::new(&conn).create(&new_account)?;

    info!(account_number = %account.account_number, id = account.id, "account created");

    Ok((StatusCode::CREATED, Json(account.into())))
}

/// GET /api/accounts - List all accounts
async fn list_accounts(State(state): State<AppState>) -> Result<Json<Vec<AccountResponse>>, ApiError> {
    let conn = state.lock_db()?;
    let accounts = SqliteAccountStore::new(&conn).find_all()?;

    Ok(Json(accounts.into_iter().map(AccountResponse::from).collect()))
}

/// GET /api/accounts/:account_number - Get one account
async fn get_account(
    State(state): State<AppState>,
    Path(account_number): Path<String>,
) -> Result<Json<AccountResponse>, ApiError> {
    let conn = state.lock_db()?;

    SqliteAccountStore::new(&conn)
        .find_by_number(&account_number)?
        .map(|account| Json(AccountResponse::from(account)))
        .ok_or(ApiError::NotFound(account_number))
}

/// POST /api/transactions - Process a deposit/withdrawal/...
///
/// Domain failures are 200 with status FAILED in the body.
async fn process_transaction(
    State(state): State<AppState>,
    payload: Result<Json<TransactionRequest>, JsonRejection>,
) -> Result<Json<TransactionOutcome>, ApiError> {
    let Json(request) = payload?;
    let intent = request.validate()?;

    let mut conn = state.lock_db()?;
    let outcome = state.transactions.process_transaction(&mut conn, &intent)?;

    Ok(Json(outcome))
}

/// GET /api/transactions/types - Registered transaction types
async fn transaction_types(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.transactions.transaction_types())
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/accounts", post(create_account).get(list_accounts))
        .route("/accounts/:account_number", get(get_account))
        .route("/transactions", post(process_transaction))
        .route("/transactions/types", get(transaction_types))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
