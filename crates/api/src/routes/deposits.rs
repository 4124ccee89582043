//! Deposit lifecycle routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, error::ApiError};
use nexvest_db::DepositRepository;
use nexvest_db::entities::deposits;
use nexvest_db::entities::sea_orm_active_enums::{Chain, DepositStatus};

/// Creates the deposit routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/deposits", post(record_deposit))
        .route("/deposits/{id}/confirm", post(confirm_deposit))
        .route("/deposits/{id}/reject", post(reject_deposit))
        .route("/users/{user_id}/deposits", get(list_deposits))
}

/// Request body for recording a deposit intent.
#[derive(Debug, Deserialize)]
pub struct RecordDepositRequest {
    /// Depositing user.
    pub owner_id: Uuid,
    /// Blockchain network.
    pub chain: Chain,
    /// On-chain transaction hash (idempotency key).
    pub tx_identifier: String,
    /// Deposited amount.
    pub amount: Decimal,
}

/// Request body for confirming a deposit.
#[derive(Debug, Deserialize)]
pub struct ConfirmDepositRequest {
    /// Confirmations observed on chain.
    pub confirmations: i32,
}

/// Request body for rejecting a deposit.
#[derive(Debug, Deserialize, Default)]
pub struct RejectDepositRequest {
    /// Optional rejection reason.
    pub reason: Option<String>,
}

/// Response for a deposit.
#[derive(Debug, Serialize)]
pub struct DepositResponse {
    /// Deposit id.
    pub id: Uuid,
    /// Depositing user.
    pub owner_id: Uuid,
    /// Deposited amount, as a decimal string.
    pub amount: String,
    /// Blockchain network.
    pub chain: &'static str,
    /// On-chain transaction hash.
    pub tx_identifier: String,
    /// Lifecycle status.
    pub status: &'static str,
    /// Confirmations recorded at confirm time.
    pub confirmations: i32,
    /// Whether the owner has been credited.
    pub credited: bool,
}

impl From<deposits::Model> for DepositResponse {
    fn from(deposit: deposits::Model) -> Self {
        Self {
            id: deposit.id,
            owner_id: deposit.owner_id,
            amount: deposit.amount.to_string(),
            chain: deposit.chain.as_str(),
            tx_identifier: deposit.tx_identifier,
            status: match deposit.status {
                DepositStatus::Pending => "pending",
                DepositStatus::Confirmed => "confirmed",
                DepositStatus::Rejected => "rejected",
            },
            confirmations: deposit.confirmations,
            credited: deposit.credited,
        }
    }
}

/// POST `/deposits` - Record a deposit intent, idempotent by tx hash.
async fn record_deposit(
    State(state): State<AppState>,
    Json(payload): Json<RecordDepositRequest>,
) -> Result<(StatusCode, Json<DepositResponse>), ApiError> {
    let repo = DepositRepository::new((*state.db).clone());
    let deposit = repo
        .record(
            payload.owner_id,
            payload.chain,
            &payload.tx_identifier,
            payload.amount,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(deposit.into())))
}

/// POST `/deposits/{id}/confirm` - Confirm a pending deposit.
async fn confirm_deposit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ConfirmDepositRequest>,
) -> Result<Json<DepositResponse>, ApiError> {
    let repo = DepositRepository::new((*state.db).clone());
    let deposit = repo.confirm(id, payload.confirmations).await?;
    Ok(Json(deposit.into()))
}

/// POST `/deposits/{id}/reject` - Reject a pending deposit.
async fn reject_deposit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RejectDepositRequest>,
) -> Result<Json<DepositResponse>, ApiError> {
    let repo = DepositRepository::new((*state.db).clone());
    let deposit = repo.reject(id, payload.reason).await?;
    Ok(Json(deposit.into()))
}

/// GET `/users/{user_id}/deposits` - List a user's deposits.
async fn list_deposits(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<DepositResponse>>, ApiError> {
    let repo = DepositRepository::new((*state.db).clone());
    let rows = repo.list_for(user_id).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}
