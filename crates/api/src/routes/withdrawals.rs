//! Withdrawal lifecycle routes: request intake, admin review, and payout
//! executor callbacks.

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
use nexvest_db::WithdrawalRepository;
use nexvest_db::entities::sea_orm_active_enums::{Chain, WithdrawalStatus};
use nexvest_db::entities::withdrawal_requests;

/// Creates the withdrawal routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/withdrawals", post(create_withdrawal))
        .route("/withdrawals/{id}/approve", post(approve_withdrawal))
        .route("/withdrawals/{id}/reject", post(reject_withdrawal))
        .route("/withdrawals/{id}/processing", post(mark_processing))
        .route("/withdrawals/{id}/sent", post(mark_sent))
        .route("/withdrawals/{id}/failed", post(mark_failed))
        .route("/users/{user_id}/withdrawals", get(list_withdrawals))
}

/// Request body for creating a withdrawal request.
#[derive(Debug, Deserialize)]
pub struct CreateWithdrawalRequest {
    /// Withdrawing user.
    pub owner_id: Uuid,
    /// Amount to withdraw.
    pub amount: Decimal,
    /// Blockchain network.
    pub chain: Chain,
    /// Payout destination address.
    pub destination_address: String,
}

/// Request body for admin review actions.
#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    /// Reviewing admin, recorded in the audit note.
    pub actor: String,
    /// Optional reason, recorded in the audit note.
    pub reason: Option<String>,
}

/// Request body for reporting a sent payout.
#[derive(Debug, Deserialize)]
pub struct SentRequest {
    /// On-chain hash of the payout.
    pub tx_identifier: String,
}

/// Request body for reporting a failed payout.
#[derive(Debug, Deserialize)]
pub struct FailedRequest {
    /// Failure reason, recorded in the audit note.
    pub reason: String,
}

/// Response for a withdrawal request.
#[derive(Debug, Serialize)]
pub struct WithdrawalResponse {
    /// Withdrawal id.
    pub id: Uuid,
    /// Withdrawing user.
    pub owner_id: Uuid,
    /// Requested amount, as a decimal string.
    pub amount: String,
    /// Blockchain network.
    pub chain: &'static str,
    /// Payout destination address.
    pub destination_address: String,
    /// Lifecycle status.
    pub status: &'static str,
    /// Append-only audit trail of review actions.
    pub admin_note: Option<String>,
    /// On-chain hash of the payout, when sent.
    pub payout_tx_identifier: Option<String>,
    /// When the request was resolved, if it has been.
    pub processed_at: Option<String>,
}

fn status_str(status: WithdrawalStatus) -> &'static str {
    match status {
        WithdrawalStatus::Pending => "pending",
        WithdrawalStatus::Approved => "approved",
        WithdrawalStatus::Processing => "processing",
        WithdrawalStatus::Sent => "sent",
        WithdrawalStatus::Failed => "failed",
        WithdrawalStatus::Rejected => "rejected",
    }
}

impl From<withdrawal_requests::Model> for WithdrawalResponse {
    fn from(request: withdrawal_requests::Model) -> Self {
        Self {
            id: request.id,
            owner_id: request.owner_id,
            amount: request.amount.to_string(),
            chain: request.chain.as_str(),
            destination_address: request.destination_address,
            status: status_str(request.status),
            admin_note: request.admin_note,
            payout_tx_identifier: request.payout_tx_identifier,
            processed_at: request.processed_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// POST `/withdrawals` - Create a pending withdrawal request.
async fn create_withdrawal(
    State(state): State<AppState>,
    Json(payload): Json<CreateWithdrawalRequest>,
) -> Result<(StatusCode, Json<WithdrawalResponse>), ApiError> {
    let repo = WithdrawalRepository::new((*state.db).clone());
    let request = repo
        .request(
            payload.owner_id,
            payload.amount,
            payload.chain,
            &payload.destination_address,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(request.into())))
}

/// POST `/withdrawals/{id}/approve` - Approve and debit the owner.
async fn approve_withdrawal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReviewRequest>,
) -> Result<Json<WithdrawalResponse>, ApiError> {
    let repo = WithdrawalRepository::new((*state.db).clone());
    let request = repo.approve(id, &payload.actor).await?;
    Ok(Json(request.into()))
}

/// POST `/withdrawals/{id}/reject` - Reject a pending request.
async fn reject_withdrawal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReviewRequest>,
) -> Result<Json<WithdrawalResponse>, ApiError> {
    let repo = WithdrawalRepository::new((*state.db).clone());
    let request = repo
        .reject(id, &payload.actor, payload.reason.as_deref())
        .await?;
    Ok(Json(request.into()))
}

/// POST `/withdrawals/{id}/processing` - Payout executor claims the payout.
async fn mark_processing(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WithdrawalResponse>, ApiError> {
    let repo = WithdrawalRepository::new((*state.db).clone());
    let request = repo.mark_processing(id).await?;
    Ok(Json(request.into()))
}

/// POST `/withdrawals/{id}/sent` - Payout executor reports success.
async fn mark_sent(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SentRequest>,
) -> Result<Json<WithdrawalResponse>, ApiError> {
    let repo = WithdrawalRepository::new((*state.db).clone());
    let request = repo.mark_sent(id, &payload.tx_identifier).await?;
    Ok(Json(request.into()))
}

/// POST `/withdrawals/{id}/failed` - Payout executor reports failure; the
/// owner is re-credited.
async fn mark_failed(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<FailedRequest>,
) -> Result<Json<WithdrawalResponse>, ApiError> {
    let repo = WithdrawalRepository::new((*state.db).clone());
    let request = repo.mark_failed(id, &payload.reason).await?;
    Ok(Json(request.into()))
}

/// GET `/users/{user_id}/withdrawals` - List a user's withdrawal requests.
async fn list_withdrawals(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<WithdrawalResponse>>, ApiError> {
    let repo = WithdrawalRepository::new((*state.db).clone());
    let rows = repo.list_for(user_id).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}
