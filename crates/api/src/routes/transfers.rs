//! Peer-to-peer transfer route.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::post,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, error::ApiError};
use nexvest_db::BalanceRepository;

/// Creates the transfer routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/transfers", post(create_transfer))
}

/// Request body for a transfer.
#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    /// Sending user.
    pub sender_id: Uuid,
    /// Receiving user.
    pub recipient_id: Uuid,
    /// Amount to move.
    pub amount: Decimal,
    /// Optional free-text note.
    pub note: Option<String>,
}

/// Response for a completed transfer.
#[derive(Debug, Serialize)]
pub struct TransferResponse {
    /// Transfer record id.
    pub id: Uuid,
    /// Sender's balance after the debit, as a decimal string.
    pub sender_balance: String,
    /// Recipient's balance after the credit, as a decimal string.
    pub recipient_balance: String,
}

/// POST `/transfers` - Atomically move funds between two users.
async fn create_transfer(
    State(state): State<AppState>,
    Json(payload): Json<TransferRequest>,
) -> Result<(StatusCode, Json<TransferResponse>), ApiError> {
    let repo = BalanceRepository::new((*state.db).clone());
    let outcome = repo
        .transfer(
            payload.sender_id,
            payload.recipient_id,
            payload.amount,
            payload.note,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TransferResponse {
            id: outcome.transfer.id,
            sender_balance: outcome.sender_balance.to_string(),
            recipient_balance: outcome.recipient_balance.to_string(),
        }),
    ))
}
