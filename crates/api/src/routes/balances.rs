//! Balance snapshot and ledger history routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, error::ApiError};
use nexvest_db::BalanceRepository;
use nexvest_db::entities::ledger_entries;
use nexvest_db::entities::sea_orm_active_enums::EntryDirection;

/// Creates the balance routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users/{user_id}/balance", get(get_balance))
        .route("/users/{user_id}/ledger", get(get_ledger))
}

/// Response for a balance snapshot.
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    /// Owner of the balance.
    pub user_id: Uuid,
    /// Current balance, as a decimal string.
    pub balance: String,
}

/// Query parameters for paging ledger entries.
#[derive(Debug, Deserialize)]
pub struct LedgerQuery {
    /// Page number (1-indexed, default: 1).
    pub page: Option<u64>,
    /// Number of entries per page (default: 50, max: 100).
    pub limit: Option<u64>,
}

const DEFAULT_PAGE_SIZE: u64 = 50;
const MAX_PAGE_SIZE: u64 = 100;

/// Resolves paging query values into a row limit and offset.
///
/// Saturating arithmetic: an absurd page number yields an offset past the
/// end of the ledger (an empty page), never a panic or a wrapped offset.
fn page_window(query: &LedgerQuery) -> (u64, u64) {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE);
    let offset = page.saturating_sub(1).saturating_mul(limit);
    (limit, offset)
}

/// Response for a single ledger entry.
#[derive(Debug, Serialize)]
pub struct LedgerEntryResponse {
    /// Entry ID.
    pub id: Uuid,
    /// `credit` or `debit`.
    pub direction: &'static str,
    /// Entry amount, as a decimal string.
    pub amount: String,
    /// What caused the entry.
    pub reason: String,
    /// Correlated deposit / withdrawal / transfer / investment id.
    pub reference_id: Option<Uuid>,
    /// Entry timestamp (RFC 3339).
    pub created_at: String,
}

impl From<ledger_entries::Model> for LedgerEntryResponse {
    fn from(entry: ledger_entries::Model) -> Self {
        Self {
            id: entry.id,
            direction: match entry.direction {
                EntryDirection::Credit => "credit",
                EntryDirection::Debit => "debit",
            },
            amount: entry.amount.to_string(),
            reason: entry.reason,
            reference_id: entry.reference_id,
            created_at: entry.created_at.to_rfc3339(),
        }
    }
}

/// GET `/users/{user_id}/balance` - Current balance snapshot.
async fn get_balance(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let repo = BalanceRepository::new((*state.db).clone());
    let balance = repo.balance_of(user_id).await?;
    Ok(Json(BalanceResponse {
        user_id,
        balance: balance.to_string(),
    }))
}

/// GET `/users/{user_id}/ledger` - Chronological ledger entries, paged.
async fn get_ledger(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<LedgerQuery>,
) -> Result<Json<Vec<LedgerEntryResponse>>, ApiError> {
    let (limit, offset) = page_window(&query);

    let repo = BalanceRepository::new((*state.db).clone());
    let entries = repo.ledger_for(user_id, limit, offset).await?;
    Ok(Json(entries.into_iter().map(Into::into).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<u64>, limit: Option<u64>) -> LedgerQuery {
        LedgerQuery { page, limit }
    }

    #[test]
    fn test_page_window_defaults() {
        assert_eq!(page_window(&query(None, None)), (50, 0));
    }

    #[test]
    fn test_page_window_caps_limit() {
        assert_eq!(page_window(&query(Some(1), Some(5000))), (100, 0));
    }

    #[test]
    fn test_page_window_zero_page_means_first() {
        assert_eq!(page_window(&query(Some(0), Some(10))), (10, 0));
    }

    #[test]
    fn test_page_window_second_page_offsets_by_limit() {
        assert_eq!(page_window(&query(Some(3), Some(25))), (25, 50));
    }

    #[test]
    fn test_page_window_huge_page_saturates() {
        // Must not panic or wrap; an offset past the end is an empty page.
        let (limit, offset) = page_window(&query(Some(u64::MAX), Some(100)));
        assert_eq!(limit, 100);
        assert_eq!(offset, u64::MAX);
    }

    #[test]
    fn test_page_window_huge_page_and_limit_saturate() {
        let (limit, offset) = page_window(&query(Some(u64::MAX), Some(u64::MAX)));
        assert_eq!(limit, MAX_PAGE_SIZE);
        assert_eq!(offset, u64::MAX);
    }
}
