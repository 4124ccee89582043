//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod balances;
pub mod deposits;
pub mod health;
pub mod investments;
pub mod transfers;
pub mod withdrawals;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(balances::routes())
        .merge(transfers::routes())
        .merge(deposits::routes())
        .merge(withdrawals::routes())
        .merge(investments::routes())
}
