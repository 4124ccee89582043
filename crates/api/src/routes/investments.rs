//! Investment creation and plan listing routes.

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
use nexvest_db::InvestmentRepository;
use nexvest_db::entities::{investment_plans, user_investments};

/// Creates the investment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/investments", post(create_investment))
        .route("/investments/plans", get(list_plans))
        .route("/users/{user_id}/investments", get(list_investments))
}

/// Request body for creating an investment.
#[derive(Debug, Deserialize)]
pub struct CreateInvestmentRequest {
    /// Investing user.
    pub owner_id: Uuid,
    /// Chosen plan.
    pub plan_id: Uuid,
    /// Amount to invest.
    pub amount: Decimal,
}

/// Response for an investment.
#[derive(Debug, Serialize)]
pub struct InvestmentResponse {
    /// Investment id.
    pub id: Uuid,
    /// Investing user.
    pub owner_id: Uuid,
    /// Chosen plan.
    pub plan_id: Uuid,
    /// Invested amount, as a decimal string.
    pub amount: String,
    /// Profit due at maturity, as a decimal string.
    pub expected_profit: String,
    /// Start of the investment term (RFC 3339).
    pub started_at: String,
    /// End of the investment term (RFC 3339).
    pub matures_at: String,
    /// Whether the term is still running.
    pub is_active: bool,
}

impl From<user_investments::Model> for InvestmentResponse {
    fn from(investment: user_investments::Model) -> Self {
        Self {
            id: investment.id,
            owner_id: investment.owner_id,
            plan_id: investment.plan_id,
            amount: investment.amount.to_string(),
            expected_profit: investment.expected_profit.to_string(),
            started_at: investment.started_at.to_rfc3339(),
            matures_at: investment.matures_at.to_rfc3339(),
            is_active: investment.is_active,
        }
    }
}

/// Response for an investment plan.
#[derive(Debug, Serialize)]
pub struct PlanResponse {
    /// Plan id.
    pub id: Uuid,
    /// Plan name.
    pub name: String,
    /// Profit percent over the term, as a decimal string.
    pub profit_percent: String,
    /// Term length in hours.
    pub duration_hours: i32,
    /// Minimum investment, as a decimal string.
    pub min_amount: String,
    /// Maximum investment, as a decimal string, when bounded.
    pub max_amount: Option<String>,
    /// Referral bonus percent, as a decimal string, when the plan has one.
    pub referral_bonus_percent: Option<String>,
}

impl From<investment_plans::Model> for PlanResponse {
    fn from(plan: investment_plans::Model) -> Self {
        Self {
            id: plan.id,
            name: plan.name,
            profit_percent: plan.profit_percent.to_string(),
            duration_hours: plan.duration_hours,
            min_amount: plan.min_amount.to_string(),
            max_amount: plan.max_amount.map(|m| m.to_string()),
            referral_bonus_percent: plan.referral_bonus_percent.map(|p| p.to_string()),
        }
    }
}

/// POST `/investments` - Create an investment; fires the referral bonus
/// hook exactly once.
async fn create_investment(
    State(state): State<AppState>,
    Json(payload): Json<CreateInvestmentRequest>,
) -> Result<(StatusCode, Json<InvestmentResponse>), ApiError> {
    let repo = InvestmentRepository::new((*state.db).clone());
    let investment = repo
        .create_investment(payload.owner_id, payload.plan_id, payload.amount)
        .await?;
    Ok((StatusCode::CREATED, Json(investment.into())))
}

/// GET `/investments/plans` - List the active investment plans.
async fn list_plans(
    State(state): State<AppState>,
) -> Result<Json<Vec<PlanResponse>>, ApiError> {
    let repo = InvestmentRepository::new((*state.db).clone());
    let plans = repo.list_plans().await?;
    Ok(Json(plans.into_iter().map(Into::into).collect()))
}

/// GET `/users/{user_id}/investments` - List a user's investments.
async fn list_investments(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<InvestmentResponse>>, ApiError> {
    let repo = InvestmentRepository::new((*state.db).clone());
    let rows = repo.list_for(user_id).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}
