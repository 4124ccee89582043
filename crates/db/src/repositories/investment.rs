//! Investment repository: plan-bounded investment creation and the
//! referral bonus trigger.
//!
//! The bonus hook runs after the investment commits, in its own
//! transaction. A missing referrer, a plan without a bonus percent, or a
//! storage failure while crediting skips the bonus with a warning; the
//! investment write is never blocked.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use nexvest_core::ledger::{EntryDirection, LedgerError, quantize, validate_amount};
use nexvest_core::referral::compute_bonus;
use nexvest_shared::AppError;

use crate::entities::{investment_plans, user_investments};
use crate::repositories::balance::{
    self, BalanceError, apply_entry, get_or_create_account, lock_account,
};

/// Error types for investment operations.
#[derive(Debug, thiserror::Error)]
pub enum InvestmentError {
    /// Plan not found or inactive.
    #[error("Investment plan not found: {0}")]
    PlanNotFound(Uuid),

    /// Amount outside the plan's bounds.
    #[error("Amount {amount} is outside plan bounds [{min}, {max:?}]")]
    AmountOutOfBounds {
        /// Offered amount.
        amount: Decimal,
        /// Plan minimum.
        min: Decimal,
        /// Plan maximum, when bounded.
        max: Option<Decimal>,
    },

    /// Amount validation or funds failure.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Balance-side failure while debiting.
    #[error(transparent)]
    Balance(#[from] BalanceError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<InvestmentError> for AppError {
    fn from(err: InvestmentError) -> Self {
        match err {
            InvestmentError::PlanNotFound(id) => Self::NotFound(format!("investment plan {id}")),
            InvestmentError::AmountOutOfBounds { amount, min, max } => Self::Validation(
                max.map_or_else(
                    || format!("amount {amount} is below the plan minimum {min}"),
                    |max| format!("amount {amount} is outside the plan range {min}..={max}"),
                ),
            ),
            InvestmentError::Ledger(e) => e.into(),
            InvestmentError::Balance(e) => e.into(),
            InvestmentError::Database(e) => Self::Storage(e.to_string()),
        }
    }
}

/// Repository for investment plans and user investments.
#[derive(Debug, Clone)]
pub struct InvestmentRepository {
    db: DatabaseConnection,
}

impl InvestmentRepository {
    /// Creates a new investment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an investment, debiting the owner, then fires the referral
    /// bonus hook exactly once.
    ///
    /// # Errors
    ///
    /// Returns an error if the plan is unknown or inactive, the amount is
    /// outside the plan bounds or the owner's funds, or the database
    /// fails. Bonus-side failures never surface here.
    pub async fn create_investment(
        &self,
        owner_id: Uuid,
        plan_id: Uuid,
        amount: Decimal,
    ) -> Result<user_investments::Model, InvestmentError> {
        let amount = validate_amount(amount)?;

        let plan = investment_plans::Entity::find_by_id(plan_id)
            .filter(investment_plans::Column::IsActive.eq(true))
            .one(&self.db)
            .await?
            .ok_or(InvestmentError::PlanNotFound(plan_id))?;

        if amount < plan.min_amount || plan.max_amount.is_some_and(|max| amount > max) {
            return Err(InvestmentError::AmountOutOfBounds {
                amount,
                min: plan.min_amount,
                max: plan.max_amount,
            });
        }

        get_or_create_account(&self.db, owner_id).await?;

        let investment_id = Uuid::new_v4();
        let txn = self.db.begin().await?;

        let account = lock_account(&txn, owner_id).await?;
        apply_entry(
            &txn,
            account,
            EntryDirection::Debit,
            amount,
            "investment",
            Some(investment_id),
        )
        .await?;

        let now = Utc::now();
        let matures_at = now + Duration::hours(i64::from(plan.duration_hours));
        let expected_profit = quantize(amount * plan.profit_percent / Decimal::ONE_HUNDRED);
        let investment = user_investments::ActiveModel {
            id: Set(investment_id),
            owner_id: Set(owner_id),
            plan_id: Set(plan.id),
            amount: Set(amount),
            expected_profit: Set(expected_profit),
            started_at: Set(now.into()),
            matures_at: Set(matures_at.into()),
            is_active: Set(true),
            created_at: Set(now.into()),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        tracing::info!(
            investment = %investment.id,
            owner = %owner_id,
            plan = %plan.name,
            %amount,
            "investment created"
        );

        self.award_referral_bonus(&investment, &plan).await;
        Ok(investment)
    }

    /// Lists the active investment plans.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_plans(&self) -> Result<Vec<investment_plans::Model>, InvestmentError> {
        let plans = investment_plans::Entity::find()
            .filter(investment_plans::Column::IsActive.eq(true))
            .order_by_asc(investment_plans::Column::MinAmount)
            .all(&self.db)
            .await?;
        Ok(plans)
    }

    /// Lists a user's investments, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<user_investments::Model>, InvestmentError> {
        let rows = user_investments::Entity::find()
            .filter(user_investments::Column::OwnerId.eq(owner_id))
            .order_by_desc(user_investments::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// Credits the investor's referrer, if one exists and the plan carries
    /// a bonus percent. All skip paths log at `warn` and return normally.
    async fn award_referral_bonus(
        &self,
        investment: &user_investments::Model,
        plan: &investment_plans::Model,
    ) {
        let investor = match balance::ensure_user(&self.db, investment.owner_id).await {
            Ok(user) => user,
            Err(err) => {
                tracing::warn!(
                    investment = %investment.id,
                    error = %err,
                    "referral bonus skipped: investor lookup failed"
                );
                return;
            }
        };

        let Some(referrer_id) = investor.referred_by else {
            tracing::warn!(
                investment = %investment.id,
                owner = %investment.owner_id,
                "referral bonus skipped: no referrer"
            );
            return;
        };

        let Some(bonus) = compute_bonus(investment.amount, plan.referral_bonus_percent) else {
            tracing::warn!(
                investment = %investment.id,
                plan = %plan.name,
                percent = ?plan.referral_bonus_percent,
                "referral bonus skipped: no usable bonus percent"
            );
            return;
        };

        let credit = async {
            get_or_create_account(&self.db, referrer_id).await?;
            let txn = self.db.begin().await?;
            let account = lock_account(&txn, referrer_id).await?;
            apply_entry(
                &txn,
                account,
                EntryDirection::Credit,
                bonus,
                "referral_bonus",
                Some(investment.id),
            )
            .await?;
            txn.commit().await?;
            Ok::<(), BalanceError>(())
        };

        match credit.await {
            Ok(()) => {
                tracing::info!(
                    investment = %investment.id,
                    referrer = %referrer_id,
                    %bonus,
                    "referral bonus credited"
                );
            }
            Err(err) => {
                tracing::warn!(
                    investment = %investment.id,
                    referrer = %referrer_id,
                    error = %err,
                    "referral bonus skipped: credit failed"
                );
            }
        }
    }
}
