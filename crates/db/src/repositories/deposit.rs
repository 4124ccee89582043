//! Deposit repository: recording deposit intents and the one-time credit
//! at confirmation.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use nexvest_core::deposit::{ConfirmOutcome, DepositStateError, confirm_outcome, validate_reject};
use nexvest_core::ledger::{EntryDirection, LedgerError, validate_amount};
use nexvest_shared::AppError;

use crate::entities::sea_orm_active_enums::{Chain, DepositStatus};
use crate::entities::deposits;
use crate::repositories::balance::{
    self, BalanceError, apply_entry, get_or_create_account, lock_account,
};

/// Error types for deposit operations.
#[derive(Debug, thiserror::Error)]
pub enum DepositError {
    /// Deposit not found.
    #[error("Deposit not found: {0}")]
    NotFound(Uuid),

    /// Invalid lifecycle transition.
    #[error(transparent)]
    State(#[from] DepositStateError),

    /// Amount validation failure.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Balance-side failure while crediting.
    #[error(transparent)]
    Balance(#[from] BalanceError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<DepositError> for AppError {
    fn from(err: DepositError) -> Self {
        match err {
            DepositError::NotFound(id) => Self::NotFound(format!("deposit {id}")),
            DepositError::State(e) => e.into(),
            DepositError::Ledger(e) => e.into(),
            DepositError::Balance(e) => e.into(),
            DepositError::Database(e) => Self::Storage(e.to_string()),
        }
    }
}

/// Repository for the deposit lifecycle.
#[derive(Debug, Clone)]
pub struct DepositRepository {
    db: DatabaseConnection,
}

impl DepositRepository {
    /// Creates a new deposit repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a deposit intent, idempotently keyed by `tx_identifier`.
    ///
    /// Re-recording a transaction hash that already exists returns the
    /// existing row unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount does not validate, the user does not
    /// exist, or the database fails.
    pub async fn record(
        &self,
        owner_id: Uuid,
        chain: Chain,
        tx_identifier: &str,
        amount: Decimal,
    ) -> Result<deposits::Model, DepositError> {
        let amount = validate_amount(amount)?;
        balance::ensure_user(&self.db, owner_id).await?;

        let now = Utc::now().into();
        let deposit = deposits::ActiveModel {
            id: Set(Uuid::new_v4()),
            owner_id: Set(owner_id),
            amount: Set(amount),
            chain: Set(chain),
            tx_identifier: Set(tx_identifier.to_owned()),
            status: Set(DepositStatus::Pending),
            confirmations: Set(0),
            credited: Set(false),
            admin_note: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };
        deposits::Entity::insert(deposit)
            .on_conflict(
                OnConflict::column(deposits::Column::TxIdentifier)
                    .do_nothing()
                    .to_owned(),
            )
            .do_nothing()
            .exec_without_returning(&self.db)
            .await?;

        let recorded = deposits::Entity::find()
            .filter(deposits::Column::TxIdentifier.eq(tx_identifier))
            .one(&self.db)
            .await?
            .ok_or_else(|| DepositError::Database(DbErr::RecordNotInserted))?;
        Ok(recorded)
    }

    /// Confirms a pending deposit and credits the owner exactly once.
    ///
    /// Re-confirming an already confirmed deposit is a no-op that returns
    /// the row unchanged; confirming a rejected deposit fails. The credit
    /// and the `credited` flag flip in the same transaction as the status
    /// change, so a crash between them is impossible.
    ///
    /// # Errors
    ///
    /// Returns an error if the deposit is unknown, the transition is
    /// invalid, or the database fails.
    pub async fn confirm(
        &self,
        deposit_id: Uuid,
        confirmations: i32,
    ) -> Result<deposits::Model, DepositError> {
        let txn = self.db.begin().await?;

        let deposit = deposits::Entity::find_by_id(deposit_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(DepositError::NotFound(deposit_id))?;

        let outcome = confirm_outcome(deposit.status.into(), deposit.credited)?;
        match outcome {
            ConfirmOutcome::AlreadyConfirmed => {
                txn.commit().await?;
                Ok(deposit)
            }
            ConfirmOutcome::Confirm { credit_owner } => {
                if credit_owner {
                    get_or_create_account(&txn, deposit.owner_id).await?;
                    let account = lock_account(&txn, deposit.owner_id).await?;
                    apply_entry(
                        &txn,
                        account,
                        EntryDirection::Credit,
                        deposit.amount,
                        "deposit",
                        Some(deposit.id),
                    )
                    .await?;
                }

                let owner_id = deposit.owner_id;
                let amount = deposit.amount;
                let mut active: deposits::ActiveModel = deposit.into();
                active.status = Set(DepositStatus::Confirmed);
                active.confirmations = Set(confirmations);
                active.credited = Set(true);
                active.updated_at = Set(Utc::now().into());
                let updated = active.update(&txn).await?;

                txn.commit().await?;
                tracing::info!(deposit = %deposit_id, owner = %owner_id, %amount, "deposit confirmed");
                Ok(updated)
            }
        }
    }

    /// Rejects a pending deposit. No balance effect.
    ///
    /// # Errors
    ///
    /// Returns an error if the deposit is unknown, is not pending, or the
    /// database fails.
    pub async fn reject(
        &self,
        deposit_id: Uuid,
        reason: Option<String>,
    ) -> Result<deposits::Model, DepositError> {
        let txn = self.db.begin().await?;

        let deposit = deposits::Entity::find_by_id(deposit_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(DepositError::NotFound(deposit_id))?;

        validate_reject(deposit.status.into())?;

        let mut active: deposits::ActiveModel = deposit.into();
        active.status = Set(DepositStatus::Rejected);
        active.admin_note = Set(reason);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        tracing::info!(deposit = %deposit_id, "deposit rejected");
        Ok(updated)
    }

    /// Fetches a deposit by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the deposit is unknown or the database fails.
    pub async fn get(&self, deposit_id: Uuid) -> Result<deposits::Model, DepositError> {
        deposits::Entity::find_by_id(deposit_id)
            .one(&self.db)
            .await?
            .ok_or(DepositError::NotFound(deposit_id))
    }

    /// Lists a user's deposits, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for(&self, owner_id: Uuid) -> Result<Vec<deposits::Model>, DepositError> {
        let rows = deposits::Entity::find()
            .filter(deposits::Column::OwnerId.eq(owner_id))
            .order_by_desc(deposits::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(rows)
    }
}
