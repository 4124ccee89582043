//! Withdrawal repository: request intake, admin review, and payout
//! progress reporting.
//!
//! The owner is debited exactly once, at pending -> approved. A failed
//! payout re-credits the owner in the same transaction as the status
//! change, so funds are never silently lost and the reversal is visible
//! in the ledger.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use nexvest_core::ledger::{EntryDirection, LedgerError, validate_amount};
use nexvest_core::withdrawal::{
    WithdrawalStateError, WithdrawalStatus as CoreStatus, append_note, validate_transition,
};
use nexvest_shared::AppError;

use crate::entities::sea_orm_active_enums::{Chain, WithdrawalStatus};
use crate::entities::withdrawal_requests;
use crate::repositories::balance::{
    BalanceError, apply_entry, get_or_create_account, lock_account,
};

/// Error types for withdrawal operations.
#[derive(Debug, thiserror::Error)]
pub enum WithdrawalError {
    /// Withdrawal request not found.
    #[error("Withdrawal request not found: {0}")]
    NotFound(Uuid),

    /// Invalid lifecycle transition.
    #[error(transparent)]
    State(#[from] WithdrawalStateError),

    /// Amount validation or funds failure.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Balance-side failure while debiting or re-crediting.
    #[error(transparent)]
    Balance(#[from] BalanceError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<WithdrawalError> for AppError {
    fn from(err: WithdrawalError) -> Self {
        match err {
            WithdrawalError::NotFound(id) => Self::NotFound(format!("withdrawal {id}")),
            WithdrawalError::State(e) => e.into(),
            WithdrawalError::Ledger(e) => e.into(),
            WithdrawalError::Balance(e) => e.into(),
            WithdrawalError::Database(e) => Self::Storage(e.to_string()),
        }
    }
}

/// Repository for the withdrawal lifecycle.
#[derive(Debug, Clone)]
pub struct WithdrawalRepository {
    db: DatabaseConnection,
}

impl WithdrawalRepository {
    /// Creates a new withdrawal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a pending withdrawal request. No balance effect.
    ///
    /// The balance check here is advisory: it rejects obviously unfundable
    /// requests early, but the authoritative check happens under the row
    /// lock at approval time.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount does not validate, the balance is
    /// clearly insufficient, the user does not exist, or the database
    /// fails.
    pub async fn request(
        &self,
        owner_id: Uuid,
        amount: Decimal,
        chain: Chain,
        destination_address: &str,
    ) -> Result<withdrawal_requests::Model, WithdrawalError> {
        let amount = validate_amount(amount)?;

        let account = get_or_create_account(&self.db, owner_id).await?;
        if account.balance < amount {
            return Err(LedgerError::InsufficientBalance {
                available: account.balance,
                requested: amount,
            }
            .into());
        }

        let now = Utc::now().into();
        let request = withdrawal_requests::ActiveModel {
            id: Set(Uuid::new_v4()),
            owner_id: Set(owner_id),
            amount: Set(amount),
            chain: Set(chain),
            destination_address: Set(destination_address.to_owned()),
            status: Set(WithdrawalStatus::Pending),
            admin_note: Set(None),
            payout_tx_identifier: Set(None),
            processed_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        tracing::info!(withdrawal = %request.id, owner = %owner_id, %amount, "withdrawal requested");
        Ok(request)
    }

    /// Approves a pending request and debits the owner.
    ///
    /// Only pending requests can be approved, so a second approve fails
    /// with an invalid-transition error and debits nothing. If the funds
    /// re-check under the lock fails, the request stays pending.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is unknown, is not pending, the
    /// owner's funds are insufficient, or the database fails.
    pub async fn approve(
        &self,
        withdrawal_id: Uuid,
        actor: &str,
    ) -> Result<withdrawal_requests::Model, WithdrawalError> {
        let txn = self.db.begin().await?;

        let request = self.lock_request(&txn, withdrawal_id).await?;
        validate_transition(request.status.into(), CoreStatus::Approved)?;

        let account = lock_account(&txn, request.owner_id).await?;
        apply_entry(
            &txn,
            account,
            EntryDirection::Debit,
            request.amount,
            "withdrawal",
            Some(request.id),
        )
        .await?;

        let now = Utc::now();
        let note = append_note(request.admin_note.as_deref(), "Approved", actor, now);
        let owner_id = request.owner_id;
        let amount = request.amount;
        let mut active: withdrawal_requests::ActiveModel = request.into();
        active.status = Set(WithdrawalStatus::Approved);
        active.admin_note = Set(Some(note));
        active.processed_at = Set(Some(now.into()));
        active.updated_at = Set(now.into());
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        tracing::info!(withdrawal = %withdrawal_id, owner = %owner_id, %amount, "withdrawal approved");
        Ok(updated)
    }

    /// Rejects a pending request. No balance effect.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is unknown, is not pending, or the
    /// database fails.
    pub async fn reject(
        &self,
        withdrawal_id: Uuid,
        actor: &str,
        reason: Option<&str>,
    ) -> Result<withdrawal_requests::Model, WithdrawalError> {
        let txn = self.db.begin().await?;

        let request = self.lock_request(&txn, withdrawal_id).await?;
        validate_transition(request.status.into(), CoreStatus::Rejected)?;

        let now = Utc::now();
        let mut note = append_note(request.admin_note.as_deref(), "Rejected", actor, now);
        if let Some(reason) = reason {
            note.push_str(": ");
            note.push_str(reason);
        }
        let mut active: withdrawal_requests::ActiveModel = request.into();
        active.status = Set(WithdrawalStatus::Rejected);
        active.admin_note = Set(Some(note));
        active.processed_at = Set(Some(now.into()));
        active.updated_at = Set(now.into());
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        tracing::info!(withdrawal = %withdrawal_id, "withdrawal rejected");
        Ok(updated)
    }

    /// Marks an approved request as claimed by the payout executor.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is unknown, is not approved, or the
    /// database fails.
    pub async fn mark_processing(
        &self,
        withdrawal_id: Uuid,
    ) -> Result<withdrawal_requests::Model, WithdrawalError> {
        let txn = self.db.begin().await?;

        let request = self.lock_request(&txn, withdrawal_id).await?;
        validate_transition(request.status.into(), CoreStatus::Processing)?;

        let mut active: withdrawal_requests::ActiveModel = request.into();
        active.status = Set(WithdrawalStatus::Processing);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Records a successful payout with its on-chain transaction hash.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is unknown, is not approved or
    /// processing, or the database fails.
    pub async fn mark_sent(
        &self,
        withdrawal_id: Uuid,
        payout_tx_identifier: &str,
    ) -> Result<withdrawal_requests::Model, WithdrawalError> {
        let txn = self.db.begin().await?;

        let request = self.lock_request(&txn, withdrawal_id).await?;
        validate_transition(request.status.into(), CoreStatus::Sent)?;

        let now = Utc::now().into();
        let mut active: withdrawal_requests::ActiveModel = request.into();
        active.status = Set(WithdrawalStatus::Sent);
        active.payout_tx_identifier = Set(Some(payout_tx_identifier.to_owned()));
        active.processed_at = Set(Some(now));
        active.updated_at = Set(now);
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        tracing::info!(withdrawal = %withdrawal_id, "withdrawal sent");
        Ok(updated)
    }

    /// Records a failed payout and re-credits the owner.
    ///
    /// The compensating credit lands in the same transaction as the status
    /// change, referencing the withdrawal id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is unknown, is not approved or
    /// processing, or the database fails.
    pub async fn mark_failed(
        &self,
        withdrawal_id: Uuid,
        reason: &str,
    ) -> Result<withdrawal_requests::Model, WithdrawalError> {
        let txn = self.db.begin().await?;

        let request = self.lock_request(&txn, withdrawal_id).await?;
        validate_transition(request.status.into(), CoreStatus::Failed)?;

        let account = lock_account(&txn, request.owner_id).await?;
        apply_entry(
            &txn,
            account,
            EntryDirection::Credit,
            request.amount,
            "withdrawal_reversal",
            Some(request.id),
        )
        .await?;

        let now = Utc::now();
        let mut note = append_note(request.admin_note.as_deref(), "Failed", "payout-executor", now);
        note.push_str(": ");
        note.push_str(reason);
        let owner_id = request.owner_id;
        let amount = request.amount;
        let mut active: withdrawal_requests::ActiveModel = request.into();
        active.status = Set(WithdrawalStatus::Failed);
        active.admin_note = Set(Some(note));
        active.processed_at = Set(Some(now.into()));
        active.updated_at = Set(now.into());
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        tracing::warn!(
            withdrawal = %withdrawal_id,
            owner = %owner_id,
            %amount,
            reason,
            "withdrawal failed, owner re-credited"
        );
        Ok(updated)
    }

    /// Fetches a withdrawal request by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is unknown or the database fails.
    pub async fn get(
        &self,
        withdrawal_id: Uuid,
    ) -> Result<withdrawal_requests::Model, WithdrawalError> {
        withdrawal_requests::Entity::find_by_id(withdrawal_id)
            .one(&self.db)
            .await?
            .ok_or(WithdrawalError::NotFound(withdrawal_id))
    }

    /// Lists a user's withdrawal requests, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<withdrawal_requests::Model>, WithdrawalError> {
        let rows = withdrawal_requests::Entity::find()
            .filter(withdrawal_requests::Column::OwnerId.eq(owner_id))
            .order_by_desc(withdrawal_requests::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    async fn lock_request(
        &self,
        txn: &sea_orm::DatabaseTransaction,
        withdrawal_id: Uuid,
    ) -> Result<withdrawal_requests::Model, WithdrawalError> {
        withdrawal_requests::Entity::find_by_id(withdrawal_id)
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or(WithdrawalError::NotFound(withdrawal_id))
    }
}
