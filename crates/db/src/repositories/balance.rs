//! Balance repository: credit, debit, and the two-party transfer protocol.
//!
//! Every mutation runs inside one database transaction and appends to the
//! ledger while updating the cached balance, so the reconciliation
//! invariant `balance == sum(credits) - sum(debits)` holds at every commit
//! point.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use nexvest_core::ledger::{EntryDirection, LedgerError, replay_balance, validate_amount};
use nexvest_shared::AppError;

use crate::entities::{balance_accounts, ledger_entries, p2p_transfers, users};

/// Error types for balance operations.
#[derive(Debug, thiserror::Error)]
pub enum BalanceError {
    /// User not found.
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    /// Balance account not found.
    #[error("Balance account not found for user: {0}")]
    AccountNotFound(Uuid),

    /// Domain validation failure (amount, funds, self-transfer).
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<BalanceError> for AppError {
    fn from(err: BalanceError) -> Self {
        match err {
            BalanceError::UserNotFound(id) => Self::NotFound(format!("user {id}")),
            BalanceError::AccountNotFound(id) => {
                Self::NotFound(format!("balance account for user {id}"))
            }
            BalanceError::Ledger(e) => e.into(),
            BalanceError::Database(e) => Self::Storage(e.to_string()),
        }
    }
}

/// Result of a completed transfer: the record plus both updated balances.
#[derive(Debug, Clone)]
pub struct TransferOutcome {
    /// The persisted transfer record.
    pub transfer: p2p_transfers::Model,
    /// Sender's balance after the debit.
    pub sender_balance: Decimal,
    /// Recipient's balance after the credit.
    pub recipient_balance: Decimal,
}

/// Comparison of the cached balance against a full ledger replay.
#[derive(Debug, Clone, Copy)]
pub struct Reconciliation {
    /// Balance stored on the account row.
    pub cached: Decimal,
    /// Balance recomputed from the ledger entries.
    pub replayed: Decimal,
}

impl Reconciliation {
    /// Whether the cached balance matches the ledger.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.cached == self.replayed
    }
}

/// Repository for balance accounts and the append-only ledger.
#[derive(Debug, Clone)]
pub struct BalanceRepository {
    db: DatabaseConnection,
}

impl BalanceRepository {
    /// Creates a new balance repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the user's balance account, creating it on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist or the database fails.
    pub async fn get_or_create_account(
        &self,
        owner_id: Uuid,
    ) -> Result<balance_accounts::Model, BalanceError> {
        get_or_create_account(&self.db, owner_id).await
    }

    /// Credits the user's account.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount does not validate, the user does not
    /// exist, or the database fails.
    pub async fn credit(
        &self,
        owner_id: Uuid,
        amount: Decimal,
        reason: &str,
        reference_id: Option<Uuid>,
    ) -> Result<balance_accounts::Model, BalanceError> {
        let amount = validate_amount(amount)?;
        self.get_or_create_account(owner_id).await?;

        let txn = self.db.begin().await?;
        let account = lock_account(&txn, owner_id).await?;
        let updated = apply_entry(
            &txn,
            account,
            EntryDirection::Credit,
            amount,
            reason,
            reference_id,
        )
        .await?;
        txn.commit().await?;

        tracing::info!(owner = %owner_id, %amount, reason, "balance credited");
        Ok(updated)
    }

    /// Debits the user's account.
    ///
    /// The funds check happens under the row lock, so a concurrent debit
    /// can never drive the balance negative.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount does not validate, the balance is
    /// insufficient, the user does not exist, or the database fails.
    pub async fn debit(
        &self,
        owner_id: Uuid,
        amount: Decimal,
        reason: &str,
        reference_id: Option<Uuid>,
    ) -> Result<balance_accounts::Model, BalanceError> {
        let amount = validate_amount(amount)?;
        self.get_or_create_account(owner_id).await?;

        let txn = self.db.begin().await?;
        let account = lock_account(&txn, owner_id).await?;
        let updated = apply_entry(
            &txn,
            account,
            EntryDirection::Debit,
            amount,
            reason,
            reference_id,
        )
        .await?;
        txn.commit().await?;

        tracing::info!(owner = %owner_id, %amount, reason, "balance debited");
        Ok(updated)
    }

    /// Moves funds from one user to another atomically.
    ///
    /// Both balance rows are locked in ascending account-id order so two
    /// opposite-direction transfers can never deadlock. Balances are
    /// re-read under the locks; either both ledger entries and the
    /// transfer record commit, or nothing does.
    ///
    /// # Errors
    ///
    /// Returns an error if sender equals recipient, the amount does not
    /// validate, the sender's funds are insufficient, either user does not
    /// exist, or the database fails.
    pub async fn transfer(
        &self,
        sender_id: Uuid,
        recipient_id: Uuid,
        amount: Decimal,
        note: Option<String>,
    ) -> Result<TransferOutcome, BalanceError> {
        if sender_id == recipient_id {
            return Err(LedgerError::SelfTransfer.into());
        }
        let amount = validate_amount(amount)?;

        let sender_account = self.get_or_create_account(sender_id).await?;
        let recipient_account = self.get_or_create_account(recipient_id).await?;

        let txn = self.db.begin().await?;

        // Deterministic global lock order: ascending account id.
        if sender_account.id < recipient_account.id {
            lock_account(&txn, sender_id).await?;
            lock_account(&txn, recipient_id).await?;
        } else {
            lock_account(&txn, recipient_id).await?;
            lock_account(&txn, sender_id).await?;
        }

        // Re-read under the locks; the earlier reads were advisory.
        let sender_account = find_account(&txn, sender_id).await?;
        let recipient_account = find_account(&txn, recipient_id).await?;

        let transfer_id = Uuid::new_v4();
        let sender_after = apply_entry(
            &txn,
            sender_account,
            EntryDirection::Debit,
            amount,
            "transfer_out",
            Some(transfer_id),
        )
        .await?;
        let recipient_after = apply_entry(
            &txn,
            recipient_account,
            EntryDirection::Credit,
            amount,
            "transfer_in",
            Some(transfer_id),
        )
        .await?;

        let now = Utc::now().into();
        let transfer = p2p_transfers::ActiveModel {
            id: Set(transfer_id),
            sender_id: Set(sender_id),
            recipient_id: Set(recipient_id),
            amount: Set(amount),
            note: Set(note),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        tracing::info!(
            sender = %sender_id,
            recipient = %recipient_id,
            %amount,
            "transfer completed"
        );
        Ok(TransferOutcome {
            transfer,
            sender_balance: sender_after.balance,
            recipient_balance: recipient_after.balance,
        })
    }

    /// Returns the user's current balance; zero when no account exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn balance_of(&self, owner_id: Uuid) -> Result<Decimal, BalanceError> {
        let account = balance_accounts::Entity::find()
            .filter(balance_accounts::Column::OwnerId.eq(owner_id))
            .one(&self.db)
            .await?;
        Ok(account.map_or(Decimal::ZERO, |a| a.balance))
    }

    /// Returns the user's ledger entries in chronological order, paged.
    ///
    /// The entry id breaks timestamp ties, so the order is a stable total
    /// order and paging never skips or repeats an entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn ledger_for(
        &self,
        owner_id: Uuid,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<ledger_entries::Model>, BalanceError> {
        let Some(account) = balance_accounts::Entity::find()
            .filter(balance_accounts::Column::OwnerId.eq(owner_id))
            .one(&self.db)
            .await?
        else {
            return Ok(Vec::new());
        };

        let entries = ledger_entries::Entity::find()
            .filter(ledger_entries::Column::AccountId.eq(account.id))
            .order_by_asc(ledger_entries::Column::CreatedAt)
            .order_by_asc(ledger_entries::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(entries)
    }

    /// Replays the full ledger for the user and compares it with the
    /// cached balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the account does not exist or the database
    /// query fails.
    pub async fn reconcile(&self, owner_id: Uuid) -> Result<Reconciliation, BalanceError> {
        let account = find_account(&self.db, owner_id).await?;
        let entries = ledger_entries::Entity::find()
            .filter(ledger_entries::Column::AccountId.eq(account.id))
            .all(&self.db)
            .await?;

        let replayed = replay_balance(
            entries
                .into_iter()
                .map(|e| (EntryDirection::from(e.direction), e.amount)),
        );
        Ok(Reconciliation {
            cached: account.balance,
            replayed,
        })
    }
}

/// Looks up a user, failing with `UserNotFound` when absent.
pub(crate) async fn ensure_user<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
) -> Result<users::Model, BalanceError> {
    users::Entity::find_by_id(user_id)
        .one(conn)
        .await?
        .ok_or(BalanceError::UserNotFound(user_id))
}

/// Race-safe get-or-create: an upsert guarded by the UNIQUE constraint on
/// `owner_id`, followed by a plain select. Two concurrent callers both end
/// up with the same row.
pub(crate) async fn get_or_create_account<C: ConnectionTrait>(
    conn: &C,
    owner_id: Uuid,
) -> Result<balance_accounts::Model, BalanceError> {
    ensure_user(conn, owner_id).await?;

    let now = Utc::now().into();
    let account = balance_accounts::ActiveModel {
        id: Set(Uuid::new_v4()),
        owner_id: Set(owner_id),
        balance: Set(Decimal::ZERO),
        created_at: Set(now),
        updated_at: Set(now),
    };
    balance_accounts::Entity::insert(account)
        .on_conflict(
            OnConflict::column(balance_accounts::Column::OwnerId)
                .do_nothing()
                .to_owned(),
        )
        .do_nothing()
        .exec_without_returning(conn)
        .await?;

    find_account(conn, owner_id).await
}

/// Finds the user's balance account without locking.
pub(crate) async fn find_account<C: ConnectionTrait>(
    conn: &C,
    owner_id: Uuid,
) -> Result<balance_accounts::Model, BalanceError> {
    balance_accounts::Entity::find()
        .filter(balance_accounts::Column::OwnerId.eq(owner_id))
        .one(conn)
        .await?
        .ok_or(BalanceError::AccountNotFound(owner_id))
}

/// Locks the user's balance row with `SELECT .. FOR UPDATE` and returns it.
pub(crate) async fn lock_account<C: ConnectionTrait>(
    conn: &C,
    owner_id: Uuid,
) -> Result<balance_accounts::Model, BalanceError> {
    balance_accounts::Entity::find()
        .filter(balance_accounts::Column::OwnerId.eq(owner_id))
        .lock_exclusive()
        .one(conn)
        .await?
        .ok_or(BalanceError::AccountNotFound(owner_id))
}

/// Appends one ledger entry and moves the cached balance accordingly.
///
/// Caller must hold the row lock on `account`. Debits check funds here,
/// under that lock, so check-then-act is race-free.
pub(crate) async fn apply_entry<C: ConnectionTrait>(
    conn: &C,
    account: balance_accounts::Model,
    direction: EntryDirection,
    amount: Decimal,
    reason: &str,
    reference_id: Option<Uuid>,
) -> Result<balance_accounts::Model, BalanceError> {
    let new_balance = match direction {
        EntryDirection::Credit => account.balance + amount,
        EntryDirection::Debit => {
            if account.balance < amount {
                return Err(LedgerError::InsufficientBalance {
                    available: account.balance,
                    requested: amount,
                }
                .into());
            }
            account.balance - amount
        }
    };

    let now = Utc::now().into();
    ledger_entries::ActiveModel {
        id: Set(Uuid::new_v4()),
        account_id: Set(account.id),
        direction: Set(direction.into()),
        amount: Set(amount),
        reason: Set(reason.to_owned()),
        reference_id: Set(reference_id),
        created_at: Set(now),
    }
    .insert(conn)
    .await?;

    let mut active: balance_accounts::ActiveModel = account.into();
    active.balance = Set(new_balance);
    active.updated_at = Set(now);
    let updated = active.update(conn).await?;
    Ok(updated)
}
