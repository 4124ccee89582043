//! User repository: the minimal provisioning surface the ledger needs.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use nexvest_shared::AppError;

use crate::entities::users;

/// Error types for user operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// User not found.
    #[error("User not found: {0}")]
    NotFound(Uuid),

    /// Email already registered.
    #[error("Email already registered: {0}")]
    EmailTaken(String),

    /// Referrer does not exist.
    #[error("Referrer not found: {0}")]
    ReferrerNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(id) => Self::NotFound(format!("user {id}")),
            UserError::EmailTaken(email) => Self::Conflict(format!("email {email} is taken")),
            UserError::ReferrerNotFound(id) => Self::NotFound(format!("referrer {id}")),
            UserError::Database(e) => Self::Storage(e.to_string()),
        }
    }
}

/// Repository for user rows.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a user, optionally recording who referred them.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is taken, the referrer is unknown,
    /// or the database fails.
    pub async fn create(
        &self,
        email: &str,
        display_name: &str,
        referred_by: Option<Uuid>,
    ) -> Result<users::Model, UserError> {
        if let Some(referrer_id) = referred_by {
            users::Entity::find_by_id(referrer_id)
                .one(&self.db)
                .await?
                .ok_or(UserError::ReferrerNotFound(referrer_id))?;
        }

        let existing = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(UserError::EmailTaken(email.to_owned()));
        }

        let now = Utc::now().into();
        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email.to_owned()),
            display_name: Set(display_name.to_owned()),
            referred_by: Set(referred_by),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;
        Ok(user)
    }

    /// Fetches a user by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the user is unknown or the database fails.
    pub async fn get(&self, user_id: Uuid) -> Result<users::Model, UserError> {
        users::Entity::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or(UserError::NotFound(user_id))
    }
}
