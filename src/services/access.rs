use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set,
};
use sha2::{Digest, Sha224};
use tracing::{info, warn};

use crate::{
    db::DbPool,
    entities::user::{self, Column as UserColumn, Entity as User, UserRole},
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Username and secret of the account seeded when the schema is first
/// created, so a fresh store is always accessible.
pub const BOOTSTRAP_USERNAME: &str = "ADMIN";
pub const BOOTSTRAP_SECRET: &str = "ADMIN";

/// Fixed salt appended to every secret before digesting. Changing it
/// invalidates every stored digest.
const PASSWORD_SALT: &str = "kb8!Rw2qTz@07141996";

/// Hex-encoded SHA-224 digest of `secret ++ PASSWORD_SALT`. Used both
/// when storing a secret and when verifying one.
pub fn digest(secret: &str) -> String {
    let mut hasher = Sha224::new();
    hasher.update(secret.as_bytes());
    hasher.update(PASSWORD_SALT.as_bytes());
    hex::encode(hasher.finalize())
}

/// Outcome of one credential check. An unknown username and a wrong
/// secret produce the same `Denied`, with no distinguishing signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Granted { role: UserRole },
    Denied,
}

/// Stateless credential verifier plus user administration. Lockout
/// policy lives in [`LoginSession`], which callers hold per session.
#[derive(Clone, Debug)]
pub struct AccessGuard {
    db: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl AccessGuard {
    pub fn new(db: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Verifies one username/secret pair. Stateless per call; counting
    /// denials is the caller's job.
    pub async fn verify(
        &self,
        username: &str,
        secret: &str,
    ) -> Result<AccessDecision, ServiceError> {
        let db = self.db.as_ref();

        let row = User::find()
            .filter(UserColumn::Username.eq(username))
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;

        let Some(row) = row else {
            return Ok(AccessDecision::Denied);
        };

        if row.password_digest != digest(secret) {
            return Ok(AccessDecision::Denied);
        }

        let role = row.role().ok_or_else(|| {
            ServiceError::IntegrityError(format!(
                "user '{}' carries unknown role '{}'",
                row.username, row.role
            ))
        })?;

        Ok(AccessDecision::Granted { role })
    }

    /// Creates a user account with the given role.
    pub async fn create_user(
        &self,
        username: &str,
        secret: &str,
        role: UserRole,
    ) -> Result<i64, ServiceError> {
        if username.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "username must not be empty".to_string(),
            ));
        }
        if secret.is_empty() {
            return Err(ServiceError::ValidationError(
                "secret must not be empty".to_string(),
            ));
        }

        let db = self.db.as_ref();

        let existing = User::find()
            .filter(UserColumn::Username.eq(username))
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;
        if existing.is_some() {
            return Err(ServiceError::ValidationError(format!(
                "username '{}' already exists",
                username
            )));
        }

        let row = user::ActiveModel {
            username: Set(username.to_string()),
            password_digest: Set(digest(secret)),
            role: Set(role.as_str().to_string()),
            ..Default::default()
        };
        let inserted = row.insert(db).await.map_err(ServiceError::db_error)?;

        self.event_sender
            .send(Event::UserCreated {
                user_id: inserted.id,
            })
            .await
            .map_err(ServiceError::EventError)?;

        info!(user_id = inserted.id, username = %username, "User created");

        Ok(inserted.id)
    }

    /// Resets a user's secret and role.
    pub async fn update_user(
        &self,
        id: i64,
        secret: &str,
        role: UserRole,
    ) -> Result<(), ServiceError> {
        if secret.is_empty() {
            return Err(ServiceError::ValidationError(
                "secret must not be empty".to_string(),
            ));
        }

        let db = self.db.as_ref();

        let existing = User::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("User with id {} not found", id)))?;

        let mut row: user::ActiveModel = existing.into();
        row.password_digest = Set(digest(secret));
        row.role = Set(role.as_str().to_string());
        row.update(db).await.map_err(ServiceError::db_error)?;

        self.event_sender
            .send(Event::UserUpdated { user_id: id })
            .await
            .map_err(ServiceError::EventError)?;

        info!(user_id = id, "User updated");

        Ok(())
    }

    /// Removes a user account.
    pub async fn delete_user(&self, id: i64) -> Result<(), ServiceError> {
        let db = self.db.as_ref();

        let existing = User::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("User with id {} not found", id)))?;

        existing.delete(db).await.map_err(ServiceError::db_error)?;

        self.event_sender
            .send(Event::UserDeleted { user_id: id })
            .await
            .map_err(ServiceError::EventError)?;

        info!(user_id = id, "User deleted");

        Ok(())
    }

    /// All user accounts in creation order.
    pub async fn list_users(&self) -> Result<Vec<user::Model>, ServiceError> {
        let db = self.db.as_ref();

        User::find()
            .order_by_asc(UserColumn::Id)
            .all(db)
            .await
            .map_err(ServiceError::db_error)
    }
}

/// Per-session attempt counter enforcing the hard lockout the guard
/// itself cannot: after the configured number of cumulative denials the
/// session is terminated, and further attempts are rejected without
/// evaluating credentials.
#[derive(Debug)]
pub struct LoginSession {
    denials: u8,
    max_attempts: u8,
}

impl LoginSession {
    pub fn new(max_attempts: u8) -> Self {
        Self {
            denials: 0,
            max_attempts,
        }
    }

    pub fn is_terminated(&self) -> bool {
        self.denials >= self.max_attempts
    }

    /// Runs one login attempt through `guard`. Once terminated, returns
    /// `AuthError` without touching the store.
    pub async fn attempt(
        &mut self,
        guard: &AccessGuard,
        username: &str,
        secret: &str,
    ) -> Result<AccessDecision, ServiceError> {
        if self.is_terminated() {
            warn!(username = %username, "Login attempt after session termination");
            return Err(ServiceError::AuthError(
                "maximum login attempts reached; session terminated".to_string(),
            ));
        }

        let decision = guard.verify(username, secret).await?;
        if decision == AccessDecision::Denied {
            self.denials += 1;
            info!(
                username = %username,
                denials = self.denials,
                "Login denied"
            );
        }

        Ok(decision)
    }
}
