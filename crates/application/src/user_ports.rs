//! Ports for account storage, password hashing and verification mail.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use cadre_core::AppResult;
use cadre_domain::UserId;

/// A stored user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Stable user identifier; its string form is the session subject.
    pub id: UserId,
    /// Normalized email address.
    pub email: String,
    /// Display name.
    pub display_name: String,
    /// Argon2id password hash.
    pub password_hash: String,
    /// Whether the email address has been verified.
    pub email_verified: bool,
}

/// Repository port for user accounts and verification tokens.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds an account by normalized email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>>;

    /// Finds an account by session subject.
    async fn find_by_subject(&self, subject: &str) -> AppResult<Option<UserRecord>>;

    /// Persists a new account.
    async fn insert_user(&self, user: &UserRecord) -> AppResult<()>;

    /// Marks an account's email as verified.
    async fn mark_email_verified(&self, user_id: UserId) -> AppResult<()>;

    /// Stores a verification token digest for an account.
    async fn store_verification_token(
        &self,
        user_id: UserId,
        token_digest: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()>;

    /// Consumes an unexpired verification token digest, returning the
    /// account it belongs to. The token is single-use.
    async fn consume_verification_token(&self, token_digest: &str)
        -> AppResult<Option<UserId>>;
}

/// Port for hashing and verifying passwords.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, stored_hash: &str) -> AppResult<bool>;
}

/// Outbound port delivering verification mail.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Sends the email-verification message carrying the plaintext token.
    async fn send_verification_email(&self, email: &str, token: &str) -> AppResult<()>;
}
