//! Application service for registration, verification and login.

use std::fmt::Write as _;
use std::sync::Arc;

use chrono::{Duration, Utc};
use sha2::{Digest, Sha256};

use cadre_core::{AppError, AppResult};
use cadre_domain::{EmailAddress, UserId, validate_password};

use crate::user_ports::{Mailer, PasswordHasher, UserRecord, UserRepository};

/// Verification tokens live for one day.
const VERIFICATION_TOKEN_TTL_HOURS: i64 = 24;

/// Parameters for account registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterParams {
    /// Requested email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Display name.
    pub display_name: String,
}

/// Result of an authentication attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Credentials valid; the account is usable.
    Authenticated(UserRecord),
    /// Credentials valid but the email is not verified yet.
    EmailUnverified,
    /// Credentials invalid. Deliberately generic.
    Failed,
}

/// Application service for the account lifecycle.
#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    mailer: Arc<dyn Mailer>,
}

impl UserService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            repository,
            password_hasher,
            mailer,
        }
    }

    /// Registers an account and emails a verification token.
    pub async fn register(&self, params: RegisterParams) -> AppResult<UserId> {
        let email = EmailAddress::new(params.email)?;
        validate_password(params.password.as_str())?;

        if params.display_name.trim().is_empty() {
            return Err(AppError::Validation(
                "display name must not be empty".to_owned(),
            ));
        }

        if self
            .repository
            .find_by_email(email.as_str())
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "an account with this email already exists".to_owned(),
            ));
        }

        let user = UserRecord {
            id: UserId::new(),
            email: email.as_str().to_owned(),
            display_name: params.display_name.trim().to_owned(),
            password_hash: self.password_hasher.hash_password(params.password.as_str())?,
            email_verified: false,
        };
        self.repository.insert_user(&user).await?;

        let token = generate_token()?;
        self.repository
            .store_verification_token(
                user.id,
                digest(&token).as_str(),
                Utc::now() + Duration::hours(VERIFICATION_TOKEN_TTL_HOURS),
            )
            .await?;

        self.mailer
            .send_verification_email(user.email.as_str(), token.as_str())
            .await?;

        Ok(user.id)
    }

    /// Consumes a verification token, marking the account verified.
    pub async fn verify_email(&self, token: &str) -> AppResult<()> {
        let user_id = self
            .repository
            .consume_verification_token(digest(token).as_str())
            .await?
            .ok_or_else(|| {
                AppError::Validation("invalid or expired verification token".to_owned())
            })?;

        self.repository.mark_email_verified(user_id).await
    }

    /// Authenticates with email and password.
    ///
    /// Returns [`AuthOutcome::Failed`] with no further detail for unknown
    /// emails and wrong passwords alike, to prevent account enumeration.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthOutcome> {
        let normalized = match EmailAddress::new(email) {
            Ok(address) => address,
            Err(_) => return Ok(AuthOutcome::Failed),
        };

        let Some(user) = self.repository.find_by_email(normalized.as_str()).await? else {
            // Hash anyway so a missing account costs the same time.
            let _ = self.password_hasher.hash_password(password);
            return Ok(AuthOutcome::Failed);
        };

        if !self
            .password_hasher
            .verify_password(password, user.password_hash.as_str())?
        {
            return Ok(AuthOutcome::Failed);
        }

        if !user.email_verified {
            return Ok(AuthOutcome::EmailUnverified);
        }

        Ok(AuthOutcome::Authenticated(user))
    }

    /// Returns the account behind a session subject.
    pub async fn profile(&self, subject: &str) -> AppResult<UserRecord> {
        self.repository
            .find_by_subject(subject)
            .await?
            .ok_or_else(|| AppError::NotFound("account no longer exists".to_owned()))
    }
}

/// Generates a 256-bit random token, hex encoded.
fn generate_token() -> AppResult<String> {
    let mut bytes = [0u8; 32];
    getrandom::fill(&mut bytes)
        .map_err(|error| AppError::Internal(format!("failed to gather entropy: {error}")))?;
    Ok(hex_encode(&bytes))
}

/// Returns the hex SHA-256 digest stored in place of the plaintext token.
fn digest(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex_encode(hasher.finalize().as_slice())
}

fn hex_encode(bytes: &[u8]) -> String {
    let mut encoded = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(encoded, "{byte:02x}");
    }
    encoded
}
