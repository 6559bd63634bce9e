//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod console_mailer;
/// Development fixture data shared by seeding and the in-memory
/// repository.
pub mod fixtures;
mod in_memory_access_repository;
mod postgres_access_repository;
mod postgres_approver_repository;
mod postgres_audit_repository;
mod postgres_campaign_repository;
mod postgres_preference_repository;
mod postgres_user_repository;
mod slack_webhook_notifier;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use console_mailer::ConsoleMailer;
pub use in_memory_access_repository::InMemoryAccessRepository;
pub use postgres_access_repository::PostgresAccessRepository;
pub use postgres_approver_repository::PostgresApproverRepository;
pub use postgres_audit_repository::PostgresAuditRepository;
pub use postgres_campaign_repository::PostgresCampaignRepository;
pub use postgres_preference_repository::PostgresPreferenceRepository;
pub use postgres_user_repository::PostgresUserRepository;
pub use slack_webhook_notifier::SlackWebhookNotifier;
