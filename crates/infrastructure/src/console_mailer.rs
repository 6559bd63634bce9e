//! Console mailer for development. Logs verification mail to tracing
//! output instead of delivering it.

use async_trait::async_trait;
use tracing::info;

use cadre_application::Mailer;
use cadre_core::AppResult;

/// Development mailer that logs messages to the console.
#[derive(Clone)]
pub struct ConsoleMailer;

impl ConsoleMailer {
    /// Creates a new console mailer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Mailer for ConsoleMailer {
    async fn send_verification_email(&self, email: &str, token: &str) -> AppResult<()> {
        info!(
            to = email,
            "--- EMAIL (console) ---\nTo: {email}\nSubject: Verify your Cadre account\n\n\
             Use this token to verify your email address: {token}\n--- END EMAIL ---"
        );

        Ok(())
    }
}
