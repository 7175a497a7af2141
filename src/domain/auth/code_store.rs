use std::time::Duration;

use async_trait::async_trait;

use crate::domain::DomainResult;

/// Short-lived verification codes keyed by email.
#[async_trait]
pub trait VerificationCodeStore: Send + Sync {
    /// Store `code` for `email`, replacing any previous one.
    async fn save_code(&self, email: &str, code: &str, ttl: Duration) -> DomainResult<()>;

    /// Remove the stored code if it equals `code` and is still live.
    ///
    /// Returns whether it was removed. Concurrent calls with the same code
    /// succeed at most once.
    async fn take_code(&self, email: &str, code: &str) -> DomainResult<bool>;
}
