//! Redis verification code store
//!
//! Codes are written with `SETEX` so expiry is enforced by Redis itself, and
//! consumed by a server-side compare-and-delete so one code verifies once.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, RedisError, Script};
use tracing::{error, info};

use crate::domain::{DomainError, DomainResult, VerificationCodeStore};

const KEY_PREFIX: &str = "users_service:verification_code:";

/// Deletes `KEYS[1]` only when it holds `ARGV[1]`; returns the number removed.
const TAKE_SCRIPT: &str = r"
if redis.call('GET', KEYS[1]) == ARGV[1] then
    return redis.call('DEL', KEYS[1])
end
return 0
";

/// Shared code store backed by a reconnecting Redis connection.
#[derive(Clone)]
pub struct RedisCodeStore {
    manager: ConnectionManager,
    take: Script,
}

impl RedisCodeStore {
    pub async fn connect(url: &str) -> Result<Self, RedisError> {
        let client = redis::Client::open(url)?;
        let manager = ConnectionManager::new(client).await?;
        info!("Connected to Redis code store");
        Ok(Self {
            manager,
            take: Script::new(TAKE_SCRIPT),
        })
    }

    fn key(email: &str) -> String {
        format!("{KEY_PREFIX}{email}")
    }
}

fn cache_err(operation: &'static str, err: RedisError) -> DomainError {
    error!(operation, error = %err, "Redis operation failed");
    if err.is_io_error()
        || err.is_connection_refusal()
        || err.is_connection_dropped()
        || err.is_timeout()
    {
        DomainError::StoreUnavailable(format!("{operation}: {err}"))
    } else {
        DomainError::Internal(format!("{operation}: {err}"))
    }
}

#[async_trait]
impl VerificationCodeStore for RedisCodeStore {
    async fn save_code(&self, email: &str, code: &str, ttl: Duration) -> DomainResult<()> {
        let mut conn = self.manager.clone();
        // SETEX rejects a zero expiry
        let secs = ttl.as_secs().max(1);
        conn.set_ex::<_, _, ()>(Self::key(email), code, secs)
            .await
            .map_err(|e| cache_err("codes.save_code", e))
    }

    async fn take_code(&self, email: &str, code: &str) -> DomainResult<bool> {
        let mut conn = self.manager.clone();
        let removed: i64 = self
            .take
            .key(Self::key(email))
            .arg(code)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| cache_err("codes.take_code", e))?;
        Ok(removed == 1)
    }
}

#[cfg(test)]
mod tests {
    use redis::ErrorKind;

    use super::*;

    #[test]
    fn keys_are_namespaced() {
        assert_eq!(
            RedisCodeStore::key("a@x.com"),
            "users_service:verification_code:a@x.com"
        );
    }

    #[test]
    fn io_failures_mean_store_unavailable() {
        let io = RedisError::from(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "refused",
        ));
        assert!(matches!(
            cache_err("codes.take_code", io),
            DomainError::StoreUnavailable(_)
        ));

        let typed = RedisError::from((ErrorKind::TypeError, "bad reply"));
        assert!(matches!(
            cache_err("codes.take_code", typed),
            DomainError::Internal(_)
        ));
    }
}
