//! Verification code stores
//!
//! Two interchangeable backends behind [`VerificationCodeStore`]: an
//! in-process map for single-instance deployments and tests, and Redis for
//! deployments that run several replicas.

pub mod memory;
pub mod redis_store;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::VerificationCodeStore;
use crate::shared::errors::InfraError;

pub use memory::InMemoryCodeStore;
pub use redis_store::RedisCodeStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    #[default]
    Memory,
    Redis,
}

/// Cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub backend: CacheBackend,
    /// Required when `backend = "redis"`
    pub redis_url: Option<String>,
    /// Lifetime of a verification code
    pub code_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Memory,
            redis_url: None,
            code_ttl_secs: 300,
        }
    }
}

/// Build the configured code store.
pub async fn build_code_store(
    config: &CacheConfig,
) -> Result<Arc<dyn VerificationCodeStore>, InfraError> {
    match config.backend {
        CacheBackend::Memory => {
            info!("Using in-memory verification code store");
            Ok(Arc::new(InMemoryCodeStore::new()))
        }
        CacheBackend::Redis => {
            let url = config.redis_url.as_deref().ok_or_else(|| {
                InfraError::Config("cache.redis_url is required for the redis backend".into())
            })?;
            Ok(Arc::new(RedisCodeStore::connect(url).await?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_parses_lowercase() {
        let cfg: CacheConfig = toml::from_str("backend = \"redis\"\nredis_url = \"redis://localhost\"").unwrap();
        assert_eq!(cfg.backend, CacheBackend::Redis);
        assert_eq!(cfg.code_ttl_secs, 300);
    }

    #[tokio::test]
    async fn redis_backend_without_url_is_config_error() {
        let cfg = CacheConfig {
            backend: CacheBackend::Redis,
            ..CacheConfig::default()
        };
        let err = build_code_store(&cfg).await.err().unwrap();
        assert!(matches!(err, InfraError::Config(_)));
    }
}
