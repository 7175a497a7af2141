//! In-memory verification code store

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::{DomainResult, VerificationCodeStore};

struct Entry {
    code: String,
    expires_at: Instant,
}

/// Code store for single-instance deployments and tests.
///
/// Expired entries are dropped lazily on the next take.
#[derive(Default)]
pub struct InMemoryCodeStore {
    codes: DashMap<String, Entry>,
}

impl InMemoryCodeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VerificationCodeStore for InMemoryCodeStore {
    async fn save_code(&self, email: &str, code: &str, ttl: Duration) -> DomainResult<()> {
        self.codes.insert(
            email.to_owned(),
            Entry {
                code: code.to_owned(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn take_code(&self, email: &str, code: &str) -> DomainResult<bool> {
        let now = Instant::now();
        if self
            .codes
            .remove_if(email, |_, entry| entry.code == code && now < entry.expires_at)
            .is_some()
        {
            return Ok(true);
        }

        self.codes.remove_if(email, |_, entry| now >= entry.expires_at);
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn matching_code_is_taken_once() {
        let store = InMemoryCodeStore::new();
        store.save_code("a@x.com", "123456", TTL).await.unwrap();

        assert!(store.take_code("a@x.com", "123456").await.unwrap());
        assert!(!store.take_code("a@x.com", "123456").await.unwrap());
        assert!(!store.take_code("b@x.com", "123456").await.unwrap());
    }

    #[tokio::test]
    async fn wrong_code_leaves_stored_one() {
        let store = InMemoryCodeStore::new();
        store.save_code("a@x.com", "123456", TTL).await.unwrap();

        assert!(!store.take_code("a@x.com", "000000").await.unwrap());
        assert!(store.take_code("a@x.com", "123456").await.unwrap());
    }

    #[tokio::test]
    async fn expired_code_is_rejected_and_dropped() {
        let store = InMemoryCodeStore::new();
        store.save_code("a@x.com", "123456", Duration::ZERO).await.unwrap();

        assert!(!store.take_code("a@x.com", "123456").await.unwrap());
        assert!(store.codes.is_empty());
    }

    #[tokio::test]
    async fn saving_again_replaces_code() {
        let store = InMemoryCodeStore::new();
        store.save_code("a@x.com", "111111", TTL).await.unwrap();
        store.save_code("a@x.com", "222222", TTL).await.unwrap();

        assert!(!store.take_code("a@x.com", "111111").await.unwrap());
        assert!(store.take_code("a@x.com", "222222").await.unwrap());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_takes_succeed_once() {
        let store = Arc::new(InMemoryCodeStore::new());
        store.save_code("a@x.com", "424242", TTL).await.unwrap();

        let takers: Vec<_> = (0..16)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.take_code("a@x.com", "424242").await.unwrap() })
            })
            .collect();

        let mut taken = 0;
        for taker in takers {
            if taker.await.unwrap() {
                taken += 1;
            }
        }
        assert_eq!(taken, 1);
    }
}
