//! Per-business serialization of read-modify-write cycles.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Hands out one async lock per business id.
///
/// Operations on the same business queue up behind each other; different
/// businesses never contend. Entries nobody holds are dropped on the next
/// acquisition so the map does not grow with every business ever seen.
#[derive(Default)]
pub struct BusinessLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl BusinessLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `business_id`.
    pub async fn acquire(&self, business_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks.retain(|id, lock| id == business_id || Arc::strong_count(lock) > 1);
            locks
                .entry(business_id.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };

        lock.lock_owned().await
    }

    /// Number of businesses currently tracked.
    pub fn tracked(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_business_is_serialized() {
        let locks = Arc::new(BusinessLocks::new());
        let guard = locks.acquire("acme").await;

        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire("acme").await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), contender)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_different_businesses_do_not_block() {
        let locks = BusinessLocks::new();
        let _first = locks.acquire("acme").await;

        let second = tokio::time::timeout(Duration::from_millis(100), locks.acquire("globex")).await;
        assert!(second.is_ok());
    }

    #[tokio::test]
    async fn test_idle_entries_are_pruned() {
        let locks = BusinessLocks::new();
        drop(locks.acquire("a").await);
        drop(locks.acquire("b").await);
        drop(locks.acquire("c").await);

        assert_eq!(locks.tracked(), 1);
    }
}
