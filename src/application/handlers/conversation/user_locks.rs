//! Per-user serialization of message handling.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::foundation::UserId;

/// Idle locks are pruned once the map grows past this many users.
const PRUNE_THRESHOLD: usize = 1024;

/// One async mutex per user.
///
/// Holding the guard returned by [`UserLocks::acquire`] guarantees no other
/// task is handling a message for the same user. Distinct users never
/// contend.
#[derive(Debug, Clone, Default)]
pub struct UserLocks {
    locks: Arc<Mutex<HashMap<UserId, Arc<Mutex<()>>>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until the user's lock is free and takes it.
    pub async fn acquire(&self, user_id: &UserId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            if locks.len() >= PRUNE_THRESHOLD {
                // Only the map holds an idle lock; clones are taken under this guard.
                locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            }
            locks.entry(user_id.clone()).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Number of users with a lock entry.
    pub async fn tracked_users(&self) -> usize {
        self.locks.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    #[tokio::test]
    async fn same_user_waits_for_release() {
        let locks = UserLocks::new();
        let guard = locks.acquire(&user("telegram:1")).await;

        let contender = locks.clone();
        let blocked = timeout(Duration::from_millis(50), async move {
            contender.acquire(&user("telegram:1")).await
        })
        .await;
        assert!(blocked.is_err());

        drop(guard);
        let acquired = timeout(Duration::from_millis(50), locks.acquire(&user("telegram:1"))).await;
        assert!(acquired.is_ok());
    }

    #[tokio::test]
    async fn different_users_do_not_contend() {
        let locks = UserLocks::new();
        let _guard = locks.acquire(&user("telegram:1")).await;

        let other = timeout(Duration::from_millis(50), locks.acquire(&user("telegram:2"))).await;

        assert!(other.is_ok());
        assert_eq!(locks.tracked_users().await, 2);
    }

    #[tokio::test]
    async fn idle_locks_are_pruned_past_threshold() {
        let locks = UserLocks::new();
        for i in 0..PRUNE_THRESHOLD {
            drop(locks.acquire(&user(&format!("telegram:{}", i))).await);
        }
        let _held = locks.acquire(&user("whatsapp:held")).await;

        assert_eq!(locks.tracked_users().await, 1);
    }
}
