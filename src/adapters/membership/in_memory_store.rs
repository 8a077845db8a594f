//! In-Memory Membership Store Adapter
//!
//! Keeps the membership set in process memory. Contents are lost on restart
//! and are not shared between processes.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::membership::NormalizedEmail;
use crate::ports::{MembershipStore, StoreError, StoreUpdate};

/// In-memory membership set.
///
/// Cloning yields another handle to the same set.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMembershipStore {
    members: Arc<RwLock<HashSet<NormalizedEmail>>>,
}

impl InMemoryMembershipStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `emails`
    #[cfg(test)]
    pub fn with_members(emails: impl IntoIterator<Item = NormalizedEmail>) -> Self {
        Self {
            members: Arc::new(RwLock::new(emails.into_iter().collect())),
        }
    }
}

#[async_trait]
impl MembershipStore for InMemoryMembershipStore {
    async fn add(&self, email: &NormalizedEmail) -> Result<StoreUpdate, StoreError> {
        let mut members = self.members.write().await;
        let changed = members.insert(email.clone());
        Ok(StoreUpdate {
            changed,
            members: members.len(),
        })
    }

    async fn remove(&self, email: &NormalizedEmail) -> Result<StoreUpdate, StoreError> {
        let mut members = self.members.write().await;
        let changed = members.remove(email);
        Ok(StoreUpdate {
            changed,
            members: members.len(),
        })
    }

    async fn contains(&self, email: &NormalizedEmail) -> Result<bool, StoreError> {
        Ok(self.members.read().await.contains(email))
    }

    async fn size(&self) -> Result<usize, StoreError> {
        Ok(self.members.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email(raw: &str) -> NormalizedEmail {
        NormalizedEmail::parse(raw).unwrap()
    }

    // ══════════════════════════════════════════════════════════════
    // add / remove
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn add_then_contains() {
        let store = InMemoryMembershipStore::new();

        let update = store.add(&email("a@example.com")).await.unwrap();

        assert_eq!(update, StoreUpdate { changed: true, members: 1 });
        assert!(store.contains(&email("a@example.com")).await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_add_is_noop() {
        let store = InMemoryMembershipStore::new();
        store.add(&email("a@example.com")).await.unwrap();

        let update = store.add(&email(" A@Example.com")).await.unwrap();

        assert_eq!(update, StoreUpdate { changed: false, members: 1 });
        assert_eq!(store.size().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn remove_revokes() {
        let store = InMemoryMembershipStore::with_members([email("a@example.com")]);

        let update = store.remove(&email("a@example.com")).await.unwrap();

        assert_eq!(update, StoreUpdate { changed: true, members: 0 });
        assert!(!store.contains(&email("a@example.com")).await.unwrap());
    }

    #[tokio::test]
    async fn remove_absent_is_noop() {
        let store = InMemoryMembershipStore::with_members([email("a@example.com")]);

        let update = store.remove(&email("b@example.com")).await.unwrap();

        assert_eq!(update, StoreUpdate { changed: false, members: 1 });
    }

    #[tokio::test]
    async fn readd_after_remove() {
        let store = InMemoryMembershipStore::new();
        let e = email("a@example.com");

        store.add(&e).await.unwrap();
        store.remove(&e).await.unwrap();
        store.add(&e).await.unwrap();

        assert!(store.contains(&e).await.unwrap());
    }

    // ══════════════════════════════════════════════════════════════
    // Sharing
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn clones_share_state() {
        let store = InMemoryMembershipStore::new();
        let other = store.clone();

        store.add(&email("a@example.com")).await.unwrap();

        assert!(other.contains(&email("a@example.com")).await.unwrap());
    }

    #[tokio::test]
    async fn concurrent_adds_are_all_applied() {
        let store = InMemoryMembershipStore::new();

        let tasks: Vec<_> = (0..50)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store.add(&email(&format!("user{}@example.com", i % 25))).await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(store.size().await.unwrap(), 25);
    }
}
