//! Membership store port.
//!
//! The authoritative record of which normalized emails currently have access.
//! The webhook ingestor writes to it, the access validator reads from it, and
//! both must be handed the same instance.
//!
//! # Design
//!
//! - **Idempotent writes**: adding a present email or removing an absent one
//!   succeeds and reports `changed: false`
//! - **Atomic**: each operation is applied whole; a reader never sees half of
//!   a mutation, and the size returned by a write reflects that write
//! - **Swappable**: the in-memory adapter is single-process only; a
//!   multi-instance deployment needs an external store behind this trait
//!
//! # Example
//!
//! ```ignore
//! async fn grant(store: &dyn MembershipStore, email: &NormalizedEmail) -> Result<(), StoreError> {
//!     let update = store.add(email).await?;
//!     tracing::info!(changed = update.changed, members = update.members, "granted");
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::membership::NormalizedEmail;

/// Port for the shared membership set.
#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// Grant access to `email`.
    async fn add(&self, email: &NormalizedEmail) -> Result<StoreUpdate, StoreError>;

    /// Revoke access from `email`.
    async fn remove(&self, email: &NormalizedEmail) -> Result<StoreUpdate, StoreError>;

    /// Whether `email` currently has access.
    async fn contains(&self, email: &NormalizedEmail) -> Result<bool, StoreError>;

    /// Number of emails with access.
    async fn size(&self) -> Result<usize, StoreError>;
}

/// Result of a store mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreUpdate {
    /// False when the write was a no-op re-application.
    pub changed: bool,
    /// Member count right after the write.
    pub members: usize,
}

/// Errors from membership store implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Backend could not be reached or is in a bad state.
    #[error("Membership store unavailable: {0}")]
    Unavailable(String),
}
