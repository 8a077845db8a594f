//! Ports - interfaces the application layer depends on.
//!
//! Adapters in `crate::adapters` provide the implementations.

mod membership_store;

pub use membership_store::{MembershipStore, StoreError, StoreUpdate};
