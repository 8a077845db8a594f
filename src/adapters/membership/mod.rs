//! Membership adapters - implementations of membership-related ports.
//!
//! - `InMemoryMembershipStore` - Single-process membership set

mod in_memory_store;

pub use in_memory_store::InMemoryMembershipStore;
