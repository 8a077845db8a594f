//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `membership` - Membership store implementations (in-memory)
//! - `http` - Axum REST API

pub mod http;
pub mod membership;

pub use membership::InMemoryMembershipStore;
