//! Access Gate - Payment-webhook driven access control
//!
//! This crate keeps the set of customer emails entitled to a product. Order
//! notifications from the payment processor grant or revoke access, and
//! clients ask whether a given email currently has access.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
