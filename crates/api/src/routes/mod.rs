//! HTTP handlers, one module per endpoint family.

pub mod catalog;
pub mod customers;
pub mod health;
pub mod metrics;
pub mod orders;
