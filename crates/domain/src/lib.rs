//! Domain layer for the order-processing system.
//!
//! This crate provides:
//! - Entities (customer, catalog hierarchy, order with its lines) and the
//!   `Validatable` rules each one enforces
//! - Credit card format and expiry validation
//! - Services for customers and the catalog
//! - `OrderService`, which assembles and persists order aggregates

pub mod catalog;
pub mod clock;
pub mod credit_card;
pub mod customer;
pub mod error;
pub mod order;
pub mod services;
pub mod validation;

pub use catalog::{CatalogService, Category, Item, Product};
pub use clock::{Clock, FixedClock, SystemClock};
pub use credit_card::{CardType, CreditCard, CreditCardValidator};
pub use customer::{Customer, CustomerService};
pub use error::{ErrorKind, Result, ServiceError};
pub use order::{Order, OrderLine, OrderRecord, OrderService, ShippingAddress};
pub use services::{Services, Stores};
pub use validation::{CheckError, Validatable};
