//! Shared types for the order-processing system.
//!
//! - [`EntityId`] and the [`Identifiable`] capability used by every entity
//! - [`Money`] decimal amounts
//! - [`dto`] flat transfer objects that cross process boundaries

pub mod dto;
pub mod types;

pub use dto::{CategoryDto, CustomerDto, ItemDto, OrderDto, OrderLineDto, ProductDto};
pub use types::{EntityId, Identifiable, Money};
