//! Wiring of stores and services.

use std::sync::Arc;

use common::EntityId;
use store::{AggregateRepository, InMemoryAggregateRepository, InMemoryRepository, Repository};

use crate::catalog::{CatalogService, Category, Item, Product};
use crate::clock::Clock;
use crate::customer::{Customer, CustomerService};
use crate::error::{Result, ServiceError};
use crate::order::{Order, OrderLine, OrderService};

/// Turns a caller-supplied id into a store key.
///
/// Blank ids can never resolve, so they fail the same way an unknown id does.
pub(crate) fn lookup_key(entity: &'static str, id: &str) -> Result<EntityId> {
    let key = EntityId::new(id.trim());
    if key.is_blank() {
        return Err(ServiceError::not_found(entity, ""));
    }
    Ok(key)
}

/// Every repository the services read and write.
#[derive(Clone)]
pub struct Stores {
    pub customers: Arc<dyn Repository<Customer>>,
    pub categories: Arc<dyn Repository<Category>>,
    pub products: Arc<dyn Repository<Product>>,
    pub items: Arc<dyn Repository<Item>>,
    pub orders: Arc<dyn AggregateRepository<Order, OrderLine>>,
}

impl Stores {
    /// Empty in-memory stores.
    pub fn in_memory() -> Self {
        Self {
            customers: Arc::new(InMemoryRepository::<Customer>::new()),
            categories: Arc::new(InMemoryRepository::<Category>::new()),
            products: Arc::new(InMemoryRepository::<Product>::new()),
            items: Arc::new(InMemoryRepository::<Item>::new()),
            orders: Arc::new(InMemoryAggregateRepository::<Order, OrderLine>::new()),
        }
    }
}

/// The three business services sharing one set of stores.
#[derive(Clone)]
pub struct Services {
    pub orders: Arc<OrderService>,
    pub catalog: Arc<CatalogService>,
    pub customers: Arc<CustomerService>,
}

impl Services {
    pub fn new(stores: Stores, clock: Arc<dyn Clock>) -> Self {
        let orders = OrderService::new(
            stores.orders,
            stores.customers.clone(),
            stores.items.clone(),
            clock,
        );
        Self {
            orders: Arc::new(orders),
            catalog: Arc::new(CatalogService::new(
                stores.categories,
                stores.products,
                stores.items,
            )),
            customers: Arc::new(CustomerService::new(stores.customers)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn blank_lookup_key_is_not_found() {
        for id in ["", "   "] {
            let err = lookup_key("Order", id).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ObjectNotFound);
        }
    }

    #[test]
    fn lookup_key_trims() {
        assert_eq!(lookup_key("Order", " o1 ").unwrap(), EntityId::new("o1"));
    }
}
