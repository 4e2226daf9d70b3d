//! Assembly and persistence of order aggregates.

use std::sync::Arc;

use common::{EntityId, OrderDto};
use store::{AggregateRepository, Entity, Repository, RepositoryExt, StoreError};

use crate::catalog::Item;
use crate::clock::Clock;
use crate::credit_card::CreditCardValidator;
use crate::customer::Customer;
use crate::error::{Result, ServiceError};
use crate::services::lookup_key;
use crate::validation::{CheckError, Validatable};

use super::{Order, OrderLine, record_from_dto, record_to_dto};

/// Service for creating, reading, updating and deleting orders.
///
/// An order is only written once every rule has passed: its own fields, the
/// customer and item references, and the credit card block when present.
/// The order and its lines are persisted in a single store write.
pub struct OrderService {
    orders: Arc<dyn AggregateRepository<Order, OrderLine>>,
    customers: Arc<dyn Repository<Customer>>,
    items: Arc<dyn Repository<Item>>,
    card_validator: CreditCardValidator,
    clock: Arc<dyn Clock>,
}

impl OrderService {
    pub fn new(
        orders: Arc<dyn AggregateRepository<Order, OrderLine>>,
        customers: Arc<dyn Repository<Customer>>,
        items: Arc<dyn Repository<Item>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            orders,
            customers,
            items,
            card_validator: CreditCardValidator::new(clock.clone()),
            clock,
        }
    }

    /// Validates and persists a new order with its lines.
    ///
    /// Any id on the input is ignored; the order and each line get fresh
    /// ids, line prices are copied from the items and the order date is
    /// stamped. Returns the stored order.
    #[tracing::instrument(skip(self, order), fields(customer_id = %order.customer_id))]
    pub async fn create_order(&self, order: OrderDto) -> Result<OrderDto> {
        let start = std::time::Instant::now();

        match self.assemble_and_insert(&order).await {
            Ok(created) => {
                metrics::counter!("orders_created_total").increment(1);
                metrics::histogram!("order_creation_duration_seconds")
                    .record(start.elapsed().as_secs_f64());
                tracing::info!(
                    order_id = %created.id,
                    lines = created.order_lines.len(),
                    "order created"
                );
                Ok(created)
            }
            Err(err) => {
                metrics::counter!("orders_rejected_total").increment(1);
                tracing::warn!(kind = ?err.kind(), error = %err, "order rejected");
                Err(err)
            }
        }
    }

    /// Customer and item lookups run before the insert under their own
    /// locks; an entity removed in between is not rechecked.
    async fn assemble_and_insert(&self, dto: &OrderDto) -> Result<OrderDto> {
        let mut record = record_from_dto(dto);
        record.check_data()?;

        let customer_id = &record.root.customer_id;
        if !self
            .customers
            .exists(customer_id)
            .await
            .map_err(ServiceError::on_find)?
        {
            return Err(
                CheckError::new("customer", format!("Unknown customer: {customer_id}")).into(),
            );
        }

        for line in &mut record.children {
            let item = match self.items.find(&line.item_id).await {
                Ok(item) => item,
                Err(StoreError::NotFound { id, .. }) => {
                    return Err(CheckError::new("item", format!("Unknown item: {id}")).into());
                }
                Err(e) => return Err(ServiceError::on_find(e)),
            };
            line.unit_price = item.unit_cost;
        }

        if let Some(card) = &record.root.credit_card {
            self.card_validator.validate(card)?;
        }

        let order_id = self
            .orders
            .unique_id()
            .await
            .map_err(ServiceError::on_create)?;
        for (n, line) in record.children.iter_mut().enumerate() {
            line.id = EntityId::new(format!("{order_id}-{}", n + 1));
        }
        record.root.id = order_id;
        record.root.order_date = Some(self.clock.today());

        self.orders
            .insert(record.clone())
            .await
            .map_err(ServiceError::on_create)?;

        Ok(record_to_dto(&record))
    }

    #[tracing::instrument(skip(self))]
    pub async fn find_order(&self, id: &str) -> Result<OrderDto> {
        let id = lookup_key(Order::NAME, id)?;
        let record = self.orders.find(&id).await.map_err(ServiceError::on_find)?;
        Ok(record_to_dto(&record))
    }

    /// Returns every order; fails with `ObjectNotFound` when there are none.
    #[tracing::instrument(skip(self))]
    pub async fn find_orders(&self) -> Result<Vec<OrderDto>> {
        let records = self.orders.find_all().await.map_err(ServiceError::on_find)?;
        Ok(records.iter().map(record_to_dto).collect())
    }

    /// Returns the orders placed by one customer (possibly none).
    #[tracing::instrument(skip(self))]
    pub async fn find_orders_for_customer(&self, customer_id: &str) -> Result<Vec<OrderDto>> {
        let customer_id = lookup_key(Customer::NAME, customer_id)?;
        self.customers
            .find(&customer_id)
            .await
            .map_err(ServiceError::on_find)?;

        let records = match self.orders.find_all().await {
            Ok(records) => records,
            Err(StoreError::Empty { .. }) => Vec::new(),
            Err(e) => return Err(ServiceError::on_find(e)),
        };
        Ok(records
            .iter()
            .filter(|r| r.root.customer_id == customer_id)
            .map(record_to_dto)
            .collect())
    }

    /// Replaces the shipping address and payment block of a stored order.
    ///
    /// The customer, order date and lines are fixed at creation.
    #[tracing::instrument(skip(self, order), fields(id = %order.id))]
    pub async fn update_order(&self, order: OrderDto) -> Result<()> {
        let changes = Order::from(&order);
        changes.shipping.check_data()?;
        if let Some(card) = &changes.credit_card {
            self.card_validator.validate(card)?;
        }

        let mut stored = match self.orders.find(&changes.id).await {
            Ok(record) => record.root,
            Err(StoreError::NotFound { entity, id }) => {
                return Err(CheckError::new("id", format!("{entity} {id} does not exist")).into());
            }
            Err(e) => return Err(ServiceError::on_find(e)),
        };
        stored.shipping = changes.shipping;
        stored.credit_card = changes.credit_card;

        self.orders
            .update_root(stored)
            .await
            .map_err(ServiceError::on_update)?;

        tracing::info!(id = %changes.id, "order updated");
        Ok(())
    }

    /// Removes an order and all of its lines.
    #[tracing::instrument(skip(self))]
    pub async fn delete_order(&self, id: &str) -> Result<()> {
        let id = lookup_key(Order::NAME, id)?;
        self.orders
            .remove(&id)
            .await
            .map_err(ServiceError::on_remove)?;

        metrics::counter!("orders_deleted_total").increment(1);
        tracing::info!(%id, "order deleted");
        Ok(())
    }
}
