//! Order delegate: one interface, local or remote execution.

use std::sync::Arc;

use async_trait::async_trait;
use common::OrderDto;
use domain::OrderService;

use crate::config::AccessMode;
use crate::error::Result;
use crate::precheck::{require_id, require_update_id};
use crate::transport::{RemoteService, segment};

/// Business operations on orders.
#[async_trait]
pub trait OrderDelegate: Send + Sync {
    fn mode(&self) -> AccessMode;

    async fn create_order(&self, order: OrderDto) -> Result<OrderDto>;

    async fn find_order(&self, id: &str) -> Result<OrderDto>;

    async fn find_orders(&self) -> Result<Vec<OrderDto>>;

    async fn find_orders_for_customer(&self, customer_id: &str) -> Result<Vec<OrderDto>>;

    async fn update_order(&self, order: OrderDto) -> Result<()>;

    async fn delete_order(&self, id: &str) -> Result<()>;
}

/// Calls the order service in-process.
pub struct LocalOrderDelegate {
    service: Arc<OrderService>,
}

impl LocalOrderDelegate {
    pub fn new(service: Arc<OrderService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl OrderDelegate for LocalOrderDelegate {
    fn mode(&self) -> AccessMode {
        AccessMode::Local
    }

    async fn create_order(&self, order: OrderDto) -> Result<OrderDto> {
        Ok(self.service.create_order(order).await?)
    }

    async fn find_order(&self, id: &str) -> Result<OrderDto> {
        Ok(self.service.find_order(id).await?)
    }

    async fn find_orders(&self) -> Result<Vec<OrderDto>> {
        Ok(self.service.find_orders().await?)
    }

    async fn find_orders_for_customer(&self, customer_id: &str) -> Result<Vec<OrderDto>> {
        Ok(self.service.find_orders_for_customer(customer_id).await?)
    }

    async fn update_order(&self, order: OrderDto) -> Result<()> {
        Ok(self.service.update_order(order).await?)
    }

    async fn delete_order(&self, id: &str) -> Result<()> {
        Ok(self.service.delete_order(id).await?)
    }
}

/// Calls the order endpoint bound in the registry.
///
/// Blank ids are rejected before any lookup, with the same error the
/// service would return.
pub struct RemoteOrderDelegate {
    remote: RemoteService,
}

impl RemoteOrderDelegate {
    pub(crate) fn new(remote: RemoteService) -> Self {
        Self { remote }
    }
}

#[async_trait]
impl OrderDelegate for RemoteOrderDelegate {
    fn mode(&self) -> AccessMode {
        AccessMode::Remote
    }

    #[tracing::instrument(skip(self, order))]
    async fn create_order(&self, order: OrderDto) -> Result<OrderDto> {
        self.remote.post("/orders", &order).await
    }

    #[tracing::instrument(skip(self))]
    async fn find_order(&self, id: &str) -> Result<OrderDto> {
        require_id("Order", id)?;
        self.remote.get(&format!("/orders/{}", segment(id))).await
    }

    #[tracing::instrument(skip(self))]
    async fn find_orders(&self) -> Result<Vec<OrderDto>> {
        self.remote.get("/orders").await
    }

    #[tracing::instrument(skip(self))]
    async fn find_orders_for_customer(&self, customer_id: &str) -> Result<Vec<OrderDto>> {
        require_id("Customer", customer_id)?;
        self.remote
            .get(&format!("/customers/{}/orders", segment(customer_id)))
            .await
    }

    #[tracing::instrument(skip(self, order), fields(id = %order.id))]
    async fn update_order(&self, order: OrderDto) -> Result<()> {
        require_update_id("Order", &order.id)?;
        self.remote
            .put(&format!("/orders/{}", segment(&order.id)), &order)
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_order(&self, id: &str) -> Result<()> {
        require_id("Order", id)?;
        self.remote.delete(&format!("/orders/{}", segment(id))).await
    }
}
