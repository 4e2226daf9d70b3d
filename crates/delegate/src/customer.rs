//! Customer delegate.

use std::sync::Arc;

use async_trait::async_trait;
use common::CustomerDto;
use domain::CustomerService;

use crate::config::AccessMode;
use crate::error::Result;
use crate::precheck::{require_id, require_update_id};
use crate::transport::{RemoteService, segment};

/// Business operations on customers.
#[async_trait]
pub trait CustomerDelegate: Send + Sync {
    fn mode(&self) -> AccessMode;

    async fn create_customer(&self, customer: CustomerDto) -> Result<CustomerDto>;

    async fn find_customer(&self, id: &str) -> Result<CustomerDto>;

    async fn find_customers(&self) -> Result<Vec<CustomerDto>>;

    async fn update_customer(&self, customer: CustomerDto) -> Result<()>;

    async fn delete_customer(&self, id: &str) -> Result<()>;
}

pub struct LocalCustomerDelegate {
    service: Arc<CustomerService>,
}

impl LocalCustomerDelegate {
    pub fn new(service: Arc<CustomerService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl CustomerDelegate for LocalCustomerDelegate {
    fn mode(&self) -> AccessMode {
        AccessMode::Local
    }

    async fn create_customer(&self, customer: CustomerDto) -> Result<CustomerDto> {
        Ok(self.service.create_customer(customer).await?)
    }

    async fn find_customer(&self, id: &str) -> Result<CustomerDto> {
        Ok(self.service.find_customer(id).await?)
    }

    async fn find_customers(&self) -> Result<Vec<CustomerDto>> {
        Ok(self.service.find_customers().await?)
    }

    async fn update_customer(&self, customer: CustomerDto) -> Result<()> {
        Ok(self.service.update_customer(customer).await?)
    }

    async fn delete_customer(&self, id: &str) -> Result<()> {
        Ok(self.service.delete_customer(id).await?)
    }
}

pub struct RemoteCustomerDelegate {
    remote: RemoteService,
}

impl RemoteCustomerDelegate {
    pub(crate) fn new(remote: RemoteService) -> Self {
        Self { remote }
    }
}

#[async_trait]
impl CustomerDelegate for RemoteCustomerDelegate {
    fn mode(&self) -> AccessMode {
        AccessMode::Remote
    }

    #[tracing::instrument(skip(self, customer), fields(id = %customer.id))]
    async fn create_customer(&self, customer: CustomerDto) -> Result<CustomerDto> {
        self.remote.post("/customers", &customer).await
    }

    #[tracing::instrument(skip(self))]
    async fn find_customer(&self, id: &str) -> Result<CustomerDto> {
        require_id("Customer", id)?;
        self.remote.get(&format!("/customers/{}", segment(id))).await
    }

    #[tracing::instrument(skip(self))]
    async fn find_customers(&self) -> Result<Vec<CustomerDto>> {
        self.remote.get("/customers").await
    }

    #[tracing::instrument(skip(self, customer), fields(id = %customer.id))]
    async fn update_customer(&self, customer: CustomerDto) -> Result<()> {
        require_update_id("Customer", &customer.id)?;
        self.remote
            .put(&format!("/customers/{}", segment(&customer.id)), &customer)
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_customer(&self, id: &str) -> Result<()> {
        require_id("Customer", id)?;
        self.remote
            .delete(&format!("/customers/{}", segment(id)))
            .await
    }
}
