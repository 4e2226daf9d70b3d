use std::sync::Arc;

use common::CustomerDto;
use store::{Entity, Repository};

use crate::error::{Result, ServiceError};
use crate::services::lookup_key;
use crate::validation::{Validatable, require_text};

use super::Customer;

/// Service for managing customers.
pub struct CustomerService {
    customers: Arc<dyn Repository<Customer>>,
}

impl CustomerService {
    pub fn new(customers: Arc<dyn Repository<Customer>>) -> Self {
        Self { customers }
    }

    #[tracing::instrument(skip(self, customer), fields(id = %customer.id))]
    pub async fn create_customer(&self, customer: CustomerDto) -> Result<CustomerDto> {
        let customer = Customer::from(&customer);
        require_text("id", customer.id.as_str(), "Invalid id")?;
        customer.check_data()?;

        self.customers
            .insert(customer.clone())
            .await
            .map_err(ServiceError::on_create)?;

        tracing::info!(id = %customer.id, "customer created");
        Ok(CustomerDto::from(&customer))
    }

    #[tracing::instrument(skip(self))]
    pub async fn find_customer(&self, id: &str) -> Result<CustomerDto> {
        let id = lookup_key(Customer::NAME, id)?;
        let customer = self
            .customers
            .find(&id)
            .await
            .map_err(ServiceError::on_find)?;
        Ok(CustomerDto::from(&customer))
    }

    /// Returns every customer; fails with `ObjectNotFound` when there are none.
    #[tracing::instrument(skip(self))]
    pub async fn find_customers(&self) -> Result<Vec<CustomerDto>> {
        let customers = self
            .customers
            .find_all()
            .await
            .map_err(ServiceError::on_find)?;
        Ok(customers.iter().map(CustomerDto::from).collect())
    }

    #[tracing::instrument(skip(self, customer), fields(id = %customer.id))]
    pub async fn update_customer(&self, customer: CustomerDto) -> Result<()> {
        let customer = Customer::from(&customer);
        customer.check_data()?;

        self.customers
            .update(customer)
            .await
            .map_err(ServiceError::on_update)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_customer(&self, id: &str) -> Result<()> {
        let id = lookup_key(Customer::NAME, id)?;
        self.customers
            .remove(&id)
            .await
            .map_err(ServiceError::on_remove)?;

        tracing::info!(%id, "customer deleted");
        Ok(())
    }
}
