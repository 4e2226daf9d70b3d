//! Customers who place orders.

mod service;

pub use service::CustomerService;

use common::{CustomerDto, EntityId, Identifiable};
use store::Entity;

use crate::validation::{CheckError, Validatable, require_text};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub telephone: String,
}

impl Customer {
    pub fn new(
        id: impl Into<EntityId>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: String::new(),
            telephone: String::new(),
        }
    }
}

impl Identifiable for Customer {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Entity for Customer {
    const NAME: &'static str = "Customer";
}

impl Validatable for Customer {
    fn check_data(&self) -> Result<(), CheckError> {
        require_text("first_name", &self.first_name, "Invalid customer first name")?;
        require_text("last_name", &self.last_name, "Invalid customer last name")
    }
}

impl From<&CustomerDto> for Customer {
    fn from(dto: &CustomerDto) -> Self {
        Self {
            id: EntityId::new(dto.id.trim()),
            first_name: dto.first_name.clone(),
            last_name: dto.last_name.clone(),
            email: dto.email.clone(),
            telephone: dto.telephone.clone(),
        }
    }
}

impl From<&Customer> for CustomerDto {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id.to_string(),
            first_name: customer.first_name.clone(),
            last_name: customer.last_name.clone(),
            email: customer.email.clone(),
            telephone: customer.telephone.clone(),
        }
    }
}
