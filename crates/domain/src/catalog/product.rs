use common::{EntityId, Identifiable, ProductDto};
use store::Entity;

use crate::validation::{CheckError, Validatable, require_text};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: EntityId,
    pub name: String,
    pub description: String,
    pub category_id: EntityId,
}

impl Identifiable for Product {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Entity for Product {
    const NAME: &'static str = "Product";
}

impl Validatable for Product {
    fn check_data(&self) -> Result<(), CheckError> {
        require_text("name", &self.name, "Invalid name")?;
        require_text("description", &self.description, "Invalid description")?;
        require_text("category", self.category_id.as_str(), "Invalid category")
    }
}

impl From<&ProductDto> for Product {
    fn from(dto: &ProductDto) -> Self {
        Self {
            id: EntityId::new(dto.id.trim()),
            name: dto.name.clone(),
            description: dto.description.clone(),
            category_id: EntityId::new(dto.category_id.trim()),
        }
    }
}

impl From<&Product> for ProductDto {
    fn from(product: &Product) -> Self {
        Self::new(
            product.id.as_str(),
            product.name.as_str(),
            product.description.as_str(),
            product.category_id.as_str(),
        )
    }
}
