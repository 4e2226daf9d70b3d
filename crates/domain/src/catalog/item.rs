use common::{EntityId, Identifiable, ItemDto, Money};
use store::Entity;

use crate::validation::{CheckError, Validatable, require_text};

/// A purchasable variant of a product, with its own price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: EntityId,
    pub name: String,
    pub unit_cost: Money,
    pub image_path: String,
    pub product_id: EntityId,
}

impl Identifiable for Item {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Entity for Item {
    const NAME: &'static str = "Item";
}

impl Validatable for Item {
    fn check_data(&self) -> Result<(), CheckError> {
        require_text("name", &self.name, "Invalid name")?;
        if !self.unit_cost.is_positive() {
            return Err(CheckError::new("unit_cost", "Invalid unit cost"));
        }
        require_text("product", self.product_id.as_str(), "Invalid product")
    }
}

impl From<&ItemDto> for Item {
    fn from(dto: &ItemDto) -> Self {
        Self {
            id: EntityId::new(dto.id.trim()),
            name: dto.name.clone(),
            unit_cost: dto.unit_cost,
            image_path: dto.image_path.clone(),
            product_id: EntityId::new(dto.product_id.trim()),
        }
    }
}

impl From<&Item> for ItemDto {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            unit_cost: item.unit_cost,
            image_path: item.image_path.clone(),
            product_id: item.product_id.to_string(),
        }
    }
}
