use common::{CategoryDto, EntityId, Identifiable};
use store::Entity;

use crate::validation::{CheckError, Validatable, require_text};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: EntityId,
    pub name: String,
    pub description: String,
}

impl Identifiable for Category {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Entity for Category {
    const NAME: &'static str = "Category";
}

impl Validatable for Category {
    fn check_data(&self) -> Result<(), CheckError> {
        require_text("name", &self.name, "Invalid name")?;
        require_text("description", &self.description, "Invalid description")
    }
}

impl From<&CategoryDto> for Category {
    fn from(dto: &CategoryDto) -> Self {
        Self {
            id: EntityId::new(dto.id.trim()),
            name: dto.name.clone(),
            description: dto.description.clone(),
        }
    }
}

impl From<&Category> for CategoryDto {
    fn from(category: &Category) -> Self {
        Self::new(
            category.id.as_str(),
            category.name.as_str(),
            category.description.as_str(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules_run_in_field_order() {
        let category = Category::from(&CategoryDto::new("cat1", "", ""));
        assert_eq!(category.check_data().unwrap_err().field, "name");

        let category = Category::from(&CategoryDto::new("cat1", "Fish", ""));
        assert_eq!(category.check_data().unwrap_err().field, "description");

        let category = Category::from(&CategoryDto::new("cat1", "Fish", "Aquatic pets"));
        assert!(category.check_data().is_ok());
    }
}
