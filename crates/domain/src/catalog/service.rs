use std::sync::Arc;

use common::{CategoryDto, EntityId, ItemDto, ProductDto};
use store::{Entity, Repository, RepositoryExt};

use crate::error::{Result, ServiceError};
use crate::services::lookup_key;
use crate::validation::{CheckError, Validatable, require_text};

use super::{Category, Item, Product};

/// Service for managing the catalog hierarchy.
///
/// Products must reference an existing category and items an existing
/// product. A category or product that still has children cannot be removed.
pub struct CatalogService {
    categories: Arc<dyn Repository<Category>>,
    products: Arc<dyn Repository<Product>>,
    items: Arc<dyn Repository<Item>>,
}

impl CatalogService {
    pub fn new(
        categories: Arc<dyn Repository<Category>>,
        products: Arc<dyn Repository<Product>>,
        items: Arc<dyn Repository<Item>>,
    ) -> Self {
        Self {
            categories,
            products,
            items,
        }
    }

    // Categories

    #[tracing::instrument(skip(self, category), fields(id = %category.id))]
    pub async fn create_category(&self, category: CategoryDto) -> Result<CategoryDto> {
        let category = Category::from(&category);
        require_text("id", category.id.as_str(), "Invalid id")?;
        category.check_data()?;

        self.categories
            .insert(category.clone())
            .await
            .map_err(ServiceError::on_create)?;

        tracing::info!(id = %category.id, "category created");
        Ok(CategoryDto::from(&category))
    }

    #[tracing::instrument(skip(self))]
    pub async fn find_category(&self, id: &str) -> Result<CategoryDto> {
        let id = lookup_key(Category::NAME, id)?;
        let category = self
            .categories
            .find(&id)
            .await
            .map_err(ServiceError::on_find)?;
        Ok(CategoryDto::from(&category))
    }

    #[tracing::instrument(skip(self))]
    pub async fn find_categories(&self) -> Result<Vec<CategoryDto>> {
        let categories = self
            .categories
            .find_all()
            .await
            .map_err(ServiceError::on_find)?;
        Ok(categories.iter().map(CategoryDto::from).collect())
    }

    #[tracing::instrument(skip(self, category), fields(id = %category.id))]
    pub async fn update_category(&self, category: CategoryDto) -> Result<()> {
        let category = Category::from(&category);
        category.check_data()?;

        self.categories
            .update(category)
            .await
            .map_err(ServiceError::on_update)
    }

    /// Removes a category that has no products.
    ///
    /// The product guard and the removal take separate locks, so a product
    /// created concurrently for this category may outlive it.
    #[tracing::instrument(skip(self))]
    pub async fn delete_category(&self, id: &str) -> Result<()> {
        let id = lookup_key(Category::NAME, id)?;
        self.categories
            .find(&id)
            .await
            .map_err(ServiceError::on_find)?;

        let products = self.products.list().await.map_err(ServiceError::on_find)?;
        if products.iter().any(|p| p.category_id == id) {
            return Err(ServiceError::Remove(format!(
                "Category {id} still has products"
            )));
        }

        self.categories
            .remove(&id)
            .await
            .map_err(ServiceError::on_remove)
    }

    // Products

    #[tracing::instrument(skip(self, product), fields(id = %product.id))]
    pub async fn create_product(&self, product: ProductDto) -> Result<ProductDto> {
        let product = Product::from(&product);
        require_text("id", product.id.as_str(), "Invalid id")?;
        product.check_data()?;
        require_reference(self.categories.as_ref(), &product.category_id, "category").await?;

        self.products
            .insert(product.clone())
            .await
            .map_err(ServiceError::on_create)?;

        tracing::info!(id = %product.id, category_id = %product.category_id, "product created");
        Ok(ProductDto::from(&product))
    }

    #[tracing::instrument(skip(self))]
    pub async fn find_product(&self, id: &str) -> Result<ProductDto> {
        let id = lookup_key(Product::NAME, id)?;
        let product = self
            .products
            .find(&id)
            .await
            .map_err(ServiceError::on_find)?;
        Ok(ProductDto::from(&product))
    }

    #[tracing::instrument(skip(self))]
    pub async fn find_products(&self) -> Result<Vec<ProductDto>> {
        let products = self
            .products
            .find_all()
            .await
            .map_err(ServiceError::on_find)?;
        Ok(products.iter().map(ProductDto::from).collect())
    }

    /// Returns the products of one category (possibly none).
    #[tracing::instrument(skip(self))]
    pub async fn find_products_in_category(&self, category_id: &str) -> Result<Vec<ProductDto>> {
        let category_id = lookup_key(Category::NAME, category_id)?;
        self.categories
            .find(&category_id)
            .await
            .map_err(ServiceError::on_find)?;

        let products = self.products.list().await.map_err(ServiceError::on_find)?;
        Ok(products
            .iter()
            .filter(|p| p.category_id == category_id)
            .map(ProductDto::from)
            .collect())
    }

    #[tracing::instrument(skip(self, product), fields(id = %product.id))]
    pub async fn update_product(&self, product: ProductDto) -> Result<()> {
        let product = Product::from(&product);
        product.check_data()?;
        require_reference(self.categories.as_ref(), &product.category_id, "category").await?;

        self.products
            .update(product)
            .await
            .map_err(ServiceError::on_update)
    }

    /// Removes a product that has no items.
    ///
    /// Same guard window as [`Self::delete_category`], for items.
    #[tracing::instrument(skip(self))]
    pub async fn delete_product(&self, id: &str) -> Result<()> {
        let id = lookup_key(Product::NAME, id)?;
        self.products
            .find(&id)
            .await
            .map_err(ServiceError::on_find)?;

        let items = self.items.list().await.map_err(ServiceError::on_find)?;
        if items.iter().any(|i| i.product_id == id) {
            return Err(ServiceError::Remove(format!("Product {id} still has items")));
        }

        self.products
            .remove(&id)
            .await
            .map_err(ServiceError::on_remove)
    }

    // Items

    #[tracing::instrument(skip(self, item), fields(id = %item.id))]
    pub async fn create_item(&self, item: ItemDto) -> Result<ItemDto> {
        let item = Item::from(&item);
        require_text("id", item.id.as_str(), "Invalid id")?;
        item.check_data()?;
        require_reference(self.products.as_ref(), &item.product_id, "product").await?;

        self.items
            .insert(item.clone())
            .await
            .map_err(ServiceError::on_create)?;

        tracing::info!(id = %item.id, unit_cost = %item.unit_cost, "item created");
        Ok(ItemDto::from(&item))
    }

    #[tracing::instrument(skip(self))]
    pub async fn find_item(&self, id: &str) -> Result<ItemDto> {
        let id = lookup_key(Item::NAME, id)?;
        let item = self.items.find(&id).await.map_err(ServiceError::on_find)?;
        Ok(ItemDto::from(&item))
    }

    #[tracing::instrument(skip(self))]
    pub async fn find_items(&self) -> Result<Vec<ItemDto>> {
        let items = self.items.find_all().await.map_err(ServiceError::on_find)?;
        Ok(items.iter().map(ItemDto::from).collect())
    }

    /// Returns the items of one product (possibly none).
    #[tracing::instrument(skip(self))]
    pub async fn find_items_in_product(&self, product_id: &str) -> Result<Vec<ItemDto>> {
        let product_id = lookup_key(Product::NAME, product_id)?;
        self.products
            .find(&product_id)
            .await
            .map_err(ServiceError::on_find)?;

        let items = self.items.list().await.map_err(ServiceError::on_find)?;
        Ok(items
            .iter()
            .filter(|i| i.product_id == product_id)
            .map(ItemDto::from)
            .collect())
    }

    /// Case-insensitive search on item id and name.
    #[tracing::instrument(skip(self))]
    pub async fn search_items(&self, keyword: &str) -> Result<Vec<ItemDto>> {
        let keyword = keyword.trim().to_lowercase();
        let items = self.items.list().await.map_err(ServiceError::on_find)?;
        Ok(items
            .iter()
            .filter(|i| {
                i.id.as_str().to_lowercase().contains(&keyword)
                    || i.name.to_lowercase().contains(&keyword)
            })
            .map(ItemDto::from)
            .collect())
    }

    #[tracing::instrument(skip(self, item), fields(id = %item.id))]
    pub async fn update_item(&self, item: ItemDto) -> Result<()> {
        let item = Item::from(&item);
        item.check_data()?;
        require_reference(self.products.as_ref(), &item.product_id, "product").await?;

        self.items
            .update(item)
            .await
            .map_err(ServiceError::on_update)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_item(&self, id: &str) -> Result<()> {
        let id = lookup_key(Item::NAME, id)?;
        self.items
            .remove(&id)
            .await
            .map_err(ServiceError::on_remove)
    }
}

/// Fails with a `Check` error unless `id` resolves in `repo`.
async fn require_reference<E: Entity>(
    repo: &dyn Repository<E>,
    id: &EntityId,
    field: &'static str,
) -> Result<()> {
    if repo.exists(id).await.map_err(ServiceError::on_find)? {
        Ok(())
    } else {
        Err(CheckError::new(field, format!("Unknown {field}: {id}")).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use common::Money;
    use store::InMemoryRepository;

    fn create_service() -> CatalogService {
        CatalogService::new(
            Arc::new(InMemoryRepository::new()),
            Arc::new(InMemoryRepository::new()),
            Arc::new(InMemoryRepository::new()),
        )
    }

    async fn seed(service: &CatalogService) {
        service
            .create_category(CategoryDto::new("cat42", "name42", "description42"))
            .await
            .unwrap();
        service
            .create_product(ProductDto::new("prod42", "name42", "description42", "cat42"))
            .await
            .unwrap();
        service
            .create_item(ItemDto::new("item42", "name42", Money::from_units(42), "prod42"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn create_hierarchy_and_navigate_it() {
        let service = create_service();
        seed(&service).await;

        let products = service.find_products_in_category("cat42").await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, "prod42");

        let items = service.find_items_in_product("prod42").await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].unit_cost, Money::from_units(42));
    }

    #[tokio::test]
    async fn product_with_unknown_category_fails_check() {
        let service = create_service();
        let err = service
            .create_product(ProductDto::new("prod1", "name", "description", "nowhere"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Check);
        assert!(service.find_products().await.is_err());
    }

    #[tokio::test]
    async fn item_with_unknown_product_fails_check() {
        let service = create_service();
        let err = service
            .create_item(ItemDto::new("item1", "name", Money::from_units(1), "nowhere"))
            .await
            .unwrap_err();
        match err {
            ServiceError::Check(check) => assert_eq!(check.field, "product"),
            other => panic!("expected check error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn find_with_invalid_ids_is_not_found() {
        let service = create_service();
        seed(&service).await;

        for id in ["", "unknown"] {
            assert_eq!(
                service.find_category(id).await.unwrap_err().kind(),
                ErrorKind::ObjectNotFound
            );
            assert_eq!(
                service.find_product(id).await.unwrap_err().kind(),
                ErrorKind::ObjectNotFound
            );
            assert_eq!(
                service.find_item(id).await.unwrap_err().kind(),
                ErrorKind::ObjectNotFound
            );
        }
    }

    #[tokio::test]
    async fn find_all_on_empty_catalog_is_not_found() {
        let service = create_service();
        assert_eq!(
            service.find_categories().await.unwrap_err().kind(),
            ErrorKind::ObjectNotFound
        );
        assert_eq!(
            service.find_items().await.unwrap_err().kind(),
            ErrorKind::ObjectNotFound
        );
    }

    #[tokio::test]
    async fn search_matches_id_and_name_case_insensitively() {
        let service = create_service();
        seed(&service).await;
        service
            .create_item(ItemDto::new("item43", "Spotted Koi", Money::from_units(10), "prod42"))
            .await
            .unwrap();

        assert_eq!(service.search_items("KOI").await.unwrap().len(), 1);
        assert_eq!(service.search_items("item4").await.unwrap().len(), 2);
        assert!(service.search_items("parrot").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn parents_with_children_cannot_be_deleted() {
        let service = create_service();
        seed(&service).await;

        let err = service.delete_category("cat42").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Remove);
        let err = service.delete_product("prod42").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Remove);

        service.delete_item("item42").await.unwrap();
        service.delete_product("prod42").await.unwrap();
        service.delete_category("cat42").await.unwrap();
        assert_eq!(
            service.find_category("cat42").await.unwrap_err().kind(),
            ErrorKind::ObjectNotFound
        );
    }

    #[tokio::test]
    async fn update_item_changes_price_and_checks_product() {
        let service = create_service();
        seed(&service).await;

        let mut item = service.find_item("item42").await.unwrap();
        item.unit_cost = Money::from_units(50);
        service.update_item(item.clone()).await.unwrap();
        assert_eq!(
            service.find_item("item42").await.unwrap().unit_cost,
            Money::from_units(50)
        );

        item.product_id = "nowhere".to_string();
        let err = service.update_item(item).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Check);
    }

    #[tokio::test]
    async fn update_unknown_category_fails_check() {
        let service = create_service();
        let err = service
            .update_category(CategoryDto::new("ghost", "name", "description"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Check);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn racing_product_create_and_category_delete_settle_consistently() {
        for _ in 0..20 {
            let service = Arc::new(create_service());
            service
                .create_category(CategoryDto::new("cat1", "name", "description"))
                .await
                .unwrap();

            let creator = {
                let service = service.clone();
                tokio::spawn(async move {
                    service
                        .create_product(ProductDto::new("prod1", "name", "description", "cat1"))
                        .await
                })
            };
            let deleted = service.delete_category("cat1").await;
            let created = creator.await.unwrap();

            match (&created, &deleted) {
                // Guard saw the product: the category survives
                (Ok(_), Err(err)) => {
                    assert_eq!(err.kind(), ErrorKind::Remove);
                    assert!(service.find_category("cat1").await.is_ok());
                }
                // Delete won before the reference check
                (Err(err), Ok(())) => assert_eq!(err.kind(), ErrorKind::Check),
                // Create slipped between guard and removal: product outlives its category
                (Ok(_), Ok(())) => {
                    assert!(service.find_product("prod1").await.is_ok());
                    assert_eq!(
                        service.find_category("cat1").await.unwrap_err().kind(),
                        ErrorKind::ObjectNotFound
                    );
                }
                (Err(create), Err(delete)) => {
                    panic!("both calls failed: {create:?} / {delete:?}")
                }
            }
        }
    }
}
