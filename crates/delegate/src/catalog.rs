//! Catalog delegate covering categories, products and items.

use std::sync::Arc;

use async_trait::async_trait;
use common::{CategoryDto, ItemDto, ProductDto};
use domain::CatalogService;

use crate::config::AccessMode;
use crate::error::Result;
use crate::precheck::{require_id, require_update_id};
use crate::transport::{RemoteService, segment};

/// Business operations on the catalog.
#[async_trait]
pub trait CatalogDelegate: Send + Sync {
    fn mode(&self) -> AccessMode;

    async fn create_category(&self, category: CategoryDto) -> Result<CategoryDto>;
    async fn find_category(&self, id: &str) -> Result<CategoryDto>;
    async fn find_categories(&self) -> Result<Vec<CategoryDto>>;
    async fn update_category(&self, category: CategoryDto) -> Result<()>;
    async fn delete_category(&self, id: &str) -> Result<()>;

    async fn create_product(&self, product: ProductDto) -> Result<ProductDto>;
    async fn find_product(&self, id: &str) -> Result<ProductDto>;
    async fn find_products(&self) -> Result<Vec<ProductDto>>;
    async fn find_products_in_category(&self, category_id: &str) -> Result<Vec<ProductDto>>;
    async fn update_product(&self, product: ProductDto) -> Result<()>;
    async fn delete_product(&self, id: &str) -> Result<()>;

    async fn create_item(&self, item: ItemDto) -> Result<ItemDto>;
    async fn find_item(&self, id: &str) -> Result<ItemDto>;
    async fn find_items(&self) -> Result<Vec<ItemDto>>;
    async fn find_items_in_product(&self, product_id: &str) -> Result<Vec<ItemDto>>;
    async fn search_items(&self, keyword: &str) -> Result<Vec<ItemDto>>;
    async fn update_item(&self, item: ItemDto) -> Result<()>;
    async fn delete_item(&self, id: &str) -> Result<()>;
}

pub struct LocalCatalogDelegate {
    service: Arc<CatalogService>,
}

impl LocalCatalogDelegate {
    pub fn new(service: Arc<CatalogService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl CatalogDelegate for LocalCatalogDelegate {
    fn mode(&self) -> AccessMode {
        AccessMode::Local
    }

    async fn create_category(&self, category: CategoryDto) -> Result<CategoryDto> {
        Ok(self.service.create_category(category).await?)
    }

    async fn find_category(&self, id: &str) -> Result<CategoryDto> {
        Ok(self.service.find_category(id).await?)
    }

    async fn find_categories(&self) -> Result<Vec<CategoryDto>> {
        Ok(self.service.find_categories().await?)
    }

    async fn update_category(&self, category: CategoryDto) -> Result<()> {
        Ok(self.service.update_category(category).await?)
    }

    async fn delete_category(&self, id: &str) -> Result<()> {
        Ok(self.service.delete_category(id).await?)
    }

    async fn create_product(&self, product: ProductDto) -> Result<ProductDto> {
        Ok(self.service.create_product(product).await?)
    }

    async fn find_product(&self, id: &str) -> Result<ProductDto> {
        Ok(self.service.find_product(id).await?)
    }

    async fn find_products(&self) -> Result<Vec<ProductDto>> {
        Ok(self.service.find_products().await?)
    }

    async fn find_products_in_category(&self, category_id: &str) -> Result<Vec<ProductDto>> {
        Ok(self.service.find_products_in_category(category_id).await?)
    }

    async fn update_product(&self, product: ProductDto) -> Result<()> {
        Ok(self.service.update_product(product).await?)
    }

    async fn delete_product(&self, id: &str) -> Result<()> {
        Ok(self.service.delete_product(id).await?)
    }

    async fn create_item(&self, item: ItemDto) -> Result<ItemDto> {
        Ok(self.service.create_item(item).await?)
    }

    async fn find_item(&self, id: &str) -> Result<ItemDto> {
        Ok(self.service.find_item(id).await?)
    }

    async fn find_items(&self) -> Result<Vec<ItemDto>> {
        Ok(self.service.find_items().await?)
    }

    async fn find_items_in_product(&self, product_id: &str) -> Result<Vec<ItemDto>> {
        Ok(self.service.find_items_in_product(product_id).await?)
    }

    async fn search_items(&self, keyword: &str) -> Result<Vec<ItemDto>> {
        Ok(self.service.search_items(keyword).await?)
    }

    async fn update_item(&self, item: ItemDto) -> Result<()> {
        Ok(self.service.update_item(item).await?)
    }

    async fn delete_item(&self, id: &str) -> Result<()> {
        Ok(self.service.delete_item(id).await?)
    }
}

pub struct RemoteCatalogDelegate {
    remote: RemoteService,
}

impl RemoteCatalogDelegate {
    pub(crate) fn new(remote: RemoteService) -> Self {
        Self { remote }
    }
}

#[async_trait]
impl CatalogDelegate for RemoteCatalogDelegate {
    fn mode(&self) -> AccessMode {
        AccessMode::Remote
    }

    #[tracing::instrument(skip(self, category), fields(id = %category.id))]
    async fn create_category(&self, category: CategoryDto) -> Result<CategoryDto> {
        self.remote.post("/categories", &category).await
    }

    async fn find_category(&self, id: &str) -> Result<CategoryDto> {
        require_id("Category", id)?;
        self.remote.get(&format!("/categories/{}", segment(id))).await
    }

    async fn find_categories(&self) -> Result<Vec<CategoryDto>> {
        self.remote.get("/categories").await
    }

    #[tracing::instrument(skip(self, category), fields(id = %category.id))]
    async fn update_category(&self, category: CategoryDto) -> Result<()> {
        require_update_id("Category", &category.id)?;
        self.remote
            .put(&format!("/categories/{}", segment(&category.id)), &category)
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_category(&self, id: &str) -> Result<()> {
        require_id("Category", id)?;
        self.remote
            .delete(&format!("/categories/{}", segment(id)))
            .await
    }

    #[tracing::instrument(skip(self, product), fields(id = %product.id))]
    async fn create_product(&self, product: ProductDto) -> Result<ProductDto> {
        self.remote.post("/products", &product).await
    }

    async fn find_product(&self, id: &str) -> Result<ProductDto> {
        require_id("Product", id)?;
        self.remote.get(&format!("/products/{}", segment(id))).await
    }

    async fn find_products(&self) -> Result<Vec<ProductDto>> {
        self.remote.get("/products").await
    }

    async fn find_products_in_category(&self, category_id: &str) -> Result<Vec<ProductDto>> {
        require_id("Category", category_id)?;
        self.remote
            .get(&format!("/categories/{}/products", segment(category_id)))
            .await
    }

    #[tracing::instrument(skip(self, product), fields(id = %product.id))]
    async fn update_product(&self, product: ProductDto) -> Result<()> {
        require_update_id("Product", &product.id)?;
        self.remote
            .put(&format!("/products/{}", segment(&product.id)), &product)
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_product(&self, id: &str) -> Result<()> {
        require_id("Product", id)?;
        self.remote
            .delete(&format!("/products/{}", segment(id)))
            .await
    }

    #[tracing::instrument(skip(self, item), fields(id = %item.id))]
    async fn create_item(&self, item: ItemDto) -> Result<ItemDto> {
        self.remote.post("/items", &item).await
    }

    async fn find_item(&self, id: &str) -> Result<ItemDto> {
        require_id("Item", id)?;
        self.remote.get(&format!("/items/{}", segment(id))).await
    }

    async fn find_items(&self) -> Result<Vec<ItemDto>> {
        self.remote.get("/items").await
    }

    async fn find_items_in_product(&self, product_id: &str) -> Result<Vec<ItemDto>> {
        require_id("Product", product_id)?;
        self.remote
            .get(&format!("/products/{}/items", segment(product_id)))
            .await
    }

    async fn search_items(&self, keyword: &str) -> Result<Vec<ItemDto>> {
        self.remote
            .get(&format!("/items?keyword={}", urlencoding::encode(keyword)))
            .await
    }

    #[tracing::instrument(skip(self, item), fields(id = %item.id))]
    async fn update_item(&self, item: ItemDto) -> Result<()> {
        require_update_id("Item", &item.id)?;
        self.remote
            .put(&format!("/items/{}", segment(&item.id)), &item)
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_item(&self, id: &str) -> Result<()> {
        require_id("Item", id)?;
        self.remote.delete(&format!("/items/{}", segment(id))).await
    }
}
