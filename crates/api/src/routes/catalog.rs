//! Category, product and item endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::{CategoryDto, ItemDto, ProductDto};
use domain::{CatalogService, ServiceError};
use serde::Deserialize;

use crate::error::{ApiError, require_body};

type Catalog = State<Arc<CatalogService>>;

#[derive(Debug, Deserialize)]
pub struct ItemQuery {
    pub keyword: Option<String>,
}

// -- Categories --

/// POST /categories
#[tracing::instrument(skip(service, body))]
pub async fn create_category(
    State(service): Catalog,
    body: Result<Json<Option<CategoryDto>>, JsonRejection>,
) -> Result<(StatusCode, Json<CategoryDto>), ApiError> {
    let category = require_body(body, ServiceError::Create)?;
    let created = service.create_category(category).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /categories
pub async fn list_categories(State(service): Catalog) -> Result<Json<Vec<CategoryDto>>, ApiError> {
    Ok(Json(service.find_categories().await?))
}

/// GET /categories/{id}
pub async fn get_category(
    State(service): Catalog,
    Path(id): Path<String>,
) -> Result<Json<CategoryDto>, ApiError> {
    Ok(Json(service.find_category(&id).await?))
}

/// PUT /categories/{id}
#[tracing::instrument(skip(service, body))]
pub async fn update_category(
    State(service): Catalog,
    Path(id): Path<String>,
    body: Result<Json<Option<CategoryDto>>, JsonRejection>,
) -> Result<Json<CategoryDto>, ApiError> {
    let mut category = require_body(body, ServiceError::Update)?;
    category.id = id;
    service.update_category(category.clone()).await?;
    Ok(Json(category))
}

/// DELETE /categories/{id}
#[tracing::instrument(skip(service))]
pub async fn delete_category(
    State(service): Catalog,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    service.delete_category(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /categories/{id}/products
pub async fn products_in_category(
    State(service): Catalog,
    Path(id): Path<String>,
) -> Result<Json<Vec<ProductDto>>, ApiError> {
    Ok(Json(service.find_products_in_category(&id).await?))
}

// -- Products --

/// POST /products
#[tracing::instrument(skip(service, body))]
pub async fn create_product(
    State(service): Catalog,
    body: Result<Json<Option<ProductDto>>, JsonRejection>,
) -> Result<(StatusCode, Json<ProductDto>), ApiError> {
    let product = require_body(body, ServiceError::Create)?;
    let created = service.create_product(product).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /products
pub async fn list_products(State(service): Catalog) -> Result<Json<Vec<ProductDto>>, ApiError> {
    Ok(Json(service.find_products().await?))
}

/// GET /products/{id}
pub async fn get_product(
    State(service): Catalog,
    Path(id): Path<String>,
) -> Result<Json<ProductDto>, ApiError> {
    Ok(Json(service.find_product(&id).await?))
}

/// PUT /products/{id}
#[tracing::instrument(skip(service, body))]
pub async fn update_product(
    State(service): Catalog,
    Path(id): Path<String>,
    body: Result<Json<Option<ProductDto>>, JsonRejection>,
) -> Result<Json<ProductDto>, ApiError> {
    let mut product = require_body(body, ServiceError::Update)?;
    product.id = id;
    service.update_product(product.clone()).await?;
    Ok(Json(product))
}

/// DELETE /products/{id}
#[tracing::instrument(skip(service))]
pub async fn delete_product(
    State(service): Catalog,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    service.delete_product(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /products/{id}/items
pub async fn items_in_product(
    State(service): Catalog,
    Path(id): Path<String>,
) -> Result<Json<Vec<ItemDto>>, ApiError> {
    Ok(Json(service.find_items_in_product(&id).await?))
}

// -- Items --

/// POST /items
#[tracing::instrument(skip(service, body))]
pub async fn create_item(
    State(service): Catalog,
    body: Result<Json<Option<ItemDto>>, JsonRejection>,
) -> Result<(StatusCode, Json<ItemDto>), ApiError> {
    let item = require_body(body, ServiceError::Create)?;
    let created = service.create_item(item).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /items, or GET /items?keyword=... to search by id or name.
pub async fn list_items(
    State(service): Catalog,
    Query(query): Query<ItemQuery>,
) -> Result<Json<Vec<ItemDto>>, ApiError> {
    let items = match query.keyword {
        Some(keyword) => service.search_items(&keyword).await?,
        None => service.find_items().await?,
    };
    Ok(Json(items))
}

/// GET /items/{id}
pub async fn get_item(
    State(service): Catalog,
    Path(id): Path<String>,
) -> Result<Json<ItemDto>, ApiError> {
    Ok(Json(service.find_item(&id).await?))
}

/// PUT /items/{id}
#[tracing::instrument(skip(service, body))]
pub async fn update_item(
    State(service): Catalog,
    Path(id): Path<String>,
    body: Result<Json<Option<ItemDto>>, JsonRejection>,
) -> Result<Json<ItemDto>, ApiError> {
    let mut item = require_body(body, ServiceError::Update)?;
    item.id = id;
    service.update_item(item.clone()).await?;
    Ok(Json(item))
}

/// DELETE /items/{id}
#[tracing::instrument(skip(service))]
pub async fn delete_item(
    State(service): Catalog,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    service.delete_item(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
