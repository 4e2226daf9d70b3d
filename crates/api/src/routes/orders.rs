//! Order endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::OrderDto;
use domain::{OrderService, ServiceError};

use crate::error::{ApiError, require_body};

/// POST /orders: validate and persist a new order with its lines.
#[tracing::instrument(skip(service, body))]
pub async fn create(
    State(service): State<Arc<OrderService>>,
    body: Result<Json<Option<OrderDto>>, JsonRejection>,
) -> Result<(StatusCode, Json<OrderDto>), ApiError> {
    let order = require_body(body, ServiceError::Create)?;
    let created = service.create_order(order).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /orders: every order.
#[tracing::instrument(skip(service))]
pub async fn list(State(service): State<Arc<OrderService>>) -> Result<Json<Vec<OrderDto>>, ApiError> {
    Ok(Json(service.find_orders().await?))
}

/// GET /orders/{id}
#[tracing::instrument(skip(service))]
pub async fn get(
    State(service): State<Arc<OrderService>>,
    Path(id): Path<String>,
) -> Result<Json<OrderDto>, ApiError> {
    Ok(Json(service.find_order(&id).await?))
}

/// PUT /orders/{id}: replace the shipping address and payment block.
///
/// The id in the path wins over any id in the body.
#[tracing::instrument(skip(service, body))]
pub async fn update(
    State(service): State<Arc<OrderService>>,
    Path(id): Path<String>,
    body: Result<Json<Option<OrderDto>>, JsonRejection>,
) -> Result<Json<OrderDto>, ApiError> {
    let mut order = require_body(body, ServiceError::Update)?;
    order.id = id;
    service.update_order(order.clone()).await?;
    Ok(Json(service.find_order(&order.id).await?))
}

/// DELETE /orders/{id}: remove the order and its lines.
#[tracing::instrument(skip(service))]
pub async fn delete(
    State(service): State<Arc<OrderService>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    service.delete_order(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /customers/{id}/orders: orders placed by one customer.
#[tracing::instrument(skip(service))]
pub async fn for_customer(
    State(service): State<Arc<OrderService>>,
    Path(customer_id): Path<String>,
) -> Result<Json<Vec<OrderDto>>, ApiError> {
    Ok(Json(service.find_orders_for_customer(&customer_id).await?))
}
