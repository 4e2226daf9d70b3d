//! Customer endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::CustomerDto;
use domain::{CustomerService, ServiceError};

use crate::error::{ApiError, require_body};

/// POST /customers
#[tracing::instrument(skip(service, body))]
pub async fn create(
    State(service): State<Arc<CustomerService>>,
    body: Result<Json<Option<CustomerDto>>, JsonRejection>,
) -> Result<(StatusCode, Json<CustomerDto>), ApiError> {
    let customer = require_body(body, ServiceError::Create)?;
    let created = service.create_customer(customer).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /customers
pub async fn list(
    State(service): State<Arc<CustomerService>>,
) -> Result<Json<Vec<CustomerDto>>, ApiError> {
    Ok(Json(service.find_customers().await?))
}

/// GET /customers/{id}
pub async fn get(
    State(service): State<Arc<CustomerService>>,
    Path(id): Path<String>,
) -> Result<Json<CustomerDto>, ApiError> {
    Ok(Json(service.find_customer(&id).await?))
}

/// PUT /customers/{id}
#[tracing::instrument(skip(service, body))]
pub async fn update(
    State(service): State<Arc<CustomerService>>,
    Path(id): Path<String>,
    body: Result<Json<Option<CustomerDto>>, JsonRejection>,
) -> Result<Json<CustomerDto>, ApiError> {
    let mut customer = require_body(body, ServiceError::Update)?;
    customer.id = id;
    service.update_customer(customer.clone()).await?;
    Ok(Json(customer))
}

/// DELETE /customers/{id}
#[tracing::instrument(skip(service))]
pub async fn delete(
    State(service): State<Arc<CustomerService>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    service.delete_customer(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
