//! Request/response exchange with a bound endpoint.

use api::ErrorBody;
use axum::body::{Body, Bytes};
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tower::ServiceExt;

use crate::error::{DelegateError, Result, TransportError};
use crate::registry::NamingRegistry;

/// A service reached by name through the registry.
///
/// The name is resolved on every call, so unbinding takes effect on the next
/// call and rebinding redirects it.
#[derive(Debug, Clone)]
pub(crate) struct RemoteService {
    registry: NamingRegistry,
    name: String,
}

impl RemoteService {
    pub(crate) fn new(registry: NamingRegistry, name: impl Into<String>) -> Self {
        Self {
            registry,
            name: name.into(),
        }
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let bytes = self.exchange(Method::GET, path, None).await?;
        self.decode(&bytes)
    }

    pub(crate) async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let body = self.encode(body)?;
        let bytes = self.exchange(Method::POST, path, Some(body)).await?;
        self.decode(&bytes)
    }

    /// Sends a replacement; the response body is not needed.
    pub(crate) async fn put<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let body = self.encode(body)?;
        self.exchange(Method::PUT, path, Some(body)).await?;
        Ok(())
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        self.exchange(Method::DELETE, path, None).await?;
        Ok(())
    }

    async fn exchange(&self, method: Method, path: &str, body: Option<Vec<u8>>) -> Result<Bytes> {
        metrics::counter!("delegate_remote_calls_total", "service" => self.name.clone())
            .increment(1);

        let result = self.try_exchange(method.clone(), path, body).await;
        if let Err(DelegateError::Transport(err)) = &result {
            metrics::counter!("delegate_transport_errors_total", "service" => self.name.clone())
                .increment(1);
            tracing::warn!(service = %self.name, %method, path, error = %err, "remote call failed");
        }
        result
    }

    async fn try_exchange(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<Bytes> {
        let endpoint = self
            .registry
            .lookup(&self.name)
            .map_err(|_| TransportError::NotBound(self.name.clone()))?;

        let builder = Request::builder().method(method).uri(path);
        let request = match body {
            Some(bytes) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(bytes)),
            None => builder.body(Body::empty()),
        }
        .map_err(|e| self.protocol(e.to_string()))?;

        let response = endpoint
            .oneshot(request)
            .await
            .unwrap_or_else(|never| match never {});
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| TransportError::Dispatch {
                service: self.name.clone(),
                reason: e.to_string(),
            })?;

        if status.is_success() {
            return Ok(bytes);
        }
        match serde_json::from_slice::<ErrorBody>(&bytes) {
            Ok(error) => Err(DelegateError::Service(error.into())),
            Err(_) => Err(self.protocol(format!("{status} without an error body")).into()),
        }
    }

    fn encode<B: Serialize>(&self, body: &B) -> Result<Vec<u8>> {
        serde_json::to_vec(body).map_err(|e| self.protocol(e.to_string()).into())
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        serde_json::from_slice(bytes).map_err(|e| self.protocol(e.to_string()).into())
    }

    fn protocol(&self, reason: String) -> TransportError {
        TransportError::Protocol {
            service: self.name.clone(),
            reason,
        }
    }
}

/// Encodes one id as a path segment.
pub(crate) fn segment(id: &str) -> String {
    urlencoding::encode(id.trim()).into_owned()
}
