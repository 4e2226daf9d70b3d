//! Name-to-endpoint table used by remote delegates.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use axum::Router;
use domain::Services;

use crate::config::DelegateConfig;
use crate::error::RegistryError;

/// Binds symbolic service names to endpoint routers.
///
/// Clones share one table. Each operation takes the lock once, so a
/// `rebind` racing a `lookup` yields either the old or the new endpoint;
/// the last writer wins.
#[derive(Clone, Default)]
pub struct NamingRegistry {
    bindings: Arc<RwLock<HashMap<String, Router>>>,
}

impl NamingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name`, failing if it is already taken.
    pub fn bind(&self, name: &str, endpoint: Router) -> Result<(), RegistryError> {
        let mut bindings = self.bindings.write().unwrap_or_else(PoisonError::into_inner);
        if bindings.contains_key(name) {
            return Err(RegistryError::AlreadyBound(name.to_string()));
        }
        bindings.insert(name.to_string(), endpoint);
        tracing::info!(name, "service bound");
        Ok(())
    }

    /// Binds `name`, replacing any existing binding.
    pub fn rebind(&self, name: &str, endpoint: Router) {
        let mut bindings = self.bindings.write().unwrap_or_else(PoisonError::into_inner);
        let replaced = bindings.insert(name.to_string(), endpoint).is_some();
        tracing::info!(name, replaced, "service rebound");
    }

    pub fn unbind(&self, name: &str) -> Result<(), RegistryError> {
        let mut bindings = self.bindings.write().unwrap_or_else(PoisonError::into_inner);
        match bindings.remove(name) {
            Some(_) => {
                tracing::info!(name, "service unbound");
                Ok(())
            }
            None => Err(RegistryError::NotBound(name.to_string())),
        }
    }

    pub fn lookup(&self, name: &str) -> Result<Router, RegistryError> {
        self.bindings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::NotBound(name.to_string()))
    }

    pub fn is_bound(&self, name: &str) -> bool {
        self.bindings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Bound names, sorted.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .bindings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Publishes the three service endpoints under the configured names.
    pub fn export(&self, config: &DelegateConfig, services: &Services) {
        self.rebind(
            &config.order_service_name,
            api::order_endpoint(services.orders.clone()),
        );
        self.rebind(
            &config.catalog_service_name,
            api::catalog_endpoint(services.catalog.clone()),
        );
        self.rebind(
            &config.customer_service_name,
            api::customer_endpoint(services.customers.clone()),
        );
    }
}

impl std::fmt::Debug for NamingRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamingRegistry")
            .field("names", &self.list())
            .finish()
    }
}
