//! Selection of local or remote delegates.

use std::sync::Arc;

use domain::Services;

use crate::catalog::{CatalogDelegate, LocalCatalogDelegate, RemoteCatalogDelegate};
use crate::config::{AccessMode, DelegateConfig};
use crate::customer::{CustomerDelegate, LocalCustomerDelegate, RemoteCustomerDelegate};
use crate::order::{LocalOrderDelegate, OrderDelegate, RemoteOrderDelegate};
use crate::registry::NamingRegistry;
use crate::transport::RemoteService;

enum Backend {
    Local(Services),
    Remote {
        registry: NamingRegistry,
        config: DelegateConfig,
    },
}

/// Hands out delegates for one access mode, fixed at construction.
///
/// Delegates are stateless with respect to business data and may be shared
/// freely between tasks.
pub struct DelegateFactory {
    backend: Backend,
}

impl DelegateFactory {
    /// Delegates that call `services` in-process.
    pub fn local(services: Services) -> Self {
        Self {
            backend: Backend::Local(services),
        }
    }

    /// Delegates that call the endpoints bound in `registry` under the
    /// names in `config`.
    pub fn remote(registry: NamingRegistry, config: DelegateConfig) -> Self {
        Self {
            backend: Backend::Remote { registry, config },
        }
    }

    /// Picks local or remote from `config.mode`.
    pub fn from_config(config: DelegateConfig, services: Services, registry: NamingRegistry) -> Self {
        tracing::info!(mode = %config.mode, "delegate factory configured");
        match config.mode {
            AccessMode::Local => Self::local(services),
            AccessMode::Remote => Self::remote(registry, config),
        }
    }

    pub fn mode(&self) -> AccessMode {
        match self.backend {
            Backend::Local(_) => AccessMode::Local,
            Backend::Remote { .. } => AccessMode::Remote,
        }
    }

    pub fn order_delegate(&self) -> Arc<dyn OrderDelegate> {
        match &self.backend {
            Backend::Local(services) => Arc::new(LocalOrderDelegate::new(services.orders.clone())),
            Backend::Remote { registry, config } => Arc::new(RemoteOrderDelegate::new(
                RemoteService::new(registry.clone(), &config.order_service_name),
            )),
        }
    }

    pub fn catalog_delegate(&self) -> Arc<dyn CatalogDelegate> {
        match &self.backend {
            Backend::Local(services) => {
                Arc::new(LocalCatalogDelegate::new(services.catalog.clone()))
            }
            Backend::Remote { registry, config } => Arc::new(RemoteCatalogDelegate::new(
                RemoteService::new(registry.clone(), &config.catalog_service_name),
            )),
        }
    }

    pub fn customer_delegate(&self) -> Arc<dyn CustomerDelegate> {
        match &self.backend {
            Backend::Local(services) => {
                Arc::new(LocalCustomerDelegate::new(services.customers.clone()))
            }
            Backend::Remote { registry, config } => Arc::new(RemoteCustomerDelegate::new(
                RemoteService::new(registry.clone(), &config.customer_service_name),
            )),
        }
    }
}
