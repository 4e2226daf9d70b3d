//! Location-transparent access to the order, catalog and customer services.
//!
//! A [`DelegateFactory`] is configured once as local or remote. Local
//! delegates call the domain services in-process. Remote delegates resolve a
//! well-known name in a [`NamingRegistry`] on every call and exchange JSON
//! with the endpoint bound there; an unbound name is a
//! [`TransportError`], never a business error.
//!
//! Bound endpoints are `axum::Router`s driven in-process with
//! `tower::ServiceExt::oneshot`. Remote delegates do not open sockets, so
//! they cannot reach the `api` binary serving the same routes over TCP.

pub mod catalog;
pub mod config;
pub mod customer;
pub mod error;
pub mod factory;
pub mod order;
mod precheck;
pub mod registry;
mod transport;

pub use catalog::{CatalogDelegate, LocalCatalogDelegate, RemoteCatalogDelegate};
pub use config::{AccessMode, DelegateConfig};
pub use customer::{CustomerDelegate, LocalCustomerDelegate, RemoteCustomerDelegate};
pub use error::{DelegateError, RegistryError, Result, TransportError};
pub use factory::DelegateFactory;
pub use order::{LocalOrderDelegate, OrderDelegate, RemoteOrderDelegate};
pub use registry::NamingRegistry;
