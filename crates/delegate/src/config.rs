//! Delegate configuration loaded from environment variables.

use std::str::FromStr;

/// Where delegate calls execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessMode {
    /// In-process calls to the domain services.
    #[default]
    Local,
    /// Calls through endpoints bound in the naming registry.
    Remote,
}

impl FromStr for AccessMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(AccessMode::Local),
            "remote" => Ok(AccessMode::Remote),
            other => Err(format!("unknown access mode '{other}'")),
        }
    }
}

impl std::fmt::Display for AccessMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccessMode::Local => write!(f, "local"),
            AccessMode::Remote => write!(f, "remote"),
        }
    }
}

/// Access mode and well-known binding names.
///
/// Reads from environment variables:
/// - `DELEGATE_MODE`: `local` or `remote` (default: `local`)
/// - `ORDER_SERVICE_NAME` (default: `"order-service"`)
/// - `CATALOG_SERVICE_NAME` (default: `"catalog-service"`)
/// - `CUSTOMER_SERVICE_NAME` (default: `"customer-service"`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegateConfig {
    pub mode: AccessMode,
    pub order_service_name: String,
    pub catalog_service_name: String,
    pub customer_service_name: String,
}

impl DelegateConfig {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let mode = match lookup("DELEGATE_MODE").map(|m| m.parse::<AccessMode>()) {
            Some(Ok(mode)) => mode,
            Some(Err(reason)) => {
                tracing::warn!(%reason, "falling back to local access");
                AccessMode::Local
            }
            None => defaults.mode,
        };
        Self {
            mode,
            order_service_name: lookup("ORDER_SERVICE_NAME").unwrap_or(defaults.order_service_name),
            catalog_service_name: lookup("CATALOG_SERVICE_NAME")
                .unwrap_or(defaults.catalog_service_name),
            customer_service_name: lookup("CUSTOMER_SERVICE_NAME")
                .unwrap_or(defaults.customer_service_name),
        }
    }

    pub fn with_mode(mut self, mode: AccessMode) -> Self {
        self.mode = mode;
        self
    }
}

impl Default for DelegateConfig {
    fn default() -> Self {
        Self {
            mode: AccessMode::Local,
            order_service_name: "order-service".to_string(),
            catalog_service_name: "catalog-service".to_string(),
            customer_service_name: "customer-service".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> DelegateConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DelegateConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_values() {
        let config = config_from(&[]);
        assert_eq!(config, DelegateConfig::default());
        assert_eq!(config.mode, AccessMode::Local);
        assert_eq!(config.order_service_name, "order-service");
    }

    #[test]
    fn test_remote_mode_and_names() {
        let config = config_from(&[
            ("DELEGATE_MODE", "Remote"),
            ("ORDER_SERVICE_NAME", "orders-eu"),
        ]);
        assert_eq!(config.mode, AccessMode::Remote);
        assert_eq!(config.order_service_name, "orders-eu");
        assert_eq!(config.customer_service_name, "customer-service");
    }

    #[test]
    fn test_unknown_mode_falls_back_to_local() {
        let config = config_from(&[("DELEGATE_MODE", "carrier-pigeon")]);
        assert_eq!(config.mode, AccessMode::Local);
    }
}
