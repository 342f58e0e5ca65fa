//! Tenant configuration lookup boundary.
//!
//! The relational schema and ORM access live outside this core; the router
//! only needs one read. [`MockDb`] backs tests and local development.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
};

use api_models::admin::PaymentIntegrationConfig;
use common_utils::errors::CustomResult;
use error_stack::report;

/// Storage layer failures.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The underlying store rejected or failed the query
    #[error("Database operation failed")]
    DatabaseError,
}

/// Read access to per-tenant payment integration configuration.
#[async_trait::async_trait]
pub trait PaymentConfigInterface: Send + Sync {
    /// The tenant's integration config, or `None` when nothing is configured.
    async fn find_payment_config_by_tenant_id(
        &self,
        tenant_id: &str,
    ) -> CustomResult<Option<PaymentIntegrationConfig>, StorageError>;
}

/// In-memory store used by tests and local development.
#[derive(Default)]
pub struct MockDb {
    configs: Mutex<HashMap<String, PaymentIntegrationConfig>>,
    fail_lookups: AtomicBool,
}

impl MockDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tenant's integration config.
    pub fn insert_payment_config(&self, tenant_id: &str, config: PaymentIntegrationConfig) {
        if let Ok(mut configs) = self.configs.lock() {
            configs.insert(tenant_id.to_string(), config);
        }
    }

    /// Make every lookup fail, for exercising fail-closed behavior.
    pub fn fail_all_lookups(&self) {
        self.fail_lookups.store(true, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl PaymentConfigInterface for MockDb {
    async fn find_payment_config_by_tenant_id(
        &self,
        tenant_id: &str,
    ) -> CustomResult<Option<PaymentIntegrationConfig>, StorageError> {
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(report!(StorageError::DatabaseError));
        }
        let configs = self
            .configs
            .lock()
            .map_err(|_| report!(StorageError::DatabaseError))?;
        Ok(configs.get(tenant_id).cloned())
    }
}
