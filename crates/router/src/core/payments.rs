//! Capability lookup and dispatch.
//!
//! The service performs no normalization itself: it loads the tenant's
//! integration config, picks the adapter registered for the configured
//! provider and forwards the call. Provider-specific logic stays inside the
//! adapters, so adding a provider only touches the registry built in
//! [`PaymentService::new`].

use std::{collections::HashMap, sync::Arc};

use api_models::{
    admin::PaymentIntegrationConfig,
    payments::{
        ConnectionStatus, ProcessPaymentData, ProcessPaymentResult, RefundData, RefundResult,
        TerminalCheckout, TerminalCheckoutData,
    },
};
use common_enums::PaymentProvider;
use error_stack::report;
use payment_connectors::{Paypal, Square, Stripe};
use payment_interfaces::{
    api::{PaymentContext, PaymentProcessor},
    api_client::ApiClient,
    configs::Connectors,
    vault::CredentialVault,
};
use router_env::{instrument, tracing};

use crate::{
    core::errors::{self, PaymentsError, RouterResult},
    db::PaymentConfigInterface,
};

/// The uniform payment capability exposed to the rest of the application,
/// keyed by tenant.
pub struct PaymentService {
    store: Arc<dyn PaymentConfigInterface>,
    vault: Arc<dyn CredentialVault>,
    api_client: Arc<dyn ApiClient>,
    connectors: Connectors,
    adapters: HashMap<PaymentProvider, Arc<dyn PaymentProcessor>>,
}

impl PaymentService {
    /// Build the service with the standard adapter registry.
    pub fn new(
        store: Arc<dyn PaymentConfigInterface>,
        vault: Arc<dyn CredentialVault>,
        api_client: Arc<dyn ApiClient>,
        connectors: Connectors,
    ) -> Self {
        let mut adapters: HashMap<PaymentProvider, Arc<dyn PaymentProcessor>> = HashMap::new();
        adapters.insert(PaymentProvider::Card, Arc::new(Stripe::new()));
        adapters.insert(PaymentProvider::Wallet, Arc::new(Paypal::new()));
        adapters.insert(PaymentProvider::TerminalPos, Arc::new(Square::new()));
        Self::with_adapters(store, vault, api_client, connectors, adapters)
    }

    /// Build the service with an explicit adapter registry. Tests inject
    /// doubles here; nothing in the service is a global singleton.
    pub fn with_adapters(
        store: Arc<dyn PaymentConfigInterface>,
        vault: Arc<dyn CredentialVault>,
        api_client: Arc<dyn ApiClient>,
        connectors: Connectors,
        adapters: HashMap<PaymentProvider, Arc<dyn PaymentProcessor>>,
    ) -> Self {
        Self {
            store,
            vault,
            api_client,
            connectors,
            adapters,
        }
    }

    fn context(&self) -> PaymentContext<'_> {
        PaymentContext {
            api_client: self.api_client.as_ref(),
            connectors: &self.connectors,
            vault: self.vault.as_ref(),
        }
    }

    async fn load_config(&self, tenant_id: &str) -> RouterResult<PaymentIntegrationConfig> {
        let config = self
            .store
            .find_payment_config_by_tenant_id(tenant_id)
            .await
            .map_err(|error| {
                router_env::logger::error!(?error, tenant_id, "payment config lookup failed");
                error.change_context(PaymentsError::InternalServerError)
            })?
            .ok_or(report!(PaymentsError::IntegrationNotConfigured))?;
        if !config.enabled {
            return Err(report!(PaymentsError::IntegrationDisabled));
        }
        Ok(config)
    }

    fn resolve_adapter(
        &self,
        config: &PaymentIntegrationConfig,
    ) -> RouterResult<(PaymentProvider, Arc<dyn PaymentProcessor>)> {
        let provider = config
            .provider
            .parse::<PaymentProvider>()
            .map_err(|_| {
                report!(PaymentsError::UnsupportedProvider {
                    provider: config.provider.clone(),
                })
            })?;
        let adapter = self
            .adapters
            .get(&provider)
            .cloned()
            .ok_or(report!(PaymentsError::UnsupportedProvider {
                provider: config.provider.clone(),
            }))?;
        Ok((provider, adapter))
    }

    /// Whether the tenant has a usable payment integration. Never errors:
    /// any lookup failure is logged and treated as "not configured".
    #[instrument(skip_all)]
    pub async fn is_configured(&self, tenant_id: &str) -> bool {
        match self.store.find_payment_config_by_tenant_id(tenant_id).await {
            Ok(Some(config)) => config.enabled,
            Ok(None) => false,
            Err(error) => {
                router_env::logger::warn!(
                    ?error,
                    tenant_id,
                    "payment config lookup failed, treating tenant as not configured"
                );
                false
            }
        }
    }

    /// Run the configured provider's connection diagnostic.
    #[instrument(skip_all)]
    pub async fn test_connection(&self, tenant_id: &str) -> RouterResult<ConnectionStatus> {
        let config = self.load_config(tenant_id).await?;
        let (_, adapter) = self.resolve_adapter(&config)?;
        adapter
            .test_connection(&self.context(), &config)
            .await
            .map_err(|error| {
                errors::map_connector_error(adapter.id(), "test_connection", error)
            })
    }

    /// Charge the tenant's customer through the configured provider.
    #[instrument(skip_all)]
    pub async fn process_payment(
        &self,
        tenant_id: &str,
        data: ProcessPaymentData,
    ) -> RouterResult<ProcessPaymentResult> {
        let config = self.load_config(tenant_id).await?;
        let (_, adapter) = self.resolve_adapter(&config)?;
        adapter
            .process_payment(&self.context(), &config, &data)
            .await
            .map_err(|error| {
                errors::map_connector_error(adapter.id(), "process_payment", error)
            })
    }

    /// Refund a settled transaction, fully or partially.
    #[instrument(skip_all)]
    pub async fn refund_payment(
        &self,
        tenant_id: &str,
        data: RefundData,
    ) -> RouterResult<RefundResult> {
        let config = self.load_config(tenant_id).await?;
        let (_, adapter) = self.resolve_adapter(&config)?;
        adapter
            .refund_payment(&self.context(), &config, &data)
            .await
            .map_err(|error| errors::map_connector_error(adapter.id(), "refund_payment", error))
    }

    /// Push a checkout to a physical terminal. Only the terminal-POS
    /// provider offers this; any other configured provider fails before the
    /// adapter is reached.
    #[instrument(skip_all)]
    pub async fn create_terminal_checkout(
        &self,
        tenant_id: &str,
        data: TerminalCheckoutData,
    ) -> RouterResult<TerminalCheckout> {
        let config = self.load_config(tenant_id).await?;
        let (provider, adapter) = self.resolve_adapter(&config)?;
        if provider != PaymentProvider::TerminalPos {
            return Err(report!(PaymentsError::CapabilityNotSupported {
                provider: provider.to_string(),
                capability: "terminal checkouts",
            }));
        }
        adapter
            .create_terminal_checkout(&self.context(), &config, &data)
            .await
            .map_err(|error| {
                errors::map_connector_error(adapter.id(), "create_terminal_checkout", error)
            })
    }

    /// Fetch the current state of a terminal checkout. Same provider
    /// restriction as checkout creation.
    #[instrument(skip_all)]
    pub async fn get_terminal_checkout_status(
        &self,
        tenant_id: &str,
        checkout_id: &str,
    ) -> RouterResult<TerminalCheckout> {
        let config = self.load_config(tenant_id).await?;
        let (provider, adapter) = self.resolve_adapter(&config)?;
        if provider != PaymentProvider::TerminalPos {
            return Err(report!(PaymentsError::CapabilityNotSupported {
                provider: provider.to_string(),
                capability: "terminal checkouts",
            }));
        }
        adapter
            .get_terminal_checkout_status(&self.context(), &config, checkout_id)
            .await
            .map_err(|error| {
                errors::map_connector_error(adapter.id(), "get_terminal_checkout_status", error)
            })
    }
}

impl std::fmt::Debug for PaymentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentService")
            .field("adapters", &self.adapters.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
