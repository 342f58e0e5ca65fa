//! The uniform payment capability contract.

use api_models::{
    admin::PaymentIntegrationConfig,
    payments::{
        ConnectionStatus, ProcessPaymentData, ProcessPaymentResult, RefundData, RefundResult,
        TerminalCheckout, TerminalCheckoutData,
    },
};
use common_utils::errors::CustomResult;

use crate::{
    api_client::ApiClient, configs::Connectors, errors::ConnectorError, types::Response,
    vault::CredentialVault,
};

/// Everything an adapter needs to perform one call: the transport client, the
/// provider base-url table and the credential vault. Borrowed per call; there
/// is no shared mutable state between concurrent calls.
#[derive(Clone, Copy)]
pub struct PaymentContext<'a> {
    /// Transport client used to execute built requests
    pub api_client: &'a dyn ApiClient,
    /// Provider base URLs
    pub connectors: &'a Connectors,
    /// Credential decryption collaborator
    pub vault: &'a dyn CredentialVault,
}

impl std::fmt::Debug for PaymentContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentContext").finish_non_exhaustive()
    }
}

/// Functionality common to every adapter.
pub trait ConnectorCommon {
    /// Short identifier of the provider this adapter talks to, used in error
    /// prefixes (e.g. `"stripe"`).
    fn id(&self) -> &'static str;

    /// Base URL for the tenant's environment selection
    fn base_url<'a>(&self, connectors: &'a Connectors, test_mode: bool) -> &'a str;

    /// Unwrap the provider's error payload into the normalized
    /// [`crate::types::ErrorResponse`]. Each provider nests error detail
    /// differently; this is the adapter's single place to know that shape.
    fn build_error_response(
        &self,
        res: Response,
    ) -> CustomResult<crate::types::ErrorResponse, ConnectorError>;
}

/// The uniform payment capability implemented by every provider adapter.
///
/// Terminal-checkout operations default to a not-supported failure so that
/// only the terminal-POS adapter opts in; the router additionally refuses to
/// dispatch those operations to other providers before the adapter is ever
/// reached.
#[async_trait::async_trait]
pub trait PaymentProcessor: ConnectorCommon + Send + Sync {
    /// Validate that the configured credentials are usable. Providers with a
    /// cheap read-only endpoint probe it; others validate credential shape
    /// only.
    async fn test_connection(
        &self,
        ctx: &PaymentContext<'_>,
        config: &PaymentIntegrationConfig,
    ) -> CustomResult<ConnectionStatus, ConnectorError>;

    /// Charge the customer.
    async fn process_payment(
        &self,
        ctx: &PaymentContext<'_>,
        config: &PaymentIntegrationConfig,
        data: &ProcessPaymentData,
    ) -> CustomResult<ProcessPaymentResult, ConnectorError>;

    /// Refund a settled transaction, fully or partially.
    async fn refund_payment(
        &self,
        ctx: &PaymentContext<'_>,
        config: &PaymentIntegrationConfig,
        data: &RefundData,
    ) -> CustomResult<RefundResult, ConnectorError>;

    /// Push a checkout to a physical terminal device.
    async fn create_terminal_checkout(
        &self,
        _ctx: &PaymentContext<'_>,
        _config: &PaymentIntegrationConfig,
        _data: &TerminalCheckoutData,
    ) -> CustomResult<TerminalCheckout, ConnectorError> {
        Err(ConnectorError::NotSupported {
            message: "Terminal checkout".to_string(),
            connector: self.id(),
        }
        .into())
    }

    /// Fetch the current state of a terminal checkout.
    async fn get_terminal_checkout_status(
        &self,
        _ctx: &PaymentContext<'_>,
        _config: &PaymentIntegrationConfig,
        _checkout_id: &str,
    ) -> CustomResult<TerminalCheckout, ConnectorError> {
        Err(ConnectorError::NotSupported {
            message: "Terminal checkout".to_string(),
            connector: self.id(),
        }
        .into())
    }
}
