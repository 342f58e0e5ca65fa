//! Caller-facing error taxonomy of the payment core.

use common_utils::errors::CustomResult;
use payment_interfaces::errors::ConnectorError;

/// Result type of the router's inbound contract.
pub type RouterResult<T> = CustomResult<T, PaymentsError>;

/// Errors surfaced to the rest of the application. Adapters never leak raw
/// provider errors; everything crossing this boundary carries actionable,
/// human-readable text.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum PaymentsError {
    /// No payment integration exists for the tenant
    #[error("No payment integration is configured for this tenant")]
    IntegrationNotConfigured,

    /// An integration exists but is turned off
    #[error("The payment integration is disabled for this tenant")]
    IntegrationDisabled,

    /// The stored provider string matches no registered adapter
    #[error("Unsupported payment provider: {provider}")]
    UnsupportedProvider {
        /// The unrecognized provider string as stored
        provider: String,
    },

    /// The operation is not offered by the configured provider
    #[error("The configured payment provider '{provider}' does not support {capability}")]
    CapabilityNotSupported {
        /// The configured provider
        provider: String,
        /// The operation that was requested
        capability: &'static str,
    },

    /// Credentials are missing required fields or are malformed; detected
    /// before any network call
    #[error("Invalid {provider} credentials: {reason}")]
    InvalidCredentials {
        /// The provider whose credentials failed validation
        provider: &'static str,
        /// What was wrong
        reason: String,
    },

    /// The provider call failed or returned a non-success status
    #[error("{provider} {operation} failed: {message}")]
    ProviderCall {
        /// Which provider failed
        provider: &'static str,
        /// Which operation failed
        operation: &'static str,
        /// The best available human-readable detail
        message: String,
    },

    /// The configuration store failed while loading the tenant's integration
    #[error("Internal error while loading the payment configuration")]
    InternalServerError,
}

/// Fold an adapter-level error into the caller-facing taxonomy, prefixed
/// with the provider and operation that failed. Credential problems keep
/// their own kind so callers can distinguish misconfiguration from provider
/// declines.
pub fn map_connector_error(
    provider: &'static str,
    operation: &'static str,
    report: error_stack::Report<ConnectorError>,
) -> error_stack::Report<PaymentsError> {
    let error = match report.current_context() {
        ConnectorError::FailedToObtainAuthType => PaymentsError::InvalidCredentials {
            provider,
            reason: "required credential fields are missing or malformed".to_string(),
        },
        ConnectorError::InvalidConnectorConfig { config } => PaymentsError::InvalidCredentials {
            provider,
            reason: format!("invalid integration configuration: {config}"),
        },
        other => PaymentsError::ProviderCall {
            provider,
            operation,
            message: other.to_string(),
        },
    };
    report.change_context(error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_call_errors_carry_the_operation_prefix() {
        let report = error_stack::report!(ConnectorError::ProcessingStepFailed(Some(
            "card declined".to_string(),
        )));
        let mapped = map_connector_error("stripe", "process_payment", report);
        let message = mapped.current_context().to_string();
        assert!(message.starts_with("stripe process_payment failed"));
        assert!(message.contains("card declined"));
    }

    #[test]
    fn credential_errors_keep_their_own_kind() {
        let report = error_stack::report!(ConnectorError::FailedToObtainAuthType);
        let mapped = map_connector_error("square", "refund_payment", report);
        assert!(matches!(
            mapped.current_context(),
            PaymentsError::InvalidCredentials { provider: "square", .. }
        ));
    }
}
