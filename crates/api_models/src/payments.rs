//! Payment, refund and terminal-checkout models.

use std::collections::HashMap;

use common_enums::{CheckoutStatus, Currency, PaymentMethodType, PaymentStatus};
use common_utils::types::FloatMajorUnit;
use masking::Secret;
use serde::{Deserialize, Serialize};

/// Request to charge a customer for an invoice.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProcessPaymentData {
    /// The invoice being paid
    pub invoice_id: String,

    /// Amount in major units of `currency` (e.g. `19.99` USD)
    pub amount: FloatMajorUnit,

    /// ISO 4217 currency code
    pub currency: Currency,

    /// Free-text description forwarded to the provider
    #[serde(default)]
    pub description: Option<String>,

    /// Provider-side customer identifier, when known
    #[serde(default)]
    pub customer_id: Option<String>,

    /// Whether this is an online charge or an in-person terminal charge
    #[serde(default)]
    pub payment_method_type: Option<PaymentMethodType>,

    /// Tokenized payment-method reference. Required for online card charges;
    /// raw card data never passes through this layer.
    #[serde(default)]
    pub source_id: Option<Secret<String>>,

    /// Physical device identifier. Required for terminal charges.
    #[serde(default)]
    pub device_id: Option<String>,

    /// Caller-supplied idempotency key for safe retries. Over-long keys are
    /// truncated to the provider's limit, not rejected.
    #[serde(default)]
    pub idempotency_key: Option<String>,

    /// Opaque key/value pairs echoed back on the result
    #[serde(default)]
    pub metadata: Option<HashMap<String, String>>,
}

/// Canonical result shape every provider adapter produces.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProcessPaymentResult {
    /// Provider-assigned transaction identifier, treated as an opaque string
    pub transaction_id: String,

    /// Canonical status
    pub status: PaymentStatus,

    /// Payment method label as reported by the provider (e.g. "card")
    pub payment_method: String,

    /// Charged amount in major units
    pub amount: FloatMajorUnit,

    /// ISO 4217 currency code
    pub currency: Currency,

    /// Provider processing fee in major units, when the provider reports one
    #[serde(default)]
    pub fee: Option<FloatMajorUnit>,

    /// Caller metadata plus adapter-added identifiers
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// Request to refund a settled transaction.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RefundData {
    /// The provider transaction to refund
    pub transaction_id: String,

    /// Amount to refund in major units. Omitted means "refund the full
    /// captured amount", which the adapter resolves by querying the original
    /// transaction before issuing the refund.
    #[serde(default)]
    pub amount: Option<FloatMajorUnit>,

    /// Free-text reason forwarded to the provider
    #[serde(default)]
    pub reason: Option<String>,

    /// Opaque key/value pairs echoed back on the result
    #[serde(default)]
    pub metadata: Option<HashMap<String, String>>,
}

/// Canonical refund result.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RefundResult {
    /// Provider-assigned refund identifier
    pub refund_id: String,

    /// The original transaction
    pub transaction_id: String,

    /// Canonical status
    pub status: PaymentStatus,

    /// Refunded amount in major units
    pub amount: FloatMajorUnit,

    /// ISO 4217 currency code
    pub currency: Currency,

    /// Caller metadata plus adapter-added identifiers
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// Request to push a checkout to a physical terminal device.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TerminalCheckoutData {
    /// The invoice being paid
    pub invoice_id: String,

    /// Amount in major units of `currency`
    pub amount: FloatMajorUnit,

    /// ISO 4217 currency code
    pub currency: Currency,

    /// The device to push the checkout to
    pub device_id: String,

    /// Note shown on the device screen
    #[serde(default)]
    pub note: Option<String>,

    /// Caller-supplied idempotency key for safe retries
    #[serde(default)]
    pub idempotency_key: Option<String>,
}

/// A checkout pushed to a physical device for in-person completion.
/// Transitions `pending -> completed | canceled | failed`; completion arrives
/// out-of-band (webhook), so freshly created checkouts are always pending.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TerminalCheckout {
    /// Provider-assigned checkout identifier
    pub checkout_id: String,

    /// Local checkout status
    pub status: CheckoutStatus,

    /// The device the checkout was pushed to
    pub device_id: String,

    /// Amount in major units, when reported
    #[serde(default)]
    pub amount: Option<FloatMajorUnit>,

    /// ISO 4217 currency code, when reported
    #[serde(default)]
    pub currency: Option<Currency>,

    /// When the provider will expire the checkout
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub expires_at: Option<time::OffsetDateTime>,
}

/// Result of a connection diagnostic against a configured provider.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConnectionStatus {
    /// Whether the provider accepted the configured credentials
    pub success: bool,

    /// Actionable failure detail, present iff `success` is `false`
    #[serde(default)]
    pub error: Option<String>,
}

impl ConnectionStatus {
    /// A successful probe
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    /// A failed probe with an actionable message
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}
