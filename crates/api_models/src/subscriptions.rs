//! Recurring-billing and card-on-file models.
//!
//! These are served only by the terminal-POS provider and are not part of the
//! uniform router contract; the provider-specific call sites use the adapter
//! directly.

use masking::Secret;
use serde::{Deserialize, Serialize};

/// Request to start a subscription for a customer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateSubscriptionData {
    /// Provider-side customer identifier
    pub customer_id: String,

    /// Provider plan (plan variation) identifier
    pub plan_id: String,

    /// Merchant location to bill under; falls back to the configured
    /// `merchant_location_id` setting when omitted
    #[serde(default)]
    pub location_id: Option<String>,

    /// Card on file to charge; the provider picks its default otherwise
    #[serde(default)]
    pub card_id: Option<String>,

    /// First billing date (`YYYY-MM-DD`); immediate when omitted
    #[serde(default)]
    pub start_date: Option<String>,

    /// Caller-supplied idempotency key for safe retries
    #[serde(default)]
    pub idempotency_key: Option<String>,
}

/// Request to modify an active subscription.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UpdateSubscriptionData {
    /// Move the subscription to a different plan variation
    #[serde(default)]
    pub plan_id: Option<String>,

    /// Switch the card on file used for billing
    #[serde(default)]
    pub card_id: Option<String>,
}

/// A recurring-billing subscription as reported by the provider.
///
/// `status` stays a provider-defined string; callers only branch on
/// "active vs not" downstream, so no further normalization is applied.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Subscription {
    /// Provider-assigned subscription identifier
    pub subscription_id: String,

    /// Provider-defined status string (e.g. `ACTIVE`, `CANCELED`)
    pub status: String,

    /// The plan variation the customer is billed on
    pub plan_id: String,

    /// Provider-side customer identifier
    pub customer_id: String,

    /// The currently active billing phase, when the provider reports one
    #[serde(default)]
    pub current_phase: Option<SubscriptionPhase>,
}

/// A window within a subscription's billing schedule.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubscriptionPhase {
    /// Phase start date (`YYYY-MM-DD`)
    pub start_date: String,

    /// Phase end date, open-ended when absent
    #[serde(default)]
    pub end_date: Option<String>,
}

/// Request to store a tokenized card against a provider customer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SaveCardData {
    /// Provider-side customer identifier
    pub customer_id: String,

    /// Tokenized card reference produced by the provider's client-side SDK
    pub source_id: Secret<String>,

    /// Name to store on the card
    #[serde(default)]
    pub cardholder_name: Option<String>,

    /// Caller-supplied idempotency key for safe retries
    #[serde(default)]
    pub idempotency_key: Option<String>,
}

/// A card stored on file with the provider.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SavedCard {
    /// Provider-assigned card-on-file identifier
    pub card_id: String,

    /// Provider-side customer the card is attached to
    pub customer_id: String,

    /// Card brand (e.g. `VISA`), when reported
    #[serde(default)]
    pub brand: Option<String>,

    /// Last four digits of the card number
    #[serde(default)]
    pub last_4: Option<String>,

    /// Expiry month
    #[serde(default)]
    pub exp_month: Option<i64>,

    /// Expiry year
    #[serde(default)]
    pub exp_year: Option<i64>,
}
