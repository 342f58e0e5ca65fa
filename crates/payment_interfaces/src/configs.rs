//! Base-URL configuration for the provider adapters.

use serde::Deserialize;

/// Base URLs for every supported provider.
#[derive(Clone, Debug, Deserialize)]
pub struct Connectors {
    /// Card-network processor (Stripe)
    pub stripe: ConnectorParams,
    /// Wallet/redirect processor (PayPal)
    pub paypal: ConnectorParams,
    /// Point-of-sale terminal processor (Square)
    pub square: ConnectorParams,
}

/// Per-provider endpoint parameters. Environment selection between live and
/// sandbox is driven by the tenant's `test_mode` setting, not globally.
#[derive(Clone, Debug, Deserialize)]
pub struct ConnectorParams {
    /// Live environment base URL
    pub base_url: String,
    /// Sandbox environment base URL
    pub sandbox_base_url: String,
}

impl ConnectorParams {
    /// The base URL matching the tenant's environment selection.
    pub fn url_for(&self, test_mode: bool) -> &str {
        if test_mode {
            &self.sandbox_base_url
        } else {
            &self.base_url
        }
    }
}

impl Default for Connectors {
    fn default() -> Self {
        Self {
            stripe: ConnectorParams {
                base_url: "https://api.stripe.com/".to_string(),
                sandbox_base_url: "https://api.stripe.com/".to_string(),
            },
            paypal: ConnectorParams {
                base_url: "https://api-m.paypal.com/".to_string(),
                sandbox_base_url: "https://api-m.sandbox.paypal.com/".to_string(),
            },
            square: ConnectorParams {
                base_url: "https://connect.squareup.com/".to_string(),
                sandbox_base_url: "https://connect.squareupsandbox.com/".to_string(),
            },
        }
    }
}
