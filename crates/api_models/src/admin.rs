//! Tenant payment-integration configuration models.
//!
//! These are read-only views for the payment core; creation and updates happen
//! in the tenant administration surface.

use std::collections::HashMap;

use masking::StrongSecret;
use serde::{Deserialize, Serialize};

/// Encrypted credential blob as stored at rest. Opaque to the payment core;
/// it is handed to the credential vault for decryption on demand and never
/// logged or cached in plaintext.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EncryptedCredentials(StrongSecret<String>);

impl EncryptedCredentials {
    /// Wrap an encrypted blob
    pub fn new(blob: String) -> Self {
        Self(StrongSecret::new(blob))
    }

    /// The inner secret, for handing to the vault
    pub fn inner(&self) -> &StrongSecret<String> {
        &self.0
    }
}

/// Per-tenant payment integration configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PaymentIntegrationConfig {
    /// The configured provider, stored as a free-form string and parsed at
    /// dispatch time. An unknown value is an unsupported-provider error, not
    /// a deserialization failure.
    pub provider: String,

    /// Whether the integration is turned on. A disabled integration
    /// short-circuits before any credential decryption or network call.
    pub enabled: bool,

    /// Encrypted provider credentials
    pub credentials: EncryptedCredentials,

    /// Provider-specific flags
    #[serde(default)]
    pub settings: IntegrationSettings,
}

/// Typed view over the free-form settings map attached to an integration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationSettings {
    /// Route calls to the provider's sandbox environment
    #[serde(default)]
    pub test_mode: bool,

    /// Base URL the provider should deliver webhooks to
    #[serde(default)]
    pub webhook_base_url: Option<url::Url>,

    /// Merchant location identifier, required by the terminal-POS provider
    #[serde(default)]
    pub merchant_location_id: Option<String>,

    /// Any remaining provider-specific flags, passed through untyped
    #[serde(flatten, default)]
    pub extra: HashMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn settings_capture_unknown_flags() {
        let settings: IntegrationSettings = serde_json::from_value(serde_json::json!({
            "testMode": true,
            "merchantLocationId": "L123",
            "statementDescriptor": "ACME POS"
        }))
        .unwrap();
        assert!(settings.test_mode);
        assert_eq!(settings.merchant_location_id.as_deref(), Some("L123"));
        assert!(settings.extra.contains_key("statementDescriptor"));
    }

    #[test]
    fn credentials_never_appear_in_debug_output() {
        let config = PaymentIntegrationConfig {
            provider: "card".to_string(),
            enabled: true,
            credentials: EncryptedCredentials::new("vault:v1:abcdef".to_string()),
            settings: IntegrationSettings::default(),
        };
        assert!(!format!("{config:?}").contains("abcdef"));
    }
}
