//! Wire-stable enums.

use serde::{Deserialize, Serialize};

/// The payment provider family configured for a tenant.
///
/// The stored configuration carries this as a free-form string; parsing happens
/// at dispatch time so that an unknown provider string surfaces as an
/// unsupported-provider error instead of a deserialization failure.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    PartialEq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum PaymentProvider {
    /// Card-network processor (Stripe)
    Card,
    /// Wallet/redirect processor (PayPal)
    Wallet,
    /// Point-of-sale terminal processor (Square)
    TerminalPos,
}

/// Canonical payment status. Every provider-specific status collapses into
/// this closed three-value set at the adapter boundary.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    PartialEq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PaymentStatus {
    /// The charge settled on the provider side
    Succeeded,
    /// The provider accepted the request but completion arrives later
    #[default]
    Pending,
    /// The provider rejected or failed the charge
    Failed,
}

/// Local status of a terminal checkout. Terminal once non-pending.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    PartialEq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CheckoutStatus {
    /// Waiting for the buyer to complete the checkout on the device
    #[default]
    Pending,
    /// The buyer completed the checkout
    Completed,
    /// The checkout was canceled before completion
    Canceled,
    /// The checkout failed on the device or provider side
    Failed,
}

impl CheckoutStatus {
    /// Whether this status can still transition.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// How a payment is presented to the provider.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    PartialEq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PaymentMethodType {
    /// Card-not-present charge against a tokenized payment method
    Online,
    /// Card-present charge pushed to a physical device
    Terminal,
}

/// The three-letter ISO 4217 currency code.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[rustfmt::skip]
pub enum Currency {
    AED, AUD, BHD, BRL, CAD, CHF, CLP, CNY, COP, CZK,
    DKK, EUR, GBP, HKD, HUF, IDR, ILS, INR, JOD, JPY,
    KRW, KWD, MXN, MYR, NOK, NZD, OMR, PHP, PLN, SAR,
    SEK, SGD, THB, TND, TRY, TWD,
    #[default]
    USD,
    VND, ZAR,
}

impl Currency {
    /// Bool that represents if the currency has no minor unit (e.g. JPY).
    pub fn is_zero_decimal_currency(self) -> bool {
        matches!(self, Self::CLP | Self::JPY | Self::KRW | Self::VND)
    }

    /// Bool that represents if the currency's minor unit is a thousandth
    /// of the major unit (e.g. BHD).
    pub fn is_three_decimal_currency(self) -> bool {
        matches!(self, Self::BHD | Self::JOD | Self::KWD | Self::OMR | Self::TND)
    }

    /// Number of digits after the decimal point in the major-unit
    /// representation.
    pub fn number_of_digits_after_decimal_point(self) -> u8 {
        if self.is_zero_decimal_currency() {
            0
        } else if self.is_three_decimal_currency() {
            3
        } else {
            2
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn payment_provider_round_trips_through_kebab_case() {
        assert_eq!(
            PaymentProvider::from_str("terminal-pos").ok(),
            Some(PaymentProvider::TerminalPos)
        );
        assert_eq!(PaymentProvider::TerminalPos.to_string(), "terminal-pos");
        assert!(PaymentProvider::from_str("unknown").is_err());
    }

    #[test]
    fn currency_decimal_classification() {
        assert_eq!(Currency::USD.number_of_digits_after_decimal_point(), 2);
        assert_eq!(Currency::JPY.number_of_digits_after_decimal_point(), 0);
        assert_eq!(Currency::BHD.number_of_digits_after_decimal_point(), 3);
    }

    #[test]
    fn canonical_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Succeeded).ok().as_deref(),
            Some("\"succeeded\"")
        );
    }
}
