//! Types that can be used in other crates

use std::fmt::Display;

use common_enums::Currency;
use serde::{Deserialize, Serialize};

use crate::errors::AmountConversionError;

/// The amount in the major denomination of its currency (e.g. `19.99` USD).
/// This is the canonical representation at the router boundary; every
/// provider-native encoding is derived from it inside the adapters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FloatMajorUnit(f64);

impl FloatMajorUnit {
    /// forms a new major unit from amount
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    /// gets amount as f64 value
    pub fn get_amount_as_f64(self) -> f64 {
        self.0
    }

    /// Convert the amount to the provider's integer minor units, rounding to
    /// the nearest minor unit (`round(amount * 100)` for two-decimal
    /// currencies).
    #[allow(clippy::as_conversions)]
    pub fn to_minor_unit_as_i64(self, currency: Currency) -> Result<MinorUnit, AmountConversionError> {
        if !self.0.is_finite() {
            return Err(AmountConversionError::NonFiniteAmount);
        }
        let multiplier = f64::from(currency_minor_unit_multiplier(currency));
        let scaled = (self.0 * multiplier).round();
        if scaled >= i64::MIN as f64 && scaled <= i64::MAX as f64 {
            Ok(MinorUnit::new(scaled as i64))
        } else {
            Err(AmountConversionError::MinorUnitOverflow(self.0))
        }
    }

    /// Convert the amount to the provider's decimal-string representation,
    /// fixed to the currency's number of decimal places (`"19.99"`).
    /// Zero-decimal currencies are sent without decimal places.
    pub fn to_major_unit_as_string(self, currency: Currency) -> Result<StringMajorUnit, AmountConversionError> {
        if !self.0.is_finite() {
            return Err(AmountConversionError::NonFiniteAmount);
        }
        let digits = usize::from(currency.number_of_digits_after_decimal_point());
        Ok(StringMajorUnit::new(format!("{:.*}", digits, self.0)))
    }
}

/// The amount in the minor (smallest) denomination of its currency, carried
/// as a wide integer since some provider SDKs require 64-bit minor units.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct MinorUnit(i64);

impl MinorUnit {
    /// forms a new minor unit from amount
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// gets amount as i64 value
    pub fn get_amount_as_i64(self) -> i64 {
        self.0
    }

    /// Saturating addition, used when accumulating provider fee entries
    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Convert the amount back to its major denomination.
    #[allow(clippy::as_conversions)]
    pub fn to_major_unit_as_f64(self, currency: Currency) -> Result<FloatMajorUnit, AmountConversionError> {
        let multiplier = f64::from(currency_minor_unit_multiplier(currency));
        Ok(FloatMajorUnit::new(self.0 as f64 / multiplier))
    }
}

impl Display for MinorUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The amount as a decimal string in major units, fixed to the currency's
/// decimal places (e.g. `"19.99"`).
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct StringMajorUnit(String);

impl StringMajorUnit {
    /// forms a new major unit from amount
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// gets amount as string value
    pub fn get_amount_as_string(&self) -> &str {
        &self.0
    }

    /// Convert the decimal string back to its major-unit float form.
    pub fn to_major_unit_as_f64(&self) -> Result<FloatMajorUnit, AmountConversionError> {
        let value = self
            .0
            .parse::<f64>()
            .map_err(|_| AmountConversionError::DecimalParseFailure(self.0.clone()))?;
        Ok(FloatMajorUnit::new(value))
    }
}

fn currency_minor_unit_multiplier(currency: Currency) -> u32 {
    if currency.is_zero_decimal_currency() {
        1
    } else if currency.is_three_decimal_currency() {
        1000
    } else {
        100
    }
}

/// This trait lets a provider-native amount representation be produced from
/// and folded back into the canonical major-unit amount. Each adapter picks
/// the convertor matching its provider's wire encoding.
pub trait AmountConvertor: Send {
    /// The provider-native representation
    type Output;

    /// Convert the canonical amount into the provider-native representation
    fn convert(
        &self,
        amount: FloatMajorUnit,
        currency: Currency,
    ) -> Result<Self::Output, AmountConversionError>;

    /// Convert the provider-native representation back to the canonical amount
    fn convert_back(
        &self,
        amount: Self::Output,
        currency: Currency,
    ) -> Result<FloatMajorUnit, AmountConversionError>;
}

/// Convertor for providers taking integer minor units
#[derive(Clone, Copy, Debug, Default)]
pub struct MinorUnitForConnector;

impl AmountConvertor for MinorUnitForConnector {
    type Output = MinorUnit;

    fn convert(
        &self,
        amount: FloatMajorUnit,
        currency: Currency,
    ) -> Result<Self::Output, AmountConversionError> {
        amount.to_minor_unit_as_i64(currency)
    }

    fn convert_back(
        &self,
        amount: Self::Output,
        currency: Currency,
    ) -> Result<FloatMajorUnit, AmountConversionError> {
        amount.to_major_unit_as_f64(currency)
    }
}

/// Convertor for providers taking decimal-string major units
#[derive(Clone, Copy, Debug, Default)]
pub struct StringMajorUnitForConnector;

impl AmountConvertor for StringMajorUnitForConnector {
    type Output = StringMajorUnit;

    fn convert(
        &self,
        amount: FloatMajorUnit,
        currency: Currency,
    ) -> Result<Self::Output, AmountConversionError> {
        amount.to_major_unit_as_string(currency)
    }

    fn convert_back(
        &self,
        amount: Self::Output,
        _currency: Currency,
    ) -> Result<FloatMajorUnit, AmountConversionError> {
        amount.to_major_unit_as_f64()
    }
}
