use api_models::payments::{ProcessPaymentData, ProcessPaymentResult, RefundData, RefundResult};
use common_enums::{Currency, PaymentStatus};
use common_utils::{errors::CustomResult, ext_traits::StringExt, types::MinorUnit};
use error_stack::ResultExt;
use masking::Secret;
use payment_interfaces::errors::ConnectorError;
use serde::{Deserialize, Serialize};

use crate::utils;

/// Decrypted Stripe credential map.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StripeAuthType {
    /// Publishable key, used by client-side tokenization
    pub client_id: Secret<String>,
    /// Secret key, sent as the bearer credential on API calls
    pub client_secret: Secret<String>,
}

impl TryFrom<Secret<serde_json::Value>> for StripeAuthType {
    type Error = error_stack::Report<ConnectorError>;
    fn try_from(credentials: Secret<serde_json::Value>) -> Result<Self, Self::Error> {
        use common_utils::ext_traits::ValueExt;
        credentials
            .parse_value("StripeAuthType")
            .change_context(ConnectorError::FailedToObtainAuthType)
    }
}

/// Charge request, form-urlencoded with Stripe's bracketed key convention
/// for nested fields.
#[derive(Debug, Serialize)]
pub struct StripePaymentsRequest {
    pub amount: MinorUnit,
    pub currency: String,
    pub payment_method: Secret<String>,
    pub confirm: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    #[serde(rename = "metadata[invoice_id]")]
    pub metadata_invoice_id: String,
    #[serde(rename = "expand[0]")]
    pub expand_balance_transaction: &'static str,
}

impl TryFrom<(&ProcessPaymentData, MinorUnit)> for StripePaymentsRequest {
    type Error = error_stack::Report<ConnectorError>;
    fn try_from(
        (data, amount): (&ProcessPaymentData, MinorUnit),
    ) -> Result<Self, Self::Error> {
        // Raw card data must never reach this layer; only a pre-tokenized
        // payment-method reference is accepted.
        let payment_method = data
            .source_id
            .clone()
            .ok_or(ConnectorError::MissingRequiredField {
                field_name: "source_id",
            })?;
        Ok(Self {
            amount,
            currency: data.currency.to_string().to_lowercase(),
            payment_method,
            confirm: true,
            description: data.description.clone(),
            customer: data.customer_id.clone(),
            metadata_invoice_id: data.invoice_id.clone(),
            expand_balance_transaction: "latest_charge.balance_transaction",
        })
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StripePaymentStatus {
    Succeeded,
    Processing,
    RequiresAction,
    RequiresCapture,
    RequiresConfirmation,
    RequiresPaymentMethod,
    Canceled,
}

impl From<StripePaymentStatus> for PaymentStatus {
    fn from(item: StripePaymentStatus) -> Self {
        match item {
            StripePaymentStatus::Succeeded => Self::Succeeded,
            StripePaymentStatus::Processing
            | StripePaymentStatus::RequiresAction
            | StripePaymentStatus::RequiresCapture
            | StripePaymentStatus::RequiresConfirmation => Self::Pending,
            // A confirmed intent falls back to requires_payment_method only
            // after the attempt failed.
            StripePaymentStatus::RequiresPaymentMethod | StripePaymentStatus::Canceled => {
                Self::Failed
            }
        }
    }
}

/// Expanded-or-id field. Stripe sends a bare id unless the field was listed
/// in `expand[]`.
#[derive(Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum StripeExpandable<T> {
    Object(T),
    Id(String),
}

#[derive(Debug, Deserialize, Serialize)]
pub struct StripeBalanceTransaction {
    pub fee: MinorUnit,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct StripeCharge {
    pub id: String,
    #[serde(default)]
    pub balance_transaction: Option<StripeExpandable<StripeBalanceTransaction>>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct StripePaymentsResponse {
    pub id: String,
    pub status: StripePaymentStatus,
    pub amount: MinorUnit,
    #[serde(default)]
    pub amount_received: Option<MinorUnit>,
    pub currency: String,
    #[serde(default)]
    pub latest_charge: Option<StripeExpandable<StripeCharge>>,
}

impl StripePaymentsResponse {
    /// Currency of the intent, parsed from Stripe's lowercase code.
    pub fn currency(&self) -> CustomResult<Currency, ConnectorError> {
        parse_currency(&self.currency)
    }

    /// The captured amount: `amount_received` once settled, the requested
    /// amount otherwise.
    pub fn captured_amount(&self) -> MinorUnit {
        self.amount_received.unwrap_or(self.amount)
    }

    /// Processing fee from the expanded balance transaction, in minor units.
    pub fn fee(&self) -> Option<MinorUnit> {
        match &self.latest_charge {
            Some(StripeExpandable::Object(charge)) => match &charge.balance_transaction {
                Some(StripeExpandable::Object(txn)) => Some(txn.fee),
                _ => None,
            },
            _ => None,
        }
    }
}

impl TryFrom<(&ProcessPaymentData, StripePaymentsResponse)> for ProcessPaymentResult {
    type Error = error_stack::Report<ConnectorError>;
    fn try_from(
        (data, response): (&ProcessPaymentData, StripePaymentsResponse),
    ) -> Result<Self, Self::Error> {
        let currency = response.currency()?;
        let amount = utils::convert_back_amount(
            &common_utils::types::MinorUnitForConnector,
            response.amount,
            currency,
        )?;
        let fee = response
            .fee()
            .map(|fee| {
                utils::convert_back_amount(
                    &common_utils::types::MinorUnitForConnector,
                    fee,
                    currency,
                )
            })
            .transpose()?;
        Ok(Self {
            status: PaymentStatus::from(response.status),
            payment_method: "card".to_string(),
            amount,
            currency,
            fee,
            metadata: utils::merge_metadata(
                data.metadata.as_ref(),
                [("payment_intent_id", response.id.clone())],
            ),
            transaction_id: response.id,
        })
    }
}

/// Refund request. The amount is always resolved before this point: either
/// the caller's partial amount or the original captured amount looked up
/// from the payment intent.
#[derive(Debug, Serialize)]
pub struct StripeRefundRequest {
    pub payment_intent: String,
    pub amount: MinorUnit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StripeRefundStatus {
    Succeeded,
    Pending,
    RequiresAction,
    Failed,
    Canceled,
}

impl From<StripeRefundStatus> for PaymentStatus {
    fn from(item: StripeRefundStatus) -> Self {
        match item {
            StripeRefundStatus::Succeeded => Self::Succeeded,
            StripeRefundStatus::Pending | StripeRefundStatus::RequiresAction => Self::Pending,
            StripeRefundStatus::Failed | StripeRefundStatus::Canceled => Self::Failed,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct StripeRefundResponse {
    pub id: String,
    pub status: StripeRefundStatus,
    pub amount: MinorUnit,
    pub currency: String,
    #[serde(default)]
    pub payment_intent: Option<String>,
}

impl TryFrom<(&RefundData, StripeRefundResponse)> for RefundResult {
    type Error = error_stack::Report<ConnectorError>;
    fn try_from(
        (data, response): (&RefundData, StripeRefundResponse),
    ) -> Result<Self, Self::Error> {
        let currency = parse_currency(&response.currency)?;
        let amount = utils::convert_back_amount(
            &common_utils::types::MinorUnitForConnector,
            response.amount,
            currency,
        )?;
        Ok(Self {
            refund_id: response.id.clone(),
            transaction_id: response
                .payment_intent
                .unwrap_or_else(|| data.transaction_id.clone()),
            status: PaymentStatus::from(response.status),
            amount,
            currency,
            metadata: utils::merge_metadata(
                data.metadata.as_ref(),
                [("refund_id", response.id)],
            ),
        })
    }
}

/// Error envelope: `{"error": {...}}`.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct StripeErrorResponse {
    pub error: StripeErrorDetails,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct StripeErrorDetails {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub decline_code: Option<String>,
}

impl StripeErrorDetails {
    /// Compose the most useful human-readable detail the payload offers.
    pub fn detail(&self) -> Option<String> {
        match (&self.message, &self.decline_code) {
            (Some(message), Some(decline_code)) => {
                Some(format!("{message} (decline code: {decline_code})"))
            }
            (Some(message), None) => Some(message.clone()),
            (None, _) => self.code.clone(),
        }
    }
}

pub(crate) fn parse_currency(code: &str) -> CustomResult<Currency, ConnectorError> {
    code.to_uppercase()
        .parse_enum("Currency")
        .change_context(ConnectorError::ResponseDeserializationFailed)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use test_case::test_case;

    use super::*;

    #[test_case(StripePaymentStatus::Succeeded => PaymentStatus::Succeeded)]
    #[test_case(StripePaymentStatus::Processing => PaymentStatus::Pending)]
    #[test_case(StripePaymentStatus::RequiresAction => PaymentStatus::Pending)]
    #[test_case(StripePaymentStatus::RequiresPaymentMethod => PaymentStatus::Failed)]
    #[test_case(StripePaymentStatus::Canceled => PaymentStatus::Failed)]
    fn payment_status_collapses_to_canonical(status: StripePaymentStatus) -> PaymentStatus {
        PaymentStatus::from(status)
    }

    #[test]
    fn fee_requires_the_expanded_balance_transaction() {
        let response: StripePaymentsResponse = serde_json::from_value(serde_json::json!({
            "id": "pi_123",
            "status": "succeeded",
            "amount": 1999,
            "currency": "usd",
            "latest_charge": {
                "id": "ch_123",
                "balance_transaction": {"fee": 88}
            }
        }))
        .unwrap();
        assert_eq!(response.fee(), Some(MinorUnit::new(88)));

        let unexpanded: StripePaymentsResponse = serde_json::from_value(serde_json::json!({
            "id": "pi_123",
            "status": "succeeded",
            "amount": 1999,
            "currency": "usd",
            "latest_charge": "ch_123"
        }))
        .unwrap();
        assert_eq!(unexpanded.fee(), None);
    }

    #[test]
    fn charge_request_rejects_missing_source_id() {
        let data = ProcessPaymentData {
            invoice_id: "inv_1".to_string(),
            amount: common_utils::types::FloatMajorUnit::new(19.99),
            currency: Currency::USD,
            description: None,
            customer_id: None,
            payment_method_type: None,
            source_id: None,
            device_id: None,
            idempotency_key: None,
            metadata: None,
        };
        assert!(StripePaymentsRequest::try_from((&data, MinorUnit::new(1999))).is_err());
    }
}
