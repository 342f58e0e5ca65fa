use api_models::{
    payments::{
        ProcessPaymentData, ProcessPaymentResult, RefundData, RefundResult, TerminalCheckout,
        TerminalCheckoutData,
    },
    subscriptions::{SavedCard, Subscription, SubscriptionPhase},
};
use common_enums::{CheckoutStatus, Currency, PaymentStatus};
use common_utils::types::{MinorUnit, MinorUnitForConnector};
use error_stack::ResultExt;
use masking::Secret;
use payment_interfaces::errors::ConnectorError;
use serde::{Deserialize, Serialize};

use crate::utils;

/// Decrypted Square credential map.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SquareAuthType {
    pub access_token: Secret<String>,
    #[serde(default)]
    pub application_id: Option<Secret<String>>,
}

impl TryFrom<Secret<serde_json::Value>> for SquareAuthType {
    type Error = error_stack::Report<ConnectorError>;
    fn try_from(credentials: Secret<serde_json::Value>) -> Result<Self, Self::Error> {
        use common_utils::ext_traits::ValueExt;
        credentials
            .parse_value("SquareAuthType")
            .change_context(ConnectorError::FailedToObtainAuthType)
    }
}

/// Money object. The SDK requires 64-bit integer minor units, the third
/// distinct amount encoding in this codebase.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct SquareAmount {
    pub amount: MinorUnit,
    pub currency: Currency,
}

/// `POST /v2/payments` body for online (card-not-present) charges.
#[derive(Debug, Serialize)]
pub struct SquarePaymentsRequest {
    pub idempotency_key: Secret<String>,
    pub source_id: Secret<String>,
    pub amount_money: SquareAmount,
    pub autocomplete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
}

impl TryFrom<(&ProcessPaymentData, MinorUnit, String)> for SquarePaymentsRequest {
    type Error = error_stack::Report<ConnectorError>;
    fn try_from(
        (data, amount, idempotency_key): (&ProcessPaymentData, MinorUnit, String),
    ) -> Result<Self, Self::Error> {
        let source_id = data.source_id.clone().ok_or(ConnectorError::InvalidRequestData {
            message: "Square online payments require a tokenized card reference. Collect the \
                      card with the Web Payments SDK on the client and pass the resulting \
                      token as source_id."
                .to_string(),
        })?;
        Ok(Self {
            idempotency_key: Secret::new(idempotency_key),
            source_id,
            amount_money: SquareAmount {
                amount,
                currency: data.currency,
            },
            autocomplete: true,
            reference_id: Some(data.invoice_id.clone()),
            note: data.description.clone(),
            customer_id: data.customer_id.clone(),
        })
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SquarePaymentStatus {
    Completed,
    Approved,
    Pending,
    Failed,
    Canceled,
}

impl From<SquarePaymentStatus> for PaymentStatus {
    fn from(item: SquarePaymentStatus) -> Self {
        match item {
            SquarePaymentStatus::Completed => Self::Succeeded,
            SquarePaymentStatus::Approved | SquarePaymentStatus::Pending => Self::Pending,
            SquarePaymentStatus::Failed | SquarePaymentStatus::Canceled => Self::Failed,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SquareProcessingFee {
    pub amount_money: SquareAmount,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SquarePaymentDetails {
    pub id: String,
    pub status: SquarePaymentStatus,
    pub amount_money: SquareAmount,
    #[serde(default)]
    pub source_type: Option<String>,
    #[serde(default)]
    pub processing_fee: Option<Vec<SquareProcessingFee>>,
    #[serde(default)]
    pub reference_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SquarePaymentsResponse {
    pub payment: SquarePaymentDetails,
}

impl TryFrom<(&ProcessPaymentData, SquarePaymentsResponse)> for ProcessPaymentResult {
    type Error = error_stack::Report<ConnectorError>;
    fn try_from(
        (data, response): (&ProcessPaymentData, SquarePaymentsResponse),
    ) -> Result<Self, Self::Error> {
        let payment = response.payment;
        let currency = payment.amount_money.currency;
        let amount = utils::convert_back_amount(
            &MinorUnitForConnector,
            payment.amount_money.amount,
            currency,
        )?;
        let fee_minor = payment.processing_fee.as_ref().map(|fees| {
            fees.iter()
                .fold(MinorUnit::new(0), |acc, fee| acc.saturating_add(fee.amount_money.amount))
        });
        let fee = fee_minor
            .map(|fee| utils::convert_back_amount(&MinorUnitForConnector, fee, currency))
            .transpose()?;
        Ok(Self {
            status: PaymentStatus::from(payment.status),
            payment_method: payment
                .source_type
                .map(|source_type| source_type.to_lowercase())
                .unwrap_or_else(|| "card".to_string()),
            amount,
            currency,
            fee,
            metadata: utils::merge_metadata(
                data.metadata.as_ref(),
                [("payment_id", payment.id.clone())],
            ),
            transaction_id: payment.id,
        })
    }
}

/// Provider checkout status strings. Anything the mapping table does not
/// recognize lands on `Unknown`, which maps to the fail-safe `Pending`.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SquareCheckoutStatus {
    Pending,
    InProgress,
    CancelRequested,
    Canceled,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

impl From<SquareCheckoutStatus> for CheckoutStatus {
    fn from(item: SquareCheckoutStatus) -> Self {
        match item {
            SquareCheckoutStatus::Completed => Self::Completed,
            SquareCheckoutStatus::Canceled => Self::Canceled,
            SquareCheckoutStatus::Failed => Self::Failed,
            SquareCheckoutStatus::Pending
            | SquareCheckoutStatus::InProgress
            | SquareCheckoutStatus::CancelRequested
            | SquareCheckoutStatus::Unknown => Self::Pending,
        }
    }
}

/// A terminal checkout is asynchronous from the caller's point of view;
/// completion arrives out-of-band, so its payment-level status is pending
/// until the device reports a terminal state.
pub fn checkout_status_as_payment_status(status: CheckoutStatus) -> PaymentStatus {
    match status {
        CheckoutStatus::Completed => PaymentStatus::Succeeded,
        CheckoutStatus::Pending => PaymentStatus::Pending,
        CheckoutStatus::Canceled | CheckoutStatus::Failed => PaymentStatus::Failed,
    }
}

#[derive(Debug, Serialize)]
pub struct SquareDeviceOptions {
    pub device_id: String,
}

#[derive(Debug, Serialize)]
pub struct SquareCheckoutPayload {
    pub amount_money: SquareAmount,
    pub device_options: SquareDeviceOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
}

/// `POST /v2/terminals/checkouts` body.
#[derive(Debug, Serialize)]
pub struct SquareTerminalCheckoutRequest {
    pub idempotency_key: Secret<String>,
    pub checkout: SquareCheckoutPayload,
}

impl TryFrom<(&TerminalCheckoutData, MinorUnit, String)> for SquareTerminalCheckoutRequest {
    type Error = error_stack::Report<ConnectorError>;
    fn try_from(
        (data, amount, idempotency_key): (&TerminalCheckoutData, MinorUnit, String),
    ) -> Result<Self, Self::Error> {
        Ok(Self {
            idempotency_key: Secret::new(idempotency_key),
            checkout: SquareCheckoutPayload {
                amount_money: SquareAmount {
                    amount,
                    currency: data.currency,
                },
                device_options: SquareDeviceOptions {
                    device_id: data.device_id.clone(),
                },
                note: data.note.clone(),
                reference_id: Some(data.invoice_id.clone()),
            },
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct SquareDeviceOptionsResponse {
    #[serde(default)]
    pub device_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SquareTerminalCheckoutDetails {
    pub id: String,
    pub status: SquareCheckoutStatus,
    #[serde(default)]
    pub amount_money: Option<SquareAmount>,
    #[serde(default)]
    pub device_options: Option<SquareDeviceOptionsResponse>,
}

#[derive(Debug, Deserialize)]
pub struct SquareTerminalCheckoutResponse {
    pub checkout: SquareTerminalCheckoutDetails,
}

impl SquareTerminalCheckoutResponse {
    /// Normalize into the local checkout entity. `requested_device_id` backs
    /// up the device id when the provider response omits it.
    pub fn into_terminal_checkout(
        self,
        requested_device_id: Option<&str>,
    ) -> error_stack::Result<TerminalCheckout, ConnectorError> {
        let details = self.checkout;
        let (amount, currency) = match details.amount_money {
            Some(money) => (
                Some(utils::convert_back_amount(
                    &MinorUnitForConnector,
                    money.amount,
                    money.currency,
                )?),
                Some(money.currency),
            ),
            None => (None, None),
        };
        Ok(TerminalCheckout {
            checkout_id: details.id,
            status: CheckoutStatus::from(details.status),
            device_id: details
                .device_options
                .and_then(|options| options.device_id)
                .or_else(|| requested_device_id.map(str::to_string))
                .unwrap_or_default(),
            amount,
            currency,
            expires_at: None,
        })
    }
}

/// `POST /v2/refunds/` body (PaymentsApi refund). The provider requires an
/// explicit amount; full refunds are resolved against the original payment
/// before this request is built.
#[derive(Debug, Serialize)]
pub struct SquareRefundRequest {
    pub idempotency_key: Secret<String>,
    pub payment_id: Secret<String>,
    pub amount_money: SquareAmount,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SquareRefundStatus {
    Completed,
    Pending,
    Failed,
    Rejected,
}

impl From<SquareRefundStatus> for PaymentStatus {
    fn from(item: SquareRefundStatus) -> Self {
        match item {
            SquareRefundStatus::Completed => Self::Succeeded,
            SquareRefundStatus::Pending => Self::Pending,
            SquareRefundStatus::Failed | SquareRefundStatus::Rejected => Self::Failed,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SquareRefundDetails {
    pub id: String,
    pub status: SquareRefundStatus,
    pub amount_money: SquareAmount,
    #[serde(default)]
    pub payment_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SquareRefundResponse {
    pub refund: SquareRefundDetails,
}

impl TryFrom<(&RefundData, SquareRefundResponse)> for RefundResult {
    type Error = error_stack::Report<ConnectorError>;
    fn try_from(
        (data, response): (&RefundData, SquareRefundResponse),
    ) -> Result<Self, Self::Error> {
        let refund = response.refund;
        let currency = refund.amount_money.currency;
        let amount = utils::convert_back_amount(
            &MinorUnitForConnector,
            refund.amount_money.amount,
            currency,
        )?;
        Ok(Self {
            refund_id: refund.id.clone(),
            transaction_id: refund
                .payment_id
                .unwrap_or_else(|| data.transaction_id.clone()),
            status: PaymentStatus::from(refund.status),
            amount,
            currency,
            metadata: utils::merge_metadata(
                data.metadata.as_ref(),
                [("refund_id", refund.id)],
            ),
        })
    }
}

/// `POST /v2/subscriptions` body.
#[derive(Debug, Serialize)]
pub struct SquareCreateSubscriptionRequest {
    pub idempotency_key: Secret<String>,
    pub location_id: String,
    pub customer_id: String,
    pub plan_variation_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct SquareSubscriptionUpdatePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_variation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_id: Option<String>,
}

/// `PUT /v2/subscriptions/{id}` body.
#[derive(Debug, Serialize)]
pub struct SquareUpdateSubscriptionRequest {
    pub subscription: SquareSubscriptionUpdatePayload,
}

#[derive(Debug, Deserialize)]
pub struct SquareSubscription {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub plan_variation_id: Option<String>,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub charged_through_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SquareSubscriptionResponse {
    pub subscription: SquareSubscription,
}

impl From<SquareSubscription> for Subscription {
    fn from(item: SquareSubscription) -> Self {
        Self {
            subscription_id: item.id,
            status: item.status,
            plan_id: item.plan_variation_id.unwrap_or_default(),
            customer_id: item.customer_id.unwrap_or_default(),
            current_phase: item.start_date.map(|start_date| SubscriptionPhase {
                start_date,
                end_date: item.charged_through_date,
            }),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SquareCardPayload {
    pub customer_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cardholder_name: Option<String>,
}

/// `POST /v2/cards` body, tokenizing a card on file for a customer.
#[derive(Debug, Serialize)]
pub struct SquareCreateCardRequest {
    pub idempotency_key: Secret<String>,
    pub source_id: Secret<String>,
    pub card: SquareCardPayload,
}

#[derive(Debug, Deserialize)]
pub struct SquareCard {
    pub id: String,
    #[serde(default)]
    pub card_brand: Option<String>,
    #[serde(default)]
    pub last_4: Option<String>,
    #[serde(default)]
    pub exp_month: Option<i64>,
    #[serde(default)]
    pub exp_year: Option<i64>,
    #[serde(default)]
    pub customer_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SquareCardResponse {
    pub card: SquareCard,
}

impl SquareCardResponse {
    pub fn into_saved_card(self, requested_customer_id: &str) -> SavedCard {
        SavedCard {
            card_id: self.card.id,
            customer_id: self
                .card
                .customer_id
                .unwrap_or_else(|| requested_customer_id.to_string()),
            brand: self.card.card_brand,
            last_4: self.card.last_4,
            exp_month: self.card.exp_month,
            exp_year: self.card.exp_year,
        }
    }
}

/// Error envelope: `{"errors": [{"category", "code", "detail"}]}`.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct SquareErrorResponse {
    #[serde(default)]
    pub errors: Vec<SquareErrorDetails>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct SquareErrorDetails {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl SquareErrorResponse {
    /// First error wins; remaining entries are appended so multi-error
    /// payloads are not silently dropped.
    pub fn best_detail(&self) -> Option<String> {
        let mut details = self.errors.iter().map(|error| {
            error
                .detail
                .clone()
                .or_else(|| error.code.clone())
                .unwrap_or_else(|| "unknown error".to_string())
        });
        let first = details.next()?;
        let rest = details.collect::<Vec<_>>();
        if rest.is_empty() {
            Some(first)
        } else {
            Some(format!("{first}; {}", rest.join("; ")))
        }
    }

    /// Error code of the first entry, when present.
    pub fn first_code(&self) -> Option<String> {
        self.errors.first().and_then(|error| error.code.clone())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use test_case::test_case;

    use super::*;

    #[test_case("PENDING" => CheckoutStatus::Pending)]
    #[test_case("IN_PROGRESS" => CheckoutStatus::Pending)]
    #[test_case("CANCEL_REQUESTED" => CheckoutStatus::Pending)]
    #[test_case("CANCELED" => CheckoutStatus::Canceled)]
    #[test_case("COMPLETED" => CheckoutStatus::Completed)]
    #[test_case("FAILED" => CheckoutStatus::Failed)]
    #[test_case("SOME_FUTURE_STATUS" => CheckoutStatus::Pending; "unknown statuses are fail-safe pending")]
    fn checkout_status_mapping_is_total(provider_status: &str) -> CheckoutStatus {
        let status: SquareCheckoutStatus =
            serde_json::from_value(serde_json::Value::String(provider_status.to_string())).unwrap();
        CheckoutStatus::from(status)
    }

    #[test]
    fn online_payment_without_source_id_gets_actionable_error() {
        let data = ProcessPaymentData {
            invoice_id: "inv_9".to_string(),
            amount: common_utils::types::FloatMajorUnit::new(12.00),
            currency: Currency::USD,
            description: None,
            customer_id: None,
            payment_method_type: Some(common_enums::PaymentMethodType::Online),
            source_id: None,
            device_id: None,
            idempotency_key: None,
            metadata: None,
        };
        let error =
            SquarePaymentsRequest::try_from((&data, MinorUnit::new(1200), "key".to_string()))
                .unwrap_err();
        assert!(error.to_string().contains("Web Payments SDK"));
    }

    #[test]
    fn multi_error_payloads_accumulate() {
        let response = SquareErrorResponse {
            errors: vec![
                SquareErrorDetails {
                    category: Some("AUTHENTICATION_ERROR".to_string()),
                    code: Some("UNAUTHORIZED".to_string()),
                    detail: Some("This request could not be authorized.".to_string()),
                },
                SquareErrorDetails {
                    category: None,
                    code: Some("FORBIDDEN".to_string()),
                    detail: None,
                },
            ],
        };
        assert_eq!(
            response.best_detail().unwrap(),
            "This request could not be authorized.; FORBIDDEN"
        );
    }
}
