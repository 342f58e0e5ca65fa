use api_models::payments::{ProcessPaymentData, ProcessPaymentResult, RefundData, RefundResult};
use common_enums::{Currency, PaymentStatus};
use common_utils::types::{StringMajorUnit, StringMajorUnitForConnector};
use error_stack::ResultExt;
use masking::Secret;
use payment_interfaces::errors::ConnectorError;
use serde::{Deserialize, Serialize};

use crate::utils;

/// Decrypted PayPal credential map.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaypalAuthType {
    pub client_id: Secret<String>,
    pub client_secret: Secret<String>,
}

impl TryFrom<Secret<serde_json::Value>> for PaypalAuthType {
    type Error = error_stack::Report<ConnectorError>;
    fn try_from(credentials: Secret<serde_json::Value>) -> Result<Self, Self::Error> {
        use common_utils::ext_traits::ValueExt;
        credentials
            .parse_value("PaypalAuthType")
            .change_context(ConnectorError::FailedToObtainAuthType)
    }
}

/// Client-credentials token exchange request.
#[derive(Debug, Serialize)]
pub struct PaypalAccessTokenRequest {
    pub grant_type: &'static str,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PaypalAuthUpdateResponse {
    pub access_token: Secret<String>,
    pub token_type: String,
    pub expires_in: i64,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaypalPaymentIntent {
    Capture,
    Authorize,
}

/// Amounts are decimal strings fixed to the currency's decimal places, the
/// opposite convention from the card adapter's integer cents.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct OrderAmount {
    pub currency_code: Currency,
    pub value: StringMajorUnit,
}

#[derive(Debug, Serialize)]
pub struct PurchaseUnitRequest {
    pub reference_id: String,
    pub amount: OrderAmount,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// `POST /v2/checkout/orders` body, intent fixed to `CAPTURE`.
#[derive(Debug, Serialize)]
pub struct PaypalOrderRequest {
    pub intent: PaypalPaymentIntent,
    pub purchase_units: Vec<PurchaseUnitRequest>,
}

impl TryFrom<(&ProcessPaymentData, StringMajorUnit)> for PaypalOrderRequest {
    type Error = error_stack::Report<ConnectorError>;
    fn try_from(
        (data, amount): (&ProcessPaymentData, StringMajorUnit),
    ) -> Result<Self, Self::Error> {
        Ok(Self {
            intent: PaypalPaymentIntent::Capture,
            purchase_units: vec![PurchaseUnitRequest {
                reference_id: data.invoice_id.clone(),
                amount: OrderAmount {
                    currency_code: data.currency,
                    value: amount,
                },
                description: data.description.clone(),
            }],
        })
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaypalOrderStatus {
    Created,
    Saved,
    Approved,
    Voided,
    Completed,
    PayerActionRequired,
}

impl From<PaypalOrderStatus> for PaymentStatus {
    fn from(item: PaypalOrderStatus) -> Self {
        match item {
            PaypalOrderStatus::Completed => Self::Succeeded,
            PaypalOrderStatus::Created
            | PaypalOrderStatus::Saved
            | PaypalOrderStatus::Approved
            | PaypalOrderStatus::PayerActionRequired => Self::Pending,
            PaypalOrderStatus::Voided => Self::Failed,
        }
    }
}

/// `POST /v2/checkout/orders` response; only the order id and status matter
/// before the capture call.
#[derive(Debug, Deserialize, Serialize)]
pub struct PaypalOrderResponse {
    pub id: String,
    pub status: PaypalOrderStatus,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaypalCaptureStatus {
    Completed,
    Declined,
    Failed,
    Pending,
    Refunded,
    PartiallyRefunded,
}

impl From<PaypalCaptureStatus> for PaymentStatus {
    fn from(item: PaypalCaptureStatus) -> Self {
        match item {
            PaypalCaptureStatus::Completed
            | PaypalCaptureStatus::Refunded
            | PaypalCaptureStatus::PartiallyRefunded => Self::Succeeded,
            PaypalCaptureStatus::Pending => Self::Pending,
            PaypalCaptureStatus::Declined | PaypalCaptureStatus::Failed => Self::Failed,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SellerReceivableBreakdown {
    #[serde(default)]
    pub paypal_fee: Option<OrderAmount>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PaypalCapture {
    pub id: String,
    pub status: PaypalCaptureStatus,
    #[serde(default)]
    pub amount: Option<OrderAmount>,
    #[serde(default)]
    pub seller_receivable_breakdown: Option<SellerReceivableBreakdown>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PaypalPayments {
    #[serde(default)]
    pub captures: Vec<PaypalCapture>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PurchaseUnitResponse {
    #[serde(default)]
    pub payments: Option<PaypalPayments>,
}

/// `POST /v2/checkout/orders/{id}/capture` response.
#[derive(Debug, Deserialize, Serialize)]
pub struct PaypalCaptureOrderResponse {
    pub id: String,
    pub status: PaypalOrderStatus,
    #[serde(default)]
    pub purchase_units: Vec<PurchaseUnitResponse>,
}

impl PaypalCaptureOrderResponse {
    /// The capture created for the single purchase unit this adapter sends.
    pub fn first_capture(&self) -> Option<&PaypalCapture> {
        self.purchase_units
            .iter()
            .filter_map(|unit| unit.payments.as_ref())
            .flat_map(|payments| payments.captures.iter())
            .next()
    }
}

impl TryFrom<(&ProcessPaymentData, PaypalCaptureOrderResponse)> for ProcessPaymentResult {
    type Error = error_stack::Report<ConnectorError>;
    fn try_from(
        (data, response): (&ProcessPaymentData, PaypalCaptureOrderResponse),
    ) -> Result<Self, Self::Error> {
        let capture = response.first_capture();

        // Prefer the capture-level status; the order-level status stays
        // COMPLETED even for partially declined captures.
        let status = capture
            .map(|capture| PaymentStatus::from(capture.status))
            .unwrap_or_else(|| PaymentStatus::from(response.status));

        let (amount, currency) = match capture.and_then(|capture| capture.amount.as_ref()) {
            Some(order_amount) => (
                utils::convert_back_amount(
                    &StringMajorUnitForConnector,
                    order_amount.value.clone(),
                    order_amount.currency_code,
                )?,
                order_amount.currency_code,
            ),
            None => (data.amount, data.currency),
        };

        let fee = capture
            .and_then(|capture| capture.seller_receivable_breakdown.as_ref())
            .and_then(|breakdown| breakdown.paypal_fee.as_ref())
            .map(|fee| {
                utils::convert_back_amount(
                    &StringMajorUnitForConnector,
                    fee.value.clone(),
                    fee.currency_code,
                )
            })
            .transpose()?;

        let transaction_id = capture
            .map(|capture| capture.id.clone())
            .unwrap_or_else(|| response.id.clone());

        Ok(Self {
            transaction_id: transaction_id.clone(),
            status,
            payment_method: "paypal".to_string(),
            amount,
            currency,
            fee,
            metadata: utils::merge_metadata(
                data.metadata.as_ref(),
                [("order_id", response.id), ("capture_id", transaction_id)],
            ),
        })
    }
}

/// `GET /v2/payments/captures/{id}` response, used to discover the original
/// capture's currency before refunding.
#[derive(Debug, Deserialize, Serialize)]
pub struct PaypalCaptureDetailsResponse {
    pub id: String,
    pub status: PaypalCaptureStatus,
    pub amount: OrderAmount,
}

/// Refund body. The `amount` field is only present when the caller asked for
/// a partial refund; omitting it entirely invokes the provider's own
/// full-refund semantics, which is a different instruction from sending the
/// captured total.
#[derive(Debug, Serialize)]
pub struct PaypalRefundRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<OrderAmount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_to_payer: Option<String>,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaypalRefundStatus {
    Completed,
    Cancelled,
    Failed,
    Pending,
}

impl From<PaypalRefundStatus> for PaymentStatus {
    fn from(item: PaypalRefundStatus) -> Self {
        match item {
            PaypalRefundStatus::Completed => Self::Succeeded,
            PaypalRefundStatus::Pending => Self::Pending,
            PaypalRefundStatus::Cancelled | PaypalRefundStatus::Failed => Self::Failed,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PaypalRefundResponse {
    pub id: String,
    pub status: PaypalRefundStatus,
    #[serde(default)]
    pub amount: Option<OrderAmount>,
}

impl TryFrom<(&RefundData, PaypalRefundResponse, &PaypalCaptureDetailsResponse)> for RefundResult {
    type Error = error_stack::Report<ConnectorError>;
    fn try_from(
        (data, response, original): (
            &RefundData,
            PaypalRefundResponse,
            &PaypalCaptureDetailsResponse,
        ),
    ) -> Result<Self, Self::Error> {
        let refunded = response.amount.as_ref().unwrap_or(&original.amount);
        let amount = utils::convert_back_amount(
            &StringMajorUnitForConnector,
            refunded.value.clone(),
            refunded.currency_code,
        )?;
        Ok(Self {
            refund_id: response.id.clone(),
            transaction_id: data.transaction_id.clone(),
            status: PaymentStatus::from(response.status),
            amount,
            currency: refunded.currency_code,
            metadata: utils::merge_metadata(
                data.metadata.as_ref(),
                [("refund_id", response.id)],
            ),
        })
    }
}

/// Error envelope. The REST APIs nest detail under `details[]`; the oauth
/// endpoint uses a flat `error`/`error_description` pair.
#[derive(Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PaypalErrorResponse {
    Api(PaypalApiError),
    Auth(PaypalAuthError),
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PaypalApiError {
    pub name: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<Vec<PaypalErrorDetail>>,
    #[serde(default)]
    pub debug_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PaypalErrorDetail {
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub issue: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PaypalAuthError {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

/// Collapse nested error detail into one line, mirroring how each detail
/// entry names the failing field and issue.
pub fn get_error_reason(error: &PaypalApiError) -> Option<String> {
    let detail = error.details.as_ref().map(|details| {
        details
            .iter()
            .map(|detail| {
                let issue = detail.issue.as_deref().unwrap_or("unknown issue");
                match &detail.description {
                    Some(description) => format!("{issue}: {description}"),
                    None => issue.to_string(),
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    });
    match (&error.message, detail) {
        (Some(message), Some(detail)) => Some(format!("{message} ({detail})")),
        (Some(message), None) => Some(message.clone()),
        (None, detail) => detail,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use test_case::test_case;

    use super::*;

    #[test_case(PaypalCaptureStatus::Completed => PaymentStatus::Succeeded)]
    #[test_case(PaypalCaptureStatus::Pending => PaymentStatus::Pending)]
    #[test_case(PaypalCaptureStatus::Declined => PaymentStatus::Failed)]
    fn capture_status_collapses_to_canonical(status: PaypalCaptureStatus) -> PaymentStatus {
        PaymentStatus::from(status)
    }

    #[test]
    fn full_refund_request_carries_no_amount_field() {
        let request = PaypalRefundRequest {
            amount: None,
            note_to_payer: None,
        };
        assert_eq!(serde_json::to_string(&request).unwrap(), "{}");
    }

    #[test]
    fn partial_refund_request_carries_the_decimal_string() {
        let request = PaypalRefundRequest {
            amount: Some(OrderAmount {
                currency_code: Currency::USD,
                value: StringMajorUnit::new("10.00".to_string()),
            }),
            note_to_payer: None,
        };
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            "{\"amount\":{\"currency_code\":\"USD\",\"value\":\"10.00\"}}"
        );
    }

    #[test]
    fn error_reason_accumulates_details() {
        let error = PaypalApiError {
            name: "UNPROCESSABLE_ENTITY".to_string(),
            message: Some("The requested action could not be performed.".to_string()),
            details: Some(vec![PaypalErrorDetail {
                field: None,
                issue: Some("INSTRUMENT_DECLINED".to_string()),
                description: Some("The instrument presented was declined.".to_string()),
            }]),
            debug_id: None,
        };
        let reason = get_error_reason(&error).unwrap();
        assert!(reason.contains("INSTRUMENT_DECLINED"));
        assert!(reason.contains("declined"));
    }
}
