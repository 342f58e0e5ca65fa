//! Wallet/redirect adapter (PayPal).
//!
//! Payments run the provider's two-phase order lifecycle synchronously:
//! create order (intent `CAPTURE`), then capture it. The two provider calls
//! are deliberately kept distinct so a future asynchronous buyer-approval
//! flow only has to split them, not rebuild them. Amounts travel as decimal
//! strings fixed to two places; the provider needs no idempotency key.

pub mod transformers;

use api_models::{
    admin::PaymentIntegrationConfig,
    payments::{
        ConnectionStatus, ProcessPaymentData, ProcessPaymentResult, RefundData, RefundResult,
    },
};
use base64::Engine;
use common_utils::{
    errors::CustomResult,
    request::{Method, RequestBuilder, RequestContent},
    types::StringMajorUnitForConnector,
};
use error_stack::ResultExt;
use masking::{Mask, Maskable, PeekInterface, Secret};
use payment_interfaces::{
    api::{ConnectorCommon, PaymentContext, PaymentProcessor},
    configs::Connectors,
    consts,
    errors::ConnectorError,
    types::{ErrorResponse, Response},
};
use router_env::{instrument, tracing};
use transformers as paypal;

use crate::{constants::headers, utils};

/// Wallet/redirect processor adapter.
#[derive(Clone, Debug, Default)]
pub struct Paypal;

impl Paypal {
    pub fn new() -> Self {
        Self
    }

    async fn decrypt_auth(
        &self,
        ctx: &PaymentContext<'_>,
        config: &PaymentIntegrationConfig,
    ) -> CustomResult<paypal::PaypalAuthType, ConnectorError> {
        let credentials = ctx
            .vault
            .decrypt(&config.credentials)
            .await
            .change_context(ConnectorError::FailedToObtainAuthType)?;
        paypal::PaypalAuthType::try_from(credentials)
    }

    fn bearer_headers(access_token: &Secret<String>) -> Vec<(String, Maskable<String>)> {
        vec![(
            headers::AUTHORIZATION.to_string(),
            format!("Bearer {}", access_token.peek()).into_masked(),
        )]
    }

    /// `POST /v1/oauth2/token` client-credentials exchange. Every operation
    /// resolves its own token; nothing is cached across calls.
    async fn get_access_token(
        &self,
        ctx: &PaymentContext<'_>,
        auth: &paypal::PaypalAuthType,
        test_mode: bool,
    ) -> CustomResult<Secret<String>, ConnectorError> {
        let basic = base64::engine::general_purpose::STANDARD.encode(format!(
            "{}:{}",
            auth.client_id.peek(),
            auth.client_secret.peek()
        ));
        let request = RequestBuilder::new()
            .method(Method::Post)
            .url(&format!(
                "{}v1/oauth2/token",
                self.base_url(ctx.connectors, test_mode)
            ))
            .attach_default_headers()
            .header(
                headers::AUTHORIZATION,
                format!("Basic {basic}").into_masked(),
            )
            .set_body(RequestContent::FormUrlEncoded(Box::new(
                paypal::PaypalAccessTokenRequest {
                    grant_type: "client_credentials",
                },
            )))
            .build();

        let response = utils::call_connector(ctx, request).await?;
        let token_response: paypal::PaypalAuthUpdateResponse =
            utils::handle_response(self, response, "PaypalAuthUpdateResponse")?;
        Ok(token_response.access_token)
    }

    /// `GET /v2/payments/captures/{id}`, used to discover the original
    /// capture's currency before refunding.
    async fn fetch_capture_details(
        &self,
        ctx: &PaymentContext<'_>,
        access_token: &Secret<String>,
        test_mode: bool,
        capture_id: &str,
    ) -> CustomResult<paypal::PaypalCaptureDetailsResponse, ConnectorError> {
        let request = RequestBuilder::new()
            .method(Method::Get)
            .url(&format!(
                "{}v2/payments/captures/{capture_id}",
                self.base_url(ctx.connectors, test_mode)
            ))
            .attach_default_headers()
            .headers(Self::bearer_headers(access_token))
            .build();
        let response = utils::call_connector(ctx, request).await?;
        utils::handle_response(self, response, "PaypalCaptureDetailsResponse")
    }
}

impl ConnectorCommon for Paypal {
    fn id(&self) -> &'static str {
        "paypal"
    }

    fn base_url<'a>(&self, connectors: &'a Connectors, test_mode: bool) -> &'a str {
        connectors.paypal.url_for(test_mode)
    }

    fn build_error_response(&self, res: Response) -> CustomResult<ErrorResponse, ConnectorError> {
        use common_utils::ext_traits::BytesExt;

        let response: paypal::PaypalErrorResponse = res
            .response
            .parse_struct("PaypalErrorResponse")
            .change_context(ConnectorError::ResponseDeserializationFailed)?;

        Ok(match response {
            paypal::PaypalErrorResponse::Api(api_error) => ErrorResponse {
                status_code: res.status_code,
                code: api_error.name.clone(),
                message: api_error
                    .message
                    .clone()
                    .unwrap_or_else(|| consts::NO_ERROR_MESSAGE.to_string()),
                reason: paypal::get_error_reason(&api_error),
            },
            paypal::PaypalErrorResponse::Auth(auth_error) => ErrorResponse {
                status_code: res.status_code,
                code: auth_error.error.clone(),
                message: auth_error
                    .error_description
                    .clone()
                    .unwrap_or_else(|| consts::NO_ERROR_MESSAGE.to_string()),
                reason: auth_error.error_description,
            },
        })
    }
}

#[async_trait::async_trait]
impl PaymentProcessor for Paypal {
    /// The oauth token exchange doubles as the cheap real probe for this
    /// provider.
    #[instrument(skip_all)]
    async fn test_connection(
        &self,
        ctx: &PaymentContext<'_>,
        config: &PaymentIntegrationConfig,
    ) -> CustomResult<ConnectionStatus, ConnectorError> {
        let auth = match self.decrypt_auth(ctx, config).await {
            Ok(auth) => auth,
            Err(_) => return Ok(ConnectionStatus::failed("Invalid PayPal credentials format")),
        };
        match self
            .get_access_token(ctx, &auth, config.settings.test_mode)
            .await
        {
            Ok(_) => Ok(ConnectionStatus::ok()),
            Err(error) => Ok(ConnectionStatus::failed(match error.current_context() {
                ConnectorError::ProcessingStepFailed(Some(detail)) => {
                    format!("PayPal rejected the credentials: {detail}")
                }
                other => other.to_string(),
            })),
        }
    }

    #[instrument(skip_all)]
    async fn process_payment(
        &self,
        ctx: &PaymentContext<'_>,
        config: &PaymentIntegrationConfig,
        data: &ProcessPaymentData,
    ) -> CustomResult<ProcessPaymentResult, ConnectorError> {
        let auth = self.decrypt_auth(ctx, config).await?;
        let test_mode = config.settings.test_mode;
        let access_token = self.get_access_token(ctx, &auth, test_mode).await?;

        let amount =
            utils::convert_amount(&StringMajorUnitForConnector, data.amount, data.currency)?;
        let order_request = paypal::PaypalOrderRequest::try_from((data, amount))?;

        // Phase one: create the order.
        let request = RequestBuilder::new()
            .method(Method::Post)
            .url(&format!(
                "{}v2/checkout/orders",
                self.base_url(ctx.connectors, test_mode)
            ))
            .attach_default_headers()
            .headers(Self::bearer_headers(&access_token))
            .set_body(RequestContent::Json(Box::new(order_request)))
            .build();
        let response = utils::call_connector(ctx, request).await?;
        let order: paypal::PaypalOrderResponse =
            utils::handle_response(self, response, "PaypalOrderResponse")?;
        router_env::logger::info!(connector_order_id = %order.id, order_status = ?order.status);

        // Phase two: capture it immediately. This optimistic capture skips
        // the buyer-approval redirect; a server-initiated/stored-consent
        // flow completes here, anything else surfaces the provider's
        // decline.
        let request = RequestBuilder::new()
            .method(Method::Post)
            .url(&format!(
                "{}v2/checkout/orders/{}/capture",
                self.base_url(ctx.connectors, test_mode),
                order.id
            ))
            .attach_default_headers()
            .headers(Self::bearer_headers(&access_token))
            .set_body(RequestContent::Json(Box::new(serde_json::json!({}))))
            .build();
        let response = utils::call_connector(ctx, request).await?;
        let capture: paypal::PaypalCaptureOrderResponse =
            utils::handle_response(self, response, "PaypalCaptureOrderResponse")?;
        router_env::logger::info!(connector_response = ?capture);

        ProcessPaymentResult::try_from((data, capture))
    }

    /// A refund amount is only sent when the caller specified one; a full
    /// refund omits the field and lets the provider compute the total.
    #[instrument(skip_all)]
    async fn refund_payment(
        &self,
        ctx: &PaymentContext<'_>,
        config: &PaymentIntegrationConfig,
        data: &RefundData,
    ) -> CustomResult<RefundResult, ConnectorError> {
        let auth = self.decrypt_auth(ctx, config).await?;
        let test_mode = config.settings.test_mode;
        let access_token = self.get_access_token(ctx, &auth, test_mode).await?;

        let original = self
            .fetch_capture_details(ctx, &access_token, test_mode, &data.transaction_id)
            .await?;

        let amount = data
            .amount
            .map(|partial| {
                utils::convert_amount(
                    &StringMajorUnitForConnector,
                    partial,
                    original.amount.currency_code,
                )
                .map(|value| paypal::OrderAmount {
                    currency_code: original.amount.currency_code,
                    value,
                })
            })
            .transpose()?;

        let refund_request = paypal::PaypalRefundRequest {
            amount,
            note_to_payer: data.reason.clone(),
        };
        let request = RequestBuilder::new()
            .method(Method::Post)
            .url(&format!(
                "{}v2/payments/captures/{}/refund",
                self.base_url(ctx.connectors, test_mode),
                data.transaction_id
            ))
            .attach_default_headers()
            .headers(Self::bearer_headers(&access_token))
            .set_body(RequestContent::Json(Box::new(refund_request)))
            .build();

        let response = utils::call_connector(ctx, request).await?;
        let refund_response: paypal::PaypalRefundResponse =
            utils::handle_response(self, response, "PaypalRefundResponse")?;
        router_env::logger::info!(connector_response = ?refund_response);

        RefundResult::try_from((data, refund_response, &original))
    }
}
