//! Card-network adapter (Stripe).
//!
//! Amounts travel as integer minor units (`round(amount * 100)` for
//! two-decimal currencies). Requests are form-urlencoded and carry an
//! `Idempotency-Key` header bounded to the provider's length limit.

pub mod transformers;

use api_models::{
    admin::PaymentIntegrationConfig,
    payments::{
        ConnectionStatus, ProcessPaymentData, ProcessPaymentResult, RefundData, RefundResult,
    },
};
use common_utils::{
    errors::CustomResult,
    request::{Method, RequestBuilder, RequestContent},
    types::MinorUnitForConnector,
};
use error_stack::ResultExt;
use masking::{Mask, Maskable, PeekInterface};
use payment_interfaces::{
    api::{ConnectorCommon, PaymentContext, PaymentProcessor},
    configs::Connectors,
    consts,
    errors::ConnectorError,
    types::{ErrorResponse, Response},
};
use router_env::{instrument, tracing};
use transformers as stripe;

use crate::{constants::headers, utils};

/// Card-network processor adapter.
#[derive(Clone, Debug, Default)]
pub struct Stripe;

impl Stripe {
    pub fn new() -> Self {
        Self
    }

    async fn decrypt_auth(
        &self,
        ctx: &PaymentContext<'_>,
        config: &PaymentIntegrationConfig,
    ) -> CustomResult<stripe::StripeAuthType, ConnectorError> {
        let credentials = ctx
            .vault
            .decrypt(&config.credentials)
            .await
            .change_context(ConnectorError::FailedToObtainAuthType)?;
        stripe::StripeAuthType::try_from(credentials)
    }

    fn build_headers(
        &self,
        auth: &stripe::StripeAuthType,
        idempotency_key: Option<&str>,
    ) -> Vec<(String, Maskable<String>)> {
        let mut request_headers = vec![(
            headers::AUTHORIZATION.to_string(),
            format!("Bearer {}", auth.client_secret.peek()).into_masked(),
        )];
        if let Some(key) = idempotency_key {
            request_headers.push((headers::IDEMPOTENCY_KEY.to_string(), key.into()));
        }
        request_headers
    }

    /// `GET /v1/payment_intents/{id}`, used to resolve the original charge
    /// before refunding.
    async fn fetch_payment_intent(
        &self,
        ctx: &PaymentContext<'_>,
        auth: &stripe::StripeAuthType,
        test_mode: bool,
        payment_intent_id: &str,
    ) -> CustomResult<stripe::StripePaymentsResponse, ConnectorError> {
        let request = RequestBuilder::new()
            .method(Method::Get)
            .url(&format!(
                "{}v1/payment_intents/{payment_intent_id}",
                self.base_url(ctx.connectors, test_mode)
            ))
            .attach_default_headers()
            .headers(self.build_headers(auth, None))
            .build();
        let response = utils::call_connector(ctx, request).await?;
        utils::handle_response(self, response, "StripePaymentsResponse")
    }
}

impl ConnectorCommon for Stripe {
    fn id(&self) -> &'static str {
        "stripe"
    }

    fn base_url<'a>(&self, connectors: &'a Connectors, test_mode: bool) -> &'a str {
        connectors.stripe.url_for(test_mode)
    }

    fn build_error_response(&self, res: Response) -> CustomResult<ErrorResponse, ConnectorError> {
        use common_utils::ext_traits::BytesExt;

        let response: stripe::StripeErrorResponse = res
            .response
            .parse_struct("StripeErrorResponse")
            .change_context(ConnectorError::ResponseDeserializationFailed)?;

        Ok(ErrorResponse {
            status_code: res.status_code,
            code: response
                .error
                .code
                .clone()
                .unwrap_or_else(|| consts::NO_ERROR_CODE.to_string()),
            message: response
                .error
                .error_type
                .clone()
                .unwrap_or_else(|| consts::NO_ERROR_MESSAGE.to_string()),
            reason: response.error.detail(),
        })
    }
}

#[async_trait::async_trait]
impl PaymentProcessor for Stripe {
    /// Credential shape check only; this provider's agreed smoke-test
    /// semantics deliberately avoid a network round-trip.
    #[instrument(skip_all)]
    async fn test_connection(
        &self,
        ctx: &PaymentContext<'_>,
        config: &PaymentIntegrationConfig,
    ) -> CustomResult<ConnectionStatus, ConnectorError> {
        let auth = match self.decrypt_auth(ctx, config).await {
            Ok(auth) => auth,
            Err(_) => return Ok(ConnectionStatus::failed("Invalid Stripe credentials format")),
        };
        if utils::credential_shape_is_valid(auth.client_id.peek())
            && utils::credential_shape_is_valid(auth.client_secret.peek())
        {
            Ok(ConnectionStatus::ok())
        } else {
            Ok(ConnectionStatus::failed("Invalid Stripe credentials format"))
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
        let amount = utils::convert_amount(&MinorUnitForConnector, data.amount, data.currency)?;
        let connector_req = stripe::StripePaymentsRequest::try_from((data, amount))?;

        let idempotency_key = utils::normalize_idempotency_key(data.idempotency_key.as_deref());
        let request = RequestBuilder::new()
            .method(Method::Post)
            .url(&format!(
                "{}v1/payment_intents",
                self.base_url(ctx.connectors, config.settings.test_mode)
            ))
            .attach_default_headers()
            .headers(self.build_headers(&auth, Some(&idempotency_key)))
            .set_body(RequestContent::FormUrlEncoded(Box::new(connector_req)))
            .build();

        let response = utils::call_connector(ctx, request).await?;
        let payments_response: stripe::StripePaymentsResponse =
            utils::handle_response(self, response, "StripePaymentsResponse")?;
        router_env::logger::info!(connector_response = ?payments_response);

        ProcessPaymentResult::try_from((data, payments_response))
    }

    /// Refunds resolve the original charge first; the refund request always
    /// carries an explicit amount and a freshly generated idempotency key,
    /// never the charge's key.
    #[instrument(skip_all)]
    async fn refund_payment(
        &self,
        ctx: &PaymentContext<'_>,
        config: &PaymentIntegrationConfig,
        data: &RefundData,
    ) -> CustomResult<RefundResult, ConnectorError> {
        let auth = self.decrypt_auth(ctx, config).await?;
        let test_mode = config.settings.test_mode;

        let original = self
            .fetch_payment_intent(ctx, &auth, test_mode, &data.transaction_id)
            .await?;
        let currency = original.currency()?;
        let amount = match data.amount {
            Some(partial) => utils::convert_amount(&MinorUnitForConnector, partial, currency)?,
            None => original.captured_amount(),
        };

        let connector_req = stripe::StripeRefundRequest {
            payment_intent: data.transaction_id.clone(),
            amount,
            reason: data.reason.clone(),
        };
        let idempotency_key = utils::normalize_idempotency_key(None);
        let request = RequestBuilder::new()
            .method(Method::Post)
            .url(&format!(
                "{}v1/refunds",
                self.base_url(ctx.connectors, test_mode)
            ))
            .attach_default_headers()
            .headers(self.build_headers(&auth, Some(&idempotency_key)))
            .set_body(RequestContent::FormUrlEncoded(Box::new(connector_req)))
            .build();

        let response = utils::call_connector(ctx, request).await?;
        let refund_response: stripe::StripeRefundResponse =
            utils::handle_response(self, response, "StripeRefundResponse")?;
        router_env::logger::info!(connector_response = ?refund_response);

        RefundResult::try_from((data, refund_response))
    }
}
