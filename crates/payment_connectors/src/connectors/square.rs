//! Point-of-sale terminal adapter (Square).
//!
//! Widest capability surface of the three adapters: online and terminal
//! payments, terminal checkout lifecycle, subscription management and
//! card-on-file tokenization. The subscription and saved-card operations are
//! deliberately not exposed through the uniform router contract; the
//! provider-specific call sites use this adapter directly.

pub mod transformers;

use api_models::{
    admin::PaymentIntegrationConfig,
    payments::{
        ConnectionStatus, ProcessPaymentData, ProcessPaymentResult, RefundData, RefundResult,
        TerminalCheckout, TerminalCheckoutData,
    },
    subscriptions::{
        CreateSubscriptionData, SaveCardData, SavedCard, Subscription, UpdateSubscriptionData,
    },
};
use common_enums::PaymentMethodType;
use common_utils::{
    errors::CustomResult,
    request::{Method, Request, RequestBuilder, RequestContent},
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
use transformers as square;

use crate::{
    constants::{headers, SQUARE_API_VERSION, SQUARE_SCOPE_GUIDANCE},
    utils,
};

/// Point-of-sale terminal processor adapter.
#[derive(Clone, Debug, Default)]
pub struct Square;

impl Square {
    pub fn new() -> Self {
        Self
    }

    async fn decrypt_auth(
        &self,
        ctx: &PaymentContext<'_>,
        config: &PaymentIntegrationConfig,
    ) -> CustomResult<square::SquareAuthType, ConnectorError> {
        let credentials = ctx
            .vault
            .decrypt(&config.credentials)
            .await
            .change_context(ConnectorError::FailedToObtainAuthType)?;
        square::SquareAuthType::try_from(credentials)
    }

    fn build_headers(auth: &square::SquareAuthType) -> Vec<(String, Maskable<String>)> {
        vec![
            (
                headers::AUTHORIZATION.to_string(),
                format!("Bearer {}", auth.access_token.peek()).into_masked(),
            ),
            (
                headers::SQUARE_VERSION.to_string(),
                SQUARE_API_VERSION.into(),
            ),
        ]
    }

    fn get_request(&self, url: String, auth: &square::SquareAuthType) -> Request {
        RequestBuilder::new()
            .method(Method::Get)
            .url(&url)
            .attach_default_headers()
            .headers(Self::build_headers(auth))
            .build()
    }

    /// Fire a read-only probe and reduce the outcome to `Ok` or the best
    /// available failure text.
    async fn probe(
        &self,
        ctx: &PaymentContext<'_>,
        auth: &square::SquareAuthType,
        url: String,
    ) -> Result<(), String> {
        let response = match utils::call_connector(ctx, self.get_request(url, auth)).await {
            Ok(response) => response,
            Err(error) => return Err(error.current_context().to_string()),
        };
        if (200..300).contains(&response.status_code) {
            return Ok(());
        }
        let detail = self
            .build_error_response(response)
            .map(|error_response| error_response.best_detail())
            .unwrap_or_else(|_| "unrecognized error response".to_string());
        Err(detail)
    }

    async fn fetch_payment(
        &self,
        ctx: &PaymentContext<'_>,
        auth: &square::SquareAuthType,
        test_mode: bool,
        payment_id: &str,
    ) -> CustomResult<square::SquarePaymentsResponse, ConnectorError> {
        let url = format!(
            "{}v2/payments/{payment_id}",
            self.base_url(ctx.connectors, test_mode)
        );
        let response = utils::call_connector(ctx, self.get_request(url, auth)).await?;
        utils::handle_response(self, response, "SquarePaymentsResponse")
    }

    fn post_request<T: masking::ErasedSerialize + Send + 'static>(
        &self,
        url: String,
        auth: &square::SquareAuthType,
        body: T,
    ) -> Request {
        RequestBuilder::new()
            .method(Method::Post)
            .url(&url)
            .attach_default_headers()
            .headers(Self::build_headers(auth))
            .set_body(RequestContent::Json(Box::new(body)))
            .build()
    }
}

impl ConnectorCommon for Square {
    fn id(&self) -> &'static str {
        "square"
    }

    fn base_url<'a>(&self, connectors: &'a Connectors, test_mode: bool) -> &'a str {
        connectors.square.url_for(test_mode)
    }

    fn build_error_response(&self, res: Response) -> CustomResult<ErrorResponse, ConnectorError> {
        use common_utils::ext_traits::BytesExt;

        let response: square::SquareErrorResponse = res
            .response
            .parse_struct("SquareErrorResponse")
            .change_context(ConnectorError::ResponseDeserializationFailed)?;

        Ok(ErrorResponse {
            status_code: res.status_code,
            code: response
                .first_code()
                .unwrap_or_else(|| consts::NO_ERROR_CODE.to_string()),
            message: response
                .best_detail()
                .unwrap_or_else(|| consts::NO_ERROR_MESSAGE.to_string()),
            reason: response.best_detail(),
        })
    }
}

#[async_trait::async_trait]
impl PaymentProcessor for Square {
    /// Real network probe. The merchant listing needs an OAuth scope not
    /// granted on all accounts, so a failure falls back to the location
    /// listing before concluding the credentials are unusable.
    #[instrument(skip_all)]
    async fn test_connection(
        &self,
        ctx: &PaymentContext<'_>,
        config: &PaymentIntegrationConfig,
    ) -> CustomResult<ConnectionStatus, ConnectorError> {
        let auth = match self.decrypt_auth(ctx, config).await {
            Ok(auth) => auth,
            Err(_) => return Ok(ConnectionStatus::failed("Invalid Square credentials format")),
        };
        let base = self.base_url(ctx.connectors, config.settings.test_mode);

        let merchants_error = match self.probe(ctx, &auth, format!("{base}v2/merchants")).await {
            Ok(()) => return Ok(ConnectionStatus::ok()),
            Err(error) => error,
        };
        router_env::logger::info!(probe_error = %merchants_error, "merchant listing probe failed, falling back to locations");

        let locations_error = match self.probe(ctx, &auth, format!("{base}v2/locations")).await {
            Ok(()) => return Ok(ConnectionStatus::ok()),
            Err(error) => error,
        };

        let mut message = format!(
            "Unable to reach Square with the configured credentials: {merchants_error}; {locations_error}"
        );
        if message.to_lowercase().contains("authorized") {
            message = format!("{message}. {SQUARE_SCOPE_GUIDANCE}");
        }
        Ok(ConnectionStatus::failed(message))
    }

    #[instrument(skip_all)]
    async fn process_payment(
        &self,
        ctx: &PaymentContext<'_>,
        config: &PaymentIntegrationConfig,
        data: &ProcessPaymentData,
    ) -> CustomResult<ProcessPaymentResult, ConnectorError> {
        match data.payment_method_type.unwrap_or(PaymentMethodType::Online) {
            PaymentMethodType::Online => {
                let auth = self.decrypt_auth(ctx, config).await?;
                let amount =
                    utils::convert_amount(&MinorUnitForConnector, data.amount, data.currency)?;
                let idempotency_key =
                    utils::normalize_idempotency_key(data.idempotency_key.as_deref());
                let connector_req =
                    square::SquarePaymentsRequest::try_from((data, amount, idempotency_key))?;

                let url = format!(
                    "{}v2/payments",
                    self.base_url(ctx.connectors, config.settings.test_mode)
                );
                let response = utils::call_connector(
                    ctx,
                    self.post_request(url, &auth, connector_req),
                )
                .await?;
                let payments_response: square::SquarePaymentsResponse =
                    utils::handle_response(self, response, "SquarePaymentsResponse")?;
                router_env::logger::info!(connector_response = ?payments_response);

                ProcessPaymentResult::try_from((data, payments_response))
            }
            // An in-person charge is a terminal checkout wearing the uniform
            // result shape; completion arrives out-of-band via webhook.
            PaymentMethodType::Terminal => {
                let device_id =
                    data.device_id
                        .clone()
                        .ok_or(ConnectorError::InvalidRequestData {
                            message: "Terminal payments require the device_id of a paired \
                                      Square Terminal."
                                .to_string(),
                        })?;
                let checkout_data = TerminalCheckoutData {
                    invoice_id: data.invoice_id.clone(),
                    amount: data.amount,
                    currency: data.currency,
                    device_id,
                    note: data.description.clone(),
                    idempotency_key: data.idempotency_key.clone(),
                };
                let checkout = self
                    .create_terminal_checkout(ctx, config, &checkout_data)
                    .await?;
                Ok(ProcessPaymentResult {
                    transaction_id: checkout.checkout_id.clone(),
                    status: square::checkout_status_as_payment_status(checkout.status),
                    payment_method: "terminal".to_string(),
                    amount: data.amount,
                    currency: data.currency,
                    fee: None,
                    metadata: utils::merge_metadata(
                        data.metadata.as_ref(),
                        [
                            ("checkout_id", checkout.checkout_id),
                            ("device_id", checkout.device_id),
                        ],
                    ),
                })
            }
        }
    }

    /// The provider requires an explicit refund amount, so a full refund
    /// first resolves the original payment's captured total.
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
            .fetch_payment(ctx, &auth, test_mode, &data.transaction_id)
            .await?;
        let currency = original.payment.amount_money.currency;
        let amount = match data.amount {
            Some(partial) => utils::convert_amount(&MinorUnitForConnector, partial, currency)?,
            None => original.payment.amount_money.amount,
        };

        let connector_req = square::SquareRefundRequest {
            idempotency_key: masking::Secret::new(utils::normalize_idempotency_key(None)),
            payment_id: masking::Secret::new(data.transaction_id.clone()),
            amount_money: square::SquareAmount { amount, currency },
            reason: data.reason.clone(),
        };
        let url = format!("{}v2/refunds", self.base_url(ctx.connectors, test_mode));
        let response = utils::call_connector(ctx, self.post_request(url, &auth, connector_req))
            .await?;
        let refund_response: square::SquareRefundResponse =
            utils::handle_response(self, response, "SquareRefundResponse")?;

        RefundResult::try_from((data, refund_response))
    }

    #[instrument(skip_all)]
    async fn create_terminal_checkout(
        &self,
        ctx: &PaymentContext<'_>,
        config: &PaymentIntegrationConfig,
        data: &TerminalCheckoutData,
    ) -> CustomResult<TerminalCheckout, ConnectorError> {
        let auth = self.decrypt_auth(ctx, config).await?;
        let amount = utils::convert_amount(&MinorUnitForConnector, data.amount, data.currency)?;
        let idempotency_key = utils::normalize_idempotency_key(data.idempotency_key.as_deref());
        let connector_req =
            square::SquareTerminalCheckoutRequest::try_from((data, amount, idempotency_key))?;

        let url = format!(
            "{}v2/terminals/checkouts",
            self.base_url(ctx.connectors, config.settings.test_mode)
        );
        let response = utils::call_connector(ctx, self.post_request(url, &auth, connector_req))
            .await?;
        let checkout_response: square::SquareTerminalCheckoutResponse =
            utils::handle_response(self, response, "SquareTerminalCheckoutResponse")?;
        router_env::logger::info!(checkout_id = %checkout_response.checkout.id, checkout_status = ?checkout_response.checkout.status);

        checkout_response.into_terminal_checkout(Some(&data.device_id))
    }

    #[instrument(skip_all)]
    async fn get_terminal_checkout_status(
        &self,
        ctx: &PaymentContext<'_>,
        config: &PaymentIntegrationConfig,
        checkout_id: &str,
    ) -> CustomResult<TerminalCheckout, ConnectorError> {
        let auth = self.decrypt_auth(ctx, config).await?;
        let url = format!(
            "{}v2/terminals/checkouts/{checkout_id}",
            self.base_url(ctx.connectors, config.settings.test_mode)
        );
        let response = utils::call_connector(ctx, self.get_request(url, &auth)).await?;
        let checkout_response: square::SquareTerminalCheckoutResponse =
            utils::handle_response(self, response, "SquareTerminalCheckoutResponse")?;

        checkout_response.into_terminal_checkout(None)
    }
}

impl Square {
    /// Start a subscription for a customer. Billing location falls back to
    /// the integration's configured merchant location.
    #[instrument(skip_all)]
    pub async fn create_subscription(
        &self,
        ctx: &PaymentContext<'_>,
        config: &PaymentIntegrationConfig,
        data: &CreateSubscriptionData,
    ) -> CustomResult<Subscription, ConnectorError> {
        let auth = self.decrypt_auth(ctx, config).await?;
        let location_id = data
            .location_id
            .clone()
            .or_else(|| config.settings.merchant_location_id.clone())
            .ok_or(ConnectorError::InvalidConnectorConfig {
                config: "merchant_location_id",
            })?;

        let connector_req = square::SquareCreateSubscriptionRequest {
            idempotency_key: masking::Secret::new(utils::normalize_idempotency_key(
                data.idempotency_key.as_deref(),
            )),
            location_id,
            customer_id: data.customer_id.clone(),
            plan_variation_id: data.plan_id.clone(),
            card_id: data.card_id.clone(),
            start_date: data.start_date.clone(),
        };
        let url = format!(
            "{}v2/subscriptions",
            self.base_url(ctx.connectors, config.settings.test_mode)
        );
        let response = utils::call_connector(ctx, self.post_request(url, &auth, connector_req))
            .await?;
        let subscription_response: square::SquareSubscriptionResponse =
            utils::handle_response(self, response, "SquareSubscriptionResponse")?;

        Ok(Subscription::from(subscription_response.subscription))
    }

    /// Swap the plan or the card on file of an active subscription.
    #[instrument(skip_all)]
    pub async fn update_subscription(
        &self,
        ctx: &PaymentContext<'_>,
        config: &PaymentIntegrationConfig,
        subscription_id: &str,
        data: &UpdateSubscriptionData,
    ) -> CustomResult<Subscription, ConnectorError> {
        let auth = self.decrypt_auth(ctx, config).await?;
        let connector_req = square::SquareUpdateSubscriptionRequest {
            subscription: square::SquareSubscriptionUpdatePayload {
                plan_variation_id: data.plan_id.clone(),
                card_id: data.card_id.clone(),
            },
        };
        let url = format!(
            "{}v2/subscriptions/{subscription_id}",
            self.base_url(ctx.connectors, config.settings.test_mode)
        );
        let request = RequestBuilder::new()
            .method(Method::Put)
            .url(&url)
            .attach_default_headers()
            .headers(Self::build_headers(&auth))
            .set_body(RequestContent::Json(Box::new(connector_req)))
            .build();
        let response = utils::call_connector(ctx, request).await?;
        let subscription_response: square::SquareSubscriptionResponse =
            utils::handle_response(self, response, "SquareSubscriptionResponse")?;

        Ok(Subscription::from(subscription_response.subscription))
    }

    /// Cancel a subscription at the end of the current billing period.
    #[instrument(skip_all)]
    pub async fn cancel_subscription(
        &self,
        ctx: &PaymentContext<'_>,
        config: &PaymentIntegrationConfig,
        subscription_id: &str,
    ) -> CustomResult<Subscription, ConnectorError> {
        let auth = self.decrypt_auth(ctx, config).await?;
        let url = format!(
            "{}v2/subscriptions/{subscription_id}/cancel",
            self.base_url(ctx.connectors, config.settings.test_mode)
        );
        let response = utils::call_connector(
            ctx,
            self.post_request(url, &auth, serde_json::json!({})),
        )
        .await?;
        let subscription_response: square::SquareSubscriptionResponse =
            utils::handle_response(self, response, "SquareSubscriptionResponse")?;

        Ok(Subscription::from(subscription_response.subscription))
    }

    /// Fetch the provider's current view of a subscription.
    #[instrument(skip_all)]
    pub async fn get_subscription_status(
        &self,
        ctx: &PaymentContext<'_>,
        config: &PaymentIntegrationConfig,
        subscription_id: &str,
    ) -> CustomResult<Subscription, ConnectorError> {
        let auth = self.decrypt_auth(ctx, config).await?;
        let url = format!(
            "{}v2/subscriptions/{subscription_id}",
            self.base_url(ctx.connectors, config.settings.test_mode)
        );
        let response = utils::call_connector(ctx, self.get_request(url, &auth)).await?;
        let subscription_response: square::SquareSubscriptionResponse =
            utils::handle_response(self, response, "SquareSubscriptionResponse")?;

        Ok(Subscription::from(subscription_response.subscription))
    }

    /// Store a tokenized card against a provider customer for later charges.
    #[instrument(skip_all)]
    pub async fn save_card_for_customer(
        &self,
        ctx: &PaymentContext<'_>,
        config: &PaymentIntegrationConfig,
        data: &SaveCardData,
    ) -> CustomResult<SavedCard, ConnectorError> {
        let auth = self.decrypt_auth(ctx, config).await?;
        let connector_req = square::SquareCreateCardRequest {
            idempotency_key: masking::Secret::new(utils::normalize_idempotency_key(
                data.idempotency_key.as_deref(),
            )),
            source_id: data.source_id.clone(),
            card: square::SquareCardPayload {
                customer_id: data.customer_id.clone(),
                cardholder_name: data.cardholder_name.clone(),
            },
        };
        let url = format!(
            "{}v2/cards",
            self.base_url(ctx.connectors, config.settings.test_mode)
        );
        let response = utils::call_connector(ctx, self.post_request(url, &auth, connector_req))
            .await?;
        let card_response: square::SquareCardResponse =
            utils::handle_response(self, response, "SquareCardResponse")?;

        Ok(card_response.into_saved_card(&data.customer_id))
    }
}
