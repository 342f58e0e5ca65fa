//! Integration tests for the payment routing core, run against canned
//! provider responses. No network involved.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use api_models::{
    admin::{EncryptedCredentials, IntegrationSettings, PaymentIntegrationConfig},
    payments::{ProcessPaymentData, RefundData, TerminalCheckoutData},
    subscriptions::{CreateSubscriptionData, SaveCardData},
};
use common_enums::{CheckoutStatus, Currency, PaymentMethodType, PaymentProvider, PaymentStatus};
use common_utils::{
    errors::CustomResult,
    request::{Method, Request},
    types::FloatMajorUnit,
};
use error_stack::report;
use masking::Secret;
use payment_connectors::Square;
use payment_interfaces::{
    api::PaymentContext,
    api_client::ApiClient,
    configs::Connectors,
    errors::ApiClientError,
    types::Response,
};
use router::{
    core::errors::PaymentsError,
    db::MockDb,
    types::domain::PlainJsonVault,
    PaymentService,
};

#[derive(Debug, Clone)]
struct RecordedRequest {
    method: common_utils::request::Method,
    url: String,
    body: Option<String>,
    headers: Vec<(String, String)>,
}

impl RecordedRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(header_name, _)| header_name == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Test double for the transport client: pops canned `(status, body)` pairs
/// and records every outbound request for assertions.
#[derive(Debug, Default)]
struct MockApiClient {
    responses: Mutex<VecDeque<(u16, serde_json::Value)>>,
    recorded: Mutex<Vec<RecordedRequest>>,
}

impl MockApiClient {
    fn with_responses(responses: Vec<(u16, serde_json::Value)>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            recorded: Mutex::new(Vec::new()),
        })
    }

    fn recorded(&self) -> Vec<RecordedRequest> {
        self.recorded.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ApiClient for MockApiClient {
    async fn send_request(&self, request: Request) -> CustomResult<Response, ApiClientError> {
        let body = request
            .body
            .as_ref()
            .map(|content| {
                use masking::ExposeInterface;
                content.get_inner_value().unwrap().expose()
            });
        self.recorded.lock().unwrap().push(RecordedRequest {
            method: request.method,
            url: request.url.clone(),
            body,
            headers: request
                .headers
                .iter()
                .map(|(name, value)| (name.clone(), value.clone().into_inner()))
                .collect(),
        });
        let (status_code, body) = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| report!(ApiClientError::ConnectionError))?;
        Ok(Response {
            response: bytes::Bytes::from(serde_json::to_vec(&body).unwrap()),
            status_code,
        })
    }
}

const TENANT: &str = "tenant_1";

fn config(provider: &str, enabled: bool, credentials: serde_json::Value) -> PaymentIntegrationConfig {
    PaymentIntegrationConfig {
        provider: provider.to_string(),
        enabled,
        credentials: EncryptedCredentials::new(credentials.to_string()),
        settings: IntegrationSettings {
            test_mode: true,
            merchant_location_id: Some("L_MAIN".to_string()),
            ..Default::default()
        },
    }
}

fn card_credentials() -> serde_json::Value {
    serde_json::json!({"clientId": "ck_test_abcdefgh", "clientSecret": "cs_test_abcdefgh"})
}

fn service(
    config_value: Option<PaymentIntegrationConfig>,
    client: Arc<MockApiClient>,
) -> PaymentService {
    router_env::logger::setup();
    let db = Arc::new(MockDb::new());
    if let Some(config_value) = config_value {
        db.insert_payment_config(TENANT, config_value);
    }
    PaymentService::new(db, Arc::new(PlainJsonVault), client, Connectors::default())
}

fn payment_data(amount: f64) -> ProcessPaymentData {
    ProcessPaymentData {
        invoice_id: "inv_1".to_string(),
        amount: FloatMajorUnit::new(amount),
        currency: Currency::USD,
        description: Some("Invoice inv_1".to_string()),
        customer_id: None,
        payment_method_type: None,
        source_id: Some(Secret::new("pm_tok_visa".to_string())),
        device_id: None,
        idempotency_key: None,
        metadata: None,
    }
}

// --- router dispatch ---

#[tokio::test]
async fn unknown_provider_fails_before_reaching_any_adapter() {
    let client = MockApiClient::with_responses(vec![]);
    let service = service(Some(config("unknown", true, card_credentials())), client.clone());

    let error = service
        .process_payment(TENANT, payment_data(10.0))
        .await
        .unwrap_err();
    assert_eq!(
        *error.current_context(),
        PaymentsError::UnsupportedProvider {
            provider: "unknown".to_string()
        }
    );
    assert!(client.recorded().is_empty());
}

#[tokio::test]
async fn terminal_checkout_on_card_provider_names_the_provider() {
    let client = MockApiClient::with_responses(vec![]);
    let service = service(Some(config("card", true, card_credentials())), client.clone());

    let error = service
        .create_terminal_checkout(
            TENANT,
            TerminalCheckoutData {
                invoice_id: "inv_1".to_string(),
                amount: FloatMajorUnit::new(10.0),
                currency: Currency::USD,
                device_id: "dev_1".to_string(),
                note: None,
                idempotency_key: None,
            },
        )
        .await
        .unwrap_err();
    let message = error.current_context().to_string();
    assert!(matches!(
        error.current_context(),
        PaymentsError::CapabilityNotSupported { .. }
    ));
    assert!(message.contains("card"));
    assert!(client.recorded().is_empty());
}

#[tokio::test]
async fn missing_config_and_disabled_config_short_circuit() {
    let client = MockApiClient::with_responses(vec![]);
    let service = service(None, client.clone());
    let error = service
        .process_payment(TENANT, payment_data(10.0))
        .await
        .unwrap_err();
    assert_eq!(*error.current_context(), PaymentsError::IntegrationNotConfigured);

    let client = MockApiClient::with_responses(vec![]);
    let service = service(Some(config("card", false, card_credentials())), client.clone());
    let error = service
        .process_payment(TENANT, payment_data(10.0))
        .await
        .unwrap_err();
    assert_eq!(*error.current_context(), PaymentsError::IntegrationDisabled);
    assert!(client.recorded().is_empty());
}

#[tokio::test]
async fn is_configured_fails_closed() {
    let client = MockApiClient::with_responses(vec![]);
    let db = Arc::new(MockDb::new());
    db.insert_payment_config(TENANT, config("card", true, card_credentials()));
    let service = PaymentService::new(
        db.clone(),
        Arc::new(PlainJsonVault),
        client,
        Connectors::default(),
    );

    assert!(service.is_configured(TENANT).await);
    assert!(!service.is_configured("unknown_tenant").await);

    db.fail_all_lookups();
    // A storage failure must come back as "not configured", never an error.
    assert!(!service.is_configured(TENANT).await);
}

#[tokio::test]
async fn disabled_tenants_are_not_configured() {
    let client = MockApiClient::with_responses(vec![]);
    let service = service(Some(config("card", false, card_credentials())), client);
    assert!(!service.is_configured(TENANT).await);
}

// --- card adapter (Stripe) ---

#[tokio::test]
async fn card_test_connection_passes_on_credential_shape_alone() {
    let client = MockApiClient::with_responses(vec![]);
    let service = service(Some(config("card", true, card_credentials())), client.clone());

    let status = service.test_connection(TENANT).await.unwrap();
    assert!(status.success);
    assert!(status.error.is_none());
    // Shape check only: no network call may happen.
    assert!(client.recorded().is_empty());
}

#[tokio::test]
async fn card_test_connection_rejects_short_credentials_before_any_network_call() {
    let client = MockApiClient::with_responses(vec![]);
    let service = service(
        Some(config("card", true, serde_json::json!({"clientId": "short"}))),
        client.clone(),
    );

    let status = service.test_connection(TENANT).await.unwrap();
    assert!(!status.success);
    let error = status.error.unwrap();
    assert!(error.contains("Invalid"));
    assert!(error.contains("credentials format"));
    assert!(client.recorded().is_empty());
}

#[tokio::test]
async fn card_payment_encodes_amount_as_rounded_integer_cents() {
    let client = MockApiClient::with_responses(vec![(
        200,
        serde_json::json!({
            "id": "pi_3",
            "status": "succeeded",
            "amount": 1999,
            "amount_received": 1999,
            "currency": "usd",
            "latest_charge": {"id": "ch_1", "balance_transaction": {"fee": 88}}
        }),
    )]);
    let service = service(Some(config("card", true, card_credentials())), client.clone());

    let result = service
        .process_payment(TENANT, payment_data(19.99))
        .await
        .unwrap();

    let recorded = client.recorded();
    assert_eq!(recorded.len(), 1);
    assert!(recorded[0].url.ends_with("v1/payment_intents"));
    let body = recorded[0].body.as_deref().unwrap();
    assert!(body.contains("amount=1999"), "unexpected body: {body}");
    assert!(body.contains("payment_method=pm_tok_visa"));
    assert!(recorded[0].header("Idempotency-Key").is_some());

    assert_eq!(result.status, PaymentStatus::Succeeded);
    assert_eq!(result.transaction_id, "pi_3");
    assert_eq!(result.amount.get_amount_as_f64(), 19.99);
    assert_eq!(result.fee.unwrap().get_amount_as_f64(), 0.88);
    assert_eq!(result.metadata.get("payment_intent_id").unwrap(), "pi_3");
}

#[tokio::test]
async fn card_payment_truncates_over_long_idempotency_keys() {
    let client = MockApiClient::with_responses(vec![(
        200,
        serde_json::json!({
            "id": "pi_4", "status": "processing", "amount": 500, "currency": "usd"
        }),
    )]);
    let service = service(Some(config("card", true, card_credentials())), client.clone());

    let mut data = payment_data(5.0);
    data.idempotency_key = Some("k".repeat(80));
    service.process_payment(TENANT, data).await.unwrap();

    let key = client.recorded()[0].header("Idempotency-Key").unwrap().to_string();
    assert_eq!(key.len(), 45);
    assert_eq!(key, "k".repeat(45));
}

#[tokio::test]
async fn card_refund_without_amount_uses_the_original_captured_amount() {
    let client = MockApiClient::with_responses(vec![
        (
            200,
            serde_json::json!({
                "id": "pi_9", "status": "succeeded",
                "amount": 2500, "amount_received": 2500, "currency": "usd"
            }),
        ),
        (
            200,
            serde_json::json!({
                "id": "re_1", "status": "succeeded",
                "amount": 2500, "currency": "usd", "payment_intent": "pi_9"
            }),
        ),
    ]);
    let service = service(Some(config("card", true, card_credentials())), client.clone());

    let result = service
        .refund_payment(
            TENANT,
            RefundData {
                transaction_id: "pi_9".to_string(),
                amount: None,
                reason: None,
                metadata: None,
            },
        )
        .await
        .unwrap();

    let recorded = client.recorded();
    assert_eq!(recorded.len(), 2);
    assert_eq!(recorded[0].method, Method::Get);
    assert!(recorded[0].url.ends_with("v1/payment_intents/pi_9"));
    assert_eq!(recorded[1].method, Method::Post);
    assert!(recorded[1].url.ends_with("v1/refunds"));
    // The refund carries exactly the captured amount, resolved via lookup.
    assert!(recorded[1].body.as_deref().unwrap().contains("amount=2500"));
    // And a freshly generated idempotency key.
    assert!(recorded[1].header("Idempotency-Key").unwrap().starts_with("ik_"));

    assert_eq!(result.status, PaymentStatus::Succeeded);
    assert_eq!(result.amount.get_amount_as_f64(), 25.0);
    assert_eq!(result.transaction_id, "pi_9");
}

#[tokio::test]
async fn card_provider_errors_are_wrapped_with_operation_prefix() {
    let client = MockApiClient::with_responses(vec![(
        402,
        serde_json::json!({
            "error": {
                "type": "card_error",
                "code": "card_declined",
                "message": "Your card was declined.",
                "decline_code": "insufficient_funds"
            }
        }),
    )]);
    let service = service(Some(config("card", true, card_credentials())), client);

    let error = service
        .process_payment(TENANT, payment_data(19.99))
        .await
        .unwrap_err();
    match error.current_context() {
        PaymentsError::ProviderCall {
            provider,
            operation,
            message,
        } => {
            assert_eq!(*provider, "stripe");
            assert_eq!(*operation, "process_payment");
            assert!(message.contains("declined"));
        }
        other => panic!("expected ProviderCall, got {other:?}"),
    }
}

// --- wallet adapter (PayPal) ---

fn wallet_capture_response() -> serde_json::Value {
    serde_json::json!({
        "id": "5O190127TN364715T",
        "status": "COMPLETED",
        "purchase_units": [{
            "payments": {
                "captures": [{
                    "id": "3C679366HH908993F",
                    "status": "COMPLETED",
                    "amount": {"currency_code": "USD", "value": "25.00"},
                    "seller_receivable_breakdown": {
                        "paypal_fee": {"currency_code": "USD", "value": "1.03"}
                    }
                }]
            }
        }]
    })
}

#[tokio::test]
async fn wallet_payment_runs_both_order_phases_and_normalizes_the_status() {
    let client = MockApiClient::with_responses(vec![
        (200, serde_json::json!({"access_token": "A21AAF", "token_type": "Bearer", "expires_in": 32400})),
        (201, serde_json::json!({"id": "5O190127TN364715T", "status": "CREATED"})),
        (201, wallet_capture_response()),
    ]);
    let service = service(Some(config("wallet", true, card_credentials())), client.clone());

    let result = service
        .process_payment(TENANT, payment_data(25.00))
        .await
        .unwrap();

    let recorded = client.recorded();
    assert_eq!(recorded.len(), 3);
    assert!(recorded[0].url.ends_with("v1/oauth2/token"));
    assert!(recorded[1].url.ends_with("v2/checkout/orders"));
    assert!(recorded[2].url.ends_with("v2/checkout/orders/5O190127TN364715T/capture"));

    // The wallet provider receives decimal-string amounts, two places fixed.
    let order_body = recorded[1].body.as_deref().unwrap();
    assert!(order_body.contains("\"value\":\"25.00\""), "unexpected body: {order_body}");
    assert!(order_body.contains("\"intent\":\"CAPTURE\""));

    assert_eq!(result.status, PaymentStatus::Succeeded);
    assert_eq!(result.transaction_id, "3C679366HH908993F");
    assert_eq!(result.amount.get_amount_as_f64(), 25.0);
    assert_eq!(result.fee.unwrap().get_amount_as_f64(), 1.03);
    assert_eq!(
        result.metadata.get("order_id").unwrap(),
        "5O190127TN364715T"
    );
}

#[tokio::test]
async fn wallet_full_refund_omits_the_amount_field_entirely() {
    let client = MockApiClient::with_responses(vec![
        (200, serde_json::json!({"access_token": "A21AAF", "token_type": "Bearer", "expires_in": 32400})),
        (
            200,
            serde_json::json!({
                "id": "3C679366HH908993F",
                "status": "COMPLETED",
                "amount": {"currency_code": "USD", "value": "25.00"}
            }),
        ),
        (201, serde_json::json!({"id": "RF-7", "status": "COMPLETED"})),
    ]);
    let service = service(Some(config("wallet", true, card_credentials())), client.clone());

    let result = service
        .refund_payment(
            TENANT,
            RefundData {
                transaction_id: "3C679366HH908993F".to_string(),
                amount: None,
                reason: None,
                metadata: None,
            },
        )
        .await
        .unwrap();

    let recorded = client.recorded();
    assert!(recorded[1].url.ends_with("v2/payments/captures/3C679366HH908993F"));
    assert!(recorded[2].url.ends_with("v2/payments/captures/3C679366HH908993F/refund"));
    // Full refund: the provider's own semantics are invoked by omitting the
    // amount, not by echoing the captured total.
    assert_eq!(recorded[2].body.as_deref().unwrap(), "{}");

    assert_eq!(result.status, PaymentStatus::Succeeded);
    assert_eq!(result.amount.get_amount_as_f64(), 25.0);
}

#[tokio::test]
async fn wallet_partial_refund_sends_the_requested_amount() {
    let client = MockApiClient::with_responses(vec![
        (200, serde_json::json!({"access_token": "A21AAF", "token_type": "Bearer", "expires_in": 32400})),
        (
            200,
            serde_json::json!({
                "id": "3C679366HH908993F",
                "status": "COMPLETED",
                "amount": {"currency_code": "USD", "value": "25.00"}
            }),
        ),
        (
            201,
            serde_json::json!({
                "id": "RF-8",
                "status": "COMPLETED",
                "amount": {"currency_code": "USD", "value": "10.00"}
            }),
        ),
    ]);
    let service = service(Some(config("wallet", true, card_credentials())), client.clone());

    let result = service
        .refund_payment(
            TENANT,
            RefundData {
                transaction_id: "3C679366HH908993F".to_string(),
                amount: Some(FloatMajorUnit::new(10.0)),
                reason: None,
                metadata: None,
            },
        )
        .await
        .unwrap();

    let refund_body = client.recorded()[2].body.clone().unwrap();
    assert!(refund_body.contains("\"value\":\"10.00\""));
    assert_eq!(result.amount.get_amount_as_f64(), 10.0);
}

// --- terminal-POS adapter (Square) ---

fn terminal_checkout_response(status: &str) -> serde_json::Value {
    serde_json::json!({
        "checkout": {
            "id": "chk_1",
            "status": status,
            "amount_money": {"amount": 1999, "currency": "USD"},
            "device_options": {"device_id": "dev_1"}
        }
    })
}

#[tokio::test]
async fn terminal_payment_delegates_to_a_checkout_and_reports_pending() {
    let client = MockApiClient::with_responses(vec![(200, terminal_checkout_response("PENDING"))]);
    let service = service(Some(config("terminal-pos", true, square_credentials())), client.clone());

    let mut data = payment_data(19.99);
    data.payment_method_type = Some(PaymentMethodType::Terminal);
    data.source_id = None;
    data.device_id = Some("dev_1".to_string());

    let result = service.process_payment(TENANT, data).await.unwrap();

    let recorded = client.recorded();
    assert!(recorded[0].url.ends_with("v2/terminals/checkouts"));
    let body = recorded[0].body.as_deref().unwrap();
    assert!(body.contains("\"amount\":1999"));
    assert!(body.contains("\"device_id\":\"dev_1\""));

    assert_eq!(result.status, PaymentStatus::Pending);
    assert_eq!(result.payment_method, "terminal");
    assert_eq!(result.metadata.get("checkout_id").unwrap(), "chk_1");
}

fn square_credentials() -> serde_json::Value {
    serde_json::json!({"accessToken": "EAAA_test_access_token_value"})
}

#[tokio::test]
async fn terminal_payment_without_device_id_is_an_actionable_error() {
    let client = MockApiClient::with_responses(vec![]);
    let service = service(Some(config("terminal-pos", true, square_credentials())), client.clone());

    let mut data = payment_data(19.99);
    data.payment_method_type = Some(PaymentMethodType::Terminal);
    data.device_id = None;

    let error = service.process_payment(TENANT, data).await.unwrap_err();
    let message = error.current_context().to_string();
    assert!(message.contains("device_id"));
    assert!(client.recorded().is_empty());
}

#[tokio::test]
async fn terminal_checkout_status_maps_provider_strings_onto_the_local_enum() {
    let client = MockApiClient::with_responses(vec![(200, terminal_checkout_response("COMPLETED"))]);
    let service = service(Some(config("terminal-pos", true, square_credentials())), client.clone());

    let checkout = service
        .get_terminal_checkout_status(TENANT, "chk_1")
        .await
        .unwrap();
    assert!(client.recorded()[0].url.ends_with("v2/terminals/checkouts/chk_1"));
    assert_eq!(checkout.status, CheckoutStatus::Completed);
    assert_eq!(checkout.device_id, "dev_1");
    assert_eq!(checkout.amount.unwrap().get_amount_as_f64(), 19.99);
}

#[tokio::test]
async fn square_online_payment_charges_through_the_payments_endpoint() {
    let client = MockApiClient::with_responses(vec![(
        200,
        serde_json::json!({
            "payment": {
                "id": "sq_pay_1",
                "status": "COMPLETED",
                "amount_money": {"amount": 1999, "currency": "USD"},
                "source_type": "CARD",
                "processing_fee": [{"amount_money": {"amount": 58, "currency": "USD"}}]
            }
        }),
    )]);
    let service = service(Some(config("terminal-pos", true, square_credentials())), client.clone());

    let result = service.process_payment(TENANT, payment_data(19.99)).await.unwrap();

    let recorded = client.recorded();
    assert!(recorded[0].url.ends_with("v2/payments"));
    assert_eq!(recorded[0].header("Square-Version"), Some("2024-01-18"));
    assert_eq!(result.status, PaymentStatus::Succeeded);
    assert_eq!(result.amount.get_amount_as_f64(), 19.99);
    assert_eq!(result.fee.unwrap().get_amount_as_f64(), 0.58);
    assert_eq!(result.payment_method, "card");
}

#[tokio::test]
async fn square_refund_without_amount_resolves_the_original_payment() {
    let client = MockApiClient::with_responses(vec![
        (
            200,
            serde_json::json!({
                "payment": {
                    "id": "sq_pay_9",
                    "status": "COMPLETED",
                    "amount_money": {"amount": 2500, "currency": "USD"}
                }
            }),
        ),
        (
            200,
            serde_json::json!({
                "refund": {
                    "id": "sq_ref_1",
                    "status": "PENDING",
                    "amount_money": {"amount": 2500, "currency": "USD"},
                    "payment_id": "sq_pay_9"
                }
            }),
        ),
    ]);
    let service = service(Some(config("terminal-pos", true, square_credentials())), client.clone());

    let result = service
        .refund_payment(
            TENANT,
            RefundData {
                transaction_id: "sq_pay_9".to_string(),
                amount: None,
                reason: None,
                metadata: None,
            },
        )
        .await
        .unwrap();

    let recorded = client.recorded();
    assert!(recorded[0].url.ends_with("v2/payments/sq_pay_9"));
    assert!(recorded[1].url.ends_with("v2/refunds"));
    assert!(recorded[1].body.as_deref().unwrap().contains("\"amount\":2500"));
    assert_eq!(result.status, PaymentStatus::Pending);
    assert_eq!(result.amount.get_amount_as_f64(), 25.0);
}

#[tokio::test]
async fn square_probe_falls_back_to_locations_before_failing() {
    let unauthorized = serde_json::json!({
        "errors": [{
            "category": "AUTHENTICATION_ERROR",
            "code": "UNAUTHORIZED",
            "detail": "This request could not be authorized."
        }]
    });

    // Merchant probe fails, location probe succeeds: healthy.
    let client = MockApiClient::with_responses(vec![
        (403, unauthorized.clone()),
        (200, serde_json::json!({"locations": []})),
    ]);
    let service = service(Some(config("terminal-pos", true, square_credentials())), client.clone());
    let status = service.test_connection(TENANT).await.unwrap();
    assert!(status.success);
    let recorded = client.recorded();
    assert!(recorded[0].url.ends_with("v2/merchants"));
    assert!(recorded[1].url.ends_with("v2/locations"));

    // Both probes fail on authorization: scope guidance is appended.
    let client = MockApiClient::with_responses(vec![
        (403, unauthorized.clone()),
        (403, unauthorized),
    ]);
    let service = service(Some(config("terminal-pos", true, square_credentials())), client);
    let status = service.test_connection(TENANT).await.unwrap();
    assert!(!status.success);
    let error = status.error.unwrap();
    assert!(error.contains("could not be authorized"));
    assert!(error.contains("MERCHANT_PROFILE_READ"));
}

// --- Square-only operations, used directly by provider-specific call sites ---

#[tokio::test]
async fn square_subscription_lifecycle_uses_the_configured_location() {
    let client = MockApiClient::with_responses(vec![
        (
            200,
            serde_json::json!({
                "subscription": {
                    "id": "sub_1",
                    "status": "ACTIVE",
                    "plan_variation_id": "plan_gold",
                    "customer_id": "cust_1",
                    "start_date": "2026-08-01"
                }
            }),
        ),
        (
            200,
            serde_json::json!({
                "subscription": {
                    "id": "sub_1",
                    "status": "CANCELED",
                    "plan_variation_id": "plan_gold",
                    "customer_id": "cust_1"
                }
            }),
        ),
    ]);
    let connectors = Connectors::default();
    let vault = PlainJsonVault;
    let ctx = PaymentContext {
        api_client: client.as_ref(),
        connectors: &connectors,
        vault: &vault,
    };
    let square = Square::new();
    let config_value = config("terminal-pos", true, square_credentials());

    let subscription = square
        .create_subscription(
            &ctx,
            &config_value,
            &CreateSubscriptionData {
                customer_id: "cust_1".to_string(),
                plan_id: "plan_gold".to_string(),
                location_id: None,
                card_id: None,
                start_date: Some("2026-08-01".to_string()),
                idempotency_key: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(subscription.status, "ACTIVE");
    assert_eq!(subscription.plan_id, "plan_gold");
    assert_eq!(subscription.current_phase.unwrap().start_date, "2026-08-01");

    let canceled = square
        .cancel_subscription(&ctx, &config_value, "sub_1")
        .await
        .unwrap();
    assert_eq!(canceled.status, "CANCELED");

    let recorded = client.recorded();
    // The billing location falls back to the configured merchant location.
    assert!(recorded[0].body.as_deref().unwrap().contains("\"location_id\":\"L_MAIN\""));
    assert!(recorded[1].url.ends_with("v2/subscriptions/sub_1/cancel"));
}

#[tokio::test]
async fn square_saves_tokenized_cards_for_customers() {
    let client = MockApiClient::with_responses(vec![(
        200,
        serde_json::json!({
            "card": {
                "id": "ccof_1",
                "card_brand": "VISA",
                "last_4": "1111",
                "exp_month": 12,
                "exp_year": 2028,
                "customer_id": "cust_1"
            }
        }),
    )]);
    let connectors = Connectors::default();
    let vault = PlainJsonVault;
    let ctx = PaymentContext {
        api_client: client.as_ref(),
        connectors: &connectors,
        vault: &vault,
    };
    let square = Square::new();
    let config_value = config("terminal-pos", true, square_credentials());

    let card = square
        .save_card_for_customer(
            &ctx,
            &config_value,
            &SaveCardData {
                customer_id: "cust_1".to_string(),
                source_id: Secret::new("cnon_card_nonce".to_string()),
                cardholder_name: Some("Ada Lovelace".to_string()),
                idempotency_key: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(card.card_id, "ccof_1");
    assert_eq!(card.brand.as_deref(), Some("VISA"));
    assert!(client.recorded()[0].url.ends_with("v2/cards"));
}

// Keep the registry honest: every provider family resolves to an adapter.
#[tokio::test]
async fn every_provider_family_has_a_registered_adapter() {
    use strum::IntoEnumIterator;

    for provider in PaymentProvider::iter() {
        let client = MockApiClient::with_responses(vec![]);
        let service = service(
            Some(config(&provider.to_string(), false, card_credentials())),
            client,
        );
        // Disabled config proves the provider string parsed and dispatch
        // stopped at the enabled check, not at provider resolution.
        let error = service
            .process_payment(TENANT, payment_data(1.0))
            .await
            .unwrap_err();
        assert_eq!(*error.current_context(), PaymentsError::IntegrationDisabled);
    }
}
