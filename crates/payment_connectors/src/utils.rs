//! Shared adapter harness: idempotency-key normalization, amount conversion
//! and response unwrapping.

use std::collections::HashMap;

use common_utils::{
    consts,
    errors::CustomResult,
    ext_traits::BytesExt,
    request::Request,
    types::{AmountConvertor, FloatMajorUnit},
};
use error_stack::{report, ResultExt};
use payment_interfaces::{
    api::{ConnectorCommon, PaymentContext},
    errors::ConnectorError,
    types::Response,
};

/// Produce the idempotency key to send with a charge or checkout request.
///
/// A caller-supplied key is kept (so retries deduplicate provider-side) but
/// truncated to the provider limit rather than rejected; truncation is stable,
/// the same input always yields the same key. Without a caller key a fresh
/// one is generated.
pub fn normalize_idempotency_key(supplied: Option<&str>) -> String {
    match supplied {
        Some(key) if !key.trim().is_empty() => truncate_idempotency_key(key),
        _ => common_utils::generate_id(consts::ID_LENGTH, "ik"),
    }
}

/// Stable prefix truncation to the provider key-length limit.
pub fn truncate_idempotency_key(key: &str) -> String {
    key.chars().take(consts::MAX_IDEMPOTENCY_KEY_LENGTH).collect()
}

/// Convert the canonical amount into the provider-native representation.
pub fn convert_amount<T>(
    amount_convertor: &dyn AmountConvertor<Output = T>,
    amount: FloatMajorUnit,
    currency: common_enums::Currency,
) -> CustomResult<T, ConnectorError> {
    amount_convertor
        .convert(amount, currency)
        .change_context(ConnectorError::AmountConversionFailed)
}

/// Convert a provider-native amount back into the canonical representation.
pub fn convert_back_amount<T>(
    amount_convertor: &dyn AmountConvertor<Output = T>,
    amount: T,
    currency: common_enums::Currency,
) -> CustomResult<FloatMajorUnit, ConnectorError> {
    amount_convertor
        .convert_back(amount, currency)
        .change_context(ConnectorError::AmountConversionFailed)
}

/// Execute a built request through the context's transport client.
pub async fn call_connector(
    ctx: &PaymentContext<'_>,
    request: Request,
) -> CustomResult<Response, ConnectorError> {
    ctx.api_client
        .send_request(request)
        .await
        .change_context(ConnectorError::RequestNotSent)
}

/// Decode a success response or fail with the provider's unwrapped error
/// detail. The per-provider part is `build_error_response`; everything above
/// it is common.
pub fn handle_response<T, C>(
    connector: &C,
    res: Response,
    type_name: &'static str,
) -> CustomResult<T, ConnectorError>
where
    T: serde::de::DeserializeOwned,
    C: ConnectorCommon + ?Sized,
{
    if (200..300).contains(&res.status_code) {
        res.response
            .parse_struct(type_name)
            .change_context(ConnectorError::ResponseDeserializationFailed)
    } else {
        let error_response = connector.build_error_response(res)?;
        router_env::logger::info!(connector = connector.id(), connector_error_response = ?error_response);
        Err(report!(ConnectorError::ProcessingStepFailed(Some(
            error_response.best_detail(),
        ))))
    }
}

/// Echo the caller's metadata, extended with adapter-added identifiers.
pub fn merge_metadata<const N: usize>(
    caller: Option<&HashMap<String, String>>,
    adapter_entries: [(&str, String); N],
) -> HashMap<String, String> {
    let mut merged = caller.cloned().unwrap_or_default();
    for (key, value) in adapter_entries {
        merged.insert(key.to_string(), value);
    }
    merged
}

/// Shape check for a single credential field: present, non-empty, and long
/// enough to plausibly be a provider key.
pub fn credential_shape_is_valid(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && trimmed.len() >= crate::constants::MIN_CREDENTIAL_LENGTH
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test]
    fn caller_supplied_keys_are_kept() {
        assert_eq!(normalize_idempotency_key(Some("inv-42-attempt-1")), "inv-42-attempt-1");
    }

    #[test]
    fn over_long_keys_truncate_stably_to_the_limit() {
        let long_key = "x".repeat(80);
        let first = normalize_idempotency_key(Some(&long_key));
        let second = normalize_idempotency_key(Some(&long_key));
        assert_eq!(first.len(), consts::MAX_IDEMPOTENCY_KEY_LENGTH);
        assert_eq!(first, second);
    }

    #[test]
    fn missing_or_blank_keys_generate_fresh_ones() {
        let generated = normalize_idempotency_key(None);
        assert!(generated.starts_with("ik_"));
        assert!(generated.len() <= consts::MAX_IDEMPOTENCY_KEY_LENGTH);
        assert_ne!(normalize_idempotency_key(Some("  ")), "  ");
    }

    #[test_case("sk_test_4eC39HqLyjWDarjtT1zdp7dc" => true; "plausible key")]
    #[test_case("short" => false; "too short")]
    #[test_case("" => false; "empty")]
    #[test_case("          " => false; "blank")]
    fn credential_shape(value: &str) -> bool {
        credential_shape_is_valid(value)
    }
}
