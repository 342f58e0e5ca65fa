//! Error taxonomy internal to the provider adapters.

/// Errors raised inside an adapter. Raw provider/SDK errors never cross the
/// adapter boundary; they are unwrapped into one of these variants with the
/// best available human-readable detail attached.
#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    /// The decrypted credential map is missing required fields or has
    /// malformed values. Detected before any network call.
    #[error("Failed to obtain authentication type")]
    FailedToObtainAuthType,

    /// The integration settings are unusable for this provider
    #[error("Invalid connector configuration: {config}")]
    InvalidConnectorConfig {
        /// The offending configuration key
        config: &'static str,
    },

    /// A request field the provider requires was not supplied
    #[error("Missing required field: {field_name}")]
    MissingRequiredField {
        /// The missing field
        field_name: &'static str,
    },

    /// The provider response could not be deserialized
    #[error("Failed to deserialize connector response")]
    ResponseDeserializationFailed,

    /// The provider processed the call and reported a failure. Carries the
    /// human-readable detail unwrapped from the provider's error payload.
    #[error("Payment processing failed at connector: {0:?}")]
    ProcessingStepFailed(Option<String>),

    /// The transport layer failed before a provider response was obtained
    #[error("Failed to send request to connector")]
    RequestNotSent,

    /// The caller's request cannot be sent as-is; the message explains what
    /// the caller must change (e.g. which tokenization flow produces the
    /// missing reference)
    #[error("{message}")]
    InvalidRequestData {
        /// Actionable description of the problem
        message: String,
    },

    /// The operation exists but the caller's request shape cannot use it
    #[error("{message} is not supported by {connector}")]
    NotSupported {
        /// What was attempted
        message: String,
        /// Which adapter rejected it
        connector: &'static str,
    },

    /// Amount conversion between canonical and provider-native form failed
    #[error("Failed to convert amount to the connector's representation")]
    AmountConversionFailed,
}

/// Errors raised by the transport client.
#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    /// The reqwest client could not be constructed
    #[error("Client construction failed")]
    ClientConstructionFailed,

    /// The request body could not be rendered
    #[error("Failed to construct request body")]
    BodyConstructionFailed,

    /// The URL was rejected by the transport layer
    #[error("Invalid request URL")]
    UrlEncodingFailed,

    /// The request never produced a response (DNS, connect, TLS, timeout)
    #[error("Connection error: the request was not dispatched or timed out")]
    ConnectionError,

    /// The response body could not be read
    #[error("Failed to read response body")]
    ResponseDecodingFailed,
}
