//! Transport client abstraction.
//!
//! Adapters build transport-neutral [`Request`]s and hand them to an
//! [`ApiClient`]; the concrete reqwest-backed client lives in the router's
//! services layer so that tests can substitute a canned-response double.

use common_utils::{errors::CustomResult, request::Request};

use crate::{errors::ApiClientError, types::Response};

/// A client able to execute a built [`Request`] against a provider.
#[async_trait::async_trait]
pub trait ApiClient: Send + Sync + std::fmt::Debug {
    /// Execute the request and return the raw response. Non-2xx statuses are
    /// returned as `Ok` responses; decoding them is the adapter's concern.
    async fn send_request(&self, request: Request) -> CustomResult<Response, ApiClientError>;
}
