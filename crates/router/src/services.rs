//! Transport services: the reqwest-backed [`ApiClient`] implementation.

use bytes::Bytes;
use common_utils::{consts, errors::CustomResult, request::Request};
use error_stack::{report, ResultExt};
use payment_interfaces::{api_client::ApiClient, errors::ApiClientError, types::Response};
use router_env::{instrument, tracing};

use crate::configs::settings::Proxy;

/// Reqwest-backed client. One instance serves the whole service; per-call
/// state (credentials, bodies) lives in the requests, never in the client.
#[derive(Clone, Debug)]
pub struct ProxyClient {
    client: reqwest::Client,
}

impl ProxyClient {
    /// Build the client, honoring proxy configuration and the transport
    /// timeout. Redirects are refused: provider APIs never redirect, and
    /// following one could re-send credentials to an unexpected host.
    pub fn new(proxy_config: &Proxy) -> CustomResult<Self, ApiClientError> {
        let mut client_builder = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(std::time::Duration::from_secs(consts::REQUEST_TIME_OUT));

        if let Some(url) = proxy_config.https_url.as_deref() {
            client_builder = client_builder.proxy(
                reqwest::Proxy::https(url).change_context(ApiClientError::ClientConstructionFailed)?,
            );
        }
        if let Some(url) = proxy_config.http_url.as_deref() {
            client_builder = client_builder.proxy(
                reqwest::Proxy::http(url).change_context(ApiClientError::ClientConstructionFailed)?,
            );
        }

        Ok(Self {
            client: client_builder
                .build()
                .change_context(ApiClientError::ClientConstructionFailed)?,
        })
    }

    fn build_reqwest(
        &self,
        request: &Request,
        body: Option<&(String, &'static str)>,
    ) -> CustomResult<reqwest::Request, ApiClientError> {
        use common_utils::request::Method;

        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };
        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.clone().into_inner());
        }
        if let Some((rendered, content_type)) = body {
            builder = builder
                .header("Content-Type", *content_type)
                .body(rendered.clone());
        }
        builder
            .build()
            .change_context(ApiClientError::UrlEncodingFailed)
    }
}

#[async_trait::async_trait]
impl ApiClient for ProxyClient {
    /// Send the request, retrying transport-level failures a bounded number
    /// of times. Retries reuse the identical rendered request, so charge
    /// retries carry the same idempotency key and the provider deduplicates
    /// them; provider-decoded failures are never retried here.
    #[instrument(skip_all, fields(url = %request.url, method = ?request.method))]
    async fn send_request(&self, request: Request) -> CustomResult<Response, ApiClientError> {
        use masking::ExposeInterface;

        // Render the body once; every attempt re-sends the identical bytes.
        let body = request
            .body
            .as_ref()
            .map(|content| {
                content
                    .get_inner_value()
                    .change_context(ApiClientError::BodyConstructionFailed)
                    .map(|rendered| (rendered.expose(), content.content_type_header()))
            })
            .transpose()?;

        let mut last_error = None;
        for attempt in 1..=consts::MAX_REQUEST_ATTEMPTS {
            let reqwest_request = self.build_reqwest(&request, body.as_ref())?;
            match self.client.execute(reqwest_request).await {
                Ok(response) => {
                    let status_code = response.status().as_u16();
                    let bytes: Bytes = response
                        .bytes()
                        .await
                        .change_context(ApiClientError::ResponseDecodingFailed)?;
                    return Ok(Response {
                        response: bytes,
                        status_code,
                    });
                }
                Err(error) if error.is_timeout() || error.is_connect() => {
                    router_env::logger::warn!(
                        attempt,
                        error = %error,
                        "transport failure, retrying with the same request"
                    );
                    last_error = Some(error);
                }
                Err(error) => {
                    router_env::logger::error!(error = %error, "request dispatch failed");
                    return Err(report!(ApiClientError::ConnectionError));
                }
            }
        }
        router_env::logger::error!(?last_error, "exhausted transport retries");
        Err(report!(ApiClientError::ConnectionError))
    }
}
