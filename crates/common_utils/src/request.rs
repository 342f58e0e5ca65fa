//! Transport-neutral description of an outbound provider request.

use masking::{Maskable, Secret};
use serde::{Deserialize, Serialize};

use crate::errors;

/// Set of headers with maskable values, so that credential-bearing headers
/// never show up in debug output.
pub type Headers = std::collections::HashSet<(String, Maskable<String>)>;

/// HTTP request method
#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// Returns the default request headers as an array of tuples containing header
/// names and values.
fn default_request_headers() -> [(String, Maskable<String>); 1] {
    use http::header;

    [(header::VIA.to_string(), "Router".to_string().into())]
}

/// A fully built outbound request, ready to be executed by the transport
/// client.
#[derive(Debug)]
pub struct Request {
    pub url: String,
    pub headers: Headers,
    pub method: Method,
    pub body: Option<RequestContent>,
}

/// Request body, tagged by wire encoding.
pub enum RequestContent {
    /// Serialize the payload as a JSON document
    Json(Box<dyn masking::ErasedSerialize + Send>),
    /// Serialize the payload as an `application/x-www-form-urlencoded` form
    FormUrlEncoded(Box<dyn masking::ErasedSerialize + Send>),
}

impl std::fmt::Debug for RequestContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Json(_) => "JsonRequestBody",
            Self::FormUrlEncoded(_) => "FormUrlEncodedRequestBody",
        })
    }
}

impl RequestContent {
    /// Render the body to its on-wire string form. The result is wrapped in a
    /// secret since bodies routinely carry tokenized payment references.
    pub fn get_inner_value(&self) -> errors::CustomResult<Secret<String>, errors::ParsingError> {
        use error_stack::ResultExt;

        match self {
            Self::Json(payload) => serde_json::to_string(&payload)
                .change_context(errors::ParsingError::EncodeError("json"))
                .map(Secret::new),
            Self::FormUrlEncoded(payload) => {
                let urlencoded = serde_json::to_value(payload)
                    .change_context(errors::ParsingError::EncodeError("form-urlencoded"))
                    .and_then(|value| {
                        serde_urlencoded::to_string(value)
                            .change_context(errors::ParsingError::EncodeError("form-urlencoded"))
                    })?;
                Ok(Secret::new(urlencoded))
            }
        }
    }

    /// The `Content-Type` header value matching this body's encoding.
    pub fn content_type_header(&self) -> &'static str {
        match self {
            Self::Json(_) => "application/json",
            Self::FormUrlEncoded(_) => "application/x-www-form-urlencoded",
        }
    }
}

impl Request {
    /// Creates a new instance of Request with the specified HTTP method and URL.
    pub fn new(method: Method, url: &str) -> Self {
        Self {
            method,
            url: String::from(url),
            headers: std::collections::HashSet::new(),
            body: None,
        }
    }

    /// Sets the body of the request to the provided value.
    pub fn set_body<T: Into<RequestContent>>(&mut self, body: T) {
        self.body.replace(body.into());
    }

    /// Adds default headers to the existing headers in the request.
    pub fn add_default_headers(&mut self) {
        self.headers.extend(default_request_headers());
    }

    /// Adds a new header to the headers map.
    pub fn add_header(&mut self, header: &str, value: Maskable<String>) {
        self.headers.insert((String::from(header), value));
    }
}

/// Builder for [`Request`].
#[derive(Debug)]
pub struct RequestBuilder {
    pub url: String,
    pub headers: Headers,
    pub method: Method,
    pub body: Option<RequestContent>,
}

impl RequestBuilder {
    /// Creates a new instance of the builder with default values.
    pub fn new() -> Self {
        Self {
            method: Method::Get,
            url: String::with_capacity(1024),
            headers: std::collections::HashSet::new(),
            body: None,
        }
    }

    /// Set the request URL
    pub fn url(mut self, url: &str) -> Self {
        self.url = url.into();
        self
    }

    /// Set the request method
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Attach the default headers
    pub fn attach_default_headers(mut self) -> Self {
        self.headers.extend(default_request_headers());
        self
    }

    /// Add a single header
    pub fn header(mut self, header: &str, value: Maskable<String>) -> Self {
        self.headers.insert((header.into(), value));
        self
    }

    /// Extend with a collection of headers
    pub fn headers(mut self, headers: Vec<(String, Maskable<String>)>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Set the request body
    pub fn set_body<T: Into<RequestContent>>(mut self, body: T) -> Self {
        self.body.replace(body.into());
        self
    }

    /// Build the request
    pub fn build(self) -> Request {
        Request {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use masking::Mask;

    use super::*;

    #[test]
    fn builder_collects_headers_and_body() {
        #[derive(serde::Serialize)]
        struct Payload {
            amount: i64,
        }

        let request = RequestBuilder::new()
            .method(Method::Post)
            .url("https://api.example.com/v1/charges")
            .attach_default_headers()
            .header("Authorization", "Bearer sk_test".to_string().into_masked())
            .set_body(RequestContent::Json(Box::new(Payload { amount: 1999 })))
            .build();

        assert_eq!(request.method, Method::Post);
        assert!(request.headers.iter().any(|(name, _)| name == "Authorization"));
        let body = request.body.unwrap().get_inner_value().unwrap();
        assert_eq!(masking::PeekInterface::peek(&body), "{\"amount\":1999}");
    }

    #[test]
    fn form_urlencoded_bodies_flatten_nested_keys() {
        #[derive(serde::Serialize)]
        struct Form {
            amount: i64,
            currency: String,
        }

        let content = RequestContent::FormUrlEncoded(Box::new(Form {
            amount: 1999,
            currency: "usd".to_string(),
        }));
        let rendered = content.get_inner_value().unwrap();
        assert_eq!(
            masking::PeekInterface::peek(&rendered),
            "amount=1999&currency=usd"
        );
    }
}
