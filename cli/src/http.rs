//! `reqwest` transport for the command-line front end.
//!
//! ERROR HANDLING
//! ==============
//! Connection and body-read failures become `ApiError::Transport`. Status
//! codes are handed back untouched; the flows decide what a non-2xx means.

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use vitals::config::ClientConfig;
use vitals::transport::{Method, RequestBody};
use vitals::{ApiError, ApiRequest, ApiResponse, Transport};

const USER_AGENT: &str = concat!("vitals-cli/", env!("CARGO_PKG_VERSION"));

pub struct HttpTransport {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpTransport {
    /// # Errors
    ///
    /// Returns the `reqwest` error if the TLS backend cannot be initialised.
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client, config })
    }

    fn build(&self, request: ApiRequest) -> reqwest::RequestBuilder {
        let url = self.config.url(&request.path);
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        };
        let mut builder = self.client.request(method, url);
        if let Some(auth) = request.authorization() {
            builder = builder.header(AUTHORIZATION, auth);
        }
        if let Some(content_type) = request.body.content_type() {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        match request.body {
            RequestBody::Empty => builder,
            RequestBody::Form(body) => builder.body(body),
            RequestBody::Json(value) => builder.body(value.to_string()),
        }
    }
}

fn transport_error(err: reqwest::Error) -> ApiError {
    ApiError::Transport(err.to_string())
}

#[async_trait::async_trait(?Send)]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let path = request.path.clone();
        let response = self.build(request).send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport_error)?;
        tracing::debug!(%path, status, "api response");
        Ok(ApiResponse::new(status, body))
    }
}
