//! A model provider for the OpenAI Responses API.
//!
//! The provider is deliberately non-streaming: one POST carries the
//! full conversation, and one JSON body comes back with the ordered
//! output items.

#[macro_use]
extern crate tracing;

mod config;
mod proto;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use codeloop_model::{
    ErrorKind, ModelProvider, ModelProviderError, ModelRequest, ModelResponse,
};
use mime::Mime;
use reqwest::{Client, StatusCode, header};

pub use config::{
    DEFAULT_BASE_URL, DEFAULT_MODEL, OpenAIConfig, OpenAIConfigBuilder,
};

/// Error type for [`OpenAIProvider`].
#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    fn other(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ErrorKind::Other,
        }
    }

    fn http_status(status: StatusCode, body: String) -> Self {
        let kind = if status == StatusCode::TOO_MANY_REQUESTS {
            ErrorKind::RateLimitExceeded
        } else {
            ErrorKind::Other
        };
        Self {
            message: format!("server returned {status}: {body}"),
            kind,
        }
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// OpenAI Responses API model provider.
#[derive(Clone, Debug)]
pub struct OpenAIProvider {
    client: Client,
    config: Arc<OpenAIConfig>,
}

impl OpenAIProvider {
    /// Creates a new `OpenAIProvider` with the given configuration.
    #[inline]
    pub fn new(config: OpenAIConfig) -> Self {
        Self {
            client: Client::new(),
            config: Arc::new(config),
        }
    }
}

impl ModelProvider for OpenAIProvider {
    type Error = Error;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelResponse, Self::Error>> + Send + 'static
    {
        let payload = proto::create_request(req, &self.config);
        let resp_fut = self
            .client
            .post(format!("{}/responses", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .header(header::ACCEPT, "application/json")
            .json(&payload)
            .send();

        async move {
            let resp = resp_fut
                .await
                .map_err(|err| Error::other(format!("{err}")))?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(Error::http_status(status, body));
            }

            let content_type = resp
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok());
            let is_json = content_type
                .and_then(|v| v.parse::<Mime>().ok())
                .is_some_and(|m| m.subtype() == mime::JSON);
            if !is_json {
                return Err(Error::other(format!(
                    "unexpected content type: {content_type:?}"
                )));
            }

            let payload: proto::ResponsesResponse = resp
                .json()
                .await
                .map_err(|err| Error::other(format!("{err}")))?;
            trace!("parsed {} output items", payload.output.len());

            Ok(proto::parse_response(payload))
        }
    }
}
