//! A model provider for OpenAI-compatible APIs.
//!
//! Besides chat completions, the provider also exposes the images API, which
//! the image tools build on.

#[macro_use]
extern crate tracing;

mod config;
mod images;
mod proto;
mod transport;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use ai_orchestrator_model::{
    ErrorKind, ModelProvider, ModelProviderError, ModelReply, ModelRequest,
};
use reqwest::Client;

pub use config::{OpenAIConfig, OpenAIConfigBuilder};
pub use images::{
    ImageData, ImageEditRequest, ImageGenerationRequest, ImagesResponse,
};
use proto::ChatCompletion;

/// Error type for [`OpenAIProvider`].
#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
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

/// OpenAI-compatible model provider.
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

    /// Returns the configuration of this provider.
    #[inline]
    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    #[inline]
    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }
}

impl ModelProvider for OpenAIProvider {
    type Error = Error;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelReply, Self::Error>> + Send + 'static
    {
        let openai_req = proto::create_request(req, &self.config);
        let client = self.client.clone();
        let url = self.endpoint("/chat/completions");
        let api_key = self.config.api_key.clone();
        let max_elapsed = self.config.max_retry_elapsed;

        async move {
            let completion: ChatCompletion = transport::send_with_retry(
                || {
                    Ok(client
                        .post(&url)
                        .bearer_auth(&api_key)
                        .json(&openai_req))
                },
                max_elapsed,
            )
            .await?;
            trace!("got a completion: {:?}", completion.id);
            proto::parse_reply(completion)
        }
    }
}
