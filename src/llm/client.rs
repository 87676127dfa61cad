//! The completion boundary: one prompt out, one text completion in.
//!
//! The crate owns the prompt and the response contract; the transport is
//! supplied by the caller through [`CompletionClient`]. With the
//! `http-client` feature, [`HttpCompletionClient`] talks to any
//! OpenAI-compatible `chat/completions` endpoint.

use std::future::Future;

use super::error::CompletionError;

/// A single completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// Instruction and response contract
    pub system: String,
    /// Serialized sheets
    pub user: String,
}

/// Transport for model completions.
///
/// Implementations should not retry; retry policy belongs to the caller.
pub trait CompletionClient {
    fn complete(
        &self,
        request: CompletionRequest,
    ) -> impl Future<Output = Result<String, CompletionError>> + Send;
}

impl<C: CompletionClient + ?Sized> CompletionClient for &C {
    fn complete(
        &self,
        request: CompletionRequest,
    ) -> impl Future<Output = Result<String, CompletionError>> + Send {
        (**self).complete(request)
    }
}

#[cfg(feature = "http-client")]
pub use http::HttpCompletionClient;

#[cfg(feature = "http-client")]
mod http {
    use std::future::Future;

    use serde::{Deserialize, Serialize};

    use super::{CompletionClient, CompletionRequest};
    use crate::llm::error::CompletionError;

    /// OpenAI-compatible `chat/completions` client.
    #[derive(Debug, Clone)]
    pub struct HttpCompletionClient {
        http: reqwest::Client,
        base_url: String,
        model: String,
        api_key: Option<String>,
    }

    #[derive(Serialize)]
    struct ChatRequest<'a> {
        model: &'a str,
        temperature: f32,
        messages: [ChatMessage<'a>; 2],
    }

    #[derive(Serialize)]
    struct ChatMessage<'a> {
        role: &'static str,
        content: &'a str,
    }

    #[derive(Deserialize)]
    struct ChatResponse {
        choices: Vec<Choice>,
    }

    #[derive(Deserialize)]
    struct Choice {
        message: ResponseMessage,
    }

    #[derive(Deserialize)]
    struct ResponseMessage {
        content: Option<String>,
    }

    impl HttpCompletionClient {
        /// `base_url` is the API root, e.g. `https://api.openai.com/v1`.
        pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
            Self {
                http: reqwest::Client::new(),
                base_url: base_url.into().trim_end_matches('/').to_string(),
                model: model.into(),
                api_key: None,
            }
        }

        pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
            self.api_key = Some(api_key.into());
            self
        }

        pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
            self.http = http;
            self
        }
    }

    impl CompletionClient for HttpCompletionClient {
        fn complete(
            &self,
            request: CompletionRequest,
        ) -> impl Future<Output = Result<String, CompletionError>> + Send {
            let body = ChatRequest {
                model: &self.model,
                temperature: 0.0,
                messages: [
                    ChatMessage {
                        role: "system",
                        content: &request.system,
                    },
                    ChatMessage {
                        role: "user",
                        content: &request.user,
                    },
                ],
            };
            let mut builder = self
                .http
                .post(format!("{}/chat/completions", self.base_url))
                .json(&body);
            if let Some(key) = &self.api_key {
                builder = builder.bearer_auth(key);
            }

            async move {
                let response = builder
                    .send()
                    .await
                    .map_err(|e| CompletionError::Transport(e.to_string()))?;
                let status = response.status();
                if !status.is_success() {
                    let message = response.text().await.unwrap_or_default();
                    return Err(CompletionError::Status {
                        status: status.as_u16(),
                        message,
                    });
                }
                let body: ChatResponse = response
                    .json()
                    .await
                    .map_err(|e| CompletionError::Transport(e.to_string()))?;
                body.choices
                    .into_iter()
                    .next()
                    .and_then(|choice| choice.message.content)
                    .ok_or(CompletionError::EmptyResponse)
            }
        }
    }
}
