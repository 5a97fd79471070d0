//! OpenAI-compatible inference gateway.
//!
//! Talks to a locally hosted model server through its chat-completions
//! endpoint with plain `reqwest`. Network failures, deadline overruns, and
//! HTTP errors are folded into [`InferenceError`].

pub mod types;

use std::time::Duration;

use nova_core::llm::gateway::InferenceGateway;
use nova_types::config::InferenceConfig;
use nova_types::llm::{BackendStatus, CompletionRequest, CompletionResponse, InferenceError};
use tracing::debug;

use self::types::{ChatCompletionRequest, ChatCompletionResponse, WireMessage};

/// Upper bound on how much of an error body is kept.
const MAX_ERROR_BODY: usize = 2048;

/// Gateway to an OpenAI-compatible `/v1/chat/completions` endpoint.
pub struct OpenAiCompatGateway {
    client: reqwest::Client,
    url: String,
    model: String,
    temperature: f64,
    max_tokens: u32,
    request_timeout: Duration,
    probe_timeout: Duration,
}

impl OpenAiCompatGateway {
    pub fn new(config: &InferenceConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            url: config.completions_url(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            probe_timeout: Duration::from_secs(config.probe_timeout_secs),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn build_request<'a>(&'a self, request: &'a CompletionRequest) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.model,
            messages: request
                .messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stream: false,
        }
    }
}

/// Map a transport error to the gateway's failure modes.
fn classify(e: reqwest::Error) -> InferenceError {
    if e.is_timeout() {
        InferenceError::Timeout
    } else if e.is_decode() {
        InferenceError::Malformed(e.to_string())
    } else {
        InferenceError::Offline(e.to_string())
    }
}

fn truncate_body(mut body: String) -> String {
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    body
}

impl InferenceGateway for OpenAiCompatGateway {
    async fn probe(&self) -> BackendStatus {
        // Minimal payload; the reply content is irrelevant.
        let body = serde_json::json!({
            "model": self.model,
            "messages": [{"role": "system", "content": "test"}],
            "max_tokens": 1,
            "temperature": 0,
        });

        match self
            .client
            .post(&self.url)
            .timeout(self.probe_timeout)
            .json(&body)
            .send()
            .await
        {
            Ok(response) => {
                debug!(status = %response.status(), "Backend probe answered");
                BackendStatus::Online
            }
            Err(e) => {
                debug!(error = %e, "Backend probe failed");
                BackendStatus::Offline
            }
        }
    }

    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, InferenceError> {
        let body = self.build_request(request);

        let response = self
            .client
            .post(&self.url)
            .timeout(self.request_timeout)
            .json(&body)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(InferenceError::Upstream {
                status: status.as_u16(),
                body: truncate_body(error_body),
            });
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(classify)?;
        let model = parsed.model.clone();
        let content = parsed
            .into_content()
            .ok_or_else(|| InferenceError::Malformed("response has no choices".to_string()))?;

        Ok(CompletionResponse { content, model })
    }
}
