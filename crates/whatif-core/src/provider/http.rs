//! HTTP provider covering every supported dialect

use super::error_text::sanitize_error_text;
use super::kind::{Dialect, ProviderKind};
use super::traits::{LlmProvider, ProviderRequest, RawCompletion};
use crate::config::ProviderConfig;
use crate::error::{WhatIfError, WhatIfResult};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::{Value, json};
use tracing::{debug, instrument};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Provider speaking its kind's HTTP dialect
pub struct HttpProvider {
    kind: ProviderKind,
    base_url: String,
    api_key: String,
    http_client: Client,
}

impl std::fmt::Debug for HttpProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProvider")
            .field("kind", &self.kind)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpProvider {
    pub fn new(kind: ProviderKind, base_url: impl Into<String>, api_key: impl Into<String>, http_client: Client) -> Self {
        Self {
            kind,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            http_client,
        }
    }

    /// Build from a chain link's configuration
    ///
    /// # Errors
    ///
    /// Returns `WhatIfError::Config` when no API key was resolved.
    pub fn from_config(config: &ProviderConfig, http_client: Client) -> WhatIfResult<Self> {
        let api_key = config.require_api_key()?;
        Ok(Self::new(config.kind, config.base_url(), api_key, http_client))
    }

    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn build_request(&self, request: &ProviderRequest) -> RequestBuilder {
        match self.kind.dialect() {
            Dialect::AnthropicMessages => self
                .http_client
                .post(format!("{}/messages", self.base_url))
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&anthropic_body(request)),
            Dialect::ChatCompletions => {
                let builder = self
                    .http_client
                    .post(format!("{}/chat/completions", self.base_url))
                    .bearer_auth(&self.api_key)
                    .json(&chat_body(request));
                match self.kind {
                    ProviderKind::OpenRouter => builder
                        .header("HTTP-Referer", "https://github.com/whatif-sim/whatif")
                        .header("X-Title", "What If"),
                    _ => builder,
                }
            }
            Dialect::GeminiGenerate => self
                .http_client
                .post(format!(
                    "{}/models/{}:generateContent",
                    self.base_url, request.model
                ))
                .header("x-goog-api-key", &self.api_key)
                .json(&gemini_body(request)),
        }
    }

    fn transport_error(&self, error: reqwest::Error, request: &ProviderRequest) -> WhatIfError {
        let provider = self.kind.name();
        if error.is_timeout() {
            // reqwest does not report the configured duration; the gateway's
            // own timeout normally fires first
            WhatIfError::provider(provider, format!("request timed out: {}", error))
        } else if error.is_connect() {
            WhatIfError::provider(provider, format!("connect failed for {}: {}", request.model, error))
        } else {
            WhatIfError::provider(provider, format!("network error: {}", error))
        }
    }
}

#[async_trait]
impl LlmProvider for HttpProvider {
    #[instrument(skip(self, request), fields(provider = %self.kind, model = %request.model), level = "debug")]
    async fn call(&self, request: &ProviderRequest) -> WhatIfResult<RawCompletion> {
        let response = self
            .build_request(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e, request))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WhatIfError::provider_status(
                self.kind.name(),
                status.as_u16(),
                format!("API error (status {}): {}", status, sanitize_error_text(&body)),
            ));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| WhatIfError::malformed(self.kind.name(), format!("invalid JSON body: {}", e)))?;
        debug!("Received response from {}", self.kind);

        parse_completion(self.kind, &body)
    }
}

fn anthropic_body(request: &ProviderRequest) -> Value {
    json!({
        "model": request.model,
        "max_tokens": request.max_tokens,
        "temperature": request.temperature,
        "messages": [{"role": "user", "content": request.prompt}],
    })
}

fn chat_body(request: &ProviderRequest) -> Value {
    json!({
        "model": request.model,
        "max_tokens": request.max_tokens,
        "temperature": request.temperature,
        "messages": [{"role": "user", "content": request.prompt}],
    })
}

fn gemini_body(request: &ProviderRequest) -> Value {
    json!({
        "contents": [{"role": "user", "parts": [{"text": request.prompt}]}],
        "generationConfig": {
            "maxOutputTokens": request.max_tokens,
            "temperature": request.temperature,
        },
    })
}

/// Extract text and usage from a dialect-specific response body
pub(crate) fn parse_completion(kind: ProviderKind, body: &Value) -> WhatIfResult<RawCompletion> {
    let (text, input_tokens, output_tokens) = match kind.dialect() {
        Dialect::AnthropicMessages => (
            join_text(body["content"].as_array(), |block| {
                (block["type"] == "text").then(|| block["text"].as_str()).flatten()
            }),
            body["usage"]["input_tokens"].as_u64(),
            body["usage"]["output_tokens"].as_u64(),
        ),
        Dialect::ChatCompletions => (
            body["choices"][0]["message"]["content"]
                .as_str()
                .unwrap_or_default()
                .to_string(),
            body["usage"]["prompt_tokens"].as_u64(),
            body["usage"]["completion_tokens"].as_u64(),
        ),
        Dialect::GeminiGenerate => (
            join_text(body["candidates"][0]["content"]["parts"].as_array(), |part| {
                part["text"].as_str()
            }),
            body["usageMetadata"]["promptTokenCount"].as_u64(),
            body["usageMetadata"]["candidatesTokenCount"].as_u64(),
        ),
    };

    if text.trim().is_empty() {
        return Err(WhatIfError::malformed(kind.name(), "response contained no text"));
    }

    Ok(RawCompletion {
        text,
        input_tokens,
        output_tokens,
    })
}

fn join_text<'a, F>(items: Option<&'a Vec<Value>>, extract: F) -> String
where
    F: Fn(&'a Value) -> Option<&'a str>,
{
    items
        .into_iter()
        .flatten()
        .filter_map(extract)
        .collect::<Vec<_>>()
        .join("")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ProviderRequest {
        ProviderRequest {
            model: "m".to_string(),
            prompt: "hello".to_string(),
            max_tokens: 1024,
            temperature: 0.7,
        }
    }

    #[test]
    fn test_parse_anthropic_response() {
        let body = json!({
            "content": [
                {"type": "text", "text": "{\"a\":"},
                {"type": "tool_use", "id": "x"},
                {"type": "text", "text": "1}"}
            ],
            "usage": {"input_tokens": 12, "output_tokens": 34}
        });
        let completion = parse_completion(ProviderKind::Anthropic, &body).unwrap();
        assert_eq!(completion.text, "{\"a\":1}");
        assert_eq!(completion.input_tokens, Some(12));
        assert_eq!(completion.output_tokens, Some(34));
    }

    #[test]
    fn test_parse_chat_completion_response() {
        let body = json!({
            "choices": [{"message": {"role": "assistant", "content": "{}"}}],
            "usage": {"prompt_tokens": 5, "completion_tokens": 7}
        });
        for kind in [ProviderKind::OpenAi, ProviderKind::Grok, ProviderKind::OpenRouter] {
            let completion = parse_completion(kind, &body).unwrap();
            assert_eq!(completion.text, "{}");
            assert_eq!(completion.output_tokens, Some(7));
        }
    }

    #[test]
    fn test_parse_gemini_response_without_usage() {
        let body = json!({
            "candidates": [{"content": {"parts": [{"text": "{\"ok\": true}"}]}}]
        });
        let completion = parse_completion(ProviderKind::Google, &body).unwrap();
        assert_eq!(completion.text, "{\"ok\": true}");
        assert_eq!(completion.input_tokens, None);
    }

    #[test]
    fn test_empty_text_is_malformed() {
        let body = json!({"choices": []});
        let err = parse_completion(ProviderKind::OpenAi, &body).unwrap_err();
        assert!(matches!(err, WhatIfError::MalformedResponse { .. }));
    }

    #[test]
    fn test_request_bodies() {
        let anthropic = anthropic_body(&request());
        assert_eq!(anthropic["messages"][0]["content"], "hello");
        assert_eq!(anthropic["max_tokens"], 1024);

        let gemini = gemini_body(&request());
        assert_eq!(gemini["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(gemini["generationConfig"]["maxOutputTokens"], 1024);
    }

    #[test]
    fn test_from_config_requires_key() {
        let config = ProviderConfig::new(ProviderKind::Anthropic, "claude");
        assert!(HttpProvider::from_config(&config, Client::new()).is_err());

        let provider =
            HttpProvider::from_config(&config.with_api_key("sk-test"), Client::new()).unwrap();
        assert_eq!(provider.kind(), ProviderKind::Anthropic);
        assert!(!format!("{:?}", provider).contains("sk-test"));
    }
}
