//! Text-generation collaborator.
//!
//! The engine only needs `prompt -> raw text`. No shape is guaranteed for the
//! returned text; parsing and fallback live in the insight generator.

use crate::config::{LlmConfig, LlmProvider};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::json;
use std::time::Duration;

pub(crate) const SYSTEM_PROMPT: &str = "You are a thoughtful journaling coach. You read a person's journal entries together with metrics computed from them and reply with strict JSON containing exactly six non-empty string fields: keyThemes, progressIndicators, patterns, breakthroughs, focusAreas, encouragement. Never recompute or contradict the supplied metrics.";

/// Narrative completion interface.
#[async_trait]
pub trait NarrativeClient: Send + Sync {
    async fn generate_narrative(&self, prompt: &str) -> Result<String>;
}

/// Create the default HTTP-backed narrative client.
pub fn create_narrative_client(llm: &LlmConfig) -> Result<Box<dyn NarrativeClient>> {
    Ok(Box::new(HttpNarrativeClient::new(llm)?))
}

/// Narrative client speaking the Ollama, Claude, or OpenAI HTTP APIs.
pub struct HttpNarrativeClient {
    model: String,
    provider: LlmProvider,
    endpoint: String,
    api_key: Option<String>,
    timeout_secs: u64,
    http: reqwest::Client,
}

impl HttpNarrativeClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_key = config.resolved_api_key()?;
        let timeout_secs = config.effective_timeout_secs();
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            model: config.model.clone(),
            provider: config.provider,
            endpoint: config.resolved_endpoint(),
            api_key,
            timeout_secs,
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint.trim_end_matches('/'), path)
    }

    fn request_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::NarrativeServiceTimeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            Error::NarrativeServiceUnavailable(format!(
                "{} request failed: {e}",
                self.provider.as_str()
            ))
        }
    }

    /// POST a JSON body and return the response body, failing on non-2xx.
    async fn post(
        &self,
        url: String,
        headers: HeaderMap,
        body: serde_json::Value,
    ) -> Result<serde_json::Value> {
        let resp = self
            .http
            .post(url)
            .headers(headers)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;
        let status = resp.status();
        let text = resp.text().await.map_err(|e| self.request_error(e))?;
        if !status.is_success() {
            return Err(Error::NarrativeServiceUnavailable(format!(
                "{} returned {}: {}",
                self.provider.as_str(),
                status.as_u16(),
                text
            )));
        }
        serde_json::from_str(&text).map_err(|e| {
            Error::NarrativeServiceUnavailable(format!(
                "{} returned an unreadable body: {e}",
                self.provider.as_str()
            ))
        })
    }

    fn json_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    fn header_value(value: &str) -> Result<HeaderValue> {
        HeaderValue::from_str(value)
            .map_err(|e| Error::Config(format!("invalid API key header: {e}")))
    }
}

fn missing(provider: LlmProvider, path: &str) -> Error {
    Error::NarrativeServiceUnavailable(format!(
        "{} response missing {}",
        provider.as_str(),
        path
    ))
}

#[async_trait]
impl NarrativeClient for HttpNarrativeClient {
    async fn generate_narrative(&self, prompt: &str) -> Result<String> {
        match self.provider {
            LlmProvider::Ollama => {
                let json = self
                    .post(
                        self.url("/api/generate"),
                        self.json_headers(),
                        json!({
                            "model": self.model,
                            "system": SYSTEM_PROMPT,
                            "prompt": prompt,
                            "stream": false,
                        }),
                    )
                    .await?;
                json.get("response")
                    .and_then(|v| v.as_str())
                    .map(ToString::to_string)
                    .ok_or_else(|| missing(self.provider, "string field `response`"))
            }
            LlmProvider::Claude => {
                let mut headers = self.json_headers();
                headers.insert(
                    "x-api-key",
                    Self::header_value(self.api_key.as_deref().unwrap_or_default())?,
                );
                headers.insert("anthropic-version", HeaderValue::from_static("2023-06-01"));

                let json = self
                    .post(
                        self.url("/v1/messages"),
                        headers,
                        json!({
                            "model": self.model,
                            "max_tokens": 1200,
                            "temperature": 0.4,
                            "system": SYSTEM_PROMPT,
                            "messages": [{ "role": "user", "content": prompt }],
                        }),
                    )
                    .await?;
                json.get("content")
                    .and_then(|v| v.as_array())
                    .and_then(|arr| arr.first())
                    .and_then(|v| v.get("text"))
                    .and_then(|v| v.as_str())
                    .map(ToString::to_string)
                    .ok_or_else(|| missing(self.provider, "content[0].text"))
            }
            LlmProvider::OpenAI => {
                let mut headers = self.json_headers();
                headers.insert(
                    AUTHORIZATION,
                    Self::header_value(&format!(
                        "Bearer {}",
                        self.api_key.as_deref().unwrap_or_default()
                    ))?,
                );

                let json = self
                    .post(
                        self.url("/v1/chat/completions"),
                        headers,
                        json!({
                            "model": self.model,
                            "temperature": 0.4,
                            "messages": [
                                { "role": "system", "content": SYSTEM_PROMPT },
                                { "role": "user", "content": prompt }
                            ]
                        }),
                    )
                    .await?;
                json.get("choices")
                    .and_then(|v| v.as_array())
                    .and_then(|arr| arr.first())
                    .and_then(|v| v.get("message"))
                    .and_then(|v| v.get("content"))
                    .and_then(|v| v.as_str())
                    .map(ToString::to_string)
                    .ok_or_else(|| missing(self.provider, "choices[0].message.content"))
            }
        }
    }
}
