use crate::{config::AppConfig, errors::ServiceError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{instrument, warn};

const GROQ_MODEL: &str = "llama-3.3-70b-versatile";
const GEMINI_MODEL: &str = "gemini-pro";

const CHAT_TEMPERATURE: f32 = 0.5;
const CHAT_MAX_TOKENS: u32 = 200;
const INSIGHTS_TEMPERATURE: f32 = 0.3;
const INSIGHTS_MAX_TOKENS: u32 = 1024;

const CHAT_SYSTEM_PROMPT: &str = "You are a concise manufacturing operations assistant. \
Answer questions about inventory, suppliers, production and purchasing in a few sentences.";

/// Hosted completion providers, tried in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Groq,
    Gemini,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Groq => "groq",
            ProviderKind::Gemini => "gemini",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub api_key: String,
    pub base_url: String,
}

/// Completion request shared by both providers
#[derive(Debug, Clone)]
struct CompletionParams<'a> {
    system: Option<&'a str>,
    prompt: &'a str,
    temperature: f32,
    max_tokens: u32,
}

/// Structured insight set parsed from the model reply
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct InsightBundle {
    #[serde(default)]
    pub investments: Vec<serde_json::Value>,
    #[serde(default)]
    pub profitability: Vec<serde_json::Value>,
    #[serde(default)]
    pub critical_items: Vec<serde_json::Value>,
    #[serde(default)]
    pub risks: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ChatReply {
    pub message: String,
    pub source: String,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct InsightsReply {
    pub data: InsightBundle,
    pub is_ai_generated: bool,
    pub source: String,
}

/// Proxy over hosted LLM chat-completion providers.
///
/// Providers are capability-equivalent and tried in configuration order.
/// One timeout budget is shared across the whole chain, so a slow first
/// provider shrinks the window left for the next one.
#[derive(Clone)]
pub struct InsightsService {
    client: reqwest::Client,
    providers: Vec<ProviderConfig>,
    timeout: Duration,
}

impl InsightsService {
    pub fn new(providers: Vec<ProviderConfig>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            providers,
            timeout,
        }
    }

    pub fn from_config(cfg: &AppConfig) -> Self {
        let mut providers = Vec::new();
        if let Some(key) = cfg.groq_api_key.as_ref().filter(|k| !k.is_empty()) {
            providers.push(ProviderConfig {
                kind: ProviderKind::Groq,
                api_key: key.clone(),
                base_url: cfg.groq_base_url.clone(),
            });
        }
        if let Some(key) = cfg.gemini_api_key.as_ref().filter(|k| !k.is_empty()) {
            providers.push(ProviderConfig {
                kind: ProviderKind::Gemini,
                api_key: key.clone(),
                base_url: cfg.gemini_base_url.clone(),
            });
        }
        Self::new(providers, Duration::from_secs(cfg.insights_timeout_secs))
    }

    pub fn has_providers(&self) -> bool {
        !self.providers.is_empty()
    }

    /// Runs the provider chain, returning the first successful completion
    /// together with the provider that produced it.
    async fn complete(
        &self,
        params: CompletionParams<'_>,
    ) -> Result<(String, ProviderKind), ServiceError> {
        if self.providers.is_empty() {
            return Err(ServiceError::ExternalServiceError(
                "No completion providers configured".into(),
            ));
        }

        let deadline = tokio::time::Instant::now() + self.timeout;
        let mut last_error = String::new();

        for provider in &self.providers {
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            if remaining.is_zero() {
                last_error = "timeout budget exhausted".into();
                break;
            }

            let attempt = tokio::time::timeout(remaining, self.call_provider(provider, &params));
            match attempt.await {
                Ok(Ok(text)) => return Ok((text, provider.kind)),
                Ok(Err(e)) => {
                    warn!(provider = provider.kind.as_str(), error = %e, "provider call failed");
                    last_error = e;
                }
                Err(_) => {
                    warn!(provider = provider.kind.as_str(), "provider call timed out");
                    last_error = "request timed out".into();
                }
            }
        }

        Err(ServiceError::ExternalServiceError(format!(
            "All completion providers failed: {}",
            last_error
        )))
    }

    async fn call_provider(
        &self,
        provider: &ProviderConfig,
        params: &CompletionParams<'_>,
    ) -> Result<String, String> {
        match provider.kind {
            ProviderKind::Groq => self.call_groq(provider, params).await,
            ProviderKind::Gemini => self.call_gemini(provider, params).await,
        }
    }

    async fn call_groq(
        &self,
        provider: &ProviderConfig,
        params: &CompletionParams<'_>,
    ) -> Result<String, String> {
        let url = format!("{}/chat/completions", provider.base_url);
        let mut messages = Vec::new();
        if let Some(system) = params.system {
            messages.push(json!({ "role": "system", "content": system }));
        }
        messages.push(json!({ "role": "user", "content": params.prompt }));

        let body = json!({
            "model": GROQ_MODEL,
            "messages": messages,
            "temperature": params.temperature,
            "max_tokens": params.max_tokens,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&provider.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("transport error: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("upstream status {}", response.status()));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| format!("invalid response body: {}", e))?;

        payload["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| "response missing message content".into())
    }

    async fn call_gemini(
        &self,
        provider: &ProviderConfig,
        params: &CompletionParams<'_>,
    ) -> Result<String, String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            provider.base_url, GEMINI_MODEL, provider.api_key
        );

        // Gemini has no separate system role; prepend it to the prompt
        let text = match params.system {
            Some(system) => format!("{}\n\n{}", system, params.prompt),
            None => params.prompt.to_string(),
        };

        let body = json!({
            "contents": [{ "parts": [{ "text": text }] }],
            "generationConfig": {
                "temperature": params.temperature,
                "maxOutputTokens": params.max_tokens,
            },
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("transport error: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("upstream status {}", response.status()));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| format!("invalid response body: {}", e))?;

        payload["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| "response missing candidate text".into())
    }

    /// Conversational completion for the chat endpoints
    #[instrument(skip(self, message))]
    pub async fn chat(&self, message: &str) -> Result<ChatReply, ServiceError> {
        let (text, kind) = self
            .complete(CompletionParams {
                system: Some(CHAT_SYSTEM_PROMPT),
                prompt: message,
                temperature: CHAT_TEMPERATURE,
                max_tokens: CHAT_MAX_TOKENS,
            })
            .await?;

        Ok(ChatReply {
            message: text,
            source: kind.as_str().to_string(),
        })
    }

    /// Free-text analysis over a prepared prompt
    #[instrument(skip(self, prompt))]
    pub async fn analyze(&self, prompt: &str) -> Result<ChatReply, ServiceError> {
        let (text, kind) = self
            .complete(CompletionParams {
                system: None,
                prompt,
                temperature: INSIGHTS_TEMPERATURE,
                max_tokens: INSIGHTS_MAX_TOKENS,
            })
            .await?;

        Ok(ChatReply {
            message: text,
            source: kind.as_str().to_string(),
        })
    }

    /// Structured insight generation.
    ///
    /// A provider failure falls through to the next provider; when every
    /// provider fails the canned analysis set is returned. A reply that
    /// arrives but is not valid JSON is a client-visible error carrying
    /// the raw text, and is not retried against other providers.
    #[instrument(skip(self, prompt))]
    pub async fn generate_insights(&self, prompt: &str) -> Result<InsightsReply, ServiceError> {
        let completed = self
            .complete(CompletionParams {
                system: None,
                prompt,
                temperature: INSIGHTS_TEMPERATURE,
                max_tokens: INSIGHTS_MAX_TOKENS,
            })
            .await;

        let (text, kind) = match completed {
            Ok(ok) => ok,
            Err(e) => {
                warn!(error = %e, "all providers failed, returning canned insights");
                return Ok(InsightsReply {
                    data: fallback_insights(),
                    is_ai_generated: false,
                    source: "fallback".to_string(),
                });
            }
        };

        let cleaned = strip_code_fences(&text);
        let bundle: InsightBundle = serde_json::from_str(cleaned).map_err(|_| {
            ServiceError::InvalidUpstreamReply {
                message: "Failed to parse insights response".into(),
                raw: text.clone(),
            }
        })?;

        Ok(InsightsReply {
            data: bundle,
            is_ai_generated: true,
            source: kind.as_str().to_string(),
        })
    }
}

/// Strips a surrounding markdown code fence, with or without a language tag
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the language tag line if present
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Canned analysis returned when no provider is reachable
pub fn fallback_insights() -> InsightBundle {
    InsightBundle {
        investments: vec![json!({
            "title": "Increase safety stock for high-velocity SKUs",
            "description": "Top sellers are trending near their reorder levels; raising safety stock reduces stockout exposure.",
            "priority": "high",
        })],
        profitability: vec![json!({
            "title": "Review low-margin product pricing",
            "description": "Several products sell below a 20% margin; small price adjustments would have outsized profit impact.",
            "priority": "medium",
        })],
        critical_items: vec![json!({
            "title": "Expedite items below reorder level",
            "description": "Items with available stock under their reorder level need expedited purchase orders.",
            "priority": "high",
        })],
        risks: vec![json!({
            "title": "Single-supplier dependencies",
            "description": "Products sourced from one supplier are exposed to lead-time slips; qualify alternates.",
            "priority": "medium",
        })],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_fence_with_language_tag() {
        let text = "```json\n{\"risks\":[]}\n```";
        assert_eq!(strip_code_fences(text), "{\"risks\":[]}");
    }

    #[test]
    fn strips_bare_fence() {
        let text = "```\n{\"risks\":[]}\n```";
        assert_eq!(strip_code_fences(text), "{\"risks\":[]}");
    }

    #[test]
    fn leaves_plain_text_alone() {
        assert_eq!(strip_code_fences("  {\"a\":1} "), "{\"a\":1}");
    }

    #[test]
    fn bundle_parses_with_missing_categories() {
        let bundle: InsightBundle = serde_json::from_str("{\"risks\":[{\"title\":\"x\"}]}")
            .expect("partial bundle should parse");
        assert_eq!(bundle.risks.len(), 1);
        assert!(bundle.investments.is_empty());
    }

    #[test]
    fn fallback_covers_all_categories() {
        let bundle = fallback_insights();
        assert!(!bundle.investments.is_empty());
        assert!(!bundle.profitability.is_empty());
        assert!(!bundle.critical_items.is_empty());
        assert!(!bundle.risks.is_empty());
    }

    #[tokio::test]
    async fn empty_provider_list_is_an_upstream_error() {
        let svc = InsightsService::new(Vec::new(), Duration::from_secs(1));
        let err = svc.chat("hello").await.unwrap_err();
        assert_matches::assert_matches!(err, ServiceError::ExternalServiceError(_));
    }

    #[tokio::test]
    async fn no_providers_yields_canned_insights() {
        let svc = InsightsService::new(Vec::new(), Duration::from_secs(1));
        let reply = svc.generate_insights("analyze").await.unwrap();
        assert_eq!(reply.source, "fallback");
        assert!(!reply.is_ai_generated);
    }
}
