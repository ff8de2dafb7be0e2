// crates/forge-server/src/llm/gemini/client.rs
// Google Gemini generateContent client (non-streaming)
// Serves both persona synthesis (JSON mode) and chat relay (system instruction + history)

use crate::http::create_shared_client;
use crate::llm::gemini::conversion::build_request;
use crate::llm::gemini::extraction::{first_candidate_text, first_finish_reason};
use crate::llm::gemini::types::GeminiResponse;
use crate::llm::http_client::LlmHttpClient;
use crate::llm::provider::LlmClient;
use crate::llm::{GenerateRequest, GenerateResult, Usage};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::time::Instant;
use tracing::{Span, debug, info, instrument, warn};
use uuid::Uuid;

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Google Gemini API client
pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    http: LlmHttpClient,
}

impl GeminiClient {
    /// Create a new Gemini client with default model
    pub fn new(api_key: String) -> Self {
        Self::with_model(api_key, DEFAULT_MODEL.to_string())
    }

    /// Create a new Gemini client with custom model
    pub fn with_model(api_key: String, model: String) -> Self {
        Self::with_http_client(api_key, model, create_shared_client())
    }

    /// Create a new Gemini client with a shared HTTP client
    pub fn with_http_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            api_key,
            model,
            base_url: GEMINI_API_BASE.to_string(),
            http: LlmHttpClient::from_client(client),
        }
    }

    /// Point the client at another API base (proxies, test servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    fn model_name(&self) -> String {
        self.model.clone()
    }

    #[instrument(skip(self, request), fields(request_id, model = %self.model, turn_count = request.contents.len()))]
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResult> {
        let request_id = Uuid::new_v4().to_string();
        let start_time = Instant::now();

        Span::current().record("request_id", request_id.as_str());

        info!(
            request_id = %request_id,
            turn_count = request.contents.len(),
            structured = request.response_format.is_some(),
            has_system_instruction = request.system_instruction.is_some(),
            model = %self.model,
            "Starting Gemini request"
        );

        let body = serde_json::to_string(&build_request(&request))?;
        debug!(request_id = %request_id, "Gemini request: {}", body);

        // Gemini authenticates via query-string key, not a Bearer header
        let url = self.endpoint();
        let response_body = self
            .http
            .execute_request(&request_id, body, |client, body| {
                client
                    .post(&url)
                    .header("Content-Type", "application/json")
                    .body(body)
            })
            .await?;

        let duration_ms = start_time.elapsed().as_millis() as u64;

        let data: GeminiResponse = serde_json::from_str(&response_body)
            .map_err(|e| anyhow!("Failed to parse Gemini response: {}", e))?;

        if let Some(error) = data.error.as_ref() {
            return Err(anyhow!("Gemini error: {}", error.message));
        }

        if let Some(reason) = data
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            warn!(request_id = %request_id, block_reason = %reason, "Gemini blocked the prompt");
        }

        let text = first_candidate_text(&data);
        if text.is_none() {
            warn!(
                request_id = %request_id,
                finish_reason = first_finish_reason(&data).unwrap_or("unknown"),
                "Gemini returned no text"
            );
        }

        let usage = data.usage_metadata.map(|u| Usage {
            prompt_tokens: u.prompt_token_count,
            completion_tokens: u.candidates_token_count.unwrap_or(0),
            total_tokens: u.total_token_count,
        });

        if let Some(ref u) = usage {
            crate::llm::logging::log_usage(&request_id, "Gemini", u);
        }

        crate::llm::logging::log_completion(
            &request_id,
            "Gemini",
            duration_ms,
            text.as_ref().map(|t| t.len()).unwrap_or(0),
        );

        Ok(GenerateResult {
            request_id,
            text,
            usage,
            duration_ms,
        })
    }
}
