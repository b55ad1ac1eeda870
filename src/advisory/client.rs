//! HTTP advisory client
//!
//! Sends the component inventory to an OpenAI-compatible chat-completions
//! endpoint. One request per run, no retries: any transport or status error
//! is returned to the caller as a run-level failure.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::prompts::{build_organize_prompt, ORGANIZE_SYSTEM_PROMPT};
use super::{AdvisoryProvider, AdvisoryRequest};
use crate::config::AdvisoryConfig;
use crate::error::OrganizeError;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

pub struct HttpAdvisor {
    client: Client,
    config: AdvisoryConfig,
}

impl HttpAdvisor {
    pub fn new(config: AdvisoryConfig) -> Result<Self, OrganizeError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| OrganizeError::Advisory(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl AdvisoryProvider for HttpAdvisor {
    async fn propose(&self, request: &AdvisoryRequest) -> Result<String, OrganizeError> {
        let prompt = build_organize_prompt(request).map_err(OrganizeError::Advisory)?;

        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: ORGANIZE_SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt,
                },
            ],
            temperature: 0.1,
        };

        tracing::info!(
            model = %self.config.model,
            components = request.components.len(),
            "Requesting advisory plan"
        );

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| OrganizeError::Advisory(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(OrganizeError::Advisory(format!(
                "API error {}: {}",
                status,
                text.chars().take(500).collect::<String>()
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| OrganizeError::Advisory(format!("Failed to parse response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| OrganizeError::Advisory("No choices in response".to_string()))
    }
}
