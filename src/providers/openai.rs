// src/providers/openai.rs
//
// OpenAI-compatible chat-completions generator. Works against any endpoint
// speaking the same wire format.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::{CodeGenerator, GeneratorError};

pub struct OpenAiGenerator {
    api_key: String,
    base_url: String,
    model: String,
    /// Internal transport retries per generate() call, independent of the
    /// orchestrator's attempt budget.
    transport_retries: u8,
}

impl OpenAiGenerator {
    pub fn new(api_key: String, model: &str) -> Self {
        Self {
            api_key,
            base_url: "https://api.openai.com/v1".to_string(),
            model: model.to_string(),
            transport_retries: 1,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    async fn completion_call(
        &self,
        system: &str,
        user: &str,
        temperature: f64,
        timeout: Duration,
    ) -> Result<String, GeneratorError> {
        let request_body = json!({
            "model": self.model,
            "temperature": temperature,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
        });

        let client = reqwest::Client::new();
        let response = client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeneratorError::Timeout
                } else {
                    GeneratorError::Network(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, "generator API error: {}", body);
            return Err(GeneratorError::InvalidResponse);
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| GeneratorError::Network(e.to_string()))?;

        let text = completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(GeneratorError::InvalidResponse)?;

        if text.trim().is_empty() {
            return Err(GeneratorError::Empty);
        }
        Ok(text)
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[async_trait]
impl CodeGenerator for OpenAiGenerator {
    fn generator_name(&self) -> &str {
        "openai-compatible"
    }

    async fn generate(
        &self,
        system: &str,
        user: &str,
        temperature: f64,
        timeout: Duration,
    ) -> Result<String, GeneratorError> {
        let mut last_err = GeneratorError::InvalidResponse;
        for _ in 0..=self.transport_retries {
            match self.completion_call(system, user, temperature, timeout).await {
                Ok(text) => return Ok(text),
                Err(e) => last_err = e,
            }
        }
        Err(last_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore]
    async fn test_generate_against_real_endpoint() {
        let api_key = std::env::var("OPENAI_API_KEY")
            .expect("OPENAI_API_KEY must be set for this test");

        let generator = OpenAiGenerator::new(api_key, "gpt-4o-mini");

        let out = generator
            .generate(
                "You are a Cadence smart contract developer.",
                "Write a minimal Cadence contract named Smoke with an init block.",
                0.2,
                Duration::from_secs(30),
            )
            .await
            .unwrap();

        println!("\n=== Generated ===\n{}", out);
        assert!(out.contains("contract"));
    }
}
