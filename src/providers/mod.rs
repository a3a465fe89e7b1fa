// src/providers/mod.rs

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("generation timed out")]
    Timeout,
    #[error("generator returned an unusable response")]
    InvalidResponse,
    #[error("network error: {0}")]
    Network(String),
    #[error("generator returned empty output")]
    Empty,
}

/// The external text-generation capability. Implementations must honor the
/// caller-imposed timeout and surface failures as errors; retrying and
/// falling back are the orchestrator's job alone.
#[async_trait]
pub trait CodeGenerator: Send + Sync {
    fn generator_name(&self) -> &str;

    async fn generate(
        &self,
        system: &str,
        user: &str,
        temperature: f64,
        timeout: Duration,
    ) -> Result<String, GeneratorError>;
}

// Module declarations
pub mod mocks;
pub mod openai;

// Re-export for testing
pub use mocks::MockGenerator;
pub use openai::OpenAiGenerator;
