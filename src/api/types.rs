use crate::types::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
    /// Explicit category ("nft", "fungible-token", ...); inferred when absent.
    pub contract_type: Option<String>,
    #[serde(default)]
    pub options: GenerateOptions,
}

#[derive(Clone, Debug, Deserialize)]
pub struct GenerateOptions {
    #[serde(default = "default_min_score")]
    pub min_score: u8,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u8,
    #[serde(default = "default_true")]
    pub allow_auto_correction: bool,
    #[serde(default)]
    pub user_experience: UserExperience,
}

fn default_min_score() -> u8 { 80 }
fn default_max_attempts() -> u8 { 4 }
fn default_true() -> bool { true }

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            min_score: 80,
            max_attempts: 4,
            allow_auto_correction: true,
            user_experience: UserExperience::default(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct GenerateResponse {
    pub schema_version: String,
    pub request_id: String,
    pub requested_at: String,
    pub code: String,
    pub validation: ValidationSummary,
    pub rejected: bool,
    pub rejection_reason: Option<String>,
    pub attempts_used: u8,
    pub used_fallback: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DetectRequest {
    pub code: String,
    pub contract_type: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct DetectResponse {
    pub schema_version: String,
    pub request_id: String,
    pub requested_at: String,
    pub detection: ErrorDetectionResult,
    pub completeness: FunctionalCompletenessResult,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CorrectRequest {
    pub code: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct CorrectResponse {
    pub schema_version: String,
    pub request_id: String,
    pub requested_at: String,
    pub result: CorrectionResult,
}

#[derive(Clone, Debug, Deserialize)]
pub struct FallbackRequest {
    pub prompt: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct FallbackResponse {
    pub schema_version: String,
    pub request_id: String,
    pub requested_at: String,
    pub result: FallbackGenerationResult,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RefineRequest {
    pub code: String,
    pub instructions: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ExplainRequest {
    pub code: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct ExplainResponse {
    pub schema_version: String,
    pub request_id: String,
    pub requested_at: String,
    pub explanation: String,
}
