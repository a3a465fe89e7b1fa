use super::types::*;
use crate::completeness::validate_functional_completeness;
use crate::correction::correct_code;
use crate::detector::detect_errors;
use crate::fallback::generate_fallback_contract;
use crate::orchestrator::{self, GenerationOptions};
use crate::providers::CodeGenerator;
use crate::telemetry::Telemetry;
use crate::types::*;
use std::time::{SystemTime, UNIX_EPOCH};

const SCHEMA_VERSION: &str = "1.0.0";

/// Main API handler: runs the full quality-assured generation pipeline.
pub async fn generate<G: CodeGenerator>(
    request: GenerateRequest,
    generator: &G,
    telemetry: &Telemetry,
) -> GenerateResponse {
    let options = GenerationOptions {
        prompt: request.prompt,
        contract_type: request.contract_type,
        quality: QualityRequirements {
            min_score: request.options.min_score,
            max_attempts: request.options.max_attempts,
            allow_auto_correction: request.options.allow_auto_correction,
        },
        user_experience: request.options.user_experience,
    };

    let result = orchestrator::generate_code_with_validation(&options, generator, telemetry).await;

    GenerateResponse {
        schema_version: SCHEMA_VERSION.to_string(),
        request_id: generate_request_id(),
        requested_at: current_timestamp(),
        code: result.code,
        validation: result.validation,
        rejected: result.rejected,
        rejection_reason: result.rejection_reason,
        attempts_used: result.attempts_used,
        used_fallback: result.used_fallback,
    }
}

/// Analysis-only endpoint: detector plus completeness validator, no generator.
pub fn detect(request: DetectRequest) -> DetectResponse {
    let detection = detect_errors(&request.code, request.contract_type.as_deref());
    let completeness =
        validate_functional_completeness(&request.code, &detection.contract_type);

    DetectResponse {
        schema_version: SCHEMA_VERSION.to_string(),
        request_id: generate_request_id(),
        requested_at: current_timestamp(),
        detection,
        completeness,
    }
}

pub fn correct(request: CorrectRequest) -> CorrectResponse {
    CorrectResponse {
        schema_version: SCHEMA_VERSION.to_string(),
        request_id: generate_request_id(),
        requested_at: current_timestamp(),
        result: correct_code(&request.code),
    }
}

pub fn fallback(request: FallbackRequest) -> FallbackResponse {
    FallbackResponse {
        schema_version: SCHEMA_VERSION.to_string(),
        request_id: generate_request_id(),
        requested_at: current_timestamp(),
        result: generate_fallback_contract(&request.prompt, None),
    }
}

pub async fn refine<G: CodeGenerator>(
    request: RefineRequest,
    generator: &G,
    telemetry: &Telemetry,
) -> GenerateResponse {
    let result =
        orchestrator::refine_code(&request.code, &request.instructions, generator, telemetry)
            .await;

    GenerateResponse {
        schema_version: SCHEMA_VERSION.to_string(),
        request_id: generate_request_id(),
        requested_at: current_timestamp(),
        code: result.code,
        validation: result.validation,
        rejected: result.rejected,
        rejection_reason: result.rejection_reason,
        attempts_used: result.attempts_used,
        used_fallback: result.used_fallback,
    }
}

pub async fn explain<G: CodeGenerator>(
    request: ExplainRequest,
    generator: &G,
    telemetry: &Telemetry,
) -> ExplainResponse {
    ExplainResponse {
        schema_version: SCHEMA_VERSION.to_string(),
        request_id: generate_request_id(),
        requested_at: current_timestamp(),
        explanation: orchestrator::explain_code(&request.code, generator, telemetry).await,
    }
}

fn generate_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn current_timestamp() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    secs.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::MockGenerator;

    #[test]
    fn test_detect_reports_both_analyzers() {
        let response = detect(DetectRequest {
            code: "access(all) contract Foo { }".to_string(),
            contract_type: None,
        });

        assert_eq!(response.schema_version, "1.0.0");
        assert!(!response.detection.errors.is_empty());
        assert!(!response.completeness.is_complete);
    }

    #[test]
    fn test_fallback_endpoint_never_empty() {
        let response = fallback(FallbackRequest {
            prompt: "an NFT collection".to_string(),
        });

        assert!(response.result.success);
        assert!(!response.result.code.is_empty());
    }

    #[tokio::test]
    async fn test_generate_honors_request_options() {
        let generator = MockGenerator::new("mock").with_failure();
        let telemetry = Telemetry::new();
        let request = GenerateRequest {
            prompt: "a token".to_string(),
            contract_type: None,
            options: GenerateOptions {
                max_attempts: 2,
                ..GenerateOptions::default()
            },
        };

        let response = generate(request, &generator, &telemetry).await;

        assert!(response.used_fallback);
        assert_eq!(generator.call_count(), 2);
    }
}
