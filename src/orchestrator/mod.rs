// src/orchestrator/mod.rs
//
// Generation Orchestrator. The only component allowed to retry or fall back:
// Requesting -> Validating -> {Accepted, Correcting, Retrying, Fallback}.
// Attempt count is bounded, strictness escalates, temperature and timeout
// shrink, and the terminal fallback guarantees a syntactically valid result.

pub mod failure;
pub mod prompts;

use crate::completeness::validate_functional_completeness;
use crate::correction::correct_code;
use crate::detector::detect_errors;
use crate::fallback::{generate_fallback_contract, infer_contract_type};
use crate::providers::CodeGenerator;
use crate::scoring::{aggregate_quality, build_validation_records};
use crate::telemetry::Telemetry;
use crate::types::*;

/// The orchestrator's control state for one attempt cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerationState {
    Requesting { attempt: u8 },
    Validating { attempt: u8 },
    Accepted,
    Correcting { attempt: u8 },
    Retrying { attempt: u8 },
    Fallback,
}

#[derive(Clone, Debug)]
pub struct GenerationOptions {
    pub prompt: String,
    /// Explicit category; inferred from the prompt when absent.
    pub contract_type: Option<String>,
    pub quality: QualityRequirements,
    pub user_experience: UserExperience,
}

impl GenerationOptions {
    pub fn new(prompt: &str) -> Self {
        Self {
            prompt: prompt.to_string(),
            contract_type: None,
            quality: QualityRequirements::default(),
            user_experience: UserExperience::default(),
        }
    }
}

/// Never raises: exhausting every attempt (or the generator failing outright
/// on each) ends in the fallback path, which always produces a contract.
pub async fn generate_code_with_validation<G: CodeGenerator>(
    options: &GenerationOptions,
    generator: &G,
    telemetry: &Telemetry,
) -> QualityAssuredResult {
    let request_id = uuid::Uuid::new_v4().to_string();

    let contract_type = match &options.contract_type {
        Some(s) => ContractType {
            category: ContractCategory::parse(s),
            complexity: Complexity::Simple,
            features: Vec::new(),
        },
        None => infer_contract_type(&options.prompt),
    };

    let mut context = GenerationContext {
        user_prompt: options.prompt.clone(),
        contract_type,
        previous_attempts: Vec::new(),
        quality: options.quality,
        user_experience: options.user_experience,
    };

    let max_attempts = context.quality.max_attempts.clamp(1, 4);
    let mut state;

    for attempt in 1..=max_attempts {
        state = GenerationState::Requesting { attempt };
        telemetry.record(&request_id, "requesting", attempt, None, generator.generator_name());
        tracing::info!(%request_id, attempt, ?state, "requesting generation");

        let strictness = prompts::strictness_for_attempt(attempt, 0);
        let system = prompts::system_prompt(&context.contract_type, strictness);
        let user = prompts::user_prompt(&context);

        let raw = match generator
            .generate(
                &system,
                &user,
                prompts::temperature_for_attempt(attempt),
                prompts::timeout_for_attempt(attempt),
            )
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                telemetry.record(&request_id, "generation-error", attempt, None, &e.to_string());
                tracing::warn!(%request_id, attempt, error = %e, "generation attempt failed");
                continue;
            }
        };

        let code = prompts::strip_code_fences(&raw);

        state = GenerationState::Validating { attempt };
        tracing::debug!(%request_id, ?state, "validating generated code");
        let (summary, rejection) = validate(&code, &context.contract_type);
        telemetry.record(&request_id, "validating", attempt, Some(summary.score), "");

        if summary.passed && rejection.is_none() && summary.score >= context.quality.min_score {
            state = GenerationState::Accepted;
            telemetry.record(&request_id, "accepted", attempt, Some(summary.score), "");
            tracing::info!(%request_id, attempt, score = summary.score, ?state, "accepted");
            return QualityAssuredResult {
                code,
                validation: summary,
                rejected: false,
                rejection_reason: None,
                attempts_used: attempt,
                used_fallback: false,
            };
        }

        // Deterministic auto-correction before burning another attempt.
        let fixable = summary.errors.iter().any(|e| e.auto_fixable);
        if context.quality.allow_auto_correction && fixable {
            state = GenerationState::Correcting { attempt };
            let correction = correct_code(&code);
            if correction.success && !correction.corrections_applied.is_empty() {
                let (corrected_summary, corrected_rejection) =
                    validate(&correction.corrected_code, &context.contract_type);
                telemetry.record(
                    &request_id,
                    "corrected",
                    attempt,
                    Some(corrected_summary.score),
                    &correction.corrections_applied.join("; "),
                );
                if corrected_summary.passed
                    && corrected_rejection.is_none()
                    && corrected_summary.score >= context.quality.min_score
                {
                    tracing::info!(%request_id, attempt, ?state, "accepted after auto-correction");
                    return QualityAssuredResult {
                        code: correction.corrected_code,
                        validation: corrected_summary,
                        rejected: false,
                        rejection_reason: None,
                        attempts_used: attempt,
                        used_fallback: false,
                    };
                }
            }
        }

        state = GenerationState::Retrying { attempt };
        let patterns =
            failure::derive_failure_patterns(&code, &summary.errors, rejection.as_deref());
        telemetry.record(
            &request_id,
            "retrying",
            attempt,
            Some(summary.score),
            rejection.as_deref().unwrap_or("validation failed"),
        );
        tracing::info!(%request_id, attempt, patterns = patterns.len(), ?state, "retrying");
        context.previous_attempts.extend(patterns);
    }

    state = GenerationState::Fallback;
    telemetry.record(&request_id, "fallback", max_attempts, None, "attempts exhausted");
    tracing::warn!(%request_id, ?state, "all attempts exhausted; serving fallback");

    let fallback = generate_fallback_contract(&options.prompt, Some(&context));
    let (summary, _) = validate(&fallback.code, &context.contract_type);

    QualityAssuredResult {
        code: fallback.code,
        validation: summary,
        rejected: false,
        rejection_reason: None,
        attempts_used: max_attempts,
        used_fallback: true,
    }
}

/// Refinement must never discard working user code: on failure the original
/// input comes back unchanged. At most one extra, maximum-strictness retry.
pub async fn refine_code<G: CodeGenerator>(
    original: &str,
    instructions: &str,
    generator: &G,
    telemetry: &Telemetry,
) -> QualityAssuredResult {
    let request_id = uuid::Uuid::new_v4().to_string();
    let contract_type = detect_errors(original, None).contract_type;
    let (baseline, _) = validate(original, &contract_type);

    for attempt in 1..=2u8 {
        // Refinement starts strict (tier 2) and tops out immediately.
        let strictness = prompts::strictness_for_attempt(attempt, 2);
        let system = prompts::refine_system_prompt(strictness);
        let user = prompts::refine_user_prompt(original, instructions);

        let raw = match generator
            .generate(
                &system,
                &user,
                prompts::temperature_for_attempt(attempt + 1),
                prompts::timeout_for_attempt(attempt),
            )
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                telemetry.record(&request_id, "refine-error", attempt, None, &e.to_string());
                continue;
            }
        };

        let code = prompts::strip_code_fences(&raw);
        let (summary, rejection) = validate(&code, &contract_type);
        telemetry.record(&request_id, "refine-validating", attempt, Some(summary.score), "");

        if summary.passed && rejection.is_none() && summary.score >= baseline.score {
            telemetry.record(&request_id, "refine-accepted", attempt, Some(summary.score), "");
            return QualityAssuredResult {
                code,
                validation: summary,
                rejected: false,
                rejection_reason: None,
                attempts_used: attempt,
                used_fallback: false,
            };
        }
    }

    telemetry.record(&request_id, "refine-fallback", 2, Some(baseline.score), "returning original");
    QualityAssuredResult {
        code: original.to_string(),
        validation: baseline,
        rejected: false,
        rejection_reason: Some("refinement did not improve the contract; original kept".to_string()),
        attempts_used: 2,
        used_fallback: false,
    }
}

/// Explanation degrades to a findings-derived summary when the generator
/// fails; it never raises.
pub async fn explain_code<G: CodeGenerator>(
    code: &str,
    generator: &G,
    telemetry: &Telemetry,
) -> String {
    let request_id = uuid::Uuid::new_v4().to_string();

    match generator
        .generate(
            "You are an expert Cadence smart contract reviewer.",
            &prompts::explain_user_prompt(code),
            prompts::temperature_for_attempt(2),
            prompts::timeout_for_attempt(1),
        )
        .await
    {
        Ok(text) if !text.trim().is_empty() => text,
        _ => {
            telemetry.record(&request_id, "explain-fallback", 1, None, "derived from findings");
            derived_explanation(code)
        }
    }
}

fn derived_explanation(code: &str) -> String {
    let detection = detect_errors(code, None);
    let completeness = validate_functional_completeness(code, &detection.contract_type);

    let mut out = format!(
        "This {} contract scored {}/100 on completeness.",
        detection.contract_type.category.as_str(),
        detection.completeness_score
    );
    if !completeness.events.defined_events.is_empty() {
        out.push_str(&format!(
            " It defines the events: {}.",
            completeness.events.defined_events.join(", ")
        ));
    }
    if detection.errors.is_empty() {
        out.push_str(" No structural issues were detected.");
    } else {
        out.push_str(&format!(
            " {} issue(s) were detected; the most important: {}",
            detection.errors.len(),
            detection.errors[0].message
        ));
    }
    out
}

/// Shared validation step: detector plus completeness validator reduced by
/// the score calculator, with the forbidden-token rejection check.
fn validate(code: &str, contract_type: &ContractType) -> (ValidationSummary, Option<String>) {
    let rejection = failure::rejection_reason(code);
    let detection = detect_errors(code, Some(contract_type.category.as_str()));
    let completeness = validate_functional_completeness(code, contract_type);
    let records = build_validation_records(&detection, &completeness);
    let quality = aggregate_quality(&records, &detection.errors);

    let summary = ValidationSummary {
        score: quality.score,
        passed: quality.passed && rejection.is_none(),
        results: records,
        errors: detection.errors,
    };
    (summary, rejection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::MockGenerator;

    const GOOD_CONTRACT: &str = r#"access(all) contract Counter {

    access(all) event CountChanged(value: Int)

    access(all) var count: Int

    access(all) fun increment(): Int {
        self.count = self.count + 1
        emit CountChanged(value: self.count)
        return self.count
    }

    init() {
        self.count = 0
    }
}
"#;

    #[tokio::test]
    async fn test_good_first_attempt_is_accepted() {
        let generator = MockGenerator::new("mock").with_response(GOOD_CONTRACT);
        let telemetry = Telemetry::new();
        let options = GenerationOptions::new("Create a counter utility contract");

        let result = generate_code_with_validation(&options, &generator, &telemetry).await;

        assert!(!result.rejected);
        assert!(!result.used_fallback);
        assert_eq!(result.attempts_used, 1);
        assert!(result.validation.score >= 80);
        assert_eq!(generator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_fenced_output_is_stripped_then_accepted() {
        let fenced = format!("```cadence\n{}\n```", GOOD_CONTRACT);
        let generator = MockGenerator::new("mock").with_response(&fenced);
        let telemetry = Telemetry::new();
        let options = GenerationOptions::new("Create a counter utility contract");

        let result = generate_code_with_validation(&options, &generator, &telemetry).await;

        assert!(!result.used_fallback);
        assert!(!result.code.contains("```"));
    }

    #[tokio::test]
    async fn test_all_failures_end_in_fallback_not_panic() {
        let generator = MockGenerator::new("mock").with_failure();
        let telemetry = Telemetry::new();
        let options = GenerationOptions::new("Create an NFT contract");

        let result = generate_code_with_validation(&options, &generator, &telemetry).await;

        assert!(!result.rejected);
        assert!(result.used_fallback);
        assert!(!result.code.is_empty());
        assert_eq!(generator.call_count(), 4);
    }

    #[tokio::test]
    async fn test_bad_output_retries_with_escalation() {
        // Legacy syntax is rejected outright on every attempt; the mock keeps
        // serving it, so the orchestrator must exhaust the budget and fall
        // back to a template.
        let bad = "pub contract Old {\n    init() {\n    }\n}\n";
        let generator = MockGenerator::new("mock").with_response(bad);
        let telemetry = Telemetry::new();
        let options = GenerationOptions::new("Create a simple token contract");

        let result = generate_code_with_validation(&options, &generator, &telemetry).await;

        assert!(result.used_fallback);
        assert_eq!(generator.call_count(), 4);
        assert!(!result.code.contains("pub contract"));
    }

    #[tokio::test]
    async fn test_auto_correction_rescues_fixable_output() {
        // Unqualified function and a missing init are both mechanical fixes.
        let fixable = "access(all) contract Tally {\n    fun bump(): Int {\n        self.n = self.n + 1\n        return self.n\n    }\n}\n";
        let generator = MockGenerator::new("mock").with_response(fixable);
        let telemetry = Telemetry::new();
        let options = GenerationOptions::new("Create a tally utility");

        let result = generate_code_with_validation(&options, &generator, &telemetry).await;

        assert!(!result.used_fallback);
        assert_eq!(result.attempts_used, 1);
        assert!(result.code.contains("access(all) fun bump"));
        assert!(result.code.contains("init()"));
    }

    #[tokio::test]
    async fn test_refine_returns_original_on_failure() {
        let generator = MockGenerator::new("mock").with_failure();
        let telemetry = Telemetry::new();

        let result = refine_code(GOOD_CONTRACT, "add comments", &generator, &telemetry).await;

        assert_eq!(result.code, GOOD_CONTRACT);
        assert!(!result.rejected);
        assert!(result.rejection_reason.is_some());
    }

    #[tokio::test]
    async fn test_refine_rejects_regression() {
        // The "refined" output drops the init block; the original must win.
        let worse = "access(all) contract Counter {\n    access(all) fun increment(): Int {\n        return 1\n    }\n}\n";
        let generator = MockGenerator::new("mock").with_response(worse);
        let telemetry = Telemetry::new();

        let result = refine_code(GOOD_CONTRACT, "simplify it", &generator, &telemetry).await;

        assert_eq!(result.code, GOOD_CONTRACT);
    }

    #[tokio::test]
    async fn test_explain_degrades_to_findings_summary() {
        let generator = MockGenerator::new("mock").with_failure();
        let telemetry = Telemetry::new();

        let text = explain_code(GOOD_CONTRACT, &generator, &telemetry).await;

        assert!(text.contains("utility") || text.contains("generic"));
        assert!(text.contains("100"));
    }

    #[tokio::test]
    async fn test_telemetry_records_attempt_trail() {
        let generator = MockGenerator::new("mock").with_response(GOOD_CONTRACT);
        let telemetry = Telemetry::new();
        let options = GenerationOptions::new("counter");

        let _ = generate_code_with_validation(&options, &generator, &telemetry).await;

        let stages: Vec<String> = telemetry
            .snapshot()
            .into_iter()
            .map(|e| e.stage)
            .collect();
        assert!(stages.contains(&"requesting".to_string()));
        assert!(stages.contains(&"accepted".to_string()));
    }
}
