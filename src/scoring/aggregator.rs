// src/scoring/aggregator.rs
//
// Quality Score Calculator: a pure reduction of validation records plus
// detector findings into the single 0-100 number the orchestrator acts on.
// Same input always produces the same output; nothing here has side effects.

use crate::types::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QualityScore {
    pub model: String,
    /// 0-100 aggregate.
    pub score: u8,
    pub passed: bool,
    pub has_critical: bool,
    pub results: Vec<ValidationResult>,
    pub notes: Vec<String>,
}

/// Build the per-dimension validation records from the two analyzers' output.
pub fn build_validation_records(
    detection: &ErrorDetectionResult,
    completeness: &FunctionalCompletenessResult,
) -> Vec<ValidationResult> {
    let mut records = Vec::new();

    // Syntax record: structural findings from the detector.
    let syntax_issues: Vec<ValidationIssue> = detection
        .errors
        .iter()
        .filter(|e| matches!(e.category, ErrorCategory::Structural | ErrorCategory::Syntax))
        .map(issue_from_error)
        .collect();
    records.push(record(
        ValidationType::Syntax,
        syntax_issues,
        dimension_score(detection.completeness_score, &detection.errors, |e| {
            matches!(e.category, ErrorCategory::Structural | ErrorCategory::Syntax)
        }),
    ));

    // Logic record: functional findings.
    let logic_issues: Vec<ValidationIssue> = detection
        .errors
        .iter()
        .filter(|e| matches!(e.category, ErrorCategory::Functional | ErrorCategory::Security))
        .map(issue_from_error)
        .collect();
    records.push(record(
        ValidationType::Logic,
        logic_issues,
        dimension_score(detection.completeness_score, &detection.errors, |e| {
            matches!(e.category, ErrorCategory::Functional | ErrorCategory::Security)
        }),
    ));

    // Completeness record: scored by the completeness validator.
    records.push(record(
        ValidationType::Completeness,
        completeness.issues.clone(),
        completeness.score,
    ));

    // Best-practices record.
    let bp_issues: Vec<ValidationIssue> = detection
        .errors
        .iter()
        .filter(|e| e.category == ErrorCategory::BestPractices)
        .map(issue_from_error)
        .collect();
    records.push(record(
        ValidationType::BestPractices,
        bp_issues,
        dimension_score(detection.completeness_score, &detection.errors, |e| {
            e.category == ErrorCategory::BestPractices
        }),
    ));

    records
}

/// Reduce validation records and findings into one score. Pass requires every
/// record passing and no critical finding.
pub fn aggregate_quality(results: &[ValidationResult], errors: &[DetectedError]) -> QualityScore {
    let score = if results.is_empty() {
        0
    } else {
        let sum: u64 = results.iter().map(|r| r.score as u64).sum();
        (sum as f64 / results.len() as f64).round() as u8
    };

    let has_critical = errors.iter().any(|e| e.severity == Severity::Critical);
    let passed = results.iter().all(|r| r.passed) && !has_critical;

    let mut notes = vec![
        "Aggregate summarizes the validation records; individual findings are the source of truth."
            .to_string(),
    ];
    if has_critical {
        notes.push("Critical findings present; the contract cannot be accepted as-is.".to_string());
    }

    QualityScore {
        model: "mean_of_records_v1".to_string(),
        score,
        passed,
        has_critical,
        results: results.to_vec(),
        notes,
    }
}

fn record(
    validation_type: ValidationType,
    issues: Vec<ValidationIssue>,
    score: u8,
) -> ValidationResult {
    ValidationResult {
        validation_type,
        passed: !issues.iter().any(|i| i.severity == Severity::Critical) && score >= 60,
        issues,
        score,
    }
}

fn issue_from_error(error: &DetectedError) -> ValidationIssue {
    ValidationIssue {
        message: error.message.clone(),
        severity: error.severity,
        location: Some(error.location),
    }
}

/// Per-dimension score: start from the detector's overall completeness score
/// when the dimension is clean, otherwise subtract per matching finding.
fn dimension_score<F: Fn(&DetectedError) -> bool>(
    base: u8,
    errors: &[DetectedError],
    matches: F,
) -> u8 {
    let mut score: i64 = 100;
    let mut any = false;
    for err in errors.iter().filter(|e| matches(e)) {
        any = true;
        score -= match err.severity {
            Severity::Critical => 30,
            Severity::Warning => 15,
            Severity::Info => 5,
        };
    }
    if !any {
        return base.max(60);
    }
    score.clamp(0, 100) as u8
}
