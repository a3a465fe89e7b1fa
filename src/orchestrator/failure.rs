// src/orchestrator/failure.rs
//
// Rejection check and failure-pattern derivation. The rejection check is a
// fixed forbidden-token list that overrides any score; failure patterns feed
// the next attempt's prompt.

use crate::rules::FORBIDDEN_TOKENS;
use crate::scan;
use crate::types::*;

/// A forbidden token forces rejection regardless of the computed score.
pub fn rejection_reason(code: &str) -> Option<String> {
    for token in FORBIDDEN_TOKENS {
        if code.contains(token) {
            return Some(format!("forbidden token '{}' present in output", token.trim()));
        }
    }
    None
}

/// One pattern per cause category present in the failed attempt.
pub fn derive_failure_patterns(
    code: &str,
    errors: &[DetectedError],
    rejection: Option<&str>,
) -> Vec<FailurePattern> {
    let mut patterns = Vec::new();

    let has = |kinds: &[ErrorType]| errors.iter().any(|e| kinds.contains(&e.error_type));
    let rejected_for = |needle: &str| rejection.map(|r| r.contains(needle)).unwrap_or(false);

    if has(&[ErrorType::UndefinedValue]) || rejected_for("undefined") {
        patterns.push(FailurePattern {
            kind: FailureKind::UndefinedLiteral,
            common_causes: vec!["output contained the placeholder literal 'undefined'".to_string()],
            suggested_solutions: vec![
                "initialize every variable with a concrete typed value".to_string(),
            ],
        });
    }

    if has(&[ErrorType::LegacySyntax]) || rejected_for("pub") || rejected_for("AuthAccount") {
        patterns.push(FailurePattern {
            kind: FailureKind::LegacySyntax,
            common_causes: vec!["output used legacy pub/priv or AuthAccount syntax".to_string()],
            suggested_solutions: vec![
                "use access(all)/access(self) qualifiers and the current account API".to_string(),
            ],
        });
    }

    if has(&[
        ErrorType::MissingFunctionBody,
        ErrorType::IncompleteFunctionImplementation,
        ErrorType::IncompleteImplementation,
        ErrorType::MissingRequiredFunction,
        ErrorType::MissingInitFunction,
    ]) {
        patterns.push(FailurePattern {
            kind: FailureKind::IncompleteLogic,
            common_causes: vec![
                "functions were left without bodies or with placeholder markers".to_string(),
            ],
            suggested_solutions: vec![
                "write complete bodies for every declared function, including init()".to_string(),
            ],
        });
    }

    if !scan::balanced_delimiters(code) || rejected_for("```") {
        patterns.push(FailurePattern {
            kind: FailureKind::SyntaxBrackets,
            common_causes: vec![
                "braces or brackets were unbalanced, or markdown fences leaked into the source"
                    .to_string(),
            ],
            suggested_solutions: vec![
                "emit only raw source text with every opening brace closed".to_string(),
            ],
        });
    }

    if has(&[ErrorType::InvalidTypeAnnotation, ErrorType::MissingReturnStatement]) {
        patterns.push(FailurePattern {
            kind: FailureKind::TypeMismatch,
            common_causes: vec!["declared types did not match the produced values".to_string()],
            suggested_solutions: vec![
                "match every return statement to the declared return type".to_string(),
            ],
        });
    }

    patterns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::detect_errors;

    #[test]
    fn test_undefined_literal_rejects() {
        let reason = rejection_reason("let x = undefined").expect("rejection");
        assert!(reason.contains("undefined"));
    }

    #[test]
    fn test_legacy_syntax_rejects() {
        assert!(rejection_reason("pub fun f() {}").is_some());
        assert!(rejection_reason("access(all) fun f() {}").is_none());
    }

    #[test]
    fn test_markdown_fence_rejects() {
        assert!(rejection_reason("```cadence\naccess(all) contract C {}\n```").is_some());
    }

    #[test]
    fn test_clean_code_has_no_rejection() {
        assert!(rejection_reason("access(all) contract C {\n    init() {\n    }\n}").is_none());
    }

    #[test]
    fn test_patterns_cover_incomplete_logic() {
        let code = "access(all) contract C {\n    access(all) fun f(): Int\n    init() {}\n}\n";
        let detection = detect_errors(code, None);
        let patterns = derive_failure_patterns(code, &detection.errors, None);

        assert!(patterns.iter().any(|p| p.kind == FailureKind::IncompleteLogic));
    }

    #[test]
    fn test_unbalanced_source_yields_bracket_pattern() {
        let code = "access(all) contract C {\n    init() {\n";
        let patterns = derive_failure_patterns(code, &[], None);
        assert!(patterns.iter().any(|p| p.kind == FailureKind::SyntaxBrackets));
    }

    #[test]
    fn test_rejection_reason_feeds_patterns() {
        let patterns =
            derive_failure_patterns("balanced", &[], Some("forbidden token 'undefined' present"));
        assert!(patterns.iter().any(|p| p.kind == FailureKind::UndefinedLiteral));
    }
}
