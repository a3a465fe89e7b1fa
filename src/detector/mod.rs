// src/detector/mod.rs
//
// Pattern-based Error Detector. Seven independent passes over raw source
// text, aggregated into one flat finding list in pass order, then classified
// and scored. Detection never propagates a failure to its caller.

pub mod access;
pub mod completeness;
pub mod events;
pub mod functions;
pub mod naming;
pub mod resources;
pub mod structure;

use crate::rules;
use crate::types::*;
use std::panic::{self, AssertUnwindSafe};

/// Trimmed text of the line containing `offset`, used as finding context.
pub(crate) fn line_context(code: &str, offset: usize) -> String {
    let offset = offset.min(code.len());
    let start = code[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let end = code[offset..]
        .find('\n')
        .map(|i| offset + i)
        .unwrap_or(code.len());
    code[start..end].trim().to_string()
}

/// Run all detection passes. When `contract_type` is omitted it is inferred
/// from marker words in the source, defaulting to generic.
pub fn detect_errors(code: &str, contract_type: Option<&str>) -> ErrorDetectionResult {
    let resolved = resolve_contract_type(code, contract_type);

    match panic::catch_unwind(AssertUnwindSafe(|| detect_inner(code, &resolved))) {
        Ok(result) => result,
        Err(_) => {
            tracing::error!("error detection panicked; degrading to manual-review result");
            ErrorDetectionResult {
                errors: Vec::new(),
                classification: ErrorClassification::default(),
                completeness_score: 0,
                recommendations: vec![
                    "Automatic detection failed; manual review of the contract is required."
                        .to_string(),
                ],
                contract_type: resolved,
            }
        }
    }
}

fn resolve_contract_type(code: &str, contract_type: Option<&str>) -> ContractType {
    let category = match contract_type {
        Some(s) => ContractCategory::parse(s),
        None => rules::infer_category_from_code(code),
    };
    ContractType {
        category,
        complexity: Complexity::Simple,
        features: Vec::new(),
    }
}

fn detect_inner(code: &str, contract_type: &ContractType) -> ErrorDetectionResult {
    let mut errors = Vec::new();

    // Pass order is fixed; findings keep this order, not line order.
    errors.extend(functions::run(code, contract_type));
    errors.extend(structure::run(code, contract_type));
    errors.extend(resources::run(code, contract_type));
    errors.extend(events::run(code, contract_type));
    errors.extend(access::run(code, contract_type));
    errors.extend(completeness::run(code, contract_type));
    errors.extend(naming::run(code, contract_type));

    for (i, err) in errors.iter_mut().enumerate() {
        err.id = format!("err-{}", i + 1);
    }

    let classification = ErrorClassification::from_errors(&errors);
    let completeness_score = completeness_score(code, &errors);
    let recommendations = recommendations(&errors);

    ErrorDetectionResult {
        errors,
        classification,
        completeness_score,
        recommendations,
        contract_type: contract_type.clone(),
    }
}

/// Start at 100 and subtract per finding. Category-specific penalties stack
/// on top of the generic severity penalties; the double-counting biases the
/// score conservatively on badly broken input.
fn completeness_score(code: &str, errors: &[DetectedError]) -> u8 {
    if code.trim().is_empty() {
        return 0;
    }

    let mut score: i64 = 100;
    for err in errors {
        match err.severity {
            Severity::Critical => score -= 25,
            Severity::Warning => score -= 10,
            Severity::Info => {}
        }
        match err.category {
            ErrorCategory::Structural => score -= 15,
            ErrorCategory::Completeness => score -= 12,
            _ => {}
        }
        if matches!(
            err.error_type,
            ErrorType::MissingRequiredFunction | ErrorType::MissingEventDefinitions
        ) {
            score -= 20;
        }
    }
    score.clamp(0, 100) as u8
}

/// At most one recommendation per distinct error type present.
fn recommendations(errors: &[DetectedError]) -> Vec<String> {
    let mut seen: Vec<ErrorType> = Vec::new();
    let mut out = Vec::new();

    for err in errors {
        if seen.contains(&err.error_type) {
            continue;
        }
        seen.push(err.error_type);
        out.push(recommendation_for(err.error_type).to_string());
    }

    out
}

fn recommendation_for(error_type: ErrorType) -> &'static str {
    match error_type {
        ErrorType::MissingFunctionBody => {
            "Give every declared function a body; bodiless signatures will not deploy."
        }
        ErrorType::IncompleteFunctionImplementation => {
            "Finish partially implemented functions, including return statements for declared return types."
        }
        ErrorType::MissingRequiredFunction => {
            "Add the standard functions expected for this contract category."
        }
        ErrorType::MissingReturnStatement => {
            "Return a value from every function that declares a return type."
        }
        ErrorType::MissingContractDeclaration => {
            "Declare a top-level contract; loose declarations cannot be deployed."
        }
        ErrorType::MissingInitFunction => {
            "Add an init() block so the contract can set up its stored state."
        }
        ErrorType::MissingImportStatements => {
            "Import the standard interfaces this contract category builds on."
        }
        ErrorType::IncompleteResourceDefinition => {
            "Give every resource declaration a body."
        }
        ErrorType::MissingResourceMethods => {
            "Add destroy() methods so resources can be cleaned up."
        }
        ErrorType::MissingEventDefinitions => {
            "Define the standard events expected for this contract category."
        }
        ErrorType::MissingEventEmission => {
            "Emit every defined event from the operation it describes, or remove it."
        }
        ErrorType::MissingAccessModifiers => {
            "State an access qualifier on every function instead of relying on defaults."
        }
        ErrorType::IncompleteImplementation => {
            "Replace placeholder markers and empty bodies with real logic."
        }
        ErrorType::PoorNamingConvention => {
            "Use lowerCamelCase for functions and UpperCamelCase for types and events."
        }
        ErrorType::UndefinedValue => {
            "Replace placeholder literals with concrete typed values."
        }
        ErrorType::LegacySyntax => {
            "Replace legacy pub/priv qualifiers with access(...) syntax."
        }
        ErrorType::UnbalancedBraces => {
            "Balance braces, parentheses, and brackets before anything else."
        }
        ErrorType::EmptyContractBody => {
            "Put state and functions inside the contract body."
        }
        ErrorType::MissingPrePostConditions => {
            "Guard value-moving functions with pre/post condition blocks."
        }
        ErrorType::InvalidTypeAnnotation => {
            "Fix malformed type annotations."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_scores_zero() {
        let result = detect_errors("", None);
        assert_eq!(result.completeness_score, 0);

        let result = detect_errors("   \n\t", None);
        assert_eq!(result.completeness_score, 0);
    }

    #[test]
    fn test_score_stays_in_range() {
        // Badly broken fungible-token source stacks many penalties.
        let code = "pub contract Broken";
        let result = detect_errors(code, Some("fungible-token"));
        assert!(result.completeness_score <= 100);
        assert!(!result.errors.is_empty());
    }

    #[test]
    fn test_contract_without_init_property() {
        let result = detect_errors("access(all) contract Foo { }", None);

        let err = result
            .errors
            .iter()
            .find(|e| e.error_type == ErrorType::MissingInitFunction)
            .expect("missing init finding");
        assert_eq!(err.severity, Severity::Critical);
        assert_eq!(err.confidence, 95);
        // One critical structural finding: 100 - 25 - 15.
        assert_eq!(result.completeness_score, 60);
    }

    #[test]
    fn test_explicit_type_overrides_inference() {
        let code = "access(all) contract Foo { init() {} }";
        let result = detect_errors(code, Some("dao"));
        assert_eq!(result.contract_type.category, ContractCategory::Dao);
        assert!(result
            .errors
            .iter()
            .any(|e| e.error_type == ErrorType::MissingRequiredFunction));
    }

    #[test]
    fn test_type_inferred_from_marker_word() {
        let code = "import FungibleToken from 0x01\naccess(all) contract T { init() {} }";
        let result = detect_errors(code, None);
        assert_eq!(result.contract_type.category, ContractCategory::FungibleToken);
    }

    #[test]
    fn test_one_recommendation_per_error_type() {
        // Two unqualified functions, one recommendation.
        let code = "fun a() {\n    self.x = 1\n}\nfun b() {\n    self.x = 2\n}\n";
        let result = detect_errors(code, None);

        let access_errors = result
            .errors
            .iter()
            .filter(|e| e.error_type == ErrorType::MissingAccessModifiers)
            .count();
        assert_eq!(access_errors, 2);

        let access_recs = result
            .recommendations
            .iter()
            .filter(|r| r.contains("access qualifier"))
            .count();
        assert_eq!(access_recs, 1);
    }

    #[test]
    fn test_ids_are_sequential_and_unique() {
        let result = detect_errors("fun a()\nfun b()\n", None);
        let ids: Vec<&str> = result.errors.iter().map(|e| e.id.as_str()).collect();
        let mut deduped = ids.clone();
        deduped.dedup();
        assert_eq!(ids.len(), deduped.len());
        assert!(ids.contains(&"err-1"));
    }

    #[test]
    fn test_clean_contract_scores_high() {
        let code = r#"access(all) contract Counter {

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
        let result = detect_errors(code, None);
        assert_eq!(result.completeness_score, 100, "errors: {:?}", result.errors);
    }
}
