// src/detector/events.rs

use crate::rules;
use crate::scan;
use crate::types::*;

use super::line_context;

/// Pass 4: category-required event definitions and unemitted events.
pub fn run(code: &str, contract_type: &ContractType) -> Vec<DetectedError> {
    let mut errors = Vec::new();
    let defined = scan::events(code);
    let emitted = scan::emitted_event_names(code);

    if let Some(rules) = rules::rules_for(contract_type.category) {
        for required in rules.required_events {
            if !defined.iter().any(|e| e.name == *required) {
                errors.push(DetectedError {
                    id: String::new(),
                    error_type: ErrorType::MissingEventDefinitions,
                    category: ErrorCategory::Completeness,
                    severity: Severity::Warning,
                    location: CodeLocation { line: 1, column: 0 },
                    message: format!(
                        "Event '{}' expected for a {} contract is not defined",
                        required,
                        contract_type.category.as_str()
                    ),
                    description: "Off-chain consumers rely on standard events to observe \
                                  state changes."
                        .to_string(),
                    suggested_fix: format!("Define 'access(all) event {}(...)'", required),
                    auto_fixable: true,
                    confidence: 85,
                    context: required.to_string(),
                });
            }
        }
    }

    for event in &defined {
        if !emitted.iter().any(|e| e == &event.name) {
            errors.push(DetectedError {
                id: String::new(),
                error_type: ErrorType::MissingEventEmission,
                category: ErrorCategory::BestPractices,
                severity: Severity::Info,
                location: scan::location_at(code, event.offset),
                message: format!("Event '{}' is defined but never emitted", event.name),
                description: "A defined event with no emit statement is dead weight and \
                              suggests a forgotten notification."
                    .to_string(),
                suggested_fix: format!(
                    "Emit '{}' from the operation it describes, or remove it",
                    event.name
                ),
                auto_fixable: false,
                confidence: 75,
                context: line_context(code, event.offset),
            });
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unemitted_event_is_info() {
        let code = "access(all) contract C {\n    access(all) event Minted(id: UInt64)\n    init() {}\n}\n";
        let errors = run(code, &ContractType::generic());

        let err = errors
            .iter()
            .find(|e| e.error_type == ErrorType::MissingEventEmission)
            .expect("unemitted event finding");
        assert_eq!(err.severity, Severity::Info);
        assert_eq!(err.confidence, 75);
        assert!(!err.auto_fixable);
    }

    #[test]
    fn test_required_events_for_dao() {
        let contract_type = ContractType {
            category: ContractCategory::Dao,
            complexity: Complexity::Simple,
            features: vec![],
        };
        let errors = run("access(all) contract Gov { init() {} }", &contract_type);

        let missing: Vec<&str> = errors
            .iter()
            .filter(|e| e.error_type == ErrorType::MissingEventDefinitions)
            .map(|e| e.context.as_str())
            .collect();
        assert!(missing.contains(&"ProposalCreated"));
        assert!(missing.contains(&"VoteCast"));
    }

    #[test]
    fn test_emitted_event_is_clean() {
        let code = "access(all) event Minted(id: UInt64)\naccess(all) fun mint() {\n    emit Minted(id: 1)\n}\n";
        let errors = run(code, &ContractType::generic());
        assert!(errors.is_empty());
    }
}
