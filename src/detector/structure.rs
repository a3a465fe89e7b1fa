// src/detector/structure.rs

use crate::rules;
use crate::scan;
use crate::types::*;

use super::line_context;

/// Pass 2: contract declaration, initializer, and category-required imports.
pub fn run(code: &str, contract_type: &ContractType) -> Vec<DetectedError> {
    let mut errors = Vec::new();

    if scan::contract_declaration(code).is_none() {
        errors.push(DetectedError {
            id: String::new(),
            error_type: ErrorType::MissingContractDeclaration,
            category: ErrorCategory::Structural,
            severity: Severity::Critical,
            location: CodeLocation { line: 1, column: 0 },
            message: "No contract declaration found".to_string(),
            description: "Every Cadence file deployed on its own must declare a contract."
                .to_string(),
            suggested_fix: "Wrap the code in 'access(all) contract <Name> { ... }'".to_string(),
            auto_fixable: false,
            confidence: 100,
            context: line_context(code, 0),
        });
    }

    if !scan::has_init(code) {
        errors.push(DetectedError {
            id: String::new(),
            error_type: ErrorType::MissingInitFunction,
            category: ErrorCategory::Structural,
            severity: Severity::Critical,
            location: scan::contract_declaration(code)
                .map(|(_, offset)| scan::location_at(code, offset))
                .unwrap_or(CodeLocation { line: 1, column: 0 }),
            message: "Contract has no init() function".to_string(),
            description: "Contracts without an initializer cannot set up their stored state."
                .to_string(),
            suggested_fix: "Add an 'init() { }' block to the contract body".to_string(),
            auto_fixable: true,
            confidence: 95,
            context: "init".to_string(),
        });
    }

    if let Some(rules) = rules::rules_for(contract_type.category) {
        let present = scan::imports(code);
        for required in rules.required_imports {
            if !present.iter().any(|i| i == required) {
                errors.push(DetectedError {
                    id: String::new(),
                    error_type: ErrorType::MissingImportStatements,
                    category: ErrorCategory::Structural,
                    severity: Severity::Warning,
                    location: CodeLocation { line: 1, column: 0 },
                    message: format!(
                        "Missing import '{}' expected for a {} contract",
                        required,
                        contract_type.category.as_str()
                    ),
                    description: "Standard-interface imports are expected at the top of the file."
                        .to_string(),
                    suggested_fix: format!("Add 'import {} from <address>'", required),
                    auto_fixable: true,
                    confidence: 80,
                    context: required.to_string(),
                });
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_without_init() {
        let errors = run("access(all) contract Foo { }", &ContractType::generic());

        let err = errors
            .iter()
            .find(|e| e.error_type == ErrorType::MissingInitFunction)
            .expect("missing init finding");
        assert_eq!(err.severity, Severity::Critical);
        assert_eq!(err.confidence, 95);
        assert!(!errors
            .iter()
            .any(|e| e.error_type == ErrorType::MissingContractDeclaration));
    }

    #[test]
    fn test_init_on_declaration_line_is_seen() {
        let errors = run(
            "access(all) contract Foo { init() {} }",
            &ContractType::generic(),
        );
        assert!(!errors
            .iter()
            .any(|e| e.error_type == ErrorType::MissingInitFunction));
    }

    #[test]
    fn test_no_contract_declaration() {
        let errors = run("let x = 1", &ContractType::generic());

        let err = errors
            .iter()
            .find(|e| e.error_type == ErrorType::MissingContractDeclaration)
            .expect("missing contract finding");
        assert_eq!(err.confidence, 100);
        assert_eq!(err.severity, Severity::Critical);
    }

    #[test]
    fn test_missing_required_import_is_warning() {
        let contract_type = ContractType {
            category: ContractCategory::Nft,
            complexity: Complexity::Simple,
            features: vec![],
        };
        let errors = run(
            "access(all) contract Art {\n    init() {}\n}\n",
            &contract_type,
        );

        let err = errors
            .iter()
            .find(|e| e.error_type == ErrorType::MissingImportStatements)
            .expect("missing import finding");
        assert_eq!(err.severity, Severity::Warning);
        assert_eq!(err.context, "NonFungibleToken");
    }

    #[test]
    fn test_complete_skeleton_is_clean() {
        let errors = run(
            "access(all) contract Foo {\n    init() {\n    }\n}\n",
            &ContractType::generic(),
        );
        assert!(errors.is_empty());
    }
}
