// src/detector/naming.rs

use crate::scan;
use crate::types::*;

use super::line_context;

/// Pass 7: identifiers that mix case irregularly. Functions are expected to
/// be lowerCamelCase, resources and events UpperCamelCase.
pub fn run(code: &str, _contract_type: &ContractType) -> Vec<DetectedError> {
    let mut errors = Vec::new();

    for func in scan::functions(code) {
        if irregular_lower_camel(&func.name) {
            errors.push(naming_error(code, func.offset, "Function", &func.name, "lowerCamelCase"));
        }
    }
    for resource in scan::resources(code) {
        if irregular_upper_camel(&resource.name) {
            errors.push(naming_error(code, resource.offset, "Resource", &resource.name, "UpperCamelCase"));
        }
    }
    for event in scan::events(code) {
        if irregular_upper_camel(&event.name) {
            errors.push(naming_error(code, event.offset, "Event", &event.name, "UpperCamelCase"));
        }
    }

    errors
}

fn irregular_lower_camel(name: &str) -> bool {
    name.contains('_') || name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

fn irregular_upper_camel(name: &str) -> bool {
    name.contains('_') || name.chars().next().is_some_and(|c| c.is_ascii_lowercase())
}

fn naming_error(
    code: &str,
    offset: usize,
    kind: &str,
    name: &str,
    convention: &str,
) -> DetectedError {
    DetectedError {
        id: String::new(),
        error_type: ErrorType::PoorNamingConvention,
        category: ErrorCategory::BestPractices,
        severity: Severity::Info,
        location: scan::location_at(code, offset),
        message: format!("{} '{}' does not follow {}", kind, name, convention),
        description: "Mixed naming styles make generated code harder to review.".to_string(),
        suggested_fix: format!("Rename '{}' to {}", name, convention),
        auto_fixable: false,
        confidence: 70,
        context: line_context(code, offset),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_case_function_flagged() {
        let code = "access(all) fun get_value(): Int {\n    return 1\n}\n";
        let errors = run(code, &ContractType::generic());

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].error_type, ErrorType::PoorNamingConvention);
        assert_eq!(errors[0].severity, Severity::Info);
        assert_eq!(errors[0].confidence, 70);
    }

    #[test]
    fn test_lowercase_resource_flagged() {
        let code = "access(all) resource vault {\n    init() {}\n    destroy() {}\n}\n";
        let errors = run(code, &ContractType::generic());
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_conventional_names_are_clean() {
        let code = "access(all) resource Vault {\n    init() {}\n}\naccess(all) fun getBalance(): Int {\n    return 0\n}\n";
        assert!(run(code, &ContractType::generic()).is_empty());
    }
}
