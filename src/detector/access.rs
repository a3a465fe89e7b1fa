// src/detector/access.rs

use crate::scan;
use crate::types::*;

use super::line_context;

/// Pass 5: functions declared without a leading access qualifier.
pub fn run(code: &str, _contract_type: &ContractType) -> Vec<DetectedError> {
    let mut errors = Vec::new();

    for func in scan::functions(code) {
        // Legacy `pub` still counts as a qualifier here; the rejection check
        // is what bans it outright.
        if !func.has_access_modifier && !func.uses_legacy_modifier {
            errors.push(DetectedError {
                id: String::new(),
                error_type: ErrorType::MissingAccessModifiers,
                category: ErrorCategory::Security,
                severity: Severity::Warning,
                location: scan::location_at(code, func.offset),
                message: format!("Function '{}' has no access qualifier", func.name),
                description: "An unqualified function leaves its visibility to defaults \
                              instead of stating intent."
                    .to_string(),
                suggested_fix: format!("Prefix '{}' with 'access(all)' or 'access(self)'", func.name),
                auto_fixable: true,
                confidence: 90,
                context: line_context(code, func.offset),
            });
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unqualified_function_flagged() {
        let code = "fun doThing() {\n    self.count = 1\n}\n";
        let errors = run(code, &ContractType::generic());

        assert_eq!(errors.len(), 1);
        let err = &errors[0];
        assert_eq!(err.error_type, ErrorType::MissingAccessModifiers);
        assert_eq!(err.category, ErrorCategory::Security);
        assert!(err.auto_fixable);
        assert_eq!(err.confidence, 90);
    }

    #[test]
    fn test_qualified_function_is_clean() {
        let code = "access(all) fun doThing() {\n    self.count = 1\n}\n";
        assert!(run(code, &ContractType::generic()).is_empty());
    }

    #[test]
    fn test_legacy_pub_not_flagged_here() {
        let code = "pub fun doThing() {\n    self.count = 1\n}\n";
        assert!(run(code, &ContractType::generic()).is_empty());
    }
}
