// src/detector/completeness.rs

use crate::rules::INCOMPLETE_MARKERS;
use crate::scan;
use crate::types::*;

use super::line_context;

/// Pass 6: incompleteness markers anywhere in the source and empty function
/// bodies.
pub fn run(code: &str, _contract_type: &ContractType) -> Vec<DetectedError> {
    let mut errors = Vec::new();

    for marker in INCOMPLETE_MARKERS {
        for (offset, _) in code.match_indices(marker) {
            errors.push(DetectedError {
                id: String::new(),
                error_type: ErrorType::IncompleteImplementation,
                category: ErrorCategory::Completeness,
                severity: Severity::Warning,
                location: scan::location_at(code, offset),
                message: format!("Incompleteness marker '{}' left in source", marker),
                description: "The generator marked a hole instead of producing logic."
                    .to_string(),
                suggested_fix: "Replace the marker with a real implementation".to_string(),
                auto_fixable: false,
                confidence: 100,
                context: line_context(code, offset),
            });
        }
    }

    // Placeholder literals leaking from the generator.
    for (offset, _) in code.match_indices("undefined") {
        errors.push(DetectedError {
            id: String::new(),
            error_type: ErrorType::UndefinedValue,
            category: ErrorCategory::Completeness,
            severity: Severity::Warning,
            location: scan::location_at(code, offset),
            message: "Placeholder literal 'undefined' left in source".to_string(),
            description: "'undefined' is not a Cadence value; the generator left a hole."
                .to_string(),
            suggested_fix: "Replace 'undefined' with a type-appropriate default literal"
                .to_string(),
            auto_fixable: true,
            confidence: 90,
            context: line_context(code, offset),
        });
    }

    for func in scan::functions(code) {
        if let Some(body) = &func.body {
            if scan::stripped_body(body).is_empty() {
                errors.push(DetectedError {
                    id: String::new(),
                    error_type: ErrorType::IncompleteImplementation,
                    category: ErrorCategory::Completeness,
                    severity: Severity::Critical,
                    location: scan::location_at(code, func.offset),
                    message: format!("Function '{}' has an empty body", func.name),
                    description: "An empty body silently does nothing when called.".to_string(),
                    suggested_fix: format!("Implement '{}' or remove it", func.name),
                    auto_fixable: false,
                    confidence: 95,
                    context: line_context(code, func.offset),
                });
            }
        }
    }

    errors
}
