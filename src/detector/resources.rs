// src/detector/resources.rs

use crate::scan;
use crate::types::*;

use super::line_context;

/// Pass 3: resource definition and lifecycle defects.
pub fn run(code: &str, _contract_type: &ContractType) -> Vec<DetectedError> {
    let mut errors = Vec::new();

    for resource in scan::resources(code) {
        match &resource.body {
            None => {
                errors.push(DetectedError {
                    id: String::new(),
                    error_type: ErrorType::IncompleteResourceDefinition,
                    category: ErrorCategory::Structural,
                    severity: Severity::Critical,
                    location: scan::location_at(code, resource.offset),
                    message: format!("Resource '{}' has no body", resource.name),
                    description: "The resource declaration is not followed by an opening brace."
                        .to_string(),
                    suggested_fix: format!("Add a body with a destroy() stub to '{}'", resource.name),
                    auto_fixable: true,
                    confidence: 90,
                    context: line_context(code, resource.offset),
                });
            }
            Some(body) => {
                if !scan::has_destructor(body) {
                    errors.push(DetectedError {
                        id: String::new(),
                        error_type: ErrorType::MissingResourceMethods,
                        category: ErrorCategory::Functional,
                        severity: Severity::Warning,
                        location: scan::location_at(code, resource.offset),
                        message: format!("Resource '{}' has no destroy() method", resource.name),
                        description: "Resources own storage; without a destructor nested \
                                      resources cannot be cleaned up."
                            .to_string(),
                        suggested_fix: format!("Add 'destroy() {{ }}' to resource '{}'", resource.name),
                        auto_fixable: true,
                        confidence: 85,
                        context: line_context(code, resource.offset),
                    });
                }
            }
        }
    }

    errors
}
