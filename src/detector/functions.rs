// src/detector/functions.rs

use crate::rules::{self, INCOMPLETE_MARKERS};
use crate::scan;
use crate::types::*;

use super::line_context;

/// Pass 1: function-level defects plus category-required function coverage.
pub fn run(code: &str, contract_type: &ContractType) -> Vec<DetectedError> {
    let mut errors = Vec::new();
    let functions = scan::functions(code);

    for func in &functions {
        match &func.body {
            None => {
                errors.push(DetectedError {
                    id: String::new(),
                    error_type: ErrorType::MissingFunctionBody,
                    category: ErrorCategory::Structural,
                    severity: Severity::Critical,
                    location: scan::location_at(code, func.offset),
                    message: format!("Function '{}' has no body", func.name),
                    description: "The signature is not followed by an opening brace, so \
                                  the function declares behavior it never provides."
                        .to_string(),
                    suggested_fix: format!(
                        "Add a body to '{}', returning a default value if it declares a return type",
                        func.name
                    ),
                    auto_fixable: true,
                    confidence: 95,
                    context: line_context(code, func.offset),
                });
            }
            Some(body) => {
                if let Some(reason) = incompleteness_reason(func.return_type.as_deref(), body) {
                    errors.push(DetectedError {
                        id: String::new(),
                        error_type: ErrorType::IncompleteFunctionImplementation,
                        category: ErrorCategory::Functional,
                        severity: Severity::Critical,
                        location: scan::location_at(code, func.offset),
                        message: format!("Function '{}' is incomplete: {}", func.name, reason),
                        description: "The body exists but does not implement the declared \
                                      behavior."
                            .to_string(),
                        suggested_fix: format!("Complete the implementation of '{}'", func.name),
                        auto_fixable: false,
                        confidence: 85,
                        context: line_context(code, func.offset),
                    });
                }
            }
        }
    }

    // Category-required functions with no declaration anywhere in the source.
    if let Some(rules) = rules::rules_for(contract_type.category) {
        let declared: Vec<&str> = functions.iter().map(|f| f.name.as_str()).collect();
        let anchor = scan::contract_declaration(code)
            .map(|(_, offset)| scan::location_at(code, offset))
            .unwrap_or(CodeLocation { line: 1, column: 0 });

        for required in rules.required_functions {
            if !declared.contains(required) {
                errors.push(DetectedError {
                    id: String::new(),
                    error_type: ErrorType::MissingRequiredFunction,
                    category: ErrorCategory::Completeness,
                    severity: Severity::Critical,
                    location: anchor,
                    message: format!(
                        "Required function '{}' is missing for a {} contract",
                        required,
                        contract_type.category.as_str()
                    ),
                    description: format!(
                        "{} contracts are expected to declare '{}'",
                        contract_type.category.as_str(),
                        required
                    ),
                    suggested_fix: format!("Declare an 'access(all) fun {}' stub", required),
                    auto_fixable: true,
                    confidence: 90,
                    context: required.to_string(),
                });
            }
        }
    }

    errors
}

fn incompleteness_reason(return_type: Option<&str>, body: &str) -> Option<&'static str> {
    if INCOMPLETE_MARKERS.iter().any(|m| body.contains(m)) {
        return Some("body contains an incompleteness marker");
    }
    if scan::stripped_body(body).is_empty() {
        return Some("body is empty");
    }
    if let Some(rt) = return_type {
        if scan::requires_return(rt) && !scan::has_return_statement(body) {
            return Some("declares a return type but never returns");
        }
    }
    None
}
