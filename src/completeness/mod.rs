// src/completeness/mod.rs
//
// Functional Completeness Validator. Runs its own extraction over the raw
// source rather than sharing state with the Error Detector, so a bug in one
// pattern set cannot silently suppress the other's findings.

use crate::rules::{self, ACTION_EVENT_EXPECTATIONS, CRITICAL_FUNCTIONS, NEEDS_INIT_RESOURCES};
use crate::scan;
use crate::types::*;

/// Weighted 40/30/15/15 into the overall score; zero functions AND zero
/// resources scores 0 outright.
pub fn validate_functional_completeness(
    code: &str,
    contract_type: &ContractType,
) -> FunctionalCompletenessResult {
    let mut issues = Vec::new();

    let functions = analyze_functions(code, contract_type, &mut issues);
    let resources = analyze_resources(code, &mut issues);
    let events = analyze_events(code, &mut issues);
    let access_control = analyze_access(code);

    let score = if functions.total_functions == 0 && resources.total_resources == 0 {
        0
    } else {
        let weighted = 0.40 * functions.completeness_percentage as f64
            + 0.30 * resources.lifecycle_score as f64
            + 0.15 * events.emission_completeness as f64
            + 0.15 * access_control.access_control_score as f64;
        weighted.round() as u8
    };

    FunctionalCompletenessResult {
        is_complete: score >= 80,
        score,
        functions,
        resources,
        events,
        access_control,
        issues,
    }
}

fn analyze_functions(
    code: &str,
    contract_type: &ContractType,
    issues: &mut Vec<ValidationIssue>,
) -> FunctionReport {
    let declared = scan::functions(code);
    let mut complete = 0usize;
    let mut incomplete = Vec::new();

    for func in &declared {
        match incompleteness_reason(code, func) {
            None => complete += 1,
            Some(reason) => {
                incomplete.push(format!("{}: {}", func.name, reason));
                issues.push(ValidationIssue {
                    message: format!("Function '{}' is incomplete: {}", func.name, reason),
                    severity: Severity::Critical,
                    location: Some(scan::location_at(code, func.offset)),
                });
            }
        }
    }

    let mut missing_required = Vec::new();
    if let Some(rules) = rules::rules_for(contract_type.category) {
        let names: Vec<&str> = declared.iter().map(|f| f.name.as_str()).collect();
        for required in rules.required_functions {
            if !names.contains(required) {
                missing_required.push(required.to_string());
                issues.push(ValidationIssue {
                    message: format!(
                        "Required function '{}' is missing for a {} contract",
                        required,
                        contract_type.category.as_str()
                    ),
                    severity: Severity::Critical,
                    location: None,
                });
            }
        }
    }

    let total = declared.len();
    let completeness_percentage = if total == 0 {
        0
    } else {
        ((complete as f64 / total as f64) * 100.0).round() as u8
    };

    FunctionReport {
        total_functions: total,
        complete_functions: complete,
        incomplete_functions: incomplete,
        missing_required_functions: missing_required,
        completeness_percentage,
    }
}

fn incompleteness_reason(code: &str, func: &scan::FunctionDecl) -> Option<&'static str> {
    let body = match &func.body {
        None => return Some("no body"),
        Some(b) => b,
    };
    if body.trim().len() < 3 {
        return Some("body too short");
    }
    if let Some(rt) = &func.return_type {
        if scan::requires_return(rt) && !scan::has_return_statement(body) {
            return Some("missing return statement");
        }
    }
    if CRITICAL_FUNCTIONS.contains(&func.name.as_str())
        && !body.contains("pre {")
        && !body.contains("pre{")
        && !body.contains("post {")
        && !body.contains("post{")
    {
        return Some("critical function without pre/post conditions");
    }
    if !func.has_access_modifier && !func.uses_legacy_modifier {
        return Some("no access qualifier");
    }
    let _ = code;
    None
}

fn analyze_resources(code: &str, issues: &mut Vec<ValidationIssue>) -> ResourceReport {
    let resources = scan::resources(code);
    let mut lifecycle_complete = 0usize;

    for resource in &resources {
        let body = resource.body.as_deref().unwrap_or("");
        let has_init = scan::has_init(body);
        let has_destroy = scan::has_destructor(body);

        if has_init && has_destroy && resource.has_access_modifier {
            lifecycle_complete += 1;
        }

        if NEEDS_INIT_RESOURCES.contains(&resource.name.as_str()) && !has_init {
            issues.push(ValidationIssue {
                message: format!(
                    "Resource '{}' holds state but has no initializer",
                    resource.name
                ),
                severity: Severity::Critical,
                location: Some(scan::location_at(code, resource.offset)),
            });
        }
        if !has_destroy {
            issues.push(ValidationIssue {
                message: format!("Resource '{}' has no destructor", resource.name),
                severity: Severity::Warning,
                location: Some(scan::location_at(code, resource.offset)),
            });
        }
        if !resource.has_access_modifier {
            issues.push(ValidationIssue {
                message: format!("Resource '{}' has no access qualifier", resource.name),
                severity: Severity::Critical,
                location: Some(scan::location_at(code, resource.offset)),
            });
        }
    }

    let total = resources.len();
    // Absence of resources is not a defect.
    let lifecycle_score = if total == 0 {
        100
    } else {
        ((lifecycle_complete as f64 / total as f64) * 100.0).round() as u8
    };

    ResourceReport {
        total_resources: total,
        lifecycle_complete,
        lifecycle_score,
    }
}

fn analyze_events(code: &str, issues: &mut Vec<ValidationIssue>) -> EventReport {
    let defined: Vec<String> = scan::events(code).into_iter().map(|e| e.name).collect();
    let all_emitted = scan::emitted_event_names(code);

    let mut emitted_defined = Vec::new();
    let mut unused = Vec::new();
    for name in &defined {
        if all_emitted.iter().any(|e| e == name) {
            emitted_defined.push(name.clone());
        } else {
            unused.push(name.clone());
            issues.push(ValidationIssue {
                message: format!("Event '{}' is defined but never emitted", name),
                severity: Severity::Info,
                location: None,
            });
        }
    }

    // Action keywords in the source imply an expected event.
    let lowered = code.to_lowercase();
    let mut missing_emissions = Vec::new();
    for (action, expected) in ACTION_EVENT_EXPECTATIONS {
        if !lowered.contains(action) {
            continue;
        }
        let satisfied = expected
            .iter()
            .any(|name| defined.iter().any(|d| d == name) || all_emitted.iter().any(|e| e == name));
        if !satisfied {
            let wanted = expected[0].to_string();
            if !missing_emissions.contains(&wanted) {
                issues.push(ValidationIssue {
                    message: format!(
                        "Source performs '{}' but defines no '{}' event",
                        action, wanted
                    ),
                    severity: Severity::Warning,
                    location: None,
                });
                missing_emissions.push(wanted);
            }
        }
    }

    let emission_completeness = if defined.is_empty() {
        100
    } else {
        ((emitted_defined.len() as f64 / defined.len() as f64) * 100.0).round() as u8
    };

    EventReport {
        defined_events: defined,
        emitted_events: emitted_defined,
        unused_events: unused,
        missing_emissions,
        emission_completeness,
    }
}

fn analyze_access(code: &str) -> AccessReport {
    let functions = scan::functions(code);
    let resources = scan::resources(code);

    let total = functions.len() + resources.len();
    let with_access = functions
        .iter()
        .filter(|f| f.has_access_modifier || f.uses_legacy_modifier)
        .count()
        + resources.iter().filter(|r| r.has_access_modifier).count();

    let access_control_score = if total == 0 {
        100
    } else {
        ((with_access as f64 / total as f64) * 100.0).round() as u8
    };

    AccessReport {
        total_elements: total,
        with_access_modifier: with_access,
        access_control_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ft_type() -> ContractType {
        ContractType {
            category: ContractCategory::FungibleToken,
            complexity: Complexity::Simple,
            features: vec![],
        }
    }

    #[test]
    fn test_empty_input_scores_zero() {
        let result = validate_functional_completeness("", &ContractType::generic());
        assert_eq!(result.score, 0);
        assert!(!result.is_complete);
    }

    #[test]
    fn test_missing_required_trio_reported() {
        let code = r#"access(all) contract Token {
    access(all) fun getBalance(): UFix64 {
        return self.balance
    }
    init() {
        self.balance = 0.0
    }
}
"#;
        let result = validate_functional_completeness(code, &ft_type());

        for name in ["mint", "withdraw", "deposit"] {
            assert!(
                result
                    .functions
                    .missing_required_functions
                    .iter()
                    .any(|m| m == name),
                "expected {} in missing_required_functions",
                name
            );
        }
    }

    #[test]
    fn test_unemitted_event_listed_as_unused() {
        let code = r#"access(all) contract C {
    access(all) event Stale(id: UInt64)
    access(all) event Fresh(id: UInt64)
    access(all) fun poke() {
        emit Fresh(id: 1)
    }
    init() {}
}
"#;
        let result = validate_functional_completeness(code, &ContractType::generic());
        assert!(result.events.unused_events.contains(&"Stale".to_string()));
        assert!(!result.events.emitted_events.contains(&"Stale".to_string()));
        assert!(result.events.emitted_events.contains(&"Fresh".to_string()));
        assert_eq!(result.events.emission_completeness, 50);
    }

    #[test]
    fn test_action_keyword_requires_event() {
        let code = r#"access(all) contract M {
    access(all) fun mint() {
        pre { true: "ok" }
        self.total = self.total + 1
    }
    init() {}
}
"#;
        let result = validate_functional_completeness(code, &ContractType::generic());
        assert!(result
            .events
            .missing_emissions
            .contains(&"Minted".to_string()));
    }

    #[test]
    fn test_critical_function_needs_conditions() {
        let code = r#"access(all) contract V {
    access(all) fun withdraw(): Int {
        return 1
    }
    init() {}
}
"#;
        let result = validate_functional_completeness(code, &ContractType::generic());
        assert!(result
            .functions
            .incomplete_functions
            .iter()
            .any(|f| f.contains("pre/post")));
    }

    #[test]
    fn test_no_resources_scores_resource_section_100() {
        let code = "access(all) fun ping(): Int {\n    return 1\n}\n";
        let result = validate_functional_completeness(code, &ContractType::generic());
        assert_eq!(result.resources.lifecycle_score, 100);
    }

    #[test]
    fn test_complete_contract_passes_threshold() {
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
        let result = validate_functional_completeness(code, &ContractType::generic());
        assert!(result.is_complete, "score was {}", result.score);
        assert_eq!(result.functions.completeness_percentage, 100);
    }

    #[test]
    fn test_resource_lifecycle_scoring() {
        let code = r#"access(all) contract C {
    access(all) resource Whole {
        init() {}
        destroy() {}
    }
    access(all) resource Partial {
        init() {}
    }
    init() {}
}
"#;
        let result = validate_functional_completeness(code, &ContractType::generic());
        assert_eq!(result.resources.total_resources, 2);
        assert_eq!(result.resources.lifecycle_complete, 1);
        assert_eq!(result.resources.lifecycle_score, 50);
    }
}
