// src/orchestrator/prompts.rs
//
// Prompt construction with escalating strictness. Tier 0 is the plain
// request; each retry raises the tier, bounded at 3.

use crate::rules;
use crate::types::*;
use std::time::Duration;

pub const MAX_STRICTNESS: u8 = 3;

const TEMPERATURES: [f64; 4] = [0.7, 0.5, 0.3, 0.2];
const TIMEOUTS_SECS: [u64; 4] = [30, 20, 15, 10];

/// Temperature for a 1-based attempt number; later attempts run colder.
pub fn temperature_for_attempt(attempt: u8) -> f64 {
    let idx = (attempt.max(1) as usize - 1).min(TEMPERATURES.len() - 1);
    TEMPERATURES[idx]
}

/// Per-attempt generation timeout; later attempts get less time.
pub fn timeout_for_attempt(attempt: u8) -> Duration {
    let idx = (attempt.max(1) as usize - 1).min(TIMEOUTS_SECS.len() - 1);
    Duration::from_secs(TIMEOUTS_SECS[idx])
}

pub fn strictness_for_attempt(attempt: u8, base: u8) -> u8 {
    (base + attempt.saturating_sub(1)).min(MAX_STRICTNESS)
}

pub fn system_prompt(contract_type: &ContractType, strictness: u8) -> String {
    let mut prompt = String::from(
        "You are an expert Cadence smart contract developer. \
         Produce one complete, deployable Cadence contract and nothing else. \
         Use access(all)/access(self) qualifiers, give every function a full body, \
         and include an init() block.",
    );

    if let Some(rules) = rules::rules_for(contract_type.category) {
        if !rules.required_functions.is_empty() {
            prompt.push_str(&format!(
                " The contract is a {} contract and must implement: {}.",
                contract_type.category.as_str(),
                rules.required_functions.join(", ")
            ));
        }
        if !rules.required_events.is_empty() {
            prompt.push_str(&format!(
                " Define and emit these events: {}.",
                rules.required_events.join(", ")
            ));
        }
    }

    if strictness >= 1 {
        prompt.push_str(
            " Do not use the legacy pub/priv keywords. Do not leave TODO or FIXME \
             markers anywhere.",
        );
    }
    if strictness >= 2 {
        prompt.push_str(
            " Never write the word 'undefined'. Every function that declares a return \
             type must contain a return statement. Guard value-moving functions with \
             pre-condition blocks.",
        );
    }
    if strictness >= 3 {
        prompt.push_str(
            " This is the final attempt: output only raw Cadence source with no \
             markdown fences, no commentary, and no placeholders of any kind. \
             Prefer simple, obviously-correct logic over features.",
        );
    }

    prompt
}

/// The user prompt carries the original request plus feedback distilled from
/// failed attempts.
pub fn user_prompt(context: &GenerationContext) -> String {
    let mut prompt = context.user_prompt.clone();

    if !context.previous_attempts.is_empty() {
        prompt.push_str("\n\nPrevious attempts failed validation. Avoid these problems:");
        for pattern in &context.previous_attempts {
            for cause in &pattern.common_causes {
                prompt.push_str(&format!("\n- {}", cause));
            }
            for solution in &pattern.suggested_solutions {
                prompt.push_str(&format!("\n  Fix: {}", solution));
            }
        }
    }

    prompt
}

pub fn refine_system_prompt(strictness: u8) -> String {
    let mut prompt = String::from(
        "You are an expert Cadence smart contract developer. Improve the contract \
         the user provides according to their instructions. Keep it a single \
         complete, deployable contract; never remove working functionality.",
    );
    if strictness >= 2 {
        prompt.push_str(
            " Do not use pub/priv keywords, never write 'undefined', and do not \
             leave TODO markers.",
        );
    }
    if strictness >= 3 {
        prompt.push_str(" Output only raw Cadence source, no markdown fences.");
    }
    prompt
}

pub fn refine_user_prompt(original: &str, instructions: &str) -> String {
    format!(
        "Refine this Cadence contract.\n\nInstructions: {}\n\nContract:\n{}",
        instructions, original
    )
}

pub fn explain_user_prompt(code: &str) -> String {
    format!(
        "Explain what this Cadence contract does, its resources, events, and any \
         risks, in plain language:\n\n{}",
        code
    )
}

/// Generators often wrap output in markdown fences despite instructions.
pub fn strip_code_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_string();
    }

    let mut lines: Vec<&str> = trimmed.lines().collect();
    if !lines.is_empty() {
        lines.remove(0);
    }
    if lines.last().map(|l| l.trim().starts_with("```")).unwrap_or(false) {
        lines.pop();
    }
    lines.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_and_timeout_shrink() {
        assert!(temperature_for_attempt(1) > temperature_for_attempt(4));
        assert!(timeout_for_attempt(1) > timeout_for_attempt(4));
        // Past the schedule the last entry holds.
        assert_eq!(temperature_for_attempt(9), temperature_for_attempt(4));
    }

    #[test]
    fn test_strictness_is_bounded() {
        assert_eq!(strictness_for_attempt(1, 0), 0);
        assert_eq!(strictness_for_attempt(3, 0), 2);
        assert_eq!(strictness_for_attempt(9, 0), MAX_STRICTNESS);
        assert_eq!(strictness_for_attempt(2, 2), MAX_STRICTNESS);
    }

    #[test]
    fn test_system_prompt_names_required_functions() {
        let contract_type = ContractType {
            category: ContractCategory::FungibleToken,
            complexity: Complexity::Simple,
            features: vec![],
        };
        let prompt = system_prompt(&contract_type, 0);
        assert!(prompt.contains("mint"));
        assert!(prompt.contains("TokensMinted"));
    }

    #[test]
    fn test_user_prompt_carries_failure_feedback() {
        let context = GenerationContext {
            user_prompt: "Make a token".to_string(),
            contract_type: ContractType::generic(),
            previous_attempts: vec![FailurePattern {
                kind: FailureKind::UndefinedLiteral,
                common_causes: vec!["placeholder literals in output".to_string()],
                suggested_solutions: vec!["use typed default values".to_string()],
            }],
            quality: QualityRequirements::default(),
            user_experience: UserExperience::default(),
        };
        let prompt = user_prompt(&context);
        assert!(prompt.contains("placeholder literals"));
        assert!(prompt.contains("typed default values"));
    }

    #[test]
    fn test_strip_code_fences() {
        let fenced = "```cadence\naccess(all) contract C {\n}\n```";
        assert_eq!(strip_code_fences(fenced), "access(all) contract C {\n}");
        assert_eq!(strip_code_fences("plain"), "plain");
    }
}
