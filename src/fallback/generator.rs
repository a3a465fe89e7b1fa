// src/fallback/generator.rs
//
// Fallback Generator: maps a free-text request to a category and complexity
// tier, picks the best guaranteed-working template, and customizes it by name
// substitution only. Never synthesizes logic and never raises; any internal
// failure degrades to the emergency contract.

use crate::rules::{self, CATEGORY_RULES};
use crate::scan;
use crate::types::*;
use once_cell::sync::Lazy;
use regex::Regex;
use std::panic::{self, AssertUnwindSafe};

use super::templates::{templates_for, EMERGENCY_CONTRACT};

static NAME_FROM_PROMPT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(?:called|named)\s+"?([A-Za-z][A-Za-z0-9]*)"?"#).expect("name pattern")
});

const DEFAULT_CONTRACT_NAME: &str = "GeneratedContract";

pub fn generate_fallback_contract(
    prompt: &str,
    context: Option<&GenerationContext>,
) -> FallbackGenerationResult {
    match panic::catch_unwind(AssertUnwindSafe(|| generate_inner(prompt, context))) {
        Ok(result) => result,
        Err(_) => {
            tracing::error!("fallback generation panicked; returning emergency contract");
            emergency_result("fallback generation failed internally")
        }
    }
}

fn generate_inner(prompt: &str, context: Option<&GenerationContext>) -> FallbackGenerationResult {
    if prompt.trim().is_empty() {
        return emergency_result("empty request");
    }

    let contract_type = match context {
        Some(ctx) => ctx.contract_type.clone(),
        None => infer_contract_type(prompt),
    };

    let candidates = templates_for(contract_type.category);
    let best = candidates
        .iter()
        .max_by_key(|t| template_score(t, &contract_type, prompt));

    let template = match best {
        Some(t) => t,
        None => return emergency_result("no template available for the detected category"),
    };

    let name = extract_contract_name(prompt);
    let code = customize(&template.code, &name, &template.id);

    FallbackGenerationResult {
        success: true,
        code,
        template_id: Some(template.id.clone()),
        contract_type,
        contract_name: name,
        notes: vec![format!(
            "Served from guaranteed-working template '{}'",
            template.id
        )],
    }
}

fn emergency_result(reason: &str) -> FallbackGenerationResult {
    FallbackGenerationResult {
        success: false,
        code: EMERGENCY_CONTRACT.to_string(),
        template_id: None,
        contract_type: ContractType::generic(),
        contract_name: "EmergencyContract".to_string(),
        notes: vec![format!("Emergency contract served: {}", reason)],
    }
}

/// Category from keyword scoring, complexity from explicit words or prompt
/// size, features from the category's keyword table.
pub fn infer_contract_type(prompt: &str) -> ContractType {
    let lowered = prompt.to_lowercase();

    let mut best_category = ContractCategory::Generic;
    let mut best_hits = 0usize;
    for rules in CATEGORY_RULES.iter() {
        let hits = rules
            .prompt_keywords
            .iter()
            .filter(|k| lowered.contains(*k))
            .count();
        if hits > best_hits {
            best_hits = hits;
            best_category = rules.category;
        }
    }

    let keyword_hits = best_hits;
    let complexity = infer_complexity(&lowered, keyword_hits);

    let features = rules::rules_for(best_category)
        .map(|r| {
            r.feature_keywords
                .iter()
                .filter(|(k, _)| lowered.contains(k))
                .map(|(_, feature)| feature.to_string())
                .collect()
        })
        .unwrap_or_default();

    ContractType {
        category: best_category,
        complexity,
        features,
    }
}

fn infer_complexity(lowered: &str, keyword_hits: usize) -> Complexity {
    const SIMPLE_WORDS: &[&str] = &["simple", "basic", "minimal", "starter"];
    const ADVANCED_WORDS: &[&str] = &["advanced", "complex", "full-featured", "production"];

    if SIMPLE_WORDS.iter().any(|w| lowered.contains(w)) {
        return Complexity::Simple;
    }
    if ADVANCED_WORDS.iter().any(|w| lowered.contains(w)) {
        return Complexity::Advanced;
    }
    if lowered.len() > 200 || keyword_hits >= 4 {
        Complexity::Advanced
    } else if lowered.len() > 80 || keyword_hits >= 2 {
        Complexity::Intermediate
    } else {
        Complexity::Simple
    }
}

/// Complexity exact match +3, adjacent tier +1, each matched feature +2, each
/// matched keyword +1.
fn template_score(template: &FallbackTemplate, wanted: &ContractType, prompt: &str) -> i64 {
    let lowered = prompt.to_lowercase();
    let mut score: i64 = 0;

    let tier = |c: Complexity| match c {
        Complexity::Simple => 0i64,
        Complexity::Intermediate => 1,
        Complexity::Advanced => 2,
    };
    let distance = (tier(template.complexity) - tier(wanted.complexity)).abs();
    score += match distance {
        0 => 3,
        1 => 1,
        _ => 0,
    };

    for feature in &wanted.features {
        if template.contract_type.features.contains(feature) {
            score += 2;
        }
    }
    for keyword in &template.keywords {
        if lowered.contains(keyword.as_str()) {
            score += 1;
        }
    }

    score
}

fn extract_contract_name(prompt: &str) -> String {
    if let Some(caps) = NAME_FROM_PROMPT_RE.captures(prompt) {
        let raw = caps.get(1).expect("name").as_str();
        let mut chars = raw.chars();
        if let Some(first) = chars.next() {
            return first.to_uppercase().collect::<String>() + chars.as_str();
        }
    }
    DEFAULT_CONTRACT_NAME.to_string()
}

/// Name substitution plus a provenance header. The template's own contract
/// name is discovered from its declaration, never hard-coded here.
fn customize(template_code: &str, name: &str, template_id: &str) -> String {
    let mut code = template_code.to_string();
    if let Some((original, _)) = scan::contract_declaration(template_code) {
        if original != name {
            code = code.replace(&original, name);
        }
    }
    format!(
        "// {} - served from fallback template '{}'\n// Reviewed, deployable baseline; extend with custom logic as needed.\n{}",
        name, template_id, code
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::quality::validate_fallback_quality;

    #[test]
    fn test_empty_prompt_is_emergency_contract() {
        let result = generate_fallback_contract("", None);

        assert!(!result.success);
        assert!(!result.code.is_empty());
        assert!(scan::contract_declaration(&result.code).is_some());
        assert!(scan::has_init(&result.code));
    }

    #[test]
    fn test_nft_prompt_selects_nft_template() {
        let result = generate_fallback_contract("Create an NFT contract", None);

        assert!(result.success);
        assert_eq!(result.contract_type.category, ContractCategory::Nft);
        assert!(result.template_id.is_some());
    }

    #[test]
    fn test_name_extraction_and_substitution() {
        let result = generate_fallback_contract("Create an NFT contract called DragonArt", None);

        assert_eq!(result.contract_name, "DragonArt");
        assert!(result.code.contains("contract DragonArt"));
        assert!(!result.code.contains("BasicNFT"));
    }

    #[test]
    fn test_default_name_when_prompt_has_none() {
        let result = generate_fallback_contract("Create a simple voting dao", None);
        assert_eq!(result.contract_name, "GeneratedContract");
    }

    #[test]
    fn test_metadata_keyword_prefers_intermediate_template() {
        let result = generate_fallback_contract(
            "Create an NFT collection with metadata, a dedicated minter resource, \
             and descriptions attached to every collectible artwork",
            None,
        );

        assert_eq!(result.template_id.as_deref(), Some("nft-metadata"));
    }

    #[test]
    fn test_customized_output_still_passes_quality_gate() {
        let result = generate_fallback_contract("Create a token called PayCoin", None);

        assert!(result.success);
        assert!(validate_fallback_quality(&result.code));
    }

    #[test]
    fn test_complexity_words() {
        assert_eq!(
            infer_contract_type("a simple nft").complexity,
            Complexity::Simple
        );
        assert_eq!(
            infer_contract_type("an advanced nft collection").complexity,
            Complexity::Advanced
        );
    }

    #[test]
    fn test_unrecognized_prompt_is_generic_emergency() {
        let result = generate_fallback_contract("do the thing with the stuff", None);

        // No category keywords match, and generic has no catalog entry.
        assert!(!result.success);
        assert!(validate_fallback_quality(&result.code));
    }
}
