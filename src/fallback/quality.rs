// src/fallback/quality.rs

use crate::rules::FORBIDDEN_TOKENS;
use crate::scan;
use once_cell::sync::Lazy;
use regex::Regex;

static ACCESS_QUALIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"access\((?:all|self|contract|account)\)").expect("access pattern"));

/// Structural sanity gate every catalog template (and emergency contract)
/// must pass by construction: balanced delimiters, a contract declaration, an
/// initializer, no forbidden placeholder tokens, and at least one access
/// qualifier.
pub fn validate_fallback_quality(code: &str) -> bool {
    if code.trim().is_empty() {
        return false;
    }
    if !scan::balanced_delimiters(code) {
        return false;
    }
    if scan::contract_declaration(code).is_none() {
        return false;
    }
    if !scan::has_init(code) {
        return false;
    }
    if FORBIDDEN_TOKENS.iter().any(|t| code.contains(t)) {
        return false;
    }
    ACCESS_QUALIFIER_RE.is_match(code)
}
