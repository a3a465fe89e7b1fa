// src/types.rs

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContractCategory {
    Nft,
    FungibleToken,
    Dao,
    Marketplace,
    Defi,
    Utility,
    Generic,
}

impl ContractCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractCategory::Nft => "nft",
            ContractCategory::FungibleToken => "fungible-token",
            ContractCategory::Dao => "dao",
            ContractCategory::Marketplace => "marketplace",
            ContractCategory::Defi => "defi",
            ContractCategory::Utility => "utility",
            ContractCategory::Generic => "generic",
        }
    }

    pub fn parse(s: &str) -> ContractCategory {
        match s {
            "nft" => ContractCategory::Nft,
            "fungible-token" | "token" => ContractCategory::FungibleToken,
            "dao" => ContractCategory::Dao,
            "marketplace" => ContractCategory::Marketplace,
            "defi" => ContractCategory::Defi,
            "utility" => ContractCategory::Utility,
            _ => ContractCategory::Generic,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Simple,
    Intermediate,
    Advanced,
}

/// Inferred once from the request text, read-only afterwards. Every analyzer
/// uses it to select its category-specific rule set.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContractType {
    pub category: ContractCategory,
    pub complexity: Complexity,
    pub features: Vec<String>,
}

impl ContractType {
    pub fn generic() -> Self {
        Self {
            category: ContractCategory::Generic,
            complexity: Complexity::Simple,
            features: Vec::new(),
        }
    }
}

/// 1-based line, 0-based column, computed from a byte offset into the source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeLocation {
    pub line: usize,
    pub column: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCategory {
    Structural,
    Functional,
    Syntax,
    Completeness,
    BestPractices,
    Security,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorType {
    MissingFunctionBody,
    IncompleteFunctionImplementation,
    MissingRequiredFunction,
    MissingReturnStatement,
    MissingContractDeclaration,
    MissingInitFunction,
    MissingImportStatements,
    IncompleteResourceDefinition,
    MissingResourceMethods,
    MissingEventDefinitions,
    MissingEventEmission,
    MissingAccessModifiers,
    IncompleteImplementation,
    PoorNamingConvention,
    UndefinedValue,
    LegacySyntax,
    UnbalancedBraces,
    EmptyContractBody,
    MissingPrePostConditions,
    InvalidTypeAnnotation,
}

/// One classified finding from the Error Detector. Created per match, never
/// mutated, aggregated into a flat list in detector-pass order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DetectedError {
    pub id: String,
    pub error_type: ErrorType,
    pub category: ErrorCategory,
    pub severity: Severity,
    pub location: CodeLocation,
    pub message: String,
    pub description: String,
    pub suggested_fix: String,
    pub auto_fixable: bool,
    /// Detection confidence, 0-100.
    pub confidence: u8,
    pub context: String,
}

/// Per-category counters over a list of findings. Recomputed, not stored.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct ErrorClassification {
    pub structural: usize,
    pub functional: usize,
    pub syntax: usize,
    pub completeness: usize,
    pub best_practices: usize,
    pub security: usize,
}

impl ErrorClassification {
    pub fn from_errors(errors: &[DetectedError]) -> Self {
        let mut c = ErrorClassification::default();
        for e in errors {
            match e.category {
                ErrorCategory::Structural => c.structural += 1,
                ErrorCategory::Functional => c.functional += 1,
                ErrorCategory::Syntax => c.syntax += 1,
                ErrorCategory::Completeness => c.completeness += 1,
                ErrorCategory::BestPractices => c.best_practices += 1,
                ErrorCategory::Security => c.security += 1,
            }
        }
        c
    }

    pub fn total(&self) -> usize {
        self.structural
            + self.functional
            + self.syntax
            + self.completeness
            + self.best_practices
            + self.security
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorDetectionResult {
    pub errors: Vec<DetectedError>,
    pub classification: ErrorClassification,
    /// 0-100, floor 0; 0 for empty input.
    pub completeness_score: u8,
    /// At most one entry per distinct error type present.
    pub recommendations: Vec<String>,
    pub contract_type: ContractType,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationType {
    Syntax,
    Logic,
    Completeness,
    BestPractices,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub message: String,
    pub severity: Severity,
    pub location: Option<CodeLocation>,
}

/// The unit exchanged between analyzers and the score calculator.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ValidationResult {
    pub validation_type: ValidationType,
    pub passed: bool,
    pub issues: Vec<ValidationIssue>,
    /// 0-100.
    pub score: u8,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FunctionReport {
    pub total_functions: usize,
    pub complete_functions: usize,
    /// Function name plus the reason it was judged incomplete.
    pub incomplete_functions: Vec<String>,
    pub missing_required_functions: Vec<String>,
    /// complete/total * 100, 0 when there are no functions.
    pub completeness_percentage: u8,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResourceReport {
    pub total_resources: usize,
    pub lifecycle_complete: usize,
    /// 100 * complete/total, 100 when there are zero resources.
    pub lifecycle_score: u8,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventReport {
    pub defined_events: Vec<String>,
    pub emitted_events: Vec<String>,
    pub unused_events: Vec<String>,
    pub missing_emissions: Vec<String>,
    /// 100 * emitted-defined/defined, 100 when zero events are defined.
    pub emission_completeness: u8,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AccessReport {
    pub total_elements: usize,
    pub with_access_modifier: usize,
    /// 100 when there are no elements to qualify.
    pub access_control_score: u8,
}

/// Nested report produced by the Functional Completeness Validator.
/// Sub-scores weighted 40/30/15/15 into `score`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FunctionalCompletenessResult {
    pub is_complete: bool,
    pub score: u8,
    pub functions: FunctionReport,
    pub resources: ResourceReport,
    pub events: EventReport,
    pub access_control: AccessReport,
    pub issues: Vec<ValidationIssue>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CorrectionResult {
    pub success: bool,
    pub corrected_code: String,
    pub corrections_applied: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
    UndefinedLiteral,
    LegacySyntax,
    IncompleteLogic,
    SyntaxBrackets,
    TypeMismatch,
}

/// Derived after each failed attempt; shapes the next attempt's prompt.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FailurePattern {
    pub kind: FailureKind,
    pub common_causes: Vec<String>,
    pub suggested_solutions: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserExperience {
    Beginner,
    Intermediate,
    Advanced,
}

impl Default for UserExperience {
    fn default() -> Self {
        UserExperience::Intermediate
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct QualityRequirements {
    /// Minimum aggregate quality score to accept a generation.
    pub min_score: u8,
    /// Total attempts including the first (1 initial + retries).
    pub max_attempts: u8,
    pub allow_auto_correction: bool,
}

impl Default for QualityRequirements {
    fn default() -> Self {
        Self {
            min_score: 80,
            max_attempts: 4,
            allow_auto_correction: true,
        }
    }
}

/// Carried across retries within one orchestrator invocation. Lifetime is one
/// top-level generation request; never persisted or shared across requests.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationContext {
    pub user_prompt: String,
    pub contract_type: ContractType,
    pub previous_attempts: Vec<FailurePattern>,
    pub quality: QualityRequirements,
    pub user_experience: UserExperience,
}

/// Static catalog entry, read-only at runtime.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FallbackTemplate {
    pub id: String,
    pub contract_type: ContractType,
    pub code: String,
    pub keywords: Vec<String>,
    pub complexity: Complexity,
    pub guaranteed_working: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FallbackGenerationResult {
    pub success: bool,
    pub code: String,
    pub template_id: Option<String>,
    pub contract_type: ContractType,
    pub contract_name: String,
    pub notes: Vec<String>,
}

/// Aggregate view handed to the orchestrator's accept/retry decision and
/// surfaced with the final result.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ValidationSummary {
    /// 0-100 aggregate across validation records.
    pub score: u8,
    pub passed: bool,
    pub results: Vec<ValidationResult>,
    pub errors: Vec<DetectedError>,
}

/// The only artifact surfaced to external collaborators.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QualityAssuredResult {
    pub code: String,
    pub validation: ValidationSummary,
    pub rejected: bool,
    pub rejection_reason: Option<String>,
    pub attempts_used: u8,
    pub used_fallback: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trip() {
        for cat in [
            ContractCategory::Nft,
            ContractCategory::FungibleToken,
            ContractCategory::Dao,
            ContractCategory::Marketplace,
            ContractCategory::Defi,
            ContractCategory::Utility,
            ContractCategory::Generic,
        ] {
            assert_eq!(ContractCategory::parse(cat.as_str()), cat);
        }
    }

    #[test]
    fn test_unknown_category_is_generic() {
        assert_eq!(ContractCategory::parse("oracle"), ContractCategory::Generic);
    }

    #[test]
    fn test_classification_counts() {
        let mk = |category| DetectedError {
            id: "e".to_string(),
            error_type: ErrorType::IncompleteImplementation,
            category,
            severity: Severity::Warning,
            location: CodeLocation { line: 1, column: 0 },
            message: String::new(),
            description: String::new(),
            suggested_fix: String::new(),
            auto_fixable: false,
            confidence: 50,
            context: String::new(),
        };

        let errors = vec![
            mk(ErrorCategory::Structural),
            mk(ErrorCategory::Structural),
            mk(ErrorCategory::Security),
        ];

        let c = ErrorClassification::from_errors(&errors);
        assert_eq!(c.structural, 2);
        assert_eq!(c.security, 1);
        assert_eq!(c.total(), 3);
    }
}
