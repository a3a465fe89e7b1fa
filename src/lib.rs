// src/lib.rs

pub mod api;
pub mod completeness;
pub mod correction;
pub mod detector;
pub mod fallback;
pub mod orchestrator;
pub mod providers;
pub mod rules;
pub mod scan;
pub mod scoring;
pub mod server;
pub mod telemetry;
pub mod types;

// Re-export commonly used types
pub use api::{generate, GenerateRequest, GenerateResponse};
pub use completeness::validate_functional_completeness;
pub use correction::correct_code;
pub use detector::detect_errors;
pub use fallback::generate_fallback_contract;
pub use orchestrator::{generate_code_with_validation, GenerationOptions};
pub use providers::{CodeGenerator, GeneratorError, MockGenerator, OpenAiGenerator};
pub use telemetry::Telemetry;
pub use types::*;
