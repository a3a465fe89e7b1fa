// src/fallback/mod.rs

pub mod generator;
pub mod quality;
pub mod templates;

pub use generator::{generate_fallback_contract, infer_contract_type};
pub use quality::validate_fallback_quality;
pub use templates::TEMPLATE_CATALOG;
