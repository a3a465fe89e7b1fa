// src/scoring/mod.rs

pub mod aggregator;

pub use aggregator::{aggregate_quality, build_validation_records, QualityScore};
