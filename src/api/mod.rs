// src/api/mod.rs

pub mod generate;
pub mod types;

pub use generate::{correct, detect, explain, fallback, generate, refine};
pub use types::{
    CorrectRequest, CorrectResponse, DetectRequest, DetectResponse, ExplainRequest,
    ExplainResponse, FallbackRequest, FallbackResponse, GenerateOptions, GenerateRequest,
    GenerateResponse, RefineRequest,
};
