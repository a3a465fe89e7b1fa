// src/correction/mod.rs

pub mod engine;

pub use engine::correct_code;
