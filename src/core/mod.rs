// File: src/core/mod.rs
pub mod blend;
pub mod engine;
pub mod normalize;
pub mod types;
