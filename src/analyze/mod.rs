// src/analyze/mod.rs
//! Per-field analysis used by the row normalizer: label reconciliation,
//! heuristic sentiment, language names.

pub mod heuristic;
pub mod labels;
pub mod language;

pub use crate::analyze::heuristic::{estimate, Estimate};
pub use crate::analyze::labels::normalize_label;
pub use crate::analyze::language::normalize_language_name;
