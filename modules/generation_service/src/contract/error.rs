//! Contract error types for generation service
//!
//! These errors are transport-agnostic; the (external) HTTP layer maps them
//! to responses.

use super::settings::GeneratorKind;
use thiserror::Error;

/// Errors surfaced by the settings façade
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    /// A single kind's update was rejected; the stored settings are unchanged
    #[error("{kind} generation: {message}")]
    Validation {
        kind: GeneratorKind,
        message: String,
    },

    /// One or more kinds of a bulk update were rejected
    #[error("{}", .errors.join("; "))]
    InvalidSettings {
        /// One entry per rejected kind, prefixed with the kind name
        errors: Vec<String>,
    },
}

/// Status string read back from storage that matches no known status
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} value '{value}'")]
pub struct ParseStatusError {
    pub kind: &'static str,
    pub value: String,
}
