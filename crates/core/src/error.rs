//! Error types for the Leasebot domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all Leasebot operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Dialogue errors ---
    #[error("Dialogue error: {0}")]
    Dialogue(#[from] DialogueError),

    // --- Summary computation errors ---
    #[error("Summary error: {0}")]
    Summary(#[from] SummaryError),

    // --- Persistence errors ---
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures raised while steering a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DialogueError {
    #[error("No keyword found in input for state '{state}'")]
    NoKeywordFound { state: String },

    #[error("No matching state for name: {0}")]
    NoMatchingState(String),

    #[error("Value rejected for {field}: {reason}")]
    ValidationFailed { field: String, reason: String },

    #[error("Conversation is in an unknown state: {0}")]
    UnknownState(String),
}

/// No parsable token of the requested kind was found in user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("No number given")]
    NoNumber,

    #[error("No valid date found")]
    NoDate,

    #[error("No summary id given")]
    NoId,
}

/// Failures of the contract summary formula.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SummaryError {
    #[error("Division by zero while calculating {metric}")]
    DivisionByZero { metric: &'static str },

    #[error("End date out of range for {months} months from {start}")]
    DateOutOfRange { start: String, months: u32 },
}

/// Failures of the saved-summary store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Summary {0} not found")]
    NotFound(u32),

    #[error("Storage I/O failed: {0}")]
    Io(String),

    #[error("Failed to (de)serialize summary: {0}")]
    Serialization(String),
}
