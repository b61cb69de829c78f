//! # Leasebot Core
//!
//! Domain types, traits, and error definitions for the Leasebot leasing
//! assistant. This crate has **zero framework dependencies**; it defines the
//! domain model that all other crates implement against.
//!
//! ## Layout
//!
//! - [`state`]: the closed set of conversation states
//! - [`contract`]: the four contract values collected during a dialogue
//! - [`storage`]: the persistence seam for saved summaries
//! - [`clock`]: the injected notion of "today"
//! - [`message`]: chat messages and sessions as seen by a transport

pub mod clock;
pub mod contract;
pub mod error;
pub mod message;
pub mod state;
pub mod storage;

// Re-export key types at crate root for ergonomics
pub use clock::{Clock, FixedClock, SystemClock};
pub use contract::{ContractData, ContractField};
pub use error::{DialogueError, Error, ExtractionError, Result, StorageError, SummaryError};
pub use message::{ChatSession, Message, SessionId, User};
pub use state::ConversationState;
pub use storage::{SummaryData, SummaryStore, MAX_SUMMARY_ID};
