//! The Leasebot dialogue: a keyword-driven state machine that collects the
//! four values of a leasing contract and reports on them.
//!
//! A conversation runs through these stages:
//!
//! 1. **Start**: load a saved summary or begin a new calculation
//! 2. **Intake**: start date, months, km limit, km driven (validated, acknowledged)
//! 3. **Review**: show the collected data, edit single fields via the changes menu
//! 4. **Summary**: compute and render the report, optionally save it
//!
//! `help` and `restart` are reachable from almost everywhere.

mod augment;
pub mod extract;
pub mod machine;
pub mod phrases;
pub mod replies;
pub mod router;
pub mod validate;

pub use machine::{CurrentState, DialogueMachine, MachineSnapshot};
pub use phrases::PhraseBook;
pub use router::{KeywordRouter, Route};
