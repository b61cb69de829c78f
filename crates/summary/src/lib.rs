//! Contract summary engine for Leasebot.
//!
//! Turns the four collected contract values plus "today" into a
//! [`SummaryReport`] of mileage statistics, and renders reports (fresh or
//! previously saved) as a fixed-width text block.

pub mod dates;
pub mod engine;
pub mod render;

pub use dates::{end_date, format_date, runtime_days};
pub use engine::{compute, SummaryReport};
pub use render::{render, render_data};
