//! The closed set of stages a leasing conversation can be in.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DialogueError;

/// A stage of the guided leasing dialogue.
///
/// The snake_case name of each variant is the identifier used by the
/// transition and question files.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    #[default]
    Start,
    Restart,
    Help,
    LoadSummary,
    SummaryOverview,
    ShowLoadedSummary,
    InputStartdate,
    InputMonths,
    InputKmLimit,
    InputKmDriven,
    AskForChanges,
    Changes,
    ShowSummary,
    SaveSummary,
    Exit,
}

impl ConversationState {
    /// Every state, in declaration order.
    pub const ALL: [ConversationState; 15] = [
        Self::Start,
        Self::Restart,
        Self::Help,
        Self::LoadSummary,
        Self::SummaryOverview,
        Self::ShowLoadedSummary,
        Self::InputStartdate,
        Self::InputMonths,
        Self::InputKmLimit,
        Self::InputKmDriven,
        Self::AskForChanges,
        Self::Changes,
        Self::ShowSummary,
        Self::SaveSummary,
        Self::Exit,
    ];

    /// The configuration identifier of this state.
    pub fn name(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Restart => "restart",
            Self::Help => "help",
            Self::LoadSummary => "load_summary",
            Self::SummaryOverview => "summary_overview",
            Self::ShowLoadedSummary => "show_loaded_summary",
            Self::InputStartdate => "input_startdate",
            Self::InputMonths => "input_months",
            Self::InputKmLimit => "input_km_limit",
            Self::InputKmDriven => "input_km_driven",
            Self::AskForChanges => "ask_for_changes",
            Self::Changes => "changes",
            Self::ShowSummary => "show_summary",
            Self::SaveSummary => "save_summary",
            Self::Exit => "exit",
        }
    }

    /// Resolve a configuration identifier to a state.
    pub fn from_name(name: &str) -> Result<Self, DialogueError> {
        Self::ALL
            .into_iter()
            .find(|state| state.name() == name)
            .ok_or_else(|| DialogueError::NoMatchingState(name.to_string()))
    }
}

impl fmt::Display for ConversationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ConversationState {
    type Err = DialogueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}
