//! Keyword routing: map lowercased input to the next state.

use leasebot_config::BotData;
use leasebot_config::bot_data::PREVIOUS_TARGET;
use leasebot_core::{ConversationState, DialogueError};
use std::sync::Arc;
use tracing::trace;

/// Where a matched keyword points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    To(ConversationState),
    /// Back to whatever state preceded the current one.
    Previous,
}

/// Scans a state's keyword table in file order.
#[derive(Clone)]
pub struct KeywordRouter {
    data: Arc<BotData>,
}

impl KeywordRouter {
    pub fn new(data: Arc<BotData>) -> Self {
        Self { data }
    }

    /// Target name of the first keyword contained in `input`.
    ///
    /// `input` is expected to be lowercased already. A state without a
    /// keyword table never matches.
    pub fn route_name(&self, state: ConversationState, input: &str) -> Result<&str, DialogueError> {
        let no_match = || DialogueError::NoKeywordFound {
            state: state.name().to_string(),
        };

        let keywords = self.data.transitions_for(state.name()).ok_or_else(no_match)?;
        let (keyword, target) = keywords
            .iter()
            .find(|(keyword, _)| input.contains(keyword.as_str()))
            .ok_or_else(no_match)?;

        trace!(state = %state, keyword = %keyword, target = %target, "Keyword matched");
        Ok(target)
    }

    /// Route and resolve the target name.
    ///
    /// A target that names no known state is `NoMatchingState`.
    pub fn route(&self, state: ConversationState, input: &str) -> Result<Route, DialogueError> {
        let target = self.route_name(state, input)?;
        if target == PREVIOUS_TARGET {
            return Ok(Route::Previous);
        }
        ConversationState::from_name(target).map(Route::To)
    }
}
