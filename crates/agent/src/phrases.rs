//! Random selection from the question, fallback and greeting banks.

use leasebot_config::BotData;
use leasebot_core::ConversationState;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use std::sync::Arc;
use tracing::warn;

/// Picks one phrase per use. Seed it for reproducible conversations.
pub struct PhraseBook {
    data: Arc<BotData>,
    rng: StdRng,
}

impl PhraseBook {
    pub fn new(data: Arc<BotData>) -> Self {
        Self {
            data,
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn with_seed(data: Arc<BotData>, seed: u64) -> Self {
        Self {
            data,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// A prompt for `state`. States without prompts get a fallback.
    pub fn question(&mut self, state: ConversationState) -> String {
        match self.data.questions_for(state.name()).choose(&mut self.rng) {
            Some(question) => question.clone(),
            None => {
                warn!(state = %state, "No question configured for state");
                self.fallback()
            }
        }
    }

    pub fn fallback(&mut self) -> String {
        self.data
            .fallbacks
            .choose(&mut self.rng)
            .cloned()
            .unwrap_or_default()
    }

    pub fn greeting(&mut self) -> String {
        self.data
            .greetings
            .choose(&mut self.rng)
            .cloned()
            .unwrap_or_default()
    }
}
