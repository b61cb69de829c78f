//! Extra reply content attached after a state switch.
//!
//! Some states need more than their prompt: the overview lists saved IDs,
//! the review shows the collected data, the summary states render a report.
//! Three of them can refuse the switch and force a different state instead.

use leasebot_core::ConversationState;
use leasebot_summary::{render, render_data};
use tracing::warn;

use crate::machine::DialogueMachine;
use crate::replies;

impl DialogueMachine {
    /// Decorate `prompt` for the state just entered.
    pub(crate) fn augment(&mut self, prompt: String) -> String {
        let Some(state) = self.current.known() else {
            return prompt;
        };

        match state {
            ConversationState::SummaryOverview => self.list_saved_summaries(prompt),
            ConversationState::ShowLoadedSummary => self.attach_loaded_summary(prompt),
            ConversationState::AskForChanges => {
                format!("{prompt}\n{}{}", self.data, replies::MODIFY_QUESTION)
            }
            ConversationState::ShowSummary => self.attach_summary(prompt),
            ConversationState::SaveSummary => match self.saved_summary_id {
                Some(id) => format!("{prompt} {}", replies::saved_id(id)),
                None => prompt,
            },
            _ => prompt,
        }
    }

    fn list_saved_summaries(&mut self, prompt: String) -> String {
        self.refresh_saved_ids();
        if self.saved_ids.is_empty() {
            self.force(ConversationState::Start);
            let start = self.phrases.question(ConversationState::Start);
            return format!("{}\n{start}", replies::NO_SAVED_SUMMARIES);
        }
        format!(
            "{prompt}\n{}\n{}",
            replies::join_ids(&self.saved_ids),
            replies::CHOOSE_ONE
        )
    }

    fn attach_loaded_summary(&mut self, prompt: String) -> String {
        self.refresh_saved_ids();

        let loaded = self
            .loaded_summary_id
            .filter(|id| self.saved_ids.contains(id))
            .and_then(|id| match self.store.load(id) {
                Ok(data) => Some(data),
                Err(e) => {
                    warn!(id, error = %e, "Saved summary could not be loaded");
                    None
                }
            });

        match loaded {
            Some(data) => format!(
                "{prompt}\n{}\n{}",
                render_data(&data),
                replies::LOADED_FOLLOW_UP
            ),
            None => {
                self.force(ConversationState::SummaryOverview);
                replies::invalid_summary_id(self.loaded_summary_id, &self.saved_ids)
            }
        }
    }

    fn attach_summary(&mut self, prompt: String) -> String {
        match self.compute_report() {
            Some(Ok(report)) => format!("{prompt}\n{}\n{}", render(&report), replies::SAVE_QUESTION),
            Some(Err(e)) => {
                warn!(error = %e, "Summary could not be computed");
                self.force(ConversationState::AskForChanges);
                format!(
                    "{}\n{}{}",
                    replies::CANNOT_COMPUTE,
                    self.data,
                    replies::MODIFY_QUESTION
                )
            }
            None => {
                self.force(ConversationState::AskForChanges);
                format!(
                    "{}\n{}{}",
                    replies::missing_data(&self.data.missing_fields()),
                    self.data,
                    replies::MODIFY_QUESTION
                )
            }
        }
    }
}
