//! The dialogue state machine.
//!
//! One machine serves one conversation. Every call to
//! [`DialogueMachine::respond`] consumes one user message and produces
//! exactly one reply; no failure escapes as an error. Which handler runs is
//! decided by the current state:
//!
//! - states that parse input (start, restart, help, summary overview, the
//!   four intake states, show summary, save summary) have bespoke handlers
//! - everything else routes by keyword and switches to the target
//!
//! After any switch the reply is augmented with state-specific content
//! (see the `augment` module).

use leasebot_config::BotData;
use leasebot_core::{
    Clock, ContractData, ContractField, ConversationState, DialogueError, Error, SummaryError,
    SummaryStore, SystemClock,
};
use leasebot_summary::{SummaryReport, compute, format_date};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::extract::{extract_date, extract_integer, extract_summary_id};
use crate::phrases::PhraseBook;
use crate::replies;
use crate::router::{KeywordRouter, Route};
use crate::validate::{validate_count, validate_start_date};

/// The state slot. `Unknown` holds a name that was restored from outside
/// and matches no state; the machine refuses to move on from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurrentState {
    Known(ConversationState),
    Unknown(String),
}

impl CurrentState {
    pub fn name(&self) -> &str {
        match self {
            Self::Known(state) => state.name(),
            Self::Unknown(name) => name,
        }
    }

    pub fn known(&self) -> Option<ConversationState> {
        match self {
            Self::Known(state) => Some(*state),
            Self::Unknown(_) => None,
        }
    }
}

impl fmt::Display for CurrentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A read-only view of where a conversation stands.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MachineSnapshot {
    pub state: String,
    pub previous: ConversationState,
    pub data: ContractData,
    pub loaded_summary_id: Option<u32>,
    pub saved_summary_id: Option<u32>,
}

pub struct DialogueMachine {
    pub(crate) current: CurrentState,
    pub(crate) previous: ConversationState,
    pub(crate) data: ContractData,

    /// IDs seen at the last refresh of the store listing
    pub(crate) saved_ids: BTreeSet<u32>,
    /// ID the user asked to load in the summary overview
    pub(crate) loaded_summary_id: Option<u32>,
    /// ID assigned by the most recent save
    pub(crate) saved_summary_id: Option<u32>,

    bot_data: Arc<BotData>,
    router: KeywordRouter,
    pub(crate) phrases: PhraseBook,
    pub(crate) store: Arc<dyn SummaryStore>,
    clock: Arc<dyn Clock>,
}

impl DialogueMachine {
    /// Create a machine in the start state, using the system clock and an
    /// unseeded RNG.
    pub fn new(bot_data: Arc<BotData>, store: Arc<dyn SummaryStore>) -> Self {
        Self {
            current: CurrentState::Known(ConversationState::Start),
            previous: ConversationState::Start,
            data: ContractData::new(),
            saved_ids: BTreeSet::new(),
            loaded_summary_id: None,
            saved_summary_id: None,
            router: KeywordRouter::new(bot_data.clone()),
            phrases: PhraseBook::new(bot_data.clone()),
            bot_data,
            store,
            clock: Arc::new(SystemClock),
        }
    }

    /// Use a different notion of "today".
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Seed phrase selection for reproducible replies.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.phrases = PhraseBook::with_seed(self.bot_data.clone(), seed);
        self
    }

    pub fn state(&self) -> &CurrentState {
        &self.current
    }

    pub fn previous(&self) -> ConversationState {
        self.previous
    }

    pub fn data(&self) -> &ContractData {
        &self.data
    }

    pub fn snapshot(&self) -> MachineSnapshot {
        MachineSnapshot {
            state: self.current.name().to_string(),
            previous: self.previous,
            data: self.data.clone(),
            loaded_summary_id: self.loaded_summary_id,
            saved_summary_id: self.saved_summary_id,
        }
    }

    /// Jump to a named state and return its prompt. A name outside the
    /// enumeration leaves the machine in the unknown state.
    pub fn restore_state(&mut self, name: &str) -> String {
        match ConversationState::from_name(name) {
            Ok(state) => self.enter(state),
            Err(e) => {
                warn!(error = %e, "Restored an unknown state");
                self.current = CurrentState::Unknown(name.to_string());
                replies::UNKNOWN_STATE.to_string()
            }
        }
    }

    /// Opening message: a greeting followed by the start prompt.
    pub fn greet(&mut self) -> String {
        let greeting = self.phrases.greeting();
        let prompt = self.phrases.question(ConversationState::Start);
        format!("{greeting}\n{prompt}")
    }

    /// Handle one user message and return the reply.
    pub fn respond(&mut self, input: &str) -> String {
        let text = input.trim().to_lowercase();

        let state = match &self.current {
            CurrentState::Known(state) => *state,
            CurrentState::Unknown(name) => {
                let err = DialogueError::UnknownState(name.clone());
                warn!(error = %err, "Cannot continue the conversation");
                return replies::UNKNOWN_STATE.to_string();
            }
        };
        debug!(state = %state, input = %text, "Handling message");

        match state {
            ConversationState::Start => self.on_start(&text),
            ConversationState::Restart => self.on_restart(&text),
            ConversationState::Help => self.on_help(),
            ConversationState::SummaryOverview => self.on_summary_overview(&text),
            ConversationState::InputStartdate => self.on_input_startdate(&text),
            ConversationState::InputMonths => self.on_input_count(
                ContractField::Months,
                ConversationState::InputKmLimit,
                &text,
            ),
            ConversationState::InputKmLimit => self.on_input_count(
                ContractField::KmLimit,
                ConversationState::InputKmDriven,
                &text,
            ),
            ConversationState::InputKmDriven => self.on_input_count(
                ContractField::KmDriven,
                ConversationState::AskForChanges,
                &text,
            ),
            ConversationState::ShowSummary => self.on_show_summary(&text),
            ConversationState::SaveSummary => self.enter(ConversationState::Restart),
            ConversationState::LoadSummary
            | ConversationState::ShowLoadedSummary
            | ConversationState::AskForChanges
            | ConversationState::Changes
            | ConversationState::Exit => self.generic(state, &text),
        }
    }

    // ── Handlers ──

    fn on_start(&mut self, text: &str) -> String {
        self.refresh_saved_ids();
        match self.router.route(ConversationState::Start, text) {
            Ok(Route::To(ConversationState::LoadSummary)) if self.saved_ids.is_empty() => {
                info!("Nothing saved yet, starting a new calculation instead");
                let prompt = self.enter(ConversationState::InputStartdate);
                format!("{}\n{prompt}", replies::NOTHING_TO_LOAD)
            }
            routed => self.follow(ConversationState::Start, routed),
        }
    }

    fn on_restart(&mut self, text: &str) -> String {
        let routed = self.router.route(ConversationState::Restart, text);
        if routed == Ok(Route::To(ConversationState::Start)) {
            info!("Conversation restarted");
            self.data.reset();
            self.loaded_summary_id = None;
            self.saved_summary_id = None;
        }
        self.follow(ConversationState::Restart, routed)
    }

    /// Return to where help was asked for. `previous` stays as it is.
    fn on_help(&mut self) -> String {
        let target = self.previous;
        debug!(to = %target, "Leaving help");
        self.current = CurrentState::Known(target);
        let prompt = self.phrases.question(target);
        self.augment(prompt)
    }

    fn on_summary_overview(&mut self, text: &str) -> String {
        match extract_summary_id(text) {
            Ok(id) => {
                self.loaded_summary_id = Some(id);
                self.enter(ConversationState::ShowLoadedSummary)
            }
            Err(e) => {
                debug!(error = %e, "No summary id in input");
                self.generic(ConversationState::SummaryOverview, text)
            }
        }
    }

    fn on_input_startdate(&mut self, text: &str) -> String {
        let date = match extract_date(text) {
            Ok(date) => date,
            Err(e) => {
                debug!(error = %e, "No start date in input");
                return self.generic(ConversationState::InputStartdate, text);
            }
        };

        match validate_start_date(date, self.clock.today()) {
            Ok(date) => {
                self.data.set_start_date(date);
                debug!(start = %format_date(date), "Start date stored");
                self.acknowledge(ContractField::StartDate, ConversationState::InputMonths)
            }
            Err(e) => {
                info!(error = %e, "Start date rejected");
                replies::INVALID_START_DATE.to_string()
            }
        }
    }

    fn on_input_count(
        &mut self,
        field: ContractField,
        next: ConversationState,
        text: &str,
    ) -> String {
        let state = self.current.known().unwrap_or_default();
        let value = match extract_integer(text) {
            Ok(value) => value,
            Err(e) => {
                debug!(field = field.label(), error = %e, "No number in input");
                return self.generic(state, text);
            }
        };

        match validate_count(field, value) {
            Ok(value) => {
                match field {
                    ContractField::Months => self.data.set_months(value),
                    ContractField::KmLimit => self.data.set_km_limit(value),
                    ContractField::KmDriven => self.data.set_km_driven(value),
                    ContractField::StartDate => {}
                }
                debug!(field = field.label(), value, "Value stored");
                self.acknowledge(field, next)
            }
            Err(e) => {
                info!(error = %e, "Value rejected");
                replies::invalid_value(field).to_string()
            }
        }
    }

    fn on_show_summary(&mut self, text: &str) -> String {
        let routed = self.router.route(ConversationState::ShowSummary, text);
        if routed == Ok(Route::To(ConversationState::SaveSummary)) {
            match self.persist_summary() {
                Ok(id) => self.saved_summary_id = Some(id),
                Err(e) => {
                    warn!(error = %e, "Summary could not be saved");
                    return replies::SAVE_FAILED.to_string();
                }
            }
        }
        self.follow(ConversationState::ShowSummary, routed)
    }

    // ── Transitions ──

    /// Route by keyword and follow the result.
    fn generic(&mut self, state: ConversationState, text: &str) -> String {
        let routed = self.router.route(state, text);
        self.follow(state, routed)
    }

    fn follow(&mut self, state: ConversationState, routed: Result<Route, DialogueError>) -> String {
        match routed {
            Ok(Route::To(target)) => self.enter(target),
            Ok(Route::Previous) => {
                // Help asked from within RESTART leaves both slots on RESTART.
                let target = match self.current.known() {
                    Some(current) if current == self.previous => ConversationState::Start,
                    _ => self.previous,
                };
                self.enter(target)
            }
            Err(DialogueError::NoMatchingState(name)) => {
                error!(state = %state, target = %name, "Transition table names an unknown state");
                self.phrases.fallback()
            }
            Err(e) => {
                debug!(state = %state, error = %e, "No transition");
                self.phrases.fallback()
            }
        }
    }

    /// Switch to `target` and build its prompt.
    fn enter(&mut self, target: ConversationState) -> String {
        self.switch(target);
        let prompt = self.phrases.question(target);
        self.augment(prompt)
    }

    /// Store a captured field's acknowledgment, then move on. An edit that
    /// started from the changes menu goes back there.
    fn acknowledge(&mut self, field: ContractField, next: ConversationState) -> String {
        let next = if self.previous == ConversationState::Changes {
            ConversationState::Changes
        } else {
            next
        };
        let ack = replies::acknowledgment(field, &self.data);
        let prompt = self.enter(next);
        format!("{ack}\n{prompt}")
    }

    fn switch(&mut self, target: ConversationState) {
        if let CurrentState::Known(current) = self.current {
            self.previous = current;
        }
        self.current = CurrentState::Known(target);
        debug!(from = %self.previous, to = %target, "State switched");
    }

    /// Overwrite the current state without recording history.
    pub(crate) fn force(&mut self, target: ConversationState) {
        debug!(from = %self.current, to = %target, "State forced");
        self.current = CurrentState::Known(target);
    }

    // ── Collaborators ──

    pub(crate) fn refresh_saved_ids(&mut self) {
        match self.store.list_ids() {
            Ok(ids) => self.saved_ids = ids,
            Err(e) => warn!(store = self.store.name(), error = %e, "Could not list saved summaries"),
        }
    }

    /// `None` while any contract value is missing.
    pub(crate) fn compute_report(&self) -> Option<Result<SummaryReport, SummaryError>> {
        let (Some(start), Some(months), Some(limit), Some(driven)) = (
            self.data.start_date(),
            self.data.months(),
            self.data.km_limit(),
            self.data.km_driven(),
        ) else {
            return None;
        };
        Some(compute(start, months, limit, driven, self.clock.today()))
    }

    fn persist_summary(&self) -> leasebot_core::Result<u32> {
        let report = self
            .compute_report()
            .ok_or_else(|| Error::Internal("contract data is incomplete".into()))??;
        let id = self.store.save(&report.to_data())?;
        info!(id, store = self.store.name(), "Summary persisted");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use leasebot_core::{FixedClock, StorageError, SummaryData};
    use leasebot_storage::InMemorySummaryStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn machine_with(
        store: Arc<dyn SummaryStore>,
        today: NaiveDate,
    ) -> DialogueMachine {
        DialogueMachine::new(Arc::new(BotData::builtin().unwrap()), store)
            .with_clock(Arc::new(FixedClock(today)))
            .with_seed(42)
    }

    fn machine_on(today: NaiveDate) -> (DialogueMachine, Arc<InMemorySummaryStore>) {
        let store = Arc::new(InMemorySummaryStore::with_seed(1));
        (machine_with(store.clone(), today), store)
    }

    fn state(machine: &DialogueMachine) -> ConversationState {
        machine.state().known().expect("known state")
    }

    /// Walk from a fresh session to the review screen.
    fn intake(machine: &mut DialogueMachine, driven: &str) {
        machine.respond("I want to calculate a new one");
        machine.respond("01-03-2024");
        machine.respond("9");
        machine.respond("8000");
        machine.respond(driven);
    }

    struct BrokenStore;

    impl SummaryStore for BrokenStore {
        fn name(&self) -> &str {
            "broken"
        }
        fn list_ids(&self) -> Result<BTreeSet<u32>, StorageError> {
            Ok(BTreeSet::new())
        }
        fn save(&self, _data: &SummaryData) -> Result<u32, StorageError> {
            Err(StorageError::Io("disk full".into()))
        }
        fn load(&self, id: u32) -> Result<SummaryData, StorageError> {
            Err(StorageError::NotFound(id))
        }
        fn delete(&self, _id: u32) -> Result<bool, StorageError> {
            Ok(false)
        }
    }

    // ── Intake ──

    #[test]
    fn fresh_machine_starts_at_start() {
        let (machine, _) = machine_on(date(2024, 7, 1));
        assert_eq!(state(&machine), ConversationState::Start);
        assert_eq!(machine.data().missing_fields().len(), 4);
    }

    #[test]
    fn full_intake_summary_and_save() {
        let (mut machine, store) = machine_on(date(2024, 7, 1));

        machine.respond("I want to calculate a new one");
        assert_eq!(state(&machine), ConversationState::InputStartdate);

        let reply = machine.respond("It started on 01-03-2024");
        assert!(reply.starts_with("I saved: 01.03.2024."));
        assert_eq!(state(&machine), ConversationState::InputMonths);

        assert!(machine.respond("9 months").starts_with("I saved: 9 months."));
        assert_eq!(state(&machine), ConversationState::InputKmLimit);

        assert!(machine.respond("8000").starts_with("I saved: 8000 km as your limit."));
        assert_eq!(state(&machine), ConversationState::InputKmDriven);

        let review = machine.respond("2714 km");
        assert_eq!(state(&machine), ConversationState::AskForChanges);
        assert!(review.contains("start date: 01.03.2024"));
        assert!(review.contains("km driven: 2714"));
        assert!(review.ends_with(replies::MODIFY_QUESTION));

        let summary = machine.respond("No, looks good");
        assert_eq!(state(&machine), ConversationState::ShowSummary);
        assert!(summary.contains("8000 km over 9 months"));
        assert!(summary.contains("01.03.2024"));
        assert!(summary.contains("2714 km"));
        assert!(summary.contains("122 of 274 days"));
        assert!(summary.contains("3562.4 km"));
        assert!(summary.ends_with(replies::SAVE_QUESTION));

        let saved = machine.respond("yes please");
        assert_eq!(state(&machine), ConversationState::SaveSummary);
        assert!(saved.contains("The ID of your summary is 1."));
        assert_eq!(store.list_ids().unwrap().into_iter().collect::<Vec<_>>(), vec![1]);
        assert_eq!(
            store.load(1).unwrap().get("day"),
            Some("122 of 274 days")
        );

        machine.respond("ok");
        assert_eq!(state(&machine), ConversationState::Restart);
    }

    #[test]
    fn start_date_today_rejected_yesterday_accepted() {
        let (mut machine, _) = machine_on(date(2024, 7, 1));
        machine.restore_state("input_startdate");

        assert_eq!(machine.respond("01-07-2024"), replies::INVALID_START_DATE);
        assert_eq!(state(&machine), ConversationState::InputStartdate);
        assert!(machine.data().start_date().is_none());

        machine.respond("30-06-2024");
        assert_eq!(state(&machine), ConversationState::InputMonths);
        assert_eq!(machine.data().start_date(), Some(date(2024, 6, 30)));
    }

    #[test]
    fn old_start_date_accepted_far_in_the_future() {
        let (mut machine, _) = machine_on(date(2099, 1, 1));
        machine.restore_state("input_startdate");
        machine.respond("15-03-2023");
        assert_eq!(machine.data().start_date(), Some(date(2023, 3, 15)));
    }

    #[test]
    fn zero_months_rejected_one_accepted() {
        let (mut machine, _) = machine_on(date(2024, 7, 1));
        machine.restore_state("input_months");

        let reply = machine.respond("0");
        assert_eq!(reply, replies::invalid_value(ContractField::Months));
        assert_eq!(state(&machine), ConversationState::InputMonths);

        machine.respond("1");
        assert_eq!(machine.data().months(), Some(1));
        assert_eq!(state(&machine), ConversationState::InputKmLimit);
    }

    #[test]
    fn zero_km_limit_rejected() {
        let (mut machine, _) = machine_on(date(2024, 7, 1));
        machine.restore_state("input_km_limit");
        machine.respond("0 km");
        assert_eq!(state(&machine), ConversationState::InputKmLimit);
        assert!(machine.data().km_limit().is_none());
    }

    #[test]
    fn zero_km_driven_completes_the_contract() {
        let (mut machine, _) = machine_on(date(2024, 7, 1));
        intake(&mut machine, "0");
        assert_eq!(state(&machine), ConversationState::AskForChanges);
        assert_eq!(machine.data().km_driven(), Some(0));
        assert!(machine.data().is_complete());
    }

    #[test]
    fn negative_km_driven_rejected() {
        let (mut machine, _) = machine_on(date(2024, 7, 1));
        machine.restore_state("input_km_driven");

        let reply = machine.respond("-500");
        assert_eq!(reply, replies::invalid_value(ContractField::KmDriven));
        assert_eq!(state(&machine), ConversationState::InputKmDriven);
        assert!(machine.data().km_driven().is_none());
    }

    #[test]
    fn unrecognised_intake_input_falls_back() {
        let (mut machine, _) = machine_on(date(2024, 7, 1));
        machine.restore_state("input_months");
        let fallbacks = BotData::builtin().unwrap().fallbacks;

        let reply = machine.respond("quite a while");
        assert!(fallbacks.contains(&reply));
        assert_eq!(state(&machine), ConversationState::InputMonths);
    }

    // ── Navigation ──

    #[test]
    fn help_round_trip_returns_to_start() {
        let (mut machine, _) = machine_on(date(2024, 7, 1));

        let help = machine.respond("help");
        assert!(help.contains("DD-MM-YYYY"));
        assert_eq!(state(&machine), ConversationState::Help);
        assert_eq!(machine.previous(), ConversationState::Start);

        machine.respond("got it");
        assert_eq!(state(&machine), ConversationState::Start);
        assert_eq!(machine.previous(), ConversationState::Start);
    }

    #[test]
    fn help_during_intake_keeps_the_step() {
        let (mut machine, _) = machine_on(date(2024, 7, 1));
        machine.restore_state("input_months");

        machine.respond("help me");
        assert_eq!(state(&machine), ConversationState::Help);

        machine.respond("ok");
        assert_eq!(state(&machine), ConversationState::InputMonths);
        assert_eq!(machine.previous(), ConversationState::InputMonths);
    }

    #[test]
    fn restart_declined_goes_back() {
        let (mut machine, _) = machine_on(date(2024, 7, 1));
        machine.respond("new");
        machine.respond("01-03-2024");

        machine.respond("restart");
        assert_eq!(state(&machine), ConversationState::Restart);

        machine.respond("no");
        assert_eq!(state(&machine), ConversationState::InputMonths);
        assert_eq!(machine.data().start_date(), Some(date(2024, 3, 1)));
    }

    #[test]
    fn help_inside_restart_can_still_go_back() {
        let (mut machine, _) = machine_on(date(2024, 7, 1));
        machine.respond("new");
        machine.respond("01-03-2024");

        machine.respond("restart");
        machine.respond("help");
        machine.respond("ok");
        assert_eq!(state(&machine), ConversationState::Restart);
        assert_eq!(machine.previous(), ConversationState::Restart);

        machine.respond("no, go back");
        assert_eq!(state(&machine), ConversationState::Start);
        assert_eq!(machine.data().start_date(), Some(date(2024, 3, 1)));
    }

    #[test]
    fn restart_confirmed_clears_the_contract() {
        let (mut machine, _) = machine_on(date(2024, 7, 1));
        intake(&mut machine, "2714");

        machine.respond("restart");
        machine.respond("yes");
        assert_eq!(state(&machine), ConversationState::Start);
        assert_eq!(machine.data(), &ContractData::new());
    }

    #[test]
    fn edit_from_changes_returns_to_changes() {
        let (mut machine, _) = machine_on(date(2024, 7, 1));
        intake(&mut machine, "2714");

        machine.respond("yes");
        assert_eq!(state(&machine), ConversationState::Changes);

        machine.respond("the limit");
        assert_eq!(state(&machine), ConversationState::InputKmLimit);

        let reply = machine.respond("9000");
        assert!(reply.starts_with("I saved: 9000 km as your limit."));
        assert_eq!(state(&machine), ConversationState::Changes);

        let review = machine.respond("done");
        assert_eq!(state(&machine), ConversationState::AskForChanges);
        assert!(review.contains("km limit: 9000"));
    }

    // ── Summary ──

    #[test]
    fn incomplete_data_forces_review() {
        let (mut machine, _) = machine_on(date(2024, 7, 1));
        machine.restore_state("ask_for_changes");

        let reply = machine.respond("no");
        assert_eq!(state(&machine), ConversationState::AskForChanges);
        assert!(reply.contains("missing: start date, months, km limit, km driven."));
        assert!(reply.contains("not set"));
    }

    #[test]
    fn contract_ending_today_cannot_be_summarised() {
        let (mut machine, _) = machine_on(date(2024, 11, 30));
        intake(&mut machine, "7900");

        let reply = machine.respond("no");
        assert!(reply.starts_with(replies::CANNOT_COMPUTE));
        assert_eq!(state(&machine), ConversationState::AskForChanges);
    }

    #[test]
    fn save_failure_stays_in_summary() {
        let mut machine = machine_with(Arc::new(BrokenStore), date(2024, 7, 1));
        intake(&mut machine, "2714");
        machine.respond("no");
        assert_eq!(state(&machine), ConversationState::ShowSummary);

        assert_eq!(machine.respond("save it"), replies::SAVE_FAILED);
        assert_eq!(state(&machine), ConversationState::ShowSummary);
        assert!(machine.snapshot().saved_summary_id.is_none());
    }

    // ── Loading ──

    fn store_with_one_summary() -> Arc<InMemorySummaryStore> {
        let store = Arc::new(InMemorySummaryStore::with_seed(1));
        let report = compute(date(2024, 3, 1), 9, 8000, 2714, date(2024, 7, 1)).unwrap();
        store.save(&report.to_data()).unwrap();
        store
    }

    #[test]
    fn load_and_show_saved_summary() {
        let store = store_with_one_summary();
        let mut machine = machine_with(store, date(2024, 8, 1));

        machine.respond("load a saved one");
        assert_eq!(state(&machine), ConversationState::LoadSummary);

        let overview = machine.respond("yes");
        assert_eq!(state(&machine), ConversationState::SummaryOverview);
        assert!(overview.ends_with(&format!("1\n{}", replies::CHOOSE_ONE)));

        let shown = machine.respond("number 1 please");
        assert_eq!(state(&machine), ConversationState::ShowLoadedSummary);
        assert!(shown.contains("~~~~~~~~~~~~~~~~~~ SUMMARY ~~~~~~~~~~~~~~~~~~"));
        assert!(shown.contains("122 of 274 days"));
        assert!(shown.ends_with(replies::LOADED_FOLLOW_UP));
    }

    #[test]
    fn absent_summary_id_returns_to_overview() {
        let store = store_with_one_summary();
        let mut machine = machine_with(store, date(2024, 8, 1));
        machine.restore_state("summary_overview");

        let reply = machine.respond("42");
        assert_eq!(reply, replies::invalid_summary_id(Some(42), &[1].into_iter().collect()));
        assert_eq!(state(&machine), ConversationState::SummaryOverview);
    }

    #[test]
    fn load_with_nothing_saved_starts_a_new_calculation() {
        let (mut machine, _) = machine_on(date(2024, 7, 1));
        let reply = machine.respond("load my old summary");
        assert!(reply.starts_with(replies::NOTHING_TO_LOAD));
        assert_eq!(state(&machine), ConversationState::InputStartdate);
    }

    #[test]
    fn empty_overview_goes_back_to_start() {
        let (mut machine, _) = machine_on(date(2024, 7, 1));
        machine.restore_state("load_summary");

        let reply = machine.respond("show me the list");
        assert!(reply.starts_with(replies::NO_SAVED_SUMMARIES));
        assert_eq!(state(&machine), ConversationState::Start);
    }

    // ── Robustness ──

    #[test]
    fn unknown_state_apologises_and_stays() {
        let (mut machine, _) = machine_on(date(2024, 7, 1));
        machine.restore_state("lunar_base");

        assert_eq!(machine.respond("hello?"), replies::UNKNOWN_STATE);
        assert_eq!(machine.respond("restart"), replies::UNKNOWN_STATE);
        assert_eq!(
            machine.state(),
            &CurrentState::Unknown("lunar_base".into())
        );
        assert_eq!(machine.snapshot().state, "lunar_base");
    }

    #[test]
    fn unknown_transition_target_falls_back() {
        let mut data = BotData::builtin().unwrap();
        data.transitions
            .get_mut("start")
            .unwrap()
            .insert("moon".into(), "lunar_base".into());
        let fallbacks = data.fallbacks.clone();
        let mut machine = DialogueMachine::new(
            Arc::new(data),
            Arc::new(InMemorySummaryStore::with_seed(1)),
        );

        let reply = machine.respond("fly me to the moon");
        assert!(fallbacks.contains(&reply));
        assert_eq!(state(&machine), ConversationState::Start);
    }

    #[test]
    fn every_state_answers_every_input() {
        let inputs = [
            "", "help", "restart", "yes", "no", "42", "01-01-2020", "save", "🚗 vroom",
        ];
        for start in ConversationState::ALL {
            for input in inputs {
                let (mut machine, _) = machine_on(date(2024, 7, 1));
                machine.restore_state(start.name());
                let reply = machine.respond(input);
                assert!(!reply.is_empty(), "empty reply in {start} for {input:?}");
                assert!(machine.state().known().is_some());
            }
        }
    }

    #[test]
    fn same_seed_same_conversation() {
        let (mut a, _) = machine_on(date(2024, 7, 1));
        let (mut b, _) = machine_on(date(2024, 7, 1));
        assert_eq!(a.greet(), b.greet());
        for input in ["what?", "new", "01-03-2024", "9"] {
            assert_eq!(a.respond(input), b.respond(input));
        }
    }

    #[test]
    fn greeting_ends_with_start_prompt() {
        let (mut machine, _) = machine_on(date(2024, 7, 1));
        let data = BotData::builtin().unwrap();
        let greeting = machine.greet();
        let last = greeting.lines().last().unwrap().to_string();
        assert!(data.questions_for("start").contains(&last));
        assert!(data.greetings.iter().any(|g| greeting.starts_with(g.as_str())));
    }

    #[test]
    fn snapshot_serializes_state_names() {
        let (mut machine, _) = machine_on(date(2024, 7, 1));
        machine.respond("new");
        let json = serde_json::to_value(machine.snapshot()).unwrap();
        assert_eq!(json["state"], "input_startdate");
        assert_eq!(json["previous"], "start");
        assert!(json["data"]["months"].is_null());
    }
}
