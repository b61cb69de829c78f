//! Dialogue data: keyword transitions and phrase banks.
//!
//! Four JSON files drive the conversation:
//!
//! | File               | Shape                                   |
//! |--------------------|-----------------------------------------|
//! | `transitions.json` | state → { keyword → target state }      |
//! | `questions.json`   | state → [prompt, ...]                   |
//! | `fallback.json`    | [fallback message, ...]                 |
//! | `greetings.json`   | [greeting, ...]                         |
//!
//! Keyword order within a state is significant: the first keyword contained
//! in the user's message wins. Maps are kept in file order via `IndexMap`.

use indexmap::IndexMap;
use leasebot_core::ConversationState;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::{ConfigError, DialogueConfig};

const TRANSITIONS_FILE: &str = "transitions.json";
const QUESTIONS_FILE: &str = "questions.json";
const FALLBACK_FILE: &str = "fallback.json";
const GREETINGS_FILE: &str = "greetings.json";

const BUILTIN_TRANSITIONS: &str = include_str!("../data/transitions.json");
const BUILTIN_QUESTIONS: &str = include_str!("../data/questions.json");
const BUILTIN_FALLBACK: &str = include_str!("../data/fallback.json");
const BUILTIN_GREETINGS: &str = include_str!("../data/greetings.json");

/// Pseudo-target meaning "go back to the state before this one".
pub const PREVIOUS_TARGET: &str = "previous";

/// Ordered keyword → target-state map for one state.
pub type KeywordMap = IndexMap<String, String>;

/// Everything the dialogue machine reads but never writes.
#[derive(Debug, Clone, PartialEq)]
pub struct BotData {
    pub transitions: IndexMap<String, KeywordMap>,
    pub questions: IndexMap<String, Vec<String>>,
    pub fallbacks: Vec<String>,
    pub greetings: Vec<String>,
}

impl BotData {
    /// The data compiled into the binary.
    pub fn builtin() -> Result<Self, ConfigError> {
        let data = Self {
            transitions: parse(BUILTIN_TRANSITIONS, &builtin_path(TRANSITIONS_FILE))?,
            questions: parse(BUILTIN_QUESTIONS, &builtin_path(QUESTIONS_FILE))?,
            fallbacks: parse(BUILTIN_FALLBACK, &builtin_path(FALLBACK_FILE))?,
            greetings: parse(BUILTIN_GREETINGS, &builtin_path(GREETINGS_FILE))?,
        };
        data.validate()?;
        Ok(data)
    }

    /// Load according to the `[dialogue]` config section.
    pub fn load(config: &DialogueConfig) -> Result<Self, ConfigError> {
        match &config.data_dir {
            Some(dir) => Self::load_dir(dir),
            None => Self::builtin(),
        }
    }

    /// Load from a directory. Any of the four files that is absent falls
    /// back to its built-in version.
    pub fn load_dir(dir: &Path) -> Result<Self, ConfigError> {
        let data = Self {
            transitions: read_or_builtin(dir, TRANSITIONS_FILE, BUILTIN_TRANSITIONS)?,
            questions: read_or_builtin(dir, QUESTIONS_FILE, BUILTIN_QUESTIONS)?,
            fallbacks: read_or_builtin(dir, FALLBACK_FILE, BUILTIN_FALLBACK)?,
            greetings: read_or_builtin(dir, GREETINGS_FILE, BUILTIN_GREETINGS)?,
        };
        data.validate()?;
        info!(
            dir = %dir.display(),
            states = data.transitions.len(),
            "Bot data loaded"
        );
        Ok(data)
    }

    /// Keyword map for a state, if the state has one.
    pub fn transitions_for(&self, state: &str) -> Option<&KeywordMap> {
        self.transitions.get(state)
    }

    /// Prompt variants for a state (empty if none are configured).
    pub fn questions_for(&self, state: &str) -> &[String] {
        self.questions.get(state).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Reject data the machine cannot work with.
    ///
    /// Keywords are matched against lowercased input, so they must be
    /// lowercase themselves. Unknown target states only produce a warning;
    /// routing to them fails at runtime and is reported there.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fallbacks.is_empty() {
            return Err(ConfigError::ValidationError(
                "fallback list must not be empty".into(),
            ));
        }
        if self.greetings.is_empty() {
            return Err(ConfigError::ValidationError(
                "greeting list must not be empty".into(),
            ));
        }

        for (state, keywords) in &self.transitions {
            for (keyword, target) in keywords {
                if keyword.is_empty() || keyword.to_lowercase() != *keyword {
                    return Err(ConfigError::ValidationError(format!(
                        "keyword '{keyword}' in state '{state}' must be non-empty lowercase"
                    )));
                }
                if target != PREVIOUS_TARGET && ConversationState::from_name(target).is_err() {
                    warn!(state = %state, keyword = %keyword, target = %target, "Transition targets an unknown state");
                }
            }
        }

        for state in self.questions.keys() {
            if ConversationState::from_name(state).is_err() {
                warn!(state = %state, "Questions configured for an unknown state");
            }
        }

        Ok(())
    }
}

fn builtin_path(file: &str) -> PathBuf {
    Path::new("<builtin>").join(file)
}

fn parse<T: DeserializeOwned>(content: &str, origin: &Path) -> Result<T, ConfigError> {
    serde_json::from_str(content).map_err(|e| ConfigError::ParseError {
        path: origin.to_path_buf(),
        reason: e.to_string(),
    })
}

fn read_or_builtin<T: DeserializeOwned>(
    dir: &Path,
    file: &str,
    builtin: &str,
) -> Result<T, ConfigError> {
    let path = dir.join(file);
    if !path.exists() {
        debug!(path = %path.display(), "Bot data file missing, using built-in");
        return parse(builtin, &builtin_path(file));
    }

    let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;
    parse(&content, &path)
}
