//! Fixed reply texts that are not drawn from the phrase banks.

use leasebot_core::{ContractData, ContractField};
use std::collections::BTreeSet;

pub const UNKNOWN_STATE: &str =
    "Sorry, I lost track of where we are in our conversation. Please restart the chat.";

pub const NO_SAVED_SUMMARIES: &str = "There are no saved summaries yet.";

pub const NOTHING_TO_LOAD: &str =
    "There are no saved summaries yet, so let's calculate a new one.";

pub const CHOOSE_ONE: &str = "Please choose one.";

pub const LOADED_FOLLOW_UP: &str = "Do you want to load another summary or calculate a new one?";

pub const MODIFY_QUESTION: &str = "Do you want to modify any details?";

pub const SAVE_QUESTION: &str = "Do you want me to save this summary?";

pub const SAVE_FAILED: &str =
    "Sorry, your summary could not be saved. Do you want me to try again?";

pub const CANNOT_COMPUTE: &str = "I can't calculate a summary for a contract that starts or ends today. Please check the start date and the months.";

pub const INVALID_START_DATE: &str =
    "The start date has to be at least one day in the past. Please enter it as DD-MM-YYYY.";

/// Corrective re-prompt for a rejected value.
pub fn invalid_value(field: ContractField) -> &'static str {
    match field {
        ContractField::StartDate => INVALID_START_DATE,
        ContractField::Months => {
            "The runtime has to be at least one month. How many months does your contract run?"
        }
        ContractField::KmLimit => {
            "The kilometer limit has to be greater than zero. What is the limit of your contract?"
        }
        ContractField::KmDriven => {
            "The kilometers driven can't be negative. How many kilometers have you driven so far?"
        }
    }
}

/// "I saved: …" read back from the collected data.
pub fn acknowledgment(field: ContractField, data: &ContractData) -> String {
    let value = data.describe(field);
    match field {
        ContractField::StartDate => format!("I saved: {value}."),
        ContractField::Months => format!("I saved: {value} months."),
        ContractField::KmLimit => format!("I saved: {value} km as your limit."),
        ContractField::KmDriven => format!("I saved: {value} km driven."),
    }
}

pub fn missing_data(fields: &[ContractField]) -> String {
    let labels: Vec<&str> = fields.iter().map(|f| f.label()).collect();
    format!(
        "I can't calculate the summary yet, these details are missing: {}.",
        labels.join(", ")
    )
}

pub fn join_ids(ids: &BTreeSet<u32>) -> String {
    ids.iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn invalid_summary_id(id: Option<u32>, available: &BTreeSet<u32>) -> String {
    let head = match id {
        Some(id) => format!("Sorry, there is no summary with the ID {id}."),
        None => "Sorry, I don't know which summary you mean.".to_string(),
    };
    if available.is_empty() {
        format!("{head} {NO_SAVED_SUMMARIES} Say 'new' to calculate one.")
    } else {
        format!("{head} Please choose one of: {}.", join_ids(available))
    }
}

pub fn saved_id(id: u32) -> String {
    format!("The ID of your summary is {id}. Say anything to continue.")
}
