//! Range checks applied before a value is stored in [`ContractData`].
//!
//! [`ContractData`]: leasebot_core::ContractData

use chrono::{Days, NaiveDate};
use leasebot_core::{ContractField, DialogueError};

/// A start date must lie at least one full day before `today`.
pub fn is_valid_start_date(date: NaiveDate, today: NaiveDate) -> bool {
    today
        .checked_sub_days(Days::new(1))
        .is_some_and(|yesterday| date <= yesterday)
}

/// Greater than zero.
pub fn is_strictly_positive(value: i64) -> bool {
    value > 0
}

/// Zero or more.
pub fn is_non_negative(value: i64) -> bool {
    value >= 0
}

/// Check a start date, naming the rule on failure.
pub fn validate_start_date(date: NaiveDate, today: NaiveDate) -> Result<NaiveDate, DialogueError> {
    if is_valid_start_date(date, today) {
        Ok(date)
    } else {
        Err(DialogueError::ValidationFailed {
            field: ContractField::StartDate.label().into(),
            reason: "must be at least one day in the past".into(),
        })
    }
}

/// Check a numeric field against its rule and narrow it to `u32`.
///
/// Months and km limit must be strictly positive, km driven may be zero.
pub fn validate_count(field: ContractField, value: i64) -> Result<u32, DialogueError> {
    let (ok, rule) = match field {
        ContractField::Months | ContractField::KmLimit => {
            (is_strictly_positive(value), "must be greater than zero")
        }
        ContractField::KmDriven => (is_non_negative(value), "must not be negative"),
        ContractField::StartDate => (false, "is a date, not a number"),
    };

    let rejected = || DialogueError::ValidationFailed {
        field: field.label().into(),
        reason: rule.into(),
    };
    if !ok {
        return Err(rejected());
    }
    u32::try_from(value).map_err(|_| rejected())
}
