//! The contract summary formula.
//!
//! Everything is derived from four inputs and the current date:
//!
//! 1. end date = start + months − 1 day
//! 2. runtime days = end − start
//! 3. daily average = limit / runtime days
//! 4. monthly average = 30 × daily average
//! 5. day number = today − start (not clamped)
//! 6. allowed so far = day number × daily average
//! 7. difference = allowed so far − driven
//! 8. daily average so far = driven / day number
//! 9. daily average from now = (limit − driven) / (runtime days − day number)
//!
//! Every derived decimal is rounded to one place before it feeds the next step.

use chrono::NaiveDate;
use leasebot_core::error::SummaryError;
use leasebot_core::storage::SummaryData;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dates::{end_date, format_date, runtime_days};

/// Days per month assumed for the monthly average.
const DAYS_PER_MONTH: f64 = 30.0;

/// Derived usage statistics for one leasing contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub runtime_months: u32,
    pub runtime_days: i64,
    pub km_limit: u32,
    pub km_driven: u32,
    pub daily_average: f64,
    pub monthly_average: f64,
    pub day_number: i64,
    pub allowed_kms_so_far: f64,
    pub difference: f64,
    pub daily_average_so_far: f64,
    pub daily_average_from_now: f64,
}

/// Compute the report for a contract as of `today`.
///
/// Fails when the contract starts today (no driving days yet) or ends today
/// (no days left to spread the remaining kilometers over).
pub fn compute(
    start_date: NaiveDate,
    runtime_months: u32,
    km_limit: u32,
    km_driven: u32,
    today: NaiveDate,
) -> Result<SummaryReport, SummaryError> {
    let end = end_date(start_date, runtime_months).ok_or_else(|| SummaryError::DateOutOfRange {
        start: format_date(start_date),
        months: runtime_months,
    })?;
    let runtime_days = runtime_days(start_date, end);

    let daily_average = round1(divide(f64::from(km_limit), runtime_days, "daily average")?);
    let monthly_average = round1(DAYS_PER_MONTH * daily_average);

    let day_number = (today - start_date).num_days();
    let allowed_kms_so_far = round1(day_number as f64 * daily_average);
    let difference = round1(allowed_kms_so_far - f64::from(km_driven));
    let daily_average_so_far = round1(divide(
        f64::from(km_driven),
        day_number,
        "daily average so far",
    )?);
    let daily_average_from_now = round1(divide(
        f64::from(km_limit) - f64::from(km_driven),
        runtime_days - day_number,
        "daily average from now",
    )?);

    debug!(
        start = %start_date,
        end = %end,
        runtime_days,
        day_number,
        "Contract summary computed"
    );

    Ok(SummaryReport {
        start_date,
        end_date: end,
        runtime_months,
        runtime_days,
        km_limit,
        km_driven,
        daily_average,
        monthly_average,
        day_number,
        allowed_kms_so_far,
        difference,
        daily_average_so_far,
        daily_average_from_now,
    })
}

impl SummaryReport {
    /// The labelled display values, in report order.
    pub fn to_data(&self) -> SummaryData {
        let mut data = SummaryData::new();
        data.push(
            "contract",
            format!("{} km over {} months", self.km_limit, self.runtime_months),
        );
        data.push("start date", format_date(self.start_date));
        data.push("end date", format_date(self.end_date));
        data.push("daily average", format!("{:.1} km/day", self.daily_average));
        data.push("monthly average", format!("{:.1} km/month", self.monthly_average));
        data.push(
            "day",
            format!("{} of {} days", self.day_number, self.runtime_days),
        );
        data.push("allowed kms so far", format!("{:.1} km", self.allowed_kms_so_far));
        data.push("driven", format!("{} km", self.km_driven));
        data.push("difference", format!("{:.1} km", self.difference));
        data.push(
            "daily average so far",
            format!("{:.1} km/day", self.daily_average_so_far),
        );
        data.push(
            "daily average from now",
            format!("{:.1} km/day", self.daily_average_from_now),
        );
        data
    }
}

fn divide(numerator: f64, denominator: i64, metric: &'static str) -> Result<f64, SummaryError> {
    if denominator == 0 {
        return Err(SummaryError::DivisionByZero { metric });
    }
    Ok(numerator / denominator as f64)
}

/// One decimal place, exact halves to the even neighbour.
fn round1(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}
