//! The contract values collected over the course of one conversation.
//!
//! Every field starts out unset. The dialogue validates a value before it
//! calls a setter; the setters themselves accept anything.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four collected contract values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractField {
    StartDate,
    Months,
    KmLimit,
    KmDriven,
}

impl ContractField {
    /// Human-readable label used in replies.
    pub fn label(self) -> &'static str {
        match self {
            Self::StartDate => "start date",
            Self::Months => "months",
            Self::KmLimit => "km limit",
            Self::KmDriven => "km driven",
        }
    }
}

/// In-progress leasing contract data for a single session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractData {
    start_date: Option<NaiveDate>,
    months: Option<u32>,
    km_limit: Option<u32>,
    km_driven: Option<u32>,
}

impl ContractData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    pub fn set_start_date(&mut self, date: NaiveDate) {
        self.start_date = Some(date);
    }

    pub fn months(&self) -> Option<u32> {
        self.months
    }

    pub fn set_months(&mut self, months: u32) {
        self.months = Some(months);
    }

    pub fn km_limit(&self) -> Option<u32> {
        self.km_limit
    }

    pub fn set_km_limit(&mut self, km_limit: u32) {
        self.km_limit = Some(km_limit);
    }

    pub fn km_driven(&self) -> Option<u32> {
        self.km_driven
    }

    pub fn set_km_driven(&mut self, km_driven: u32) {
        self.km_driven = Some(km_driven);
    }

    /// True once all four values have been supplied.
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Fields that still have no value, in intake order.
    pub fn missing_fields(&self) -> Vec<ContractField> {
        let mut missing = Vec::new();
        if self.start_date.is_none() {
            missing.push(ContractField::StartDate);
        }
        if self.months.is_none() {
            missing.push(ContractField::Months);
        }
        if self.km_limit.is_none() {
            missing.push(ContractField::KmLimit);
        }
        if self.km_driven.is_none() {
            missing.push(ContractField::KmDriven);
        }
        missing
    }

    /// Forget every collected value.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Display form of a single field, `not set` when absent.
    pub fn describe(&self, field: ContractField) -> String {
        let value = match field {
            ContractField::StartDate => self.start_date.map(|d| d.format("%d.%m.%Y").to_string()),
            ContractField::Months => self.months.map(|v| v.to_string()),
            ContractField::KmLimit => self.km_limit.map(|v| v.to_string()),
            ContractField::KmDriven => self.km_driven.map(|v| v.to_string()),
        };
        value.unwrap_or_else(|| "not set".to_string())
    }
}

impl fmt::Display for ContractData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  start date: {},", self.describe(ContractField::StartDate))?;
        writeln!(f, "  months: {},", self.describe(ContractField::Months))?;
        writeln!(f, "  km limit: {},", self.describe(ContractField::KmLimit))?;
        writeln!(f, "  km driven: {}", self.describe(ContractField::KmDriven))
    }
}
