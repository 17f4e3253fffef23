use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;

use crate::error::ReportcheckError;

/// Target month of a reconciliation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReportPeriod {
    year: i32,
    month: u32,
}

impl ReportPeriod {
    pub fn new(year: i32, month: u32) -> Result<Self, ReportcheckError> {
        if !(1..=12).contains(&month) {
            return Err(ReportcheckError::InvalidInput(format!(
                "Month must be between 1 and 12, got {}",
                month
            )));
        }
        Ok(Self { year, month })
    }

    /// Reports are filed for the month that just ended.
    pub fn previous_month(today: NaiveDate) -> Self {
        if today.month() == 1 {
            Self { year: today.year() - 1, month: 12 }
        } else {
            Self { year: today.year(), month: today.month() - 1 }
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for ReportPeriod {
    type Err = ReportcheckError;

    /// Parses `YYYY-MM` (also `YYYY/MM` and `YYYYMM`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || ReportcheckError::InvalidInput(format!("Expected a period like 2025-11, got '{}'", s));

        let (year, month) = match s.split_once(['-', '/']) {
            Some(parts) => parts,
            None if s.len() == 6 && s.is_char_boundary(4) => s.split_at(4),
            None => return Err(invalid()),
        };
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}
