//! Report periods for expense export

use crate::error::Error;
use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportPeriod {
    #[default]
    Monthly,
    Quarterly,
    Annual,
}

impl ReportPeriod {
    pub const ALL: [ReportPeriod; 3] = [
        ReportPeriod::Monthly,
        ReportPeriod::Quarterly,
        ReportPeriod::Annual,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportPeriod::Monthly => "monthly",
            ReportPeriod::Quarterly => "quarterly",
            ReportPeriod::Annual => "annual",
        }
    }

    /// Whether `date` falls in the period containing `today`
    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        if date.year() != today.year() {
            return false;
        }
        match self {
            ReportPeriod::Monthly => date.month() == today.month(),
            ReportPeriod::Quarterly => date.month0() / 3 == today.month0() / 3,
            ReportPeriod::Annual => true,
        }
    }

    /// Suggested export file name
    pub fn file_name(&self) -> String {
        format!("budget_report_{}.csv", self.as_str())
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportPeriod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" | "month" => Ok(ReportPeriod::Monthly),
            "quarterly" | "quarter" => Ok(ReportPeriod::Quarterly),
            "annual" | "annually" | "yearly" | "year" => Ok(ReportPeriod::Annual),
            other => Err(Error::Invalid {
                message: format!("Unknown report period: {other}"),
            }),
        }
    }
}
