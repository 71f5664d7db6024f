//! Period definitions for timeline bucketing.
//!
//! Every period maps to one row of a rule table: how far a bucket steps,
//! where a bucket starts, and how its label is printed.

use crate::utils::error::AnalyticsError;
use chrono::{DateTime, Datelike, Days, Duration, FixedOffset, Months, TimeZone, Timelike};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bucket granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Hourly = 0,
    Daily = 1,
    Weekly = 2,
    Monthly = 3,
}

/// Distance between consecutive bucket starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Hours(i64),
    Days(u64),
    Months(u32),
}

/// Where the current period instance begins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    TopOfHour,
    Midnight,
    MondayMidnight,
    FirstOfMonth,
}

/// How bucket labels are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelFormat {
    /// `Jan`
    MonthAbbrev,
    /// `14:00`
    HourOfDay,
    /// `2024-03-04T00:00:00+00:00`
    Iso8601,
}

impl LabelFormat {
    fn pattern(self) -> &'static str {
        match self {
            LabelFormat::MonthAbbrev => "%b",
            LabelFormat::HourOfDay => "%H:00",
            LabelFormat::Iso8601 => "%Y-%m-%dT%H:%M:%S%:z",
        }
    }
}

/// One row of the period table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodRule {
    pub step: Step,
    pub alignment: Alignment,
    pub label: LabelFormat,
}

/// Indexed by `Period as usize`
const PERIOD_RULES: [PeriodRule; 4] = [
    PeriodRule {
        step: Step::Hours(1),
        alignment: Alignment::TopOfHour,
        label: LabelFormat::HourOfDay,
    },
    PeriodRule {
        step: Step::Days(1),
        alignment: Alignment::Midnight,
        label: LabelFormat::Iso8601,
    },
    PeriodRule {
        step: Step::Days(7),
        alignment: Alignment::MondayMidnight,
        label: LabelFormat::Iso8601,
    },
    PeriodRule {
        step: Step::Months(1),
        alignment: Alignment::FirstOfMonth,
        label: LabelFormat::MonthAbbrev,
    },
];

impl Period {
    pub const ALL: [Period; 4] = [Period::Hourly, Period::Daily, Period::Weekly, Period::Monthly];

    /// Rule row for this period
    pub fn rule(self) -> &'static PeriodRule {
        &PERIOD_RULES[self as usize]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Period::Hourly => "hourly",
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
        }
    }

    /// Whether `name` requests an explicit window, ignoring case and padding
    pub fn is_custom(name: &str) -> bool {
        name.trim().eq_ignore_ascii_case("custom")
    }

    /// Parse a period name, falling back to monthly for anything unknown
    ///
    /// **Public** - unknown names (including "custom") never fail
    pub fn parse_lenient(name: &str) -> Period {
        match name.parse::<Period>() {
            Ok(period) => period,
            Err(_) if Period::is_custom(name) => {
                debug!("Custom window uses monthly bucketing");
                Period::Monthly
            }
            Err(err) => {
                warn!("{}, falling back to monthly", err);
                Period::Monthly
            }
        }
    }

    /// Start of the period instance containing `at`
    pub fn align(
        self,
        at: DateTime<FixedOffset>,
    ) -> Result<DateTime<FixedOffset>, AnalyticsError> {
        let date = at.date_naive();

        let start_date = match self.rule().alignment {
            Alignment::TopOfHour | Alignment::Midnight => Some(date),
            Alignment::MondayMidnight => {
                let since_monday = u64::from(at.weekday().num_days_from_monday());
                date.checked_sub_days(Days::new(since_monday))
            }
            Alignment::FirstOfMonth => date.with_day(1),
        };

        let hour = match self.rule().alignment {
            Alignment::TopOfHour => at.hour(),
            _ => 0,
        };

        start_date
            .and_then(|d| d.and_hms_opt(hour, 0, 0))
            .and_then(|naive| at.offset().from_local_datetime(&naive).single())
            .ok_or_else(|| AnalyticsError::TimeOutOfRange(at.to_rfc3339()))
    }

    /// Instant one period before `at`
    pub fn step_back(
        self,
        at: DateTime<FixedOffset>,
    ) -> Result<DateTime<FixedOffset>, AnalyticsError> {
        let previous = match self.rule().step {
            Step::Hours(hours) => at.checked_sub_signed(Duration::hours(hours)),
            Step::Days(days) => at.checked_sub_days(Days::new(days)),
            Step::Months(months) => at.checked_sub_months(Months::new(months)),
        };

        previous.ok_or_else(|| AnalyticsError::TimeOutOfRange(at.to_rfc3339()))
    }

    /// Bucket label for a bucket starting at `start`
    pub fn label(self, start: DateTime<FixedOffset>) -> String {
        start.format(self.rule().label.pattern()).to_string()
    }
}

/// Returned by strict parsing of an unknown period name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPeriod(pub String);

impl fmt::Display for UnknownPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown period '{}'", self.0)
    }
}

impl std::error::Error for UnknownPeriod {}

impl FromStr for Period {
    type Err = UnknownPeriod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Period::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownPeriod(s.to_string()))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
