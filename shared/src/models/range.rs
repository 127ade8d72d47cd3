//! History range selection and window resolution

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Length of the relative "week" window in days
pub const WEEK_DAYS: i64 = 7;

/// Length of the relative "month" window in days
pub const MONTH_DAYS: i64 = 30;

/// Which kind of window the operator picked
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RangeKind {
    #[default]
    Week,
    Month,
    /// A single calendar day chosen with the date picker
    Date,
}

impl fmt::Display for RangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeKind::Week => write!(f, "week"),
            RangeKind::Month => write!(f, "month"),
            RangeKind::Date => write!(f, "date"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown range kind: {0}")]
pub struct UnknownRangeKind(pub String);

impl FromStr for RangeKind {
    type Err = UnknownRangeKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "week" => Ok(RangeKind::Week),
            "month" => Ok(RangeKind::Month),
            "date" => Ok(RangeKind::Date),
            other => Err(UnknownRangeKind(other.to_string())),
        }
    }
}

/// Concrete `[from, to]` bounds of a history query, both inclusive
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl ResolvedWindow {
    pub fn contains(&self, at: &DateTime<Utc>) -> bool {
        *at >= self.from && *at <= self.to
    }
}

/// Outcome of resolving a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Resolved(ResolvedWindow),
    /// Date mode without a chosen date; callers skip the query and show
    /// the empty state
    Unresolved,
}

impl Resolution {
    pub fn window(&self) -> Option<ResolvedWindow> {
        match self {
            Resolution::Resolved(window) => Some(*window),
            Resolution::Unresolved => None,
        }
    }
}

/// The range currently chosen in the dashboard controls
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RangeSelection {
    pub kind: RangeKind,
    pub explicit_date: Option<NaiveDate>,
}

impl RangeSelection {
    pub fn new(kind: RangeKind) -> Self {
        Self {
            kind,
            explicit_date: None,
        }
    }

    /// Switch the window kind. A previously chosen date survives so it is
    /// still there when switching back to date mode.
    pub fn set_kind(&mut self, kind: RangeKind) {
        self.kind = kind;
    }

    pub fn set_explicit_date(&mut self, date: NaiveDate) {
        self.explicit_date = Some(date);
    }

    /// Resolve against `now`. Calendar days are interpreted in `now`'s
    /// timezone. Pure; performs no I/O.
    pub fn resolve<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Resolution {
        let now_utc = now.with_timezone(&Utc);
        match self.kind {
            RangeKind::Week => Resolution::Resolved(ResolvedWindow {
                from: now_utc - Duration::days(WEEK_DAYS),
                to: now_utc,
            }),
            RangeKind::Month => Resolution::Resolved(ResolvedWindow {
                from: now_utc - Duration::days(MONTH_DAYS),
                to: now_utc,
            }),
            RangeKind::Date => match self.explicit_date {
                Some(date) => day_window(date, &now.timezone()),
                None => Resolution::Unresolved,
            },
        }
    }
}

/// 00:00:00.000 through 23:59:59.999 of `date` in `tz`
fn day_window<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Resolution {
    let bounds = date
        .and_hms_milli_opt(0, 0, 0, 0)
        .zip(date.and_hms_milli_opt(23, 59, 59, 999));

    let Some((start, end)) = bounds else {
        return Resolution::Unresolved;
    };

    match (local_instant(tz, start, true), local_instant(tz, end, false)) {
        (Some(from), Some(to)) => Resolution::Resolved(ResolvedWindow { from, to }),
        _ => Resolution::Unresolved,
    }
}

/// Map a wall-clock time to an instant. Ambiguous times take the earliest
/// (day start) or latest (day end) mapping; times inside a DST gap move
/// forward by an hour.
fn local_instant<Tz: TimeZone>(
    tz: &Tz,
    naive: NaiveDateTime,
    first: bool,
) -> Option<DateTime<Utc>> {
    let pick = |naive: NaiveDateTime| {
        let mapped = tz.from_local_datetime(&naive);
        if first {
            mapped.earliest()
        } else {
            mapped.latest()
        }
    };

    pick(naive)
        .or_else(|| pick(naive + Duration::hours(1)))
        .map(|at| at.with_timezone(&Utc))
}
