//! Time-windowed match statistics
//!
//! Statistics are aggregated per killer character and per map, separately for
//! each supported time window (day, week, month, year). All windows are
//! updated together through [`Stats::record_match`] so that cross-period
//! reporting stays consistent.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration as ChronoDuration, Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Outcome of one match from the survivor's perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Escaped,
    Died,
}

/// Counters accumulated for one killer character or one map
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchAggregate {
    #[serde(default)]
    pub escapes: u32,
    #[serde(default)]
    pub deaths: u32,
    /// Cumulative match duration in seconds
    #[serde(rename = "secondsPlayed", default)]
    pub seconds_played: u64,
}

impl MatchAggregate {
    fn record(&mut self, outcome: MatchOutcome, duration_secs: u64) {
        match outcome {
            MatchOutcome::Escaped => self.escapes += 1,
            MatchOutcome::Died => self.deaths += 1,
        }
        self.seconds_played += duration_secs;
    }
}

/// Supported aggregation windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// Last representable instant of a date (the windows are closed-max
/// intervals, end = 23:59:59.999999999)
fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    let max = NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).unwrap();
    date.and_time(max)
}

fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

impl Period {
    /// First instant of the window containing `reference`
    pub fn start(&self, reference: NaiveDateTime) -> NaiveDateTime {
        let date = reference.date();
        match self {
            Period::Daily => start_of_day(date),
            Period::Weekly => {
                let monday =
                    date - ChronoDuration::days(date.weekday().num_days_from_monday() as i64);
                start_of_day(monday)
            }
            Period::Monthly => start_of_day(date.with_day(1).unwrap()),
            Period::Yearly => {
                start_of_day(NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap())
            }
        }
    }

    /// Last instant of the window containing `reference`
    pub fn end(&self, reference: NaiveDateTime) -> NaiveDateTime {
        let date = reference.date();
        match self {
            Period::Daily => end_of_day(date),
            Period::Weekly => {
                let monday =
                    date - ChronoDuration::days(date.weekday().num_days_from_monday() as i64);
                end_of_day(monday + ChronoDuration::days(6))
            }
            Period::Monthly => {
                let (year, month) = if date.month() == 12 {
                    (date.year() + 1, 1)
                } else {
                    (date.year(), date.month() + 1)
                };
                let next_month = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
                end_of_day(next_month.pred_opt().unwrap())
            }
            Period::Yearly => {
                end_of_day(NaiveDate::from_ymd_opt(date.year(), 12, 31).unwrap())
            }
        }
    }
}

/// Aggregated statistics for one time window
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PeriodStats {
    pub period: Period,
    #[serde(rename = "periodStart")]
    pub period_start: NaiveDateTime,
    #[serde(rename = "periodEnd")]
    pub period_end: NaiveDateTime,
    /// Killer character name -> counters
    #[serde(rename = "killerStats", default)]
    pub per_character: BTreeMap<String, MatchAggregate>,
    /// Map name -> counters
    #[serde(rename = "mapStats", default)]
    pub per_location: BTreeMap<String, MatchAggregate>,
}

impl PeriodStats {
    /// Fresh window of `period` containing `reference`
    pub fn new(period: Period, reference: NaiveDateTime) -> Self {
        Self {
            period,
            period_start: period.start(reference),
            period_end: period.end(reference),
            per_character: BTreeMap::new(),
            per_location: BTreeMap::new(),
        }
    }

    /// Whether `instant` falls inside this window
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.period_start <= instant && instant <= self.period_end
    }

    fn record(&mut self, character: &str, location: &str, outcome: MatchOutcome, duration_secs: u64) {
        self.per_character
            .entry(character.to_string())
            .or_default()
            .record(outcome, duration_secs);
        self.per_location
            .entry(location.to_string())
            .or_default()
            .record(outcome, duration_secs);
    }

    /// Roll over to a fresh window containing `instant` if the current one
    /// has been left behind. Returns the closed window, if any.
    fn roll_over_if_elapsed(&mut self, instant: NaiveDateTime) -> Option<PeriodStats> {
        if self.contains(instant) {
            return None;
        }
        let closed = self.clone();
        *self = PeriodStats::new(self.period, instant);
        Some(closed)
    }
}

/// One window per supported period kind, updated in lockstep
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Stats {
    pub daily: PeriodStats,
    pub weekly: PeriodStats,
    pub monthly: PeriodStats,
    pub yearly: PeriodStats,
}

impl Stats {
    /// Windows containing `reference`
    pub fn new(reference: NaiveDateTime) -> Self {
        Self {
            daily: PeriodStats::new(Period::Daily, reference),
            weekly: PeriodStats::new(Period::Weekly, reference),
            monthly: PeriodStats::new(Period::Monthly, reference),
            yearly: PeriodStats::new(Period::Yearly, reference),
        }
    }

    /// Record one match outcome at instant `at` into every window.
    ///
    /// This is the only mutation entry point; a window whose boundary has
    /// passed is replaced by a fresh one before the outcome is recorded.
    pub fn record_match(
        &mut self,
        character: &str,
        location: &str,
        outcome: MatchOutcome,
        duration_secs: u64,
        at: NaiveDateTime,
    ) {
        for window in [
            &mut self.daily,
            &mut self.weekly,
            &mut self.monthly,
            &mut self.yearly,
        ] {
            window.roll_over_if_elapsed(at);
            window.record(character, location, outcome, duration_secs);
        }
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self::new(Local::now().naive_local())
    }
}
