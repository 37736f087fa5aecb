//! One-day observation windows and their sanity checks.
//!
//! A window for date D covers midnight UTC of D to midnight UTC of D+1. With
//! `count` observations at fixed intervals, the first sample is stamped one
//! interval after the opening midnight and the last exactly at the closing
//! midnight (for 96 samples: 00:15 through 24:00).

use crate::error::EncodeError;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

pub const SECONDS_PER_DAY: i64 = 86_400;

/// A single market sample as delivered by a price provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    /// Epoch seconds, UTC.
    pub time: i64,
    pub close: f64,
}

/// Expected shape of one day's observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    date: NaiveDate,
    start: i64,
    interval_secs: i64,
    count: usize,
}

impl DayWindow {
    /// Window for `date` holding `count` evenly spaced observations.
    ///
    /// The spacing must be a whole number of minutes, since providers aggregate
    /// by minute.
    pub fn for_date(date: NaiveDate, count: usize) -> Result<Self, EncodeError> {
        if count == 0 {
            return Err(EncodeError::integrity(
                "a day window needs at least one observation",
            ));
        }
        let count_i = count as i64;
        if SECONDS_PER_DAY % count_i != 0 || (SECONDS_PER_DAY / count_i) % 60 != 0 {
            return Err(EncodeError::integrity(format!(
                "{count} observations do not split a day into whole-minute intervals"
            )));
        }

        Ok(Self {
            date,
            start: date.and_time(NaiveTime::MIN).and_utc().timestamp(),
            interval_secs: SECONDS_PER_DAY / count_i,
            count,
        })
    }

    /// Calendar day this window covers.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Number of observations the window must hold.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Spacing between consecutive observations.
    pub fn interval_secs(&self) -> i64 {
        self.interval_secs
    }

    pub fn interval_minutes(&self) -> i64 {
        self.interval_secs / 60
    }

    /// Opening midnight (epoch seconds).
    pub fn start(&self) -> i64 {
        self.start
    }

    /// Closing midnight, which is also the timestamp of the last observation.
    pub fn end(&self) -> i64 {
        self.start + SECONDS_PER_DAY
    }

    /// Timestamp of the first observation, one interval after midnight.
    pub fn first_expected(&self) -> i64 {
        self.start + self.interval_secs
    }

    /// Every timestamp the window expects, oldest first.
    pub fn expected_times(&self) -> impl Iterator<Item = i64> {
        let (start, step) = (self.start, self.interval_secs);
        (1..=self.count as i64).map(move |k| start + k * step)
    }

    /// True if `time` falls inside `(start, end]`.
    pub fn contains(&self, time: i64) -> bool {
        time > self.start && time <= self.end()
    }
}

/// Reject observation sets that drifted from the expected window.
pub fn validate_window(
    observations: &[PriceObservation],
    window: &DayWindow,
) -> Result<(), EncodeError> {
    if observations.len() != window.count() {
        return Err(EncodeError::integrity(format!(
            "expected {} observations for {}, got {}",
            window.count(),
            window.date(),
            observations.len()
        )));
    }

    let (first, last) = match (observations.first(), observations.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(EncodeError::integrity("empty observation window")),
    };

    if first.time != window.first_expected() {
        return Err(EncodeError::integrity(format!(
            "first observation at t={} but window for {} starts at t={}",
            first.time,
            window.date(),
            window.first_expected()
        )));
    }

    if last.time != window.end() {
        return Err(EncodeError::integrity(format!(
            "last observation at t={} but window for {} ends at t={}",
            last.time,
            window.date(),
            window.end()
        )));
    }

    for pair in observations.windows(2) {
        let step = pair[1].time - pair[0].time;
        if step != window.interval_secs() {
            return Err(EncodeError::integrity(format!(
                "gap of {step}s between t={} and t={} (expected {}s)",
                pair[0].time,
                pair[1].time,
                window.interval_secs()
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn april_9() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 4, 9).unwrap()
    }

    fn full_day(window: &DayWindow) -> Vec<PriceObservation> {
        window
            .expected_times()
            .map(|time| PriceObservation { time, close: 100.0 })
            .collect()
    }

    #[test]
    fn default_window_is_fifteen_minutes() {
        let w = DayWindow::for_date(april_9(), 96).unwrap();
        assert_eq!(w.interval_minutes(), 15);
        // 2023-04-09T00:00:00Z
        assert_eq!(w.start(), 1_680_998_400);
        assert_eq!(w.first_expected(), 1_680_998_400 + 900);
        assert_eq!(w.end(), 1_681_084_800);
        assert_eq!(w.expected_times().last(), Some(w.end()));
    }

    #[test]
    fn uneven_counts_are_rejected() {
        assert!(DayWindow::for_date(april_9(), 140).is_err());
        assert!(DayWindow::for_date(april_9(), 0).is_err());
        assert!(DayWindow::for_date(april_9(), 60).is_ok()); // 24-minute bars
    }

    #[test]
    fn accepts_aligned_day() {
        let w = DayWindow::for_date(april_9(), 96).unwrap();
        assert!(validate_window(&full_day(&w), &w).is_ok());
    }

    #[test]
    fn rejects_wrong_count() {
        let w = DayWindow::for_date(april_9(), 96).unwrap();
        let mut obs = full_day(&w);
        obs.pop();
        assert!(matches!(
            validate_window(&obs, &w),
            Err(EncodeError::DataIntegrity(_))
        ));
    }

    #[test]
    fn rejects_shifted_window() {
        let w = DayWindow::for_date(april_9(), 96).unwrap();
        let shifted: Vec<_> = full_day(&w)
            .into_iter()
            .map(|o| PriceObservation {
                time: o.time - 900,
                ..o
            })
            .collect();
        let err = validate_window(&shifted, &w).unwrap_err();
        assert!(err.to_string().contains("first observation"));
    }

    #[test]
    fn rejects_interior_gap() {
        let w = DayWindow::for_date(april_9(), 96).unwrap();
        let mut obs = full_day(&w);
        obs[40].time += 60;
        let err = validate_window(&obs, &w).unwrap_err();
        assert!(err.to_string().contains("gap"));
    }

    #[test]
    fn contains_is_half_open_at_start() {
        let w = DayWindow::for_date(april_9(), 96).unwrap();
        assert!(!w.contains(w.start()));
        assert!(w.contains(w.first_expected()));
        assert!(w.contains(w.end()));
        assert!(!w.contains(w.end() + 1));
    }
}
