//! Whole-second durations with the `"Hh Mm Ss"` rendering used in reports.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

const SECONDS_PER_HOUR: i64 = 3600;

/// An amount of tracked time, stored as a signed count of whole seconds.
///
/// Values are immutable: every arithmetic operation returns a new `TimeSpent`.
/// The right-hand operand of `+` and `-` may be another `TimeSpent`, a raw
/// second count (`i64`), or a [`TimeDelta`]; all of them are normalized to
/// whole seconds before combining.
///
/// Negative values are allowed (e.g. time remaining after an overtime day).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeSpent(i64);

impl TimeSpent {
    /// Zero seconds.
    pub const ZERO: Self = Self(0);

    /// Creates a value from a second count.
    #[must_use]
    pub const fn from_seconds(seconds: i64) -> Self {
        Self(seconds)
    }

    /// Creates a value from a number of whole hours.
    #[must_use]
    pub const fn from_hours(hours: i64) -> Self {
        Self(hours * SECONDS_PER_HOUR)
    }

    /// Returns the underlying second count.
    #[must_use]
    pub const fn total_seconds(self) -> i64 {
        self.0
    }

    /// Renders as `"{h}h {m}m {s}s"`.
    ///
    /// A negative value is rendered with a single leading `-` followed by the
    /// magnitude split into hours, minutes and seconds, so `-3661` becomes
    /// `"-1h 1m 1s"`.
    #[must_use]
    pub fn human_readable(self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        let hours = magnitude / 3600;
        let minutes = magnitude % 3600 / 60;
        let seconds = magnitude % 60;
        format!("{sign}{hours}h {minutes}m {seconds}s")
    }
}

impl fmt::Display for TimeSpent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.human_readable())
    }
}

impl From<i64> for TimeSpent {
    fn from(seconds: i64) -> Self {
        Self(seconds)
    }
}

impl From<TimeDelta> for TimeSpent {
    /// Truncates toward zero to whole seconds.
    fn from(delta: TimeDelta) -> Self {
        Self(delta.num_seconds())
    }
}

impl<T: Into<Self>> Add<T> for TimeSpent {
    type Output = Self;

    fn add(self, rhs: T) -> Self {
        Self(self.0 + rhs.into().0)
    }
}

impl<T: Into<Self>> Sub<T> for TimeSpent {
    type Output = Self;

    fn sub(self, rhs: T) -> Self {
        Self(self.0 - rhs.into().0)
    }
}

impl Add<TimeSpent> for i64 {
    type Output = TimeSpent;

    fn add(self, rhs: TimeSpent) -> TimeSpent {
        TimeSpent(self + rhs.0)
    }
}

impl Sub<TimeSpent> for i64 {
    type Output = TimeSpent;

    fn sub(self, rhs: TimeSpent) -> TimeSpent {
        TimeSpent(self - rhs.0)
    }
}

impl Add<TimeSpent> for TimeDelta {
    type Output = TimeSpent;

    fn add(self, rhs: TimeSpent) -> TimeSpent {
        TimeSpent::from(self) + rhs
    }
}

impl Sub<TimeSpent> for TimeDelta {
    type Output = TimeSpent;

    fn sub(self, rhs: TimeSpent) -> TimeSpent {
        TimeSpent::from(self) - rhs
    }
}

impl Sum for TimeSpent {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, t| acc + t)
    }
}

impl<'a> Sum<&'a Self> for TimeSpent {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}
