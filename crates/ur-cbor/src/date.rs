//! Epoch-based dates (tag 1).

use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};

/// Seconds per day, for tag-100 day counts.
pub(crate) const SECONDS_PER_DAY: f64 = 86_400.0;

/// A point in time as fractional seconds since the Unix epoch.
#[derive(Clone, Copy, Debug)]
pub struct Date {
    seconds: f64,
}

impl Date {
    /// Create a date from seconds since the epoch.
    #[must_use]
    pub const fn from_timestamp(seconds: f64) -> Self {
        Self { seconds }
    }

    /// Create a date from a whole number of days since the epoch.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // day counts beyond 2^53 are not meaningful dates
    pub fn from_days(days: i64) -> Self {
        Self::from_timestamp(days as f64 * SECONDS_PER_DAY)
    }

    /// Seconds since the epoch.
    #[must_use]
    pub const fn timestamp(&self) -> f64 {
        self.seconds
    }

    /// Whole seconds, if the timestamp has no fractional part and fits `i64`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn whole_seconds(&self) -> Option<i64> {
        let s = self.seconds;
        if s.fract() != 0.0 || !s.is_finite() {
            return None;
        }
        // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
        if s < i64::MIN as f64 || s >= i64::MAX as f64 {
            return None;
        }
        Some(s as i64)
    }

    /// Convert to a `chrono` UTC timestamp, if representable.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        if !self.seconds.is_finite() {
            return None;
        }
        let secs = self.seconds.floor();
        let nanos = ((self.seconds - secs) * 1e9).round().min(999_999_999.0) as u32;
        let secs = i64::try_from(secs as i128).ok()?;
        DateTime::from_timestamp(secs, nanos)
    }
}

impl From<DateTime<Utc>> for Date {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: DateTime<Utc>) -> Self {
        let seconds = value.timestamp() as f64 + f64::from(value.timestamp_subsec_nanos()) / 1e9;
        Self::from_timestamp(seconds)
    }
}

impl PartialEq for Date {
    fn eq(&self, other: &Self) -> bool {
        self.seconds.to_bits() == other.seconds.to_bits()
    }
}

impl Eq for Date {}

impl Hash for Date {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.seconds.to_bits().hash(state);
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S %z")),
            None => write!(f, "{}", self.seconds),
        }
    }
}
