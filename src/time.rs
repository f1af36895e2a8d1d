//! Relative timestamps of datasets.
//!
//! Absolute times are plain [`chrono::DateTime<Utc>`] values held by a
//! [`DatasetGroup`](crate::DatasetGroup) as its reference time. Each dataset only
//! stores its offset from that reference.

use chrono::{DateTime, Duration, Utc};

/// Unit used to express a relative timestamp as a floating point number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeUnit {
    Milliseconds,
    Seconds,
    Minutes,
    #[default]
    Hours,
    Days,
    Weeks,
}

impl TimeUnit {
    fn milliseconds(self) -> f64 {
        match self {
            TimeUnit::Milliseconds => 1.0,
            TimeUnit::Seconds => 1_000.0,
            TimeUnit::Minutes => 60_000.0,
            TimeUnit::Hours => 3_600_000.0,
            TimeUnit::Days => 86_400_000.0,
            TimeUnit::Weeks => 604_800_000.0,
        }
    }
}

/// Offset of a dataset from its group's reference time, kept in whole milliseconds.
///
/// Offsets beyond the range of a [`Duration`] saturate at its ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RelativeTimestamp {
    milliseconds: i64,
}

impl RelativeTimestamp {
    pub fn new(value: f64, unit: TimeUnit) -> Self {
        // `i64::MIN` milliseconds is outside the range of a `Duration`
        let milliseconds = ((value * unit.milliseconds()).round() as i64).max(-i64::MAX);
        Self { milliseconds }
    }

    /// The offset expressed in `unit`
    pub fn value(&self, unit: TimeUnit) -> f64 {
        self.milliseconds as f64 / unit.milliseconds()
    }

    pub fn as_duration(&self) -> Duration {
        Duration::milliseconds(self.milliseconds)
    }

    /// Absolute time obtained by applying this offset to `reference`, `None` when
    /// it falls outside the representable dates
    pub fn after(&self, reference: &DateTime<Utc>) -> Option<DateTime<Utc>> {
        reference.checked_add_signed(self.as_duration())
    }
}

impl From<Duration> for RelativeTimestamp {
    fn from(duration: Duration) -> Self {
        Self {
            milliseconds: duration.num_milliseconds(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    #[test]
    fn converts_between_units() {
        let t = RelativeTimestamp::new(1.5, TimeUnit::Hours);
        assert_relative_eq!(t.value(TimeUnit::Minutes), 90.0);
        assert_relative_eq!(t.value(TimeUnit::Seconds), 5400.0);
        assert_relative_eq!(t.value(TimeUnit::Days), 1.5 / 24.0);

        let week = RelativeTimestamp::new(7.0, TimeUnit::Days);
        assert_eq!(week, RelativeTimestamp::new(1.0, TimeUnit::Weeks));
    }

    #[test]
    fn default_is_zero_hours() {
        assert_eq!(TimeUnit::default(), TimeUnit::Hours);
        assert_relative_eq!(RelativeTimestamp::default().value(TimeUnit::Hours), 0.0);
    }

    #[test]
    fn absolute_time_from_reference() {
        let reference = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let t = RelativeTimestamp::new(36.0, TimeUnit::Hours);
        let expected = Utc.with_ymd_and_hms(2020, 1, 2, 12, 0, 0).unwrap();
        assert_eq!(t.after(&reference), Some(expected));

        let back = RelativeTimestamp::from(expected - reference);
        assert_eq!(back, t);
    }

    #[test]
    fn extreme_offsets_do_not_overflow() {
        let reference = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();

        let far = RelativeTimestamp::new(1.0e12, TimeUnit::Hours);
        assert_eq!(far.after(&reference), None);

        let lowest = RelativeTimestamp::new(f64::NEG_INFINITY, TimeUnit::Hours);
        assert_eq!(lowest.as_duration().num_milliseconds(), -i64::MAX);
        assert_eq!(lowest.after(&reference), None);

        let nan = RelativeTimestamp::new(f64::NAN, TimeUnit::Days);
        assert_eq!(nan, RelativeTimestamp::default());
    }
}
