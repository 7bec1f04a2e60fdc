//! Wall-clock timing of search and validation phases

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Start and end timestamps of one phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timing {
    started_at: DateTime<Utc>,
    ended_at: DateTime<Utc>,
}

impl Timing {
    /// Record a finished phase.
    #[must_use]
    pub const fn new(started_at: DateTime<Utc>, ended_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            ended_at,
        }
    }

    /// When the phase began.
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// When the phase finished.
    #[must_use]
    pub const fn ended_at(&self) -> DateTime<Utc> {
        self.ended_at
    }

    /// Elapsed wall-clock time.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.ended_at - self.started_at
    }

    /// Elapsed time as `HH:MM:SS`.
    #[must_use]
    pub fn formatted(&self) -> String {
        format_duration(self.elapsed())
    }
}

/// Format a duration as `HH:MM:SS`, truncating fractional seconds.
///
/// Negative durations clamp to `00:00:00`; hours are not wrapped at 24.
///
/// ```rust
/// use chrono::Duration;
/// use searchlog::timing::format_duration;
///
/// assert_eq!(format_duration(Duration::seconds(3725)), "01:02:05");
/// ```
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let total = duration.num_seconds().max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::zero()), "00:00:00");
        assert_eq!(format_duration(Duration::milliseconds(59_999)), "00:00:59");
        assert_eq!(format_duration(Duration::seconds(90_061)), "25:01:01");
        assert_eq!(format_duration(Duration::seconds(-5)), "00:00:00");
    }

    #[test]
    fn test_timing_elapsed() {
        let start = Utc::now();
        let timing = Timing::new(start, start + Duration::seconds(61));
        assert_eq!(timing.elapsed(), Duration::seconds(61));
        assert_eq!(timing.formatted(), "00:01:01");
    }
}
