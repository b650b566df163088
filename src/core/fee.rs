use chrono::{DateTime, Duration, Utc};

pub const DEFAULT_HOURLY_RATE: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSchedule {
    hourly_rate: u64,
}

impl FeeSchedule {
    pub fn new(hourly_rate: u64) -> Self {
        Self { hourly_rate }
    }

    /// Started hours between entry and exit. Partial hours count as a full hour.
    pub fn billable_hours(entry_time: DateTime<Utc>, exit_time: DateTime<Utc>) -> i64 {
        let elapsed_ms = (exit_time - entry_time).num_milliseconds().max(0);
        let hour_ms = Duration::hours(1).num_milliseconds();
        (elapsed_ms + hour_ms - 1) / hour_ms
    }

    pub fn fee_for(&self, hours: i64) -> u64 {
        hours.max(0) as u64 * self.hourly_rate
    }

    pub fn charge(&self, entry_time: DateTime<Utc>, exit_time: DateTime<Utc>) -> (i64, u64) {
        let hours = Self::billable_hours(entry_time, exit_time);
        (hours, self.fee_for(hours))
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self::new(DEFAULT_HOURLY_RATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-03-01T08:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_exact_hour_is_one_hour() {
        let (hours, fee) = FeeSchedule::default().charge(entry(), entry() + Duration::minutes(60));
        assert_eq!(hours, 1);
        assert_eq!(fee, 10);
    }

    #[test]
    fn test_partial_hour_rounds_up() {
        let (hours, fee) = FeeSchedule::default().charge(entry(), entry() + Duration::minutes(61));
        assert_eq!(hours, 2);
        assert_eq!(fee, 20);

        let (hours, _) = FeeSchedule::default().charge(entry(), entry() + Duration::milliseconds(1));
        assert_eq!(hours, 1);
    }

    #[test]
    fn test_no_elapsed_time_is_free() {
        assert_eq!(FeeSchedule::default().charge(entry(), entry()), (0, 0));
    }

    #[test]
    fn test_clock_skew_clamps_to_zero() {
        let (hours, fee) = FeeSchedule::default().charge(entry(), entry() - Duration::minutes(5));
        assert_eq!(hours, 0);
        assert_eq!(fee, 0);
    }

    #[test]
    fn test_custom_rate() {
        let schedule = FeeSchedule::new(25);
        assert_eq!(schedule.charge(entry(), entry() + Duration::minutes(150)), (3, 75));
    }
}
