use chrono::{DateTime, Duration, Utc};

pub const DEFAULT_RETENTION_DAYS: i64 = 365;

/// Validated retention period. A customer is inactive when it owns no order
/// created inside the trailing window of this many days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    retention_days: i64,
}

impl RetentionPolicy {
    /// Returns an instance of `RetentionPolicy` if the period is usable.
    /// Zero and negative periods are rejected before any store access.
    pub fn new(retention_days: i64) -> Result<Self, String> {
        if retention_days <= 0 {
            return Err(format!(
                "Invalid retention period: {retention_days} days. The period must be at least one day."
            ));
        }
        Ok(Self { retention_days })
    }

    pub fn retention_days(&self) -> i64 {
        self.retention_days
    }

    /// Start of the activity window. An order created exactly at the cutoff
    /// still counts as recent.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(self.retention_days)
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            retention_days: DEFAULT_RETENTION_DAYS,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use claims::{assert_err, assert_ok};
    use proptest::prelude::*;

    use super::{DEFAULT_RETENTION_DAYS, RetentionPolicy};

    #[test]
    fn zero_day_period_is_rejected() {
        assert_err!(RetentionPolicy::new(0));
    }

    #[test]
    fn negative_period_is_rejected() {
        assert_err!(RetentionPolicy::new(-365));
    }

    #[test]
    fn one_day_period_is_accepted() {
        assert_ok!(RetentionPolicy::new(1));
    }

    #[test]
    fn default_period_is_a_year() {
        assert_eq!(
            RetentionPolicy::default().retention_days(),
            DEFAULT_RETENTION_DAYS
        );
    }

    #[test]
    fn cutoff_is_the_period_back_from_now() {
        let policy = RetentionPolicy::new(365).expect("valid period");
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).single().expect("valid date");
        let expected = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).single().expect("valid date");
        assert_eq!(policy.cutoff(now), expected);
    }

    proptest! {
        #[test]
        fn positive_periods_are_accepted(days in 1i64..=10_000) {
            prop_assert!(RetentionPolicy::new(days).is_ok());
        }

        #[test]
        fn non_positive_periods_are_rejected(days in -10_000i64..=0) {
            prop_assert!(RetentionPolicy::new(days).is_err());
        }

        // A longer period moves the cutoff further into the past, so the
        // activity window only ever grows. This is what makes the deletion
        // set monotone in the retention period.
        #[test]
        fn longer_periods_never_move_the_cutoff_forward(
            shorter in 1i64..=5_000,
            extra in 0i64..=5_000,
        ) {
            let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).single().expect("valid date");
            let a = RetentionPolicy::new(shorter).expect("valid period");
            let b = RetentionPolicy::new(shorter + extra).expect("valid period");
            prop_assert!(b.cutoff(now) <= a.cutoff(now));
        }
    }
}
