//! Subscription period arithmetic.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, ValidationError};

use super::plan::MAX_PLAN_DURATION_DAYS;

/// Half-open span of subscription time bought by one payment.
///
/// # Invariants
///
/// - `start < end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingPeriod {
    start: Timestamp,
    end: Timestamp,
}

impl BillingPeriod {
    /// A period of `duration_days` beginning at `start`.
    pub fn starting_at(start: Timestamp, duration_days: u32) -> Result<Self, ValidationError> {
        if duration_days == 0 {
            return Err(ValidationError::out_of_range(
                "duration_days",
                1,
                i64::from(u32::MAX),
                0,
            ));
        }
        let end = start.add_days(i64::from(duration_days)).ok_or_else(|| {
            ValidationError::out_of_range(
                "duration_days",
                1,
                i64::from(MAX_PLAN_DURATION_DAYS),
                i64::from(duration_days),
            )
        })?;
        Ok(Self { start, end })
    }

    /// The next period for an organization.
    ///
    /// Chains onto the latest end date among its active subscriptions so
    /// consecutive purchases leave no gap and no overlap. With no active
    /// subscription the period starts at `now`.
    pub fn next(
        latest_active_end: Option<Timestamp>,
        now: Timestamp,
        duration_days: u32,
    ) -> Result<Self, ValidationError> {
        Self::starting_at(latest_active_end.unwrap_or(now), duration_days)
    }

    /// Rebuilds a stored period, checking ordering.
    pub fn from_bounds(start: Timestamp, end: Timestamp) -> Result<Self, ValidationError> {
        if !start.is_before(&end) {
            return Err(ValidationError::invalid_format(
                "period",
                "start must be before end",
            ));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> Timestamp {
        self.start
    }

    pub fn end(&self) -> Timestamp {
        self.end
    }

    /// True while `at` has not passed the end date (inclusive).
    pub fn covers_up_to(&self, at: &Timestamp) -> bool {
        !self.end.is_before(at)
    }
}
