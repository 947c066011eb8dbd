//! Subscription plan catalog entry.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{PlanId, ValidationError};

use super::Money;

/// Longest duration a single plan may grant.
pub const MAX_PLAN_DURATION_DAYS: u32 = 3_660;

/// A purchasable plan. Buying it grants `duration_days` of subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub id: PlanId,
    pub name: String,
    pub description: Option<String>,
    pub price: Money,
    pub duration_days: u32,
    pub features: Vec<String>,
    pub is_active: bool,
}

impl Plan {
    /// Creates an active plan, validating name and duration.
    pub fn new(
        id: PlanId,
        name: impl Into<String>,
        price: Money,
        duration_days: u32,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        if duration_days == 0 || duration_days > MAX_PLAN_DURATION_DAYS {
            return Err(ValidationError::out_of_range(
                "duration_days",
                1,
                i64::from(MAX_PLAN_DURATION_DAYS),
                i64::from(duration_days),
            ));
        }
        Ok(Self {
            id,
            name,
            description: None,
            price,
            duration_days,
            features: Vec::new(),
            is_active: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price() -> Money {
        Money::from_minor(99_900, "INR").unwrap()
    }

    #[test]
    fn new_plan_is_active() {
        let plan = Plan::new(PlanId::new(), "Pro", price(), 30).unwrap();
        assert!(plan.is_active);
        assert_eq!(plan.duration_days, 30);
    }

    #[test]
    fn zero_duration_is_rejected() {
        assert!(Plan::new(PlanId::new(), "Pro", price(), 0).is_err());
    }

    #[test]
    fn duration_beyond_the_cap_is_rejected() {
        assert!(Plan::new(PlanId::new(), "Pro", price(), MAX_PLAN_DURATION_DAYS).is_ok());
        let err = Plan::new(PlanId::new(), "Pro", price(), MAX_PLAN_DURATION_DAYS + 1).unwrap_err();
        assert_eq!(err.field(), "duration_days");
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = Plan::new(PlanId::new(), "  ", price(), 30).unwrap_err();
        assert_eq!(err.field(), "name");
    }
}
