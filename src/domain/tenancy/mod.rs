//! Tenancy domain module.
//!
//! The tenant side of billing: organizations, the staff members who act on
//! their behalf, and per-organization display preferences.
//!
//! # Module Structure
//!
//! - `organization` - Organization aggregate (the billing subject)
//! - `staff` - Staff member belonging to exactly one organization
//! - `preferences` - SystemPreference and the date format catalog

mod organization;
mod preferences;
mod staff;

pub use organization::Organization;
pub use preferences::{DateFormat, SystemPreference};
pub use staff::Staff;
