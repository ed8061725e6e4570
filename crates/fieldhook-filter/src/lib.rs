//! Per-target eligibility of research updates.
//!
//! Combines the target's active flag, geofence and objective/reward filters
//! into a single verdict per target.

pub mod eligibility;
pub mod verdict;

pub use eligibility::{axis_accepts, EligibilityFilter};
pub use verdict::Eligibility;
