//! Eligibility verdicts
//!
//! Explains why a target will or will not be notified of an update.

use fieldhook_core::FilterMode;
use serde::Serialize;
use std::fmt;

/// The result of checking one target against one update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Eligibility {
    /// The target should be notified
    Eligible,
    /// The target is switched off
    Inactive,
    /// The POI lies outside the target's geofence
    OutsideGeofence { geofence: String },
    /// The objective filter rejected the update
    ObjectiveFiltered { mode: FilterMode },
    /// The reward filter rejected the update
    RewardFiltered { mode: FilterMode },
}

impl Eligibility {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Eligibility::Eligible)
    }

    /// Short machine-readable reason
    pub fn reason(&self) -> &'static str {
        match self {
            Eligibility::Eligible => "eligible",
            Eligibility::Inactive => "inactive",
            Eligibility::OutsideGeofence { .. } => "outside_geofence",
            Eligibility::ObjectiveFiltered { .. } => "objective_filtered",
            Eligibility::RewardFiltered { .. } => "reward_filtered",
        }
    }
}

impl fmt::Display for Eligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Eligibility::Eligible => write!(f, "ELIGIBLE"),
            Eligibility::Inactive => write!(f, "SKIP: target inactive"),
            Eligibility::OutsideGeofence { geofence } => {
                write!(f, "SKIP: outside geofence '{}'", geofence)
            }
            Eligibility::ObjectiveFiltered { mode } => {
                write!(f, "SKIP: objective rejected by {:?} filter", mode)
            }
            Eligibility::RewardFiltered { mode } => {
                write!(f, "SKIP: reward rejected by {:?} filter", mode)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization() {
        let verdict = Eligibility::RewardFiltered {
            mode: FilterMode::Blacklist,
        };
        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(json["verdict"], "reward_filtered");
        assert_eq!(json["mode"], "blacklist");
    }

    #[test]
    fn test_display() {
        assert_eq!(Eligibility::Eligible.to_string(), "ELIGIBLE");
        assert!(Eligibility::Inactive.to_string().starts_with("SKIP"));
        assert!(!Eligibility::Inactive.is_eligible());
    }
}
