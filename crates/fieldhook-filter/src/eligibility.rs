//! Target selection.
//!
//! A target is notified when it is active, the POI is inside its geofence
//! (if it has one), and both its objective and reward filters accept the
//! update. A filter with no requirements accepts everything; otherwise a
//! whitelist needs some requirement to match and a blacklist needs none to.

use crate::verdict::Eligibility;
use fieldhook_core::{FilterMode, GeofenceLookup, PoiSnapshot, ResearchDescriptor, ResearchFilter, WebhookTarget};
use fieldhook_research::matches_descriptor;
use std::sync::Arc;

/// Whether one filter axis accepts a descriptor
pub fn axis_accepts(filter: &ResearchFilter, descriptor: &ResearchDescriptor) -> bool {
    if filter.requirements.is_empty() {
        return true;
    }

    let any_match = filter
        .requirements
        .iter()
        .any(|required| matches_descriptor(descriptor, required));

    match filter.mode {
        FilterMode::Whitelist => any_match,
        FilterMode::Blacklist => !any_match,
    }
}

/// Decides which targets receive an update
pub struct EligibilityFilter {
    geofences: Arc<dyn GeofenceLookup>,
}

impl EligibilityFilter {
    pub fn new(geofences: Arc<dyn GeofenceLookup>) -> Self {
        Self { geofences }
    }

    /// Check one target, reporting the first failed condition
    pub fn evaluate(&self, target: &WebhookTarget, poi: &PoiSnapshot) -> Eligibility {
        if !target.active {
            return Eligibility::Inactive;
        }

        if let Some(geofence) = target.geofence.as_deref().filter(|g| !g.is_empty()) {
            if !self.geofences.contains(geofence, &poi.location) {
                return Eligibility::OutsideGeofence {
                    geofence: geofence.to_string(),
                };
            }
        }

        if !axis_accepts(&target.objectives, &poi.objective) {
            return Eligibility::ObjectiveFiltered {
                mode: target.objectives.mode,
            };
        }

        if !axis_accepts(&target.rewards, &poi.reward) {
            return Eligibility::RewardFiltered {
                mode: target.rewards.mode,
            };
        }

        Eligibility::Eligible
    }

    pub fn is_eligible(&self, target: &WebhookTarget, poi: &PoiSnapshot) -> bool {
        self.evaluate(target, poi).is_eligible()
    }

    /// Eligible targets, in configuration order
    pub fn select<'t>(&self, targets: &'t [WebhookTarget], poi: &PoiSnapshot) -> Vec<&'t WebhookTarget> {
        targets
            .iter()
            .filter(|target| {
                let verdict = self.evaluate(target, poi);
                if !verdict.is_eligible() {
                    tracing::debug!(target_id = %target.id, reason = verdict.reason(), "target skipped");
                }
                verdict.is_eligible()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldhook_core::{Coordinates, Geofence, ParamValue, StaticGeofences};

    fn poi(objective: ResearchDescriptor) -> PoiSnapshot {
        PoiSnapshot {
            id: None,
            name: "Statue".to_string(),
            location: Coordinates::new(5.0, 5.0),
            objective,
            reward: ResearchDescriptor::new("encounter").with_param("species", ParamValue::list([25])),
        }
    }

    fn filter() -> EligibilityFilter {
        let square = Geofence::from_pairs(&[[0.0, 0.0], [0.0, 10.0], [10.0, 10.0], [10.0, 0.0]]);
        EligibilityFilter::new(Arc::new(StaticGeofences::new().with_fence("park", square)))
    }

    fn target() -> WebhookTarget {
        WebhookTarget::generic("t", "http://example.invalid", "<%POI%>")
    }

    fn catch(quantity: i64) -> ResearchDescriptor {
        ResearchDescriptor::new("catch").with_param("quantity", quantity)
    }

    #[test]
    fn test_empty_whitelist_accepts_everything() {
        let t = target();
        assert_eq!(filter().evaluate(&t, &poi(catch(5))), Eligibility::Eligible);
        assert_eq!(
            filter().evaluate(&t, &poi(ResearchDescriptor::new("hatch"))),
            Eligibility::Eligible
        );
    }

    #[test]
    fn test_blacklist_rejects_only_listed() {
        let t = target().with_objectives(ResearchFilter::blacklist(vec![catch(5)]));
        assert_eq!(
            filter().evaluate(&t, &poi(catch(5))),
            Eligibility::ObjectiveFiltered {
                mode: FilterMode::Blacklist
            }
        );
        assert!(filter().is_eligible(&t, &poi(catch(10))));
        assert!(filter().is_eligible(&t, &poi(ResearchDescriptor::new("hatch").with_param("quantity", 5))));
    }

    #[test]
    fn test_whitelist_requires_a_match() {
        let t = target().with_objectives(ResearchFilter::whitelist(vec![catch(5), ResearchDescriptor::new("hatch")]));
        assert!(filter().is_eligible(&t, &poi(catch(5))));
        assert!(filter().is_eligible(&t, &poi(ResearchDescriptor::new("hatch").with_param("quantity", 3))));
        assert!(!filter().is_eligible(&t, &poi(catch(3))));
    }

    #[test]
    fn test_reward_axis() {
        let legendary = ResearchDescriptor::new("encounter").with_param("species", ParamValue::list([144, 145, 146]));
        let t = target().with_rewards(ResearchFilter::whitelist(vec![legendary]));
        assert_eq!(
            filter().evaluate(&t, &poi(catch(5))),
            Eligibility::RewardFiltered {
                mode: FilterMode::Whitelist
            }
        );
    }

    #[test]
    fn test_inactive_and_geofence() {
        assert_eq!(filter().evaluate(&target().inactive(), &poi(catch(5))), Eligibility::Inactive);
        assert!(filter().is_eligible(&target().with_geofence("park"), &poi(catch(5))));
        assert_eq!(
            filter().evaluate(&target().with_geofence("harbour"), &poi(catch(5))),
            Eligibility::OutsideGeofence {
                geofence: "harbour".to_string()
            }
        );
    }

    #[test]
    fn test_select_keeps_order() {
        let targets = vec![
            target(),
            WebhookTarget::generic("off", "http://x", "").inactive(),
            WebhookTarget::generic("second", "http://y", ""),
        ];
        let picked: Vec<&str> = filter()
            .select(&targets, &poi(catch(5)))
            .into_iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(picked, vec!["t", "second"]);
    }
}
