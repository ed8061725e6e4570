//! Outcome of notifying the targets of one update
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    /// Targets configured when the update arrived
    pub considered: usize,
    /// Targets that passed the eligibility check
    pub eligible: usize,
    /// Ids of targets that accepted the notification
    pub delivered: Vec<String>,
    /// Ids of targets that failed, with the reason
    pub failed: Vec<(String, String)>,
}

impl DispatchReport {
    pub fn new(considered: usize) -> Self {
        Self {
            considered,
            ..Self::default()
        }
    }

    /// Whether every eligible target was reached
    pub fn all_delivered(&self) -> bool {
        self.failed.is_empty()
    }
}
