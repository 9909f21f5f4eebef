use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Hand-authored control-flow table: per activity, the set of possible next activities
///
/// This is an _input_ to the simulator (e.g., extracted by hand from a process model
/// with gateways resolved), not something the engine derives. Successor sets are kept
/// in sorted order so uniform random choices are deterministic under a fixed seed.
pub struct ControlFlowTable {
    /// Possible next activities per activity
    pub successors: BTreeMap<String, BTreeSet<String>>,
    /// The activity every case starts with
    pub start_activity: String,
    /// Activities at which a case "naturally" ends, even if successors would exist
    pub end_activities: BTreeSet<String>,
}

impl ControlFlowTable {
    /// Create a table with the given start activity and no successor entries yet
    pub fn new(start_activity: impl Into<String>) -> Self {
        Self {
            successors: BTreeMap::new(),
            start_activity: start_activity.into(),
            end_activities: BTreeSet::new(),
        }
    }

    /// Register the possible successors of an activity (replacing any previous entry)
    pub fn set_successors<S: Into<String>>(
        &mut self,
        activity: impl Into<String>,
        successors: impl IntoIterator<Item = S>,
    ) {
        self.successors.insert(
            activity.into(),
            successors.into_iter().map(Into::into).collect(),
        );
    }

    /// Mark an activity as a terminal activity
    pub fn add_end_activity(&mut self, activity: impl Into<String>) {
        self.end_activities.insert(activity.into());
    }

    /// The possible next activities for the given activity (sorted; empty if none known)
    pub fn successors_of(&self, activity: &str) -> Vec<&str> {
        self.successors
            .get(activity)
            .map(|s| s.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Whether a case terminates at this activity
    pub fn is_end_activity(&self, activity: &str) -> bool {
        self.end_activities.contains(activity)
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn successors_are_sorted_and_missing_entries_are_empty() {
        let mut table = ControlFlowTable::new("A");
        table.set_successors("A", ["C", "B"]);
        table.add_end_activity("C");

        assert_eq!(table.successors_of("A"), vec!["B", "C"]);
        assert!(table.successors_of("B").is_empty());
        assert!(table.is_end_activity("C"));
        assert!(!table.is_end_activity("A"));
    }
}
