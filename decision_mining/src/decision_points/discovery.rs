use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::label_resolution::preset_labels_with_backtracking;
use crate::petri_net::petri_net_struct::{PetriNet, PlaceID, TransitionID};

#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
/// Algorithm parameters for decision point mining
pub struct DecisionMiningConfig {
    /// Maximum backward search depth (in place-hops) used when resolving preset labels
    /// through invisible transitions
    pub max_back_depth: usize,
}

impl Default for DecisionMiningConfig {
    fn default() -> Self {
        Self { max_back_depth: 2 }
    }
}

impl DecisionMiningConfig {
    /// Serialize decision mining parameters to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap()
    }
    /// Deserialize decision mining parameters from JSON string
    pub fn from_json(json: &str) -> Self {
        serde_json::from_str(json).unwrap()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// Cached preset/postset structure of one place
///
/// Computed once per place during discovery; a read-only view over the net.
pub struct PlaceContext {
    /// Transitions feeding this place
    pub preset_transitions: Vec<TransitionID>,
    /// Transitions this place enables
    pub postset_transitions: Vec<TransitionID>,
    /// Activity labels that can immediately precede reaching this place
    /// (resolved with bounded backtracking; may be empty = "unknown preset")
    pub preset_labels: HashSet<String>,
    /// Labels of the _visible_ transitions this place directly enables
    ///
    /// Invisible outgoing transitions produce no observable event and are excluded.
    pub postset_labels: HashSet<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Result of decision point discovery over a [`PetriNet`]
///
/// A place is a decision point iff it has at least two outgoing transitions and at
/// least one of them is visible: a single successor is no choice, and a place whose
/// branches are all invisible corresponds to no observable choice in a log.
///
/// Decision points are listed in arena index order; this is the fixed, deterministic
/// enumeration order used for ambiguity tie-breaks downstream.
pub struct DecisionPointAnalysis {
    /// Places classified as decision points (in arena index order)
    pub decision_points: Vec<PlaceID>,
    /// Per-place context, indexed by place arena index (covers _every_ place)
    pub contexts: Vec<PlaceContext>,
}

impl DecisionPointAnalysis {
    /// Discover the decision points of `net` and cache every place's preset/postset context
    pub fn discover(net: &PetriNet, config: &DecisionMiningConfig) -> Self {
        let mut decision_points = Vec::new();
        let mut contexts = Vec::with_capacity(net.places.len());

        for p in net.place_ids() {
            let preset_transitions = net.preset_of_place(p).to_vec();
            let postset_transitions = net.postset_of_place(p).to_vec();

            let visible_postset: Vec<TransitionID> = postset_transitions
                .iter()
                .copied()
                .filter(|t| net.transition(*t).is_visible())
                .collect();

            // XOR criterion
            if postset_transitions.len() >= 2 && !visible_postset.is_empty() {
                decision_points.push(p);
            }

            let preset_labels = preset_labels_with_backtracking(net, p, config.max_back_depth);
            let postset_labels = visible_postset
                .iter()
                .filter_map(|t| net.transition_label(*t))
                .map(String::from)
                .collect();

            contexts.push(PlaceContext {
                preset_transitions,
                postset_transitions,
                preset_labels,
                postset_labels,
            });
        }

        Self {
            decision_points,
            contexts,
        }
    }

    /// The cached [`PlaceContext`] of a place
    pub fn context(&self, p: PlaceID) -> &PlaceContext {
        &self.contexts[p.0]
    }

    /// Whether the place was classified as a decision point
    pub fn is_decision_point(&self, p: PlaceID) -> bool {
        self.decision_points.contains(&p)
    }
}
