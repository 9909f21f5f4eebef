use serde::{Deserialize, Serialize};

use super::discovery::DecisionPointAnalysis;
use crate::petri_net::petri_net_struct::PlaceID;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Outcome of matching one consecutive event pair to a decision point
///
/// Ambiguity is an explicit, reported outcome, not an error: multiple strict candidates
/// are resolved by taking the first one in decision point enumeration order, but the
/// fact that a tie-break happened stays observable through this enum.
pub enum MatchOutcome {
    /// Exactly one decision point matched both the previous and the next activity
    Strict(PlaceID),
    /// Multiple decision points matched strictly; the first one (in enumeration order) was chosen
    AmbiguousStrict {
        /// The chosen decision point (first strict candidate)
        chosen: PlaceID,
        /// Total number of strict candidates
        candidates: usize,
    },
    /// No strict candidate, but exactly one decision point whose postset contains the next activity
    Loose(PlaceID),
    /// Neither strict nor loose matching yielded a unique candidate
    NoMatch,
}

impl MatchOutcome {
    /// The matched decision point, if any
    pub fn decision_point(&self) -> Option<PlaceID> {
        match self {
            MatchOutcome::Strict(p)
            | MatchOutcome::AmbiguousStrict { chosen: p, .. }
            | MatchOutcome::Loose(p) => Some(*p),
            MatchOutcome::NoMatch => None,
        }
    }
}

///
/// Identify the decision point responsible for observing `next_act` directly after `prev_act`
///
/// Matching priority:
/// 1. _Strict_: the decision point's preset labels contain `prev_act` _and_ its postset
///    labels contain `next_act`. A unique strict candidate wins outright.
/// 2. Multiple strict candidates: the first one in enumeration order is chosen and the
///    ambiguity is reported via [`MatchOutcome::AmbiguousStrict`].
/// 3. _Loose_ (only without any strict candidate): the postset labels contain `next_act`,
///    regardless of preset. Only a unique loose candidate counts.
/// 4. Otherwise: [`MatchOutcome::NoMatch`].
///
/// Activity labels are trimmed before comparison; comparison is exact (case-sensitive)
/// string equality.
///
pub fn find_decision_point_for_pair(
    analysis: &DecisionPointAnalysis,
    prev_act: &str,
    next_act: &str,
) -> MatchOutcome {
    let prev_act = prev_act.trim();
    let next_act = next_act.trim();

    let mut strict_candidates: Vec<PlaceID> = Vec::new();
    let mut loose_candidates: Vec<PlaceID> = Vec::new();

    for p in &analysis.decision_points {
        let ctx = analysis.context(*p);
        if ctx.postset_labels.contains(next_act) {
            loose_candidates.push(*p);
            if ctx.preset_labels.contains(prev_act) {
                strict_candidates.push(*p);
            }
        }
    }

    match strict_candidates.len() {
        1 => MatchOutcome::Strict(strict_candidates[0]),
        n if n > 1 => MatchOutcome::AmbiguousStrict {
            chosen: strict_candidates[0],
            candidates: n,
        },
        _ => {
            if loose_candidates.len() == 1 {
                MatchOutcome::Loose(loose_candidates[0])
            } else {
                MatchOutcome::NoMatch
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision_points::discovery::DecisionMiningConfig;
    use crate::petri_net::petri_net_struct::{ArcType, PetriNet};

    /// Two decision places: `A -> p1 -> {B, C}` and `X -> p2 -> {B, D}`
    fn two_decision_net() -> (PetriNet, PlaceID, PlaceID) {
        let mut net = PetriNet::new();
        let a = net.add_transition(Some("A".into()));
        let x = net.add_transition(Some("X".into()));
        let b1 = net.add_transition(Some("B".into()));
        let c = net.add_transition(Some("C".into()));
        let b2 = net.add_transition(Some("B".into()));
        let d = net.add_transition(Some("D".into()));
        let p1 = net.add_place();
        let p2 = net.add_place();
        net.add_arc(ArcType::transition_to_place(a, p1), None);
        net.add_arc(ArcType::place_to_transition(p1, b1), None);
        net.add_arc(ArcType::place_to_transition(p1, c), None);
        net.add_arc(ArcType::transition_to_place(x, p2), None);
        net.add_arc(ArcType::place_to_transition(p2, b2), None);
        net.add_arc(ArcType::place_to_transition(p2, d), None);
        (net, p1, p2)
    }

    fn analyze(net: &PetriNet) -> DecisionPointAnalysis {
        DecisionPointAnalysis::discover(net, &DecisionMiningConfig::default())
    }

    #[test]
    fn unique_strict_match_wins_over_loose_candidates() {
        let (net, p1, p2) = two_decision_net();
        let analysis = analyze(&net);
        // Both p1 and p2 loosely match next = "B", but only p1 has "A" in its preset
        assert_eq!(
            find_decision_point_for_pair(&analysis, "A", "B"),
            MatchOutcome::Strict(p1)
        );
        assert_eq!(
            find_decision_point_for_pair(&analysis, "X", "B"),
            MatchOutcome::Strict(p2)
        );
    }

    #[test]
    fn unique_loose_match_when_preset_unknown() {
        let (net, p1, _) = two_decision_net();
        let analysis = analyze(&net);
        // "C" only appears in p1's postset; the unseen previous activity forces a loose match
        assert_eq!(
            find_decision_point_for_pair(&analysis, "Unknown", "C"),
            MatchOutcome::Loose(p1)
        );
    }

    #[test]
    fn ambiguous_loose_match_is_no_match() {
        let (net, _, _) = two_decision_net();
        let analysis = analyze(&net);
        // "B" is in both postsets and "Unknown" in neither preset
        assert_eq!(
            find_decision_point_for_pair(&analysis, "Unknown", "B"),
            MatchOutcome::NoMatch
        );
        assert_eq!(
            find_decision_point_for_pair(&analysis, "A", "Nowhere"),
            MatchOutcome::NoMatch
        );
    }

    #[test]
    fn multiple_strict_candidates_take_first_in_order() {
        // Two structurally identical decision places A -> p -> {B, C}
        let mut net = PetriNet::new();
        let mut places = Vec::new();
        for _ in 0..2 {
            let a = net.add_transition(Some("A".into()));
            let b = net.add_transition(Some("B".into()));
            let c = net.add_transition(Some("C".into()));
            let p = net.add_place();
            net.add_arc(ArcType::transition_to_place(a, p), None);
            net.add_arc(ArcType::place_to_transition(p, b), None);
            net.add_arc(ArcType::place_to_transition(p, c), None);
            places.push(p);
        }
        let analysis = analyze(&net);
        assert_eq!(
            find_decision_point_for_pair(&analysis, "A", "B"),
            MatchOutcome::AmbiguousStrict {
                chosen: places[0],
                candidates: 2
            }
        );
    }

    #[test]
    fn labels_are_trimmed_before_comparison() {
        let (net, p1, _) = two_decision_net();
        let analysis = analyze(&net);
        assert_eq!(
            find_decision_point_for_pair(&analysis, " A ", " B"),
            MatchOutcome::Strict(p1)
        );
    }
}
