use std::collections::HashMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::discovery::{DecisionMiningConfig, DecisionPointAnalysis};
use super::matcher::{find_decision_point_for_pair, MatchOutcome};
use crate::event_log::event_log_struct::EventLog;
use crate::petri_net::petri_net_struct::{PetriNet, PlaceID};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
/// Per-branch observation counts: decision point → activity label → count
///
/// One explicit two-level mapping type instead of ad hoc nested containers, so the
/// accumulation and normalization invariants live in one place.
pub struct BranchCountTable {
    counts: HashMap<PlaceID, HashMap<String, u64>>,
}

impl BranchCountTable {
    /// Increment the count for taking branch `activity` at decision point `p`
    pub fn increment(&mut self, p: PlaceID, activity: &str) {
        *self
            .counts
            .entry(p)
            .or_default()
            .entry(activity.to_string())
            .or_insert(0) += 1;
    }

    /// The branch counts recorded at a decision point, if any
    pub fn counts_at(&self, p: PlaceID) -> Option<&HashMap<String, u64>> {
        self.counts.get(&p)
    }

    /// Total number of observations at a decision point
    pub fn total_at(&self, p: PlaceID) -> u64 {
        self.counts_at(p).map(|c| c.values().sum()).unwrap_or(0)
    }

    /// Whether no branch observation was recorded at all
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate over (decision point, per-branch counts)
    pub fn iter(&self) -> impl Iterator<Item = (&PlaceID, &HashMap<String, u64>)> {
        self.counts.iter()
    }

    /// Normalize counts into a [`BranchProbabilityTable`]
    ///
    /// Probability of a branch = its count / total count at that decision point.
    /// Decision points with zero total count are omitted ("no data"; resolved by the
    /// router's uniform fallback at simulation time).
    pub fn to_probabilities(&self) -> BranchProbabilityTable {
        let probabilities = self
            .counts
            .iter()
            .filter(|(_, counts)| counts.values().sum::<u64>() > 0)
            .map(|(p, counts)| {
                let total: u64 = counts.values().sum();
                let probs = counts
                    .iter()
                    .map(|(act, c)| (act.clone(), *c as f64 / total as f64))
                    .collect();
                (*p, probs)
            })
            .collect();
        BranchProbabilityTable { probabilities }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
/// Per-branch probabilities: decision point → activity label → probability in \[0,1\]
///
/// Derived deterministically from a [`BranchCountTable`]; probabilities at one decision
/// point sum to 1 over its observed branches. Never mutated in place: re-running the
/// analysis with a new log produces a new, independent table.
pub struct BranchProbabilityTable {
    probabilities: HashMap<PlaceID, HashMap<String, f64>>,
}

impl BranchProbabilityTable {
    /// The branch probabilities recorded at a decision point, if any
    pub fn probabilities_at(&self, p: PlaceID) -> Option<&HashMap<String, f64>> {
        self.probabilities.get(&p)
    }

    /// The probability of taking branch `activity` at decision point `p`
    ///
    /// `None` if the decision point has no probability entry at all.
    /// An activity absent from an existing entry has probability 0.
    pub fn probability(&self, p: PlaceID, activity: &str) -> Option<f64> {
        self.probabilities_at(p)
            .map(|probs| probs.get(activity).copied().unwrap_or(0.0))
    }

    /// Whether no decision point has probability data
    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// Iterate over (decision point, per-branch probabilities)
    pub fn iter(&self) -> impl Iterator<Item = (&PlaceID, &HashMap<String, f64>)> {
        self.probabilities.iter()
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap()
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
/// Diagnostic counters over all consecutive event pairs seen while counting branches
pub struct MatchStatistics {
    /// Pairs matched to a unique decision point (strictly or loosely)
    pub matched: usize,
    /// Pairs with multiple strict candidates, resolved by enumeration-order tie-break
    pub ambiguous: usize,
    /// Pairs no decision point could be identified for (uninformative, skipped)
    pub unmatched: usize,
}

///
/// Count how often each branch is taken at each decision point, over a whole log
///
/// Every consecutive event pair of every trace (with at least two events) is matched
/// against the decision points; pairs without a unique match are skipped. Returns the
/// count table together with [`MatchStatistics`] making ambiguity and match coverage
/// observable.
///
pub fn compute_branch_counts(
    log: &EventLog,
    analysis: &DecisionPointAnalysis,
) -> (BranchCountTable, MatchStatistics) {
    let mut branch_counts = BranchCountTable::default();
    let mut stats = MatchStatistics::default();

    for trace in &log.traces {
        if trace.events.len() < 2 {
            continue;
        }
        for (prev_event, next_event) in trace.events.iter().tuple_windows() {
            let (Some(prev_act), Some(next_act)) = (prev_event.activity(), next_event.activity())
            else {
                stats.unmatched += 1;
                continue;
            };

            let outcome = find_decision_point_for_pair(analysis, prev_act, next_act);
            if let MatchOutcome::AmbiguousStrict { .. } = outcome {
                stats.ambiguous += 1;
            }
            match outcome.decision_point() {
                Some(p) => {
                    stats.matched += 1;
                    branch_counts.increment(p, next_act);
                }
                None => stats.unmatched += 1,
            }
        }
    }

    (branch_counts, stats)
}

#[derive(Debug, Clone)]
/// A branching model calibrated against an event log
///
/// Immutable snapshot for one (model, log) pair: the discovered decision points with
/// their label sets, the raw branch counts, the derived branch probabilities and the
/// match diagnostics. An existing `BranchingModel` with empty tables means "analysis
/// ran and found no data", which is distinguishable from "analysis not yet run"
/// (no `BranchingModel` exists).
pub struct BranchingModel {
    /// Discovered decision points and per-place label contexts
    pub analysis: DecisionPointAnalysis,
    /// Raw branch observation counts
    pub counts: BranchCountTable,
    /// Branch probabilities derived from the counts
    pub probabilities: BranchProbabilityTable,
    /// Diagnostics over the matched event pairs
    pub match_statistics: MatchStatistics,
}

///
/// Full decision point mining pipeline
///
/// Discovers the decision points of `net`, matches all consecutive event pairs of `log`
/// against them, and converts the resulting branch counts into branch probabilities.
///
pub fn discover_branching_model(
    net: &PetriNet,
    log: &EventLog,
    config: &DecisionMiningConfig,
) -> BranchingModel {
    let analysis = DecisionPointAnalysis::discover(net, config);
    let (counts, match_statistics) = compute_branch_counts(log, &analysis);
    let probabilities = counts.to_probabilities();
    BranchingModel {
        analysis,
        counts,
        probabilities,
        match_statistics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::petri_net::petri_net_struct::ArcType;

    /// `A -> p -> {B, C}`
    fn simple_choice_net() -> (PetriNet, PlaceID) {
        let mut net = PetriNet::new();
        let a = net.add_transition(Some("A".into()));
        let b = net.add_transition(Some("B".into()));
        let c = net.add_transition(Some("C".into()));
        let p = net.add_place();
        net.add_arc(ArcType::transition_to_place(a, p), None);
        net.add_arc(ArcType::place_to_transition(p, b), None);
        net.add_arc(ArcType::place_to_transition(p, c), None);
        (net, p)
    }

    #[test]
    fn end_to_end_even_split() {
        let (net, p) = simple_choice_net();
        let log = EventLog::from_activity_traces(&[vec!["A", "B"], vec!["A", "C"]]);
        let model = discover_branching_model(&net, &log, &DecisionMiningConfig::default());

        let counts = model.counts.counts_at(p).unwrap();
        assert_eq!(counts["B"], 1);
        assert_eq!(counts["C"], 1);

        let probs = model.probabilities.probabilities_at(p).unwrap();
        assert_eq!(probs["B"], 0.5);
        assert_eq!(probs["C"], 0.5);
        assert_eq!(model.match_statistics.matched, 2);
        assert_eq!(model.match_statistics.ambiguous, 0);
    }

    #[test]
    fn probabilities_sum_to_one() {
        let (net, p) = simple_choice_net();
        let log = EventLog::from_activity_traces(&[
            vec!["A", "B"],
            vec!["A", "B"],
            vec!["A", "B"],
            vec!["A", "C"],
        ]);
        let model = discover_branching_model(&net, &log, &DecisionMiningConfig::default());

        let sum: f64 = model
            .probabilities
            .probabilities_at(p)
            .unwrap()
            .values()
            .sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert_eq!(model.probabilities.probability(p, "B"), Some(0.75));
        // Unobserved branch at a decision point with data: probability 0
        assert_eq!(model.probabilities.probability(p, "Z"), Some(0.0));
    }

    #[test]
    fn short_traces_and_unmatched_pairs_are_skipped() {
        let (net, _) = simple_choice_net();
        let log = EventLog::from_activity_traces(&[
            vec!["A"],
            vec!["X", "Y"],
        ]);
        let model = discover_branching_model(&net, &log, &DecisionMiningConfig::default());

        assert!(model.counts.is_empty());
        assert!(model.probabilities.is_empty());
        assert_eq!(model.match_statistics.matched, 0);
        assert_eq!(model.match_statistics.unmatched, 1);
    }

    #[test]
    fn empty_log_yields_empty_tables_not_an_error() {
        let (net, p) = simple_choice_net();
        let log = EventLog::from_activity_traces::<&str>(&[]);
        let model = discover_branching_model(&net, &log, &DecisionMiningConfig::default());

        assert!(model.counts.is_empty());
        assert_eq!(model.counts.total_at(p), 0);
        assert!(model.probabilities.probabilities_at(p).is_none());
        // The decision point itself is still discovered
        assert_eq!(model.analysis.decision_points, vec![p]);
    }
}
