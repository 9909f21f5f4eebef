use rand::seq::IndexedRandom;
use rand::Rng;

use crate::decision_points::branch_statistics::BranchProbabilityTable;
use crate::petri_net::petri_net_struct::{PetriNet, PlaceID, TransitionID};

///
/// Select the next transition to fire at a decision point, weighted by branch probabilities
///
/// Fallback behavior:
/// - No probability entry for the decision point (or an empty entry): uniform random
///   choice among the enabled transitions.
/// - Enabled transitions with no label, or whose label has no recorded probability
///   (treated as 0), or a recorded probability of exactly 0, are discarded. If nothing
///   survives the filtering (model/data mismatch), again uniform random choice among
///   _all_ enabled transitions.
/// - Otherwise the surviving weights are renormalized to sum to 1 and one transition is
///   drawn by cumulative-sum sampling against a single uniform draw in \[0,1). If
///   floating-point summation error leaves the draw above the final cumulative value,
///   the last candidate is returned.
///
/// Returns `None` only for an empty enabled set. The RNG is passed in explicitly so
/// simulation runs are reproducible under fixed seeds.
///
pub fn choose_transition<R: Rng + ?Sized>(
    net: &PetriNet,
    place: PlaceID,
    enabled: &[TransitionID],
    probabilities: &BranchProbabilityTable,
    rng: &mut R,
) -> Option<TransitionID> {
    if enabled.is_empty() {
        return None;
    }

    let Some(probs_for_place) = probabilities
        .probabilities_at(place)
        .filter(|probs| !probs.is_empty())
    else {
        return enabled.choose(rng).copied();
    };

    let filtered: Vec<(TransitionID, f64)> = enabled
        .iter()
        .filter_map(|t| {
            let act = net.transition_label(*t)?;
            let p_act = probs_for_place.get(act).copied().unwrap_or(0.0);
            (p_act > 0.0).then_some((*t, p_act))
        })
        .collect();

    if filtered.is_empty() {
        return enabled.choose(rng).copied();
    }

    let total: f64 = filtered.iter().map(|(_, p)| p).sum();
    if total <= 0.0 {
        return enabled.choose(rng).copied();
    }

    // Roulette-wheel sampling over the renormalized weights
    let r = rng.random::<f64>();
    let mut cumulative = 0.0;
    for (t, p) in &filtered {
        cumulative += p / total;
        if r <= cumulative {
            return Some(*t);
        }
    }

    // numerical fallback
    filtered.last().map(|(t, _)| *t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision_points::branch_statistics::BranchCountTable;
    use crate::petri_net::petri_net_struct::ArcType;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// `p -> {B, C}` with an additional invisible branch
    fn choice_net() -> (PetriNet, PlaceID, TransitionID, TransitionID, TransitionID) {
        let mut net = PetriNet::new();
        let p = net.add_place();
        let b = net.add_transition(Some("B".into()));
        let c = net.add_transition(Some("C".into()));
        let tau = net.add_transition(None);
        net.add_arc(ArcType::place_to_transition(p, b), None);
        net.add_arc(ArcType::place_to_transition(p, c), None);
        net.add_arc(ArcType::place_to_transition(p, tau), None);
        (net, p, b, c, tau)
    }

    fn table_with(p: PlaceID, counts: &[(&str, u64)]) -> BranchProbabilityTable {
        let mut table = BranchCountTable::default();
        for (act, n) in counts {
            for _ in 0..*n {
                table.increment(p, act);
            }
        }
        table.to_probabilities()
    }

    #[test]
    fn empty_enabled_set_yields_none() {
        let (net, p, ..) = choice_net();
        let mut rng = StdRng::seed_from_u64(1);
        let probs = table_with(p, &[("B", 1)]);
        assert_eq!(choose_transition(&net, p, &[], &probs, &mut rng), None);
    }

    #[test]
    fn missing_probability_entry_falls_back_to_uniform() {
        let (net, p, b, c, _) = choice_net();
        let mut rng = StdRng::seed_from_u64(2);
        let empty = BranchProbabilityTable::default();
        for _ in 0..100 {
            let chosen = choose_transition(&net, p, &[b, c], &empty, &mut rng).unwrap();
            assert!(chosen == b || chosen == c);
        }
    }

    #[test]
    fn mismatching_probabilities_fall_back_to_uniform() {
        let (net, p, b, c, _) = choice_net();
        let mut rng = StdRng::seed_from_u64(3);
        // Probabilities only mention activities that are not enabled
        let probs = table_with(p, &[("Z", 5)]);
        for _ in 0..100 {
            let chosen = choose_transition(&net, p, &[b, c], &probs, &mut rng).unwrap();
            assert!(chosen == b || chosen == c);
        }
    }

    #[test]
    fn zero_probability_branches_are_never_chosen() {
        let (net, p, b, c, tau) = choice_net();
        let mut rng = StdRng::seed_from_u64(4);
        // Only B has mass; C (absent = 0) and the unlabeled tau must be filtered out
        let probs = table_with(p, &[("B", 10)]);
        for _ in 0..100 {
            assert_eq!(
                choose_transition(&net, p, &[b, c, tau], &probs, &mut rng),
                Some(b)
            );
        }
    }

    #[test]
    fn weighted_choice_approximates_configured_probabilities() {
        let (net, p, b, c, _) = choice_net();
        let mut rng = StdRng::seed_from_u64(42);
        let probs = table_with(p, &[("B", 80), ("C", 20)]);

        let draws = 100_000;
        let mut b_count = 0usize;
        for _ in 0..draws {
            if choose_transition(&net, p, &[b, c], &probs, &mut rng) == Some(b) {
                b_count += 1;
            }
        }
        let b_share = b_count as f64 / draws as f64;
        assert!(
            (b_share - 0.8).abs() < 0.02,
            "observed B share {b_share} outside 0.8 +/- 0.02"
        );
    }
}
