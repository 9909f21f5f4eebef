use std::collections::{HashSet, VecDeque};

use crate::petri_net::petri_net_struct::{PetriNet, PlaceID, TransitionID};

///
/// Resolve the activity labels that can immediately precede reaching `place`
///
/// First tries the labels of the directly preceding (preset) transitions; this is the
/// common, cheap case. Only if _all_ direct preset transitions are invisible does a
/// bounded breadth-first walk backward through the net start: from each invisible preset
/// transition, its own input places are expanded, up to `max_back_depth` place-hops.
/// Every place and transition is visited at most once, so the walk terminates on cyclic nets.
///
/// With `max_back_depth` 0, exactly the direct preset labels are returned (no backtracking).
///
/// The returned set may be empty if no labeled transition exists within range; callers
/// must treat this as "unknown preset", not as an error.
///
pub fn preset_labels_with_backtracking(
    net: &PetriNet,
    place: PlaceID,
    max_back_depth: usize,
) -> HashSet<String> {
    let direct_preset = net.preset_of_place(place);
    let direct_labels: HashSet<String> = direct_preset
        .iter()
        .filter_map(|t| net.transition_label(*t))
        .map(String::from)
        .collect();
    if !direct_labels.is_empty() || max_back_depth == 0 {
        return direct_labels;
    }

    // All direct preset transitions are invisible: walk backward for visible labels.
    let mut visible_labels: HashSet<String> = HashSet::new();
    let mut visited_transitions: HashSet<TransitionID> = direct_preset.iter().copied().collect();
    let mut visited_places: HashSet<PlaceID> = HashSet::from([place]);
    let mut queue: VecDeque<(PlaceID, usize)> = VecDeque::new();

    for t in direct_preset {
        for prev_place in net.preset_of_transition(*t) {
            if visited_places.insert(*prev_place) {
                queue.push_back((*prev_place, 1));
            }
        }
    }

    while let Some((curr_place, depth)) = queue.pop_front() {
        if depth > max_back_depth {
            continue;
        }
        for t in net.preset_of_place(curr_place) {
            if !visited_transitions.insert(*t) {
                continue;
            }
            if let Some(label) = net.transition_label(*t) {
                visible_labels.insert(label.to_string());
            } else if depth < max_back_depth {
                for prev_place in net.preset_of_transition(*t) {
                    if visited_places.insert(*prev_place) {
                        queue.push_back((*prev_place, depth + 1));
                    }
                }
            }
        }
    }

    visible_labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::petri_net::petri_net_struct::ArcType;

    /// `A -> p0 -> tau -> p1 -> tau -> p2 -> B` with an extra visible `C` feeding `p1`
    fn net_with_silent_chain() -> (PetriNet, PlaceID, PlaceID, PlaceID) {
        let mut net = PetriNet::new();
        let a = net.add_transition(Some("A".into()));
        let c = net.add_transition(Some("C".into()));
        let tau1 = net.add_transition(None);
        let tau2 = net.add_transition(None);
        let b = net.add_transition(Some("B".into()));
        let p0 = net.add_place();
        let p1 = net.add_place();
        let p2 = net.add_place();
        net.add_arc(ArcType::transition_to_place(a, p0), None);
        net.add_arc(ArcType::place_to_transition(p0, tau1), None);
        net.add_arc(ArcType::transition_to_place(tau1, p1), None);
        net.add_arc(ArcType::transition_to_place(c, p1), None);
        net.add_arc(ArcType::place_to_transition(p1, tau2), None);
        net.add_arc(ArcType::transition_to_place(tau2, p2), None);
        net.add_arc(ArcType::place_to_transition(p2, b), None);
        (net, p0, p1, p2)
    }

    #[test]
    fn direct_labels_win_without_backtracking() {
        let (net, p0, p1, _) = net_with_silent_chain();
        assert_eq!(
            preset_labels_with_backtracking(&net, p0, 2),
            HashSet::from(["A".to_string()])
        );
        // p1 is fed by both an invisible transition and visible C: only direct labels count
        assert_eq!(
            preset_labels_with_backtracking(&net, p1, 2),
            HashSet::from(["C".to_string()])
        );
    }

    #[test]
    fn depth_zero_returns_exactly_direct_preset_labels() {
        let (net, _, _, p2) = net_with_silent_chain();
        assert!(preset_labels_with_backtracking(&net, p2, 0).is_empty());
    }

    #[test]
    fn backtracks_through_invisible_transitions() {
        let (net, _, _, p2) = net_with_silent_chain();
        // One place-hop back from p2 reaches p1, fed by C (visible) and tau1 (invisible)
        assert_eq!(
            preset_labels_with_backtracking(&net, p2, 1),
            HashSet::from(["C".to_string()])
        );
        // Two hops additionally reach p0, fed by A
        assert_eq!(
            preset_labels_with_backtracking(&net, p2, 2),
            HashSet::from(["A".to_string(), "C".to_string()])
        );
    }

    #[test]
    fn terminates_on_cycles() {
        // tau-cycle: p0 -> tau1 -> p1 -> tau2 -> p0, no visible label anywhere
        let mut net = PetriNet::new();
        let tau1 = net.add_transition(None);
        let tau2 = net.add_transition(None);
        let p0 = net.add_place();
        let p1 = net.add_place();
        net.add_arc(ArcType::place_to_transition(p0, tau1), None);
        net.add_arc(ArcType::transition_to_place(tau1, p1), None);
        net.add_arc(ArcType::place_to_transition(p1, tau2), None);
        net.add_arc(ArcType::transition_to_place(tau2, p0), None);

        // Depth far beyond the cycle length: must terminate and find nothing
        assert!(preset_labels_with_backtracking(&net, p0, 100).is_empty());
    }
}
