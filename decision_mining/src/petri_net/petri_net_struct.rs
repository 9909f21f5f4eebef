use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize, Hash, PartialOrd, Ord)]
/// Place ID: a stable index into the place arena of a [`PetriNet`]
pub struct PlaceID(pub usize);

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize, Hash, PartialOrd, Ord)]
/// Transition ID: a stable index into the transition arena of a [`PetriNet`]
pub struct TransitionID(pub usize);

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
/// Place in a Petri net
///
/// Adjacency is stored as index lists; arcs always connect a place to a transition.
pub struct Place {
    /// Transitions with an arc into this place (preset)
    pub in_transitions: Vec<TransitionID>,
    /// Transitions this place has an arc to (postset)
    pub out_transitions: Vec<TransitionID>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
/// Transition in a Petri net
pub struct Transition {
    /// Transition label (`None` if this transition is _invisible_, i.e., a structural
    /// transition that produces no observable event)
    pub label: Option<String>,
    /// Places with an arc into this transition (preset)
    pub in_places: Vec<PlaceID>,
    /// Places this transition has an arc to (postset)
    pub out_places: Vec<PlaceID>,
}

impl Transition {
    /// Whether this transition carries a visible (non-empty) activity label
    pub fn is_visible(&self) -> bool {
        self.label.as_ref().is_some_and(|l| !l.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", content = "nodes")]
/// Arc type in a Petri net
pub enum ArcType {
    /// From Place to Transition
    PlaceTransition(PlaceID, TransitionID),
    /// From Transition to Place
    TransitionPlace(TransitionID, PlaceID),
}

impl ArcType {
    /// Create new from place to transition
    pub fn place_to_transition(from: PlaceID, to: TransitionID) -> ArcType {
        ArcType::PlaceTransition(from, to)
    }
    /// Create new from transition to place
    pub fn transition_to_place(from: TransitionID, to: PlaceID) -> ArcType {
        ArcType::TransitionPlace(from, to)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
/// Arc in a Petri net
///
/// Connecting a transition and a place (or the other way around)
pub struct Arc {
    /// Source and target of Arc
    pub from_to: ArcType,
    /// Weight (i.e., how many tokens this arc moves)
    pub weight: u32,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
///
/// A Petri net of [`Place`]s and [`Transition`]s
///
/// Bipartite graph of [`Place`]s and [`Transition`]s with [`Arc`]s connecting them.
/// Nodes live in arenas addressed by [`PlaceID`]/[`TransitionID`] and adjacency is
/// kept as index lists on both endpoints, so traversal and visited-set tracking
/// need no reference cycles.
pub struct PetriNet {
    /// Places
    pub places: Vec<Place>,
    /// Transitions
    pub transitions: Vec<Transition>,
    /// Arcs
    pub arcs: Vec<Arc>,
}

impl PetriNet {
    /// Create new [`PetriNet`] with no places or transitions
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap()
    }

    /// Add a place, returning its [`PlaceID`]
    pub fn add_place(&mut self) -> PlaceID {
        self.places.push(Place::default());
        PlaceID(self.places.len() - 1)
    }

    /// Add a transition with an (optional) label, returning its [`TransitionID`]
    ///
    /// Pass `None` for invisible (structural) transitions.
    pub fn add_transition(&mut self, label: Option<String>) -> TransitionID {
        self.transitions.push(Transition {
            label,
            in_places: Vec::new(),
            out_places: Vec::new(),
        });
        TransitionID(self.transitions.len() - 1)
    }

    /// Add an arc, updating the adjacency lists of both endpoints
    pub fn add_arc(&mut self, from_to: ArcType, weight: Option<u32>) {
        match from_to {
            ArcType::PlaceTransition(p, t) => {
                self.places[p.0].out_transitions.push(t);
                self.transitions[t.0].in_places.push(p);
            }
            ArcType::TransitionPlace(t, p) => {
                self.transitions[t.0].out_places.push(p);
                self.places[p.0].in_transitions.push(t);
            }
        }
        self.arcs.push(Arc {
            from_to,
            weight: weight.unwrap_or(1),
        });
    }

    /// Get the [`Place`] behind a [`PlaceID`]
    pub fn place(&self, p: PlaceID) -> &Place {
        &self.places[p.0]
    }

    /// Get the [`Transition`] behind a [`TransitionID`]
    pub fn transition(&self, t: TransitionID) -> &Transition {
        &self.transitions[t.0]
    }

    /// Get the (trimmed) label of a transition, or `None` if it is invisible
    pub fn transition_label(&self, t: TransitionID) -> Option<&str> {
        self.transitions[t.0]
            .label
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
    }

    /// Get the preset of a [`PetriNet`] place
    pub fn preset_of_place(&self, p: PlaceID) -> &[TransitionID] {
        &self.places[p.0].in_transitions
    }

    /// Get the postset of a [`PetriNet`] place
    pub fn postset_of_place(&self, p: PlaceID) -> &[TransitionID] {
        &self.places[p.0].out_transitions
    }

    /// Get the preset of a [`PetriNet`] transition
    pub fn preset_of_transition(&self, t: TransitionID) -> &[PlaceID] {
        &self.transitions[t.0].in_places
    }

    /// Get the postset of a [`PetriNet`] transition
    pub fn postset_of_transition(&self, t: TransitionID) -> &[PlaceID] {
        &self.transitions[t.0].out_places
    }

    /// Iterate over all [`PlaceID`]s (in arena index order)
    pub fn place_ids(&self) -> impl Iterator<Item = PlaceID> {
        (0..self.places.len()).map(PlaceID)
    }

    /// Iterate over all [`TransitionID`]s (in arena index order)
    pub fn transition_ids(&self) -> impl Iterator<Item = TransitionID> {
        (0..self.transitions.len()).map(TransitionID)
    }

    /// Mapping from activity label to the (visible) transitions carrying it
    ///
    /// Invisible transitions are not part of the mapping.
    pub fn label_to_transitions(&self) -> HashMap<&str, Vec<TransitionID>> {
        let mut map: HashMap<&str, Vec<TransitionID>> = HashMap::new();
        for t in self.transition_ids() {
            if let Some(label) = self.transition_label(t) {
                map.entry(label).or_default().push(t);
            }
        }
        map
    }

    /// All (visible) transitions carrying the given activity label
    pub fn transitions_with_label(&self, label: &str) -> Vec<TransitionID> {
        self.transition_ids()
            .filter(|t| self.transition_label(*t) == Some(label.trim()))
            .collect()
    }

}
