#![warn(
    clippy::doc_markdown,
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs
)]
#![doc = include_str!("../README.md")]

///
/// Event Logs ([`EventLog`]s of [`Trace`]s of [`Event`]s)
///
pub mod event_log {
    /// Constants (common XES-style attribute keys)
    pub mod constants;
    /// [`EventLog`] struct and sub-structs
    pub mod event_log_struct;

    pub use event_log_struct::{
        Attribute, AttributeValue, Attributes, Event, EventLog, Trace, XESEditableAttribute,
    };
}

///
/// Petri nets
///
pub mod petri_net {
    /// [`PetriNet`] struct
    pub mod petri_net_struct;

    #[doc(inline)]
    pub use petri_net_struct::PetriNet;
}

///
/// Decision point mining: discovering branching points in a [`PetriNet`] and
/// calibrating their branch probabilities against an [`EventLog`]
///
pub mod decision_points {
    /// Branch frequency counting and probability tables
    pub mod branch_statistics;
    /// Decision point discovery and per-place preset/postset context
    pub mod discovery;
    /// Resolving activity labels in the preset of a place (with bounded backtracking)
    pub mod label_resolution;
    /// Matching consecutive log events to the decision point that produced them
    pub mod matcher;
}

///
/// Stochastic replay: generating synthetic event logs from a (calibrated) model
///
pub mod simulation {
    /// Hand-authored control-flow successor table
    pub mod control_flow;
    /// Stochastic activity duration model
    pub mod duration;
    /// Probability-weighted routing at decision points
    pub mod router;
    /// Case-by-case simulation of process instances
    pub mod simulator;
}

#[doc(inline)]
pub use event_log::event_log_struct::{Event, EventLog, Trace};

#[doc(inline)]
pub use petri_net::petri_net_struct::{PetriNet, PlaceID, TransitionID};

#[doc(inline)]
pub use decision_points::branch_statistics::{
    discover_branching_model, BranchCountTable, BranchProbabilityTable, BranchingModel,
};

#[doc(inline)]
pub use decision_points::discovery::{DecisionMiningConfig, DecisionPointAnalysis};

#[doc(inline)]
pub use decision_points::matcher::{find_decision_point_for_pair, MatchOutcome};

#[doc(inline)]
pub use simulation::control_flow::ControlFlowTable;

#[doc(inline)]
pub use simulation::duration::ActivityDurations;

#[doc(inline)]
pub use simulation::router::choose_transition;

#[doc(inline)]
pub use simulation::simulator::{
    simulate_case, simulate_log, simulated_events_to_event_log, SimulatedEvent, SimulationConfig,
};
