use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::control_flow::ControlFlowTable;
use super::duration::ActivityDurations;
use super::router::choose_transition;
use crate::decision_points::branch_statistics::BranchingModel;
use crate::event_log::constants::{
    ACTIVITY_NAME, START_TIMESTAMP_NAME, TIMESTAMP_NAME, TRACE_ID_NAME,
};
use crate::event_log::event_log_struct::{
    Attribute, AttributeValue, Attributes, Event, EventLog, Trace,
};
use crate::petri_net::petri_net_struct::{PetriNet, TransitionID};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// One simulated event: a single execution of an activity within a case
pub struct SimulatedEvent {
    /// Case identifier
    pub case_id: String,
    /// Executed activity
    pub activity: String,
    /// When the activity started
    pub start_time: DateTime<Utc>,
    /// When the activity completed
    pub end_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
/// Parameters for simulating a batch of cases
pub struct SimulationConfig {
    /// Number of cases to simulate
    pub num_cases: usize,
    /// Fixed inter-arrival interval between consecutive case starts (minutes)
    pub interarrival_minutes: f64,
    /// Start time of the first case
    pub base_start: DateTime<Utc>,
    /// Safety bound on the number of steps per case
    ///
    /// Guarantees termination on control flow with cycles and no reachable terminal
    /// activity; exceeding it ends the case without signaling failure.
    pub max_steps: usize,
    /// Base seed for the per-case random generators (fixed seed = reproducible log)
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_cases: 100,
            interarrival_minutes: 5.0,
            base_start: Utc.with_ymd_and_hms(2020, 1, 1, 8, 0, 0).unwrap(),
            max_steps: 100,
            seed: 0,
        }
    }
}

impl SimulationConfig {
    /// Serialize simulation parameters to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap()
    }
    /// Deserialize simulation parameters from JSON string
    pub fn from_json(json: &str) -> Self {
        serde_json::from_str(json).unwrap()
    }
}

/// Pick the next activity after `current`
///
/// With a calibrated model, the decision point matching the current activity is located
/// and the probability-weighted router picks among the enabled branches; without one
/// (or when no decision point applies), a uniform random choice over the successor set
/// is taken.
fn next_activity<R: Rng + ?Sized>(
    table: &ControlFlowTable,
    calibrated: Option<(&PetriNet, &BranchingModel)>,
    current: &str,
    rng: &mut R,
) -> Option<String> {
    let candidates = table.successors_of(current);
    if candidates.is_empty() {
        return None;
    }

    if let Some((net, model)) = calibrated {
        // First decision point (in enumeration order) whose preset covers the current
        // activity and whose postset overlaps the successor set
        let decision_point = model.analysis.decision_points.iter().copied().find(|p| {
            let ctx = model.analysis.context(*p);
            ctx.preset_labels.contains(current)
                && candidates.iter().any(|c| ctx.postset_labels.contains(*c))
        });
        if let Some(p) = decision_point {
            let enabled: Vec<TransitionID> = model
                .analysis
                .context(p)
                .postset_transitions
                .iter()
                .copied()
                .filter(|t| {
                    net.transition_label(*t)
                        .is_some_and(|l| candidates.contains(&l))
                })
                .collect();
            if let Some(chosen) = choose_transition(net, p, &enabled, &model.probabilities, rng) {
                return net.transition_label(chosen).map(String::from);
            }
        }
    }

    candidates.choose(rng).map(|a| a.to_string())
}

///
/// Simulate one process instance (case) as a linear trace of timestamped events
///
/// The case advances from the table's start activity: sample a duration for the current
/// activity, advance the clock, emit one event, then terminate (terminal activity, no
/// eligible successor, or step bound reached) or select the next activity — via the
/// probability-weighted router when a calibrated model is passed, otherwise uniformly.
///
pub fn simulate_case<R: Rng + ?Sized>(
    table: &ControlFlowTable,
    durations: &ActivityDurations,
    calibrated: Option<(&PetriNet, &BranchingModel)>,
    case_id: &str,
    start_time: DateTime<Utc>,
    max_steps: usize,
    rng: &mut R,
) -> Vec<SimulatedEvent> {
    let mut events = Vec::new();
    let mut current_time = start_time;
    let mut current_activity = table.start_activity.clone();
    let mut steps = 0;

    loop {
        steps += 1;
        if steps > max_steps {
            // safety break to avoid infinite loops
            break;
        }

        let dur = durations.sample(&current_activity, rng);
        let start = current_time;
        let end = current_time + dur;
        events.push(SimulatedEvent {
            case_id: case_id.to_string(),
            activity: current_activity.clone(),
            start_time: start,
            end_time: end,
        });
        current_time = end;

        if table.is_end_activity(&current_activity) {
            break;
        }
        match next_activity(table, calibrated, &current_activity, rng) {
            Some(next) => current_activity = next,
            None => break,
        }
    }

    events
}

///
/// Simulate an event log with many cases
///
/// Case starts are staggered at the configured fixed inter-arrival interval. Cases are
/// independent and simulated in parallel; each case derives its own seeded generator
/// from the configured base seed, so the produced log is reproducible regardless of
/// scheduling. Events are returned grouped by case, in case order.
///
pub fn simulate_log(
    table: &ControlFlowTable,
    durations: &ActivityDurations,
    calibrated: Option<(&PetriNet, &BranchingModel)>,
    config: &SimulationConfig,
) -> Vec<SimulatedEvent> {
    let interarrival = Duration::milliseconds((config.interarrival_minutes * 60_000.0) as i64);
    (0..config.num_cases)
        .into_par_iter()
        .map(|i| {
            let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(i as u64));
            let case_start = config.base_start + interarrival * i as i32;
            simulate_case(
                table,
                durations,
                calibrated,
                &i.to_string(),
                case_start,
                config.max_steps,
                &mut rng,
            )
        })
        .flatten()
        .collect()
}

///
/// Convert simulated events into an [`EventLog`] (one [`Trace`] per case)
///
/// Each event carries the activity ([`ACTIVITY_NAME`]), its start timestamp
/// ([`START_TIMESTAMP_NAME`]) and its completion timestamp ([`TIMESTAMP_NAME`]);
/// each trace carries the case identifier ([`TRACE_ID_NAME`]).
///
pub fn simulated_events_to_event_log(events: &[SimulatedEvent]) -> EventLog {
    let mut traces: Vec<Trace> = Vec::new();
    let mut last_case: Option<&str> = None;

    for e in events {
        if last_case != Some(e.case_id.as_str()) {
            traces.push(Trace {
                attributes: vec![Attribute::new(
                    TRACE_ID_NAME.to_string(),
                    AttributeValue::String(e.case_id.clone()),
                )],
                events: Vec::new(),
            });
            last_case = Some(e.case_id.as_str());
        }
        let attributes: Attributes = vec![
            Attribute::new(
                ACTIVITY_NAME.to_string(),
                AttributeValue::String(e.activity.clone()),
            ),
            Attribute::new(
                START_TIMESTAMP_NAME.to_string(),
                AttributeValue::Date(e.start_time),
            ),
            Attribute::new(TIMESTAMP_NAME.to_string(), AttributeValue::Date(e.end_time)),
        ];
        traces.last_mut().unwrap().events.push(Event { attributes });
    }

    EventLog {
        attributes: Attributes::new(),
        traces,
    }
}
