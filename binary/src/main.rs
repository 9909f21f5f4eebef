use std::time::Instant;

use decision_mining::petri_net::petri_net_struct::ArcType;
use decision_mining::{
    discover_branching_model, simulate_log, simulated_events_to_event_log, ActivityDurations,
    ControlFlowTable, DecisionMiningConfig, EventLog, PetriNet, SimulationConfig,
};

/// Simplified control flow of the BPIC17 loan application process
/// (hand-extracted from the BPMN model, gateways resolved)
fn loan_application_control_flow() -> ControlFlowTable {
    let mut table = ControlFlowTable::new("A_Create Application");
    table.set_successors(
        "A_Create Application",
        ["A_Concept", "A_Submitted", "W_Complete application"],
    );
    table.set_successors("A_Submitted", ["W_Handle leads"]);
    table.set_successors(
        "W_Handle leads",
        ["A_Concept", "W_Complete application", "W_Handle leads"],
    );
    table.set_successors("A_Concept", ["A_Accepted"]);
    table.set_successors(
        "W_Complete application",
        ["A_Accepted", "W_Complete application"],
    );
    table.set_successors("A_Accepted", ["O_Create Offer"]);
    table.set_successors("O_Create Offer", ["O_Created"]);
    table.set_successors(
        "O_Created",
        [
            "A_Complete",
            "O_Cancelled",
            "O_Sent (mail and online)",
            "W_Call after offers",
        ],
    );
    table.set_successors(
        "O_Sent (mail and online)",
        [
            "A_Cancelled",
            "A_Validating",
            "O_Cancelled",
            "O_Create Offer",
            "W_Validate application",
        ],
    );
    table.set_successors(
        "W_Call after offers",
        [
            "A_Cancelled",
            "A_Validating",
            "O_Cancelled",
            "O_Create Offer",
            "W_Call after offers",
            "W_Validate application",
        ],
    );
    table.set_successors(
        "A_Complete",
        [
            "A_Cancelled",
            "A_Validating",
            "O_Cancelled",
            "O_Create Offer",
            "W_Validate application",
        ],
    );
    table.set_successors(
        "A_Validating",
        [
            "A_Denied",
            "A_Incomplete",
            "O_Accepted",
            "O_Returned",
            "W_Call incomplete files",
        ],
    );
    table.set_successors(
        "W_Validate application",
        [
            "A_Denied",
            "A_Incomplete",
            "O_Accepted",
            "O_Returned",
            "W_Call incomplete files",
            "W_Validate application",
        ],
    );
    table.set_successors(
        "W_Call incomplete files",
        [
            "A_Cancelled",
            "A_Validating",
            "O_Cancelled",
            "O_Create Offer",
            "W_Call incomplete files",
            "W_Validate application",
        ],
    );
    table.set_successors(
        "A_Incomplete",
        [
            "A_Cancelled",
            "A_Validating",
            "O_Cancelled",
            "O_Create Offer",
            "W_Validate application",
        ],
    );
    table.set_successors(
        "O_Returned",
        [
            "A_Denied",
            "A_Incomplete",
            "O_Accepted",
            "W_Call incomplete files",
        ],
    );
    table.set_successors("O_Accepted", ["A_Pending"]);
    table.set_successors("A_Pending", ["O_Cancelled"]);
    table.set_successors("O_Cancelled", ["O_Cancelled", "O_Create Offer"]);
    table.set_successors("A_Denied", ["O_Refused"]);
    table.set_successors("O_Refused", Vec::<&str>::new());
    table.set_successors("A_Cancelled", Vec::<&str>::new());

    table.add_end_activity("O_Refused");
    table.add_end_activity("A_Cancelled");
    table.add_end_activity("O_Cancelled");
    table
}

/// Hand-authored mean durations (minutes) per activity
fn loan_application_durations() -> ActivityDurations {
    ActivityDurations::from_means([
        ("A_Create Application", 5.0),
        ("A_Submitted", 1.0),
        ("W_Handle leads", 20.0),
        ("A_Concept", 60.0),
        ("W_Complete application", 30.0),
        ("A_Accepted", 5.0),
        ("O_Create Offer", 10.0),
        ("O_Created", 5.0),
        ("O_Sent (mail and online)", 5.0),
        ("W_Call after offers", 10.0),
        ("A_Complete", 10.0),
        ("A_Validating", 15.0),
        ("W_Validate application", 15.0),
        ("W_Call incomplete files", 10.0),
        ("A_Incomplete", 5.0),
        ("O_Returned", 5.0),
        ("O_Accepted", 5.0),
        ("A_Pending", 5.0),
        ("O_Cancelled", 3.0),
        ("A_Denied", 3.0),
        ("O_Refused", 2.0),
        ("A_Cancelled", 2.0),
    ])
}

/// A fragment of the loan process as a Petri net, with an invisible gateway transition
/// in front of the first choice
fn loan_application_net() -> PetriNet {
    let mut net = PetriNet::new();
    let create = net.add_transition(Some("A_Create Application".into()));
    let gateway = net.add_transition(None);
    let submitted = net.add_transition(Some("A_Submitted".into()));
    let concept = net.add_transition(Some("A_Concept".into()));
    let complete = net.add_transition(Some("W_Complete application".into()));

    let p_created = net.add_place();
    let p_choice = net.add_place();
    net.add_arc(ArcType::transition_to_place(create, p_created), None);
    net.add_arc(ArcType::place_to_transition(p_created, gateway), None);
    net.add_arc(ArcType::transition_to_place(gateway, p_choice), None);
    net.add_arc(ArcType::place_to_transition(p_choice, submitted), None);
    net.add_arc(ArcType::place_to_transition(p_choice, concept), None);
    net.add_arc(ArcType::place_to_transition(p_choice, complete), None);
    net
}

/// A small historical log over the modeled fragment (in practice imported from XES)
fn historical_log() -> EventLog {
    let mut traces = Vec::new();
    for _ in 0..6 {
        traces.push(vec!["A_Create Application", "A_Submitted"]);
    }
    for _ in 0..3 {
        traces.push(vec!["A_Create Application", "W_Complete application"]);
    }
    traces.push(vec!["A_Create Application", "A_Concept"]);
    EventLog::from_activity_traces(&traces)
}

fn main() {
    let net = loan_application_net();
    let log = historical_log();

    let now = Instant::now();
    let model = discover_branching_model(&net, &log, &DecisionMiningConfig::default());
    println!(
        "Mined branching model from {} traces in {:#?}",
        log.traces.len(),
        now.elapsed()
    );

    println!("\n=== Decision Points ===");
    for p in &model.analysis.decision_points {
        let ctx = model.analysis.context(*p);
        println!(
            "- Place {:?}\n    preset labels: {:?}\n    postset labels: {:?}",
            p, ctx.preset_labels, ctx.postset_labels
        );
    }
    println!(
        "\nMatch statistics: {} matched, {} ambiguous, {} unmatched",
        model.match_statistics.matched,
        model.match_statistics.ambiguous,
        model.match_statistics.unmatched
    );
    if model.probabilities.is_empty() {
        println!("No branch probability data mined from the log");
    } else {
        println!("Branch probabilities: {}", model.probabilities.to_json());
    }

    let table = loan_application_control_flow();
    let durations = loan_application_durations();
    let config = SimulationConfig {
        num_cases: 10,
        seed: 42,
        ..SimulationConfig::default()
    };

    let now = Instant::now();
    let events = simulate_log(&table, &durations, Some((&net, &model)), &config);
    let simulated = simulated_events_to_event_log(&events);
    println!(
        "\nSimulated {} cases ({} events) in {:#?}",
        simulated.traces.len(),
        events.len(),
        now.elapsed()
    );
    for e in events.iter().take(8) {
        println!(
            "case {} | {} | {} -> {}",
            e.case_id, e.activity, e.start_time, e.end_time
        );
    }
}
