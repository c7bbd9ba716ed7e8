//! Integration tests for the guarded-procedure engine: single-sweep
//! execution, decision-node loops, and the `run` convenience.

#![cfg(feature = "alloc")]

use flight_models::pr::{PrBuilder, PrDestination, PrSource};
use flight_models::ErrorCode;

struct Data {
    counter_1: i32,
}

fn incr(d: &mut Data) {
    d.counter_1 += 1;
}

fn below_3(d: &Data) -> bool {
    d.counter_1 < 3
}

#[test]
fn single_action_node_runs_to_final() {
    let mut b = PrBuilder::new(1, 0, 1, 1, 1).unwrap();
    b.set_initial_flow(PrDestination::ActionNode(1), None).unwrap();
    b.add_action_node(1, Some(incr)).unwrap();
    b.add_flow(PrSource::ActionNode(1), PrDestination::Final, None).unwrap();
    let mut pr = b.build(Data { counter_1: 0 }).unwrap();
    pr.check().unwrap();

    pr.start();
    assert_eq!(pr.current_node(), -1);
    pr.execute();
    assert_eq!(pr.user_data().counter_1, 1);
    assert_eq!(pr.current_node(), 0);
    assert_eq!(pr.exec_count(), 1);
}

#[test]
fn execute_stops_at_false_guard_without_advancing() {
    fn never(_d: &Data) -> bool {
        false
    }
    let mut b = PrBuilder::new(1, 0, 1, 1, 1).unwrap();
    b.set_initial_flow(PrDestination::ActionNode(1), Some(never)).unwrap();
    b.add_action_node(1, Some(incr)).unwrap();
    b.add_flow(PrSource::ActionNode(1), PrDestination::Final, None).unwrap();
    let mut pr = b.build(Data { counter_1: 0 }).unwrap();
    pr.check().unwrap();

    pr.start();
    pr.execute();
    assert_eq!(pr.user_data().counter_1, 0);
    assert_eq!(pr.current_node(), -1);
    assert_eq!(pr.node_exec_count(), 1);
}

#[test]
fn loop_through_decision_node_sweeps_in_one_execute() {
    let mut b = PrBuilder::new(2, 1, 4, 1, 2).unwrap();
    b.set_initial_flow(PrDestination::ActionNode(1), None).unwrap();
    b.add_action_node(1, Some(incr)).unwrap();
    b.add_action_node(2, Some(incr)).unwrap();
    b.add_decision_node(1, 2).unwrap();
    b.add_flow(PrSource::ActionNode(1), PrDestination::ActionNode(2), None).unwrap();
    b.add_flow(PrSource::ActionNode(2), PrDestination::DecisionNode(1), None).unwrap();
    b.add_flow(PrSource::DecisionNode(1), PrDestination::ActionNode(1), Some(below_3))
        .unwrap();
    b.add_flow(PrSource::DecisionNode(1), PrDestination::Final, None).unwrap();
    let mut pr = b.build(Data { counter_1: 0 }).unwrap();
    pr.check().unwrap();

    pr.start();
    pr.execute();
    assert_eq!(pr.user_data().counter_1, 4);
    assert_eq!(pr.current_node(), 0);
    assert_eq!(pr.exec_count(), 1);
}

#[test]
fn decision_node_with_no_true_guard_sets_flow_err() {
    fn never(_d: &Data) -> bool {
        false
    }
    let mut b = PrBuilder::new(1, 1, 3, 1, 2).unwrap();
    b.set_initial_flow(PrDestination::ActionNode(1), None).unwrap();
    b.add_action_node(1, Some(incr)).unwrap();
    b.add_decision_node(1, 2).unwrap();
    b.add_flow(PrSource::ActionNode(1), PrDestination::DecisionNode(1), None).unwrap();
    b.add_flow(PrSource::DecisionNode(1), PrDestination::Final, Some(never)).unwrap();
    b.add_flow(PrSource::DecisionNode(1), PrDestination::ActionNode(1), Some(never))
        .unwrap();
    let mut pr = b.build(Data { counter_1: 0 }).unwrap();
    pr.check().unwrap();

    pr.start();
    pr.execute();
    assert_eq!(pr.error_code(), Some(ErrorCode::FlowErr));
    // The sweep entered node 1 before the decision failed to resolve.
    assert_eq!(pr.current_node(), 1);
}

#[test]
fn run_drives_start_execute_stop_in_one_call() {
    let mut b = PrBuilder::new(1, 0, 1, 1, 1).unwrap();
    b.set_initial_flow(PrDestination::ActionNode(1), None).unwrap();
    b.add_action_node(1, Some(incr)).unwrap();
    b.add_flow(PrSource::ActionNode(1), PrDestination::Final, None).unwrap();
    let mut pr = b.build(Data { counter_1: 0 }).unwrap();
    pr.check().unwrap();

    pr.run();
    assert_eq!(pr.user_data().counter_1, 1);
    assert_eq!(pr.current_node(), 0);
    assert!(!pr.is_started());
}

#[test]
fn check_rejects_unreachable_action_node() {
    let mut b = PrBuilder::new(2, 0, 2, 1, 1).unwrap();
    b.set_initial_flow(PrDestination::ActionNode(1), None).unwrap();
    b.add_action_node(1, Some(incr)).unwrap();
    b.add_action_node(2, Some(incr)).unwrap();
    b.add_flow(PrSource::ActionNode(1), PrDestination::Final, None).unwrap();
    b.add_flow(PrSource::ActionNode(2), PrDestination::Final, None).unwrap();
    let mut pr = b.build(Data { counter_1: 0 }).unwrap();
    assert_eq!(pr.check(), Err(ErrorCode::Unreachable));
}

#[test]
fn builder_rejects_decision_node_with_one_out_flow() {
    let mut b: PrBuilder<Data> = PrBuilder::new(1, 1, 2, 1, 1).unwrap();
    assert_eq!(b.add_decision_node(1, 1), Err(ErrorCode::IllegalOutFlowCount));
}
