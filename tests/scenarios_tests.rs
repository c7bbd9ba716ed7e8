//! End-to-end numeric traces spanning a full start/execute/execute run (SM)
//! and a chained decision-node loop (PR), checked against hand-derived
//! expected values rather than structural properties alone.

#![cfg(feature = "alloc")]

use flight_models::pr::{PrBuilder, PrDestination, PrSource};
use flight_models::sm::{Destination, SmBuilder, Source};
use flight_models::ErrorCode;

struct SmData {
    counter_1: i32,
    flag_1: bool,
}

fn sm_incr1(d: &mut SmData) {
    d.counter_1 += 1;
}

fn sm_incr1_by_2(d: &mut SmData) {
    d.counter_1 += 2;
}

fn sm_incr1_by_4(d: &mut SmData) {
    d.counter_1 += 4;
}

fn sm_flag_1(d: &SmData) -> bool {
    d.flag_1
}

#[test]
fn sm_single_state_full_run_matches_hand_derived_counters() {
    // S1 with entry (+1), do (+2), exit (+4); S1 -> FPS guarded by flag_1,
    // with a transition action (+1, same counter as entry/do/exit).
    let mut b = SmBuilder::new(1, 0, 1, 4, 2).unwrap();
    b.set_initial_transition(Destination::State(1), None).unwrap();
    b.add_proper_state(1, Some(sm_incr1), Some(sm_incr1_by_2), Some(sm_incr1_by_4), 1, None)
        .unwrap();
    b.add_transition(Source::State(1), Destination::Final, 0, Some(sm_incr1), Some(sm_flag_1))
        .unwrap();
    let mut sm = b
        .build(SmData {
            counter_1: 0,
            flag_1: false,
        })
        .unwrap();
    sm.check().unwrap();

    sm.start();
    assert_eq!(sm.user_data().counter_1, 3); // entry (+1), do (+2)
    assert_eq!(sm.current_state(), 1);

    sm.execute(0); // flag_1 == false: do action reruns
    assert_eq!(sm.user_data().counter_1, 5);

    sm.user_data_mut().flag_1 = true;
    sm.execute(0); // flag_1 == true: exit (+4), then transition (+1)
    assert_eq!(sm.user_data().counter_1, 10);
    assert_eq!(sm.current_state(), 0);
    assert_eq!(sm.exec_count(), 2);
}

struct PrData {
    counter_1: i32,
    log: Vec<&'static str>,
}

fn pr_incr_n1(d: &mut PrData) {
    d.counter_1 += 1;
}

fn pr_incr_log_n2(d: &mut PrData) {
    d.counter_1 += 1;
    d.log.push("N2");
}

fn pr_incr_log_n3(d: &mut PrData) {
    d.counter_1 += 1;
    d.log.push("N3");
}

fn pr_below_6(d: &PrData) -> bool {
    d.counter_1 < 6
}

#[test]
fn pr_chained_decision_loop_logs_expected_visit_order() {
    // N1 -> N2 -> D1 -> D2 -> (N3 -> N2, looping) until counter_1 >= 6,
    // then D2's second out-flow takes the procedure to Final.
    let mut b = PrBuilder::new(3, 2, 7, 4, 2).unwrap();
    b.set_initial_flow(PrDestination::ActionNode(1), None).unwrap();
    b.add_action_node(1, Some(pr_incr_n1)).unwrap();
    b.add_action_node(2, Some(pr_incr_log_n2)).unwrap();
    b.add_action_node(3, Some(pr_incr_log_n3)).unwrap();
    b.add_decision_node(1, 2).unwrap();
    b.add_decision_node(2, 2).unwrap();

    b.add_flow(PrSource::ActionNode(1), PrDestination::ActionNode(2), None).unwrap();
    b.add_flow(PrSource::ActionNode(2), PrDestination::DecisionNode(1), None).unwrap();
    b.add_flow(PrSource::ActionNode(3), PrDestination::ActionNode(2), None).unwrap();
    b.add_flow(PrSource::DecisionNode(1), PrDestination::DecisionNode(2), None).unwrap();
    b.add_flow(PrSource::DecisionNode(1), PrDestination::DecisionNode(2), None).unwrap();
    b.add_flow(PrSource::DecisionNode(2), PrDestination::ActionNode(3), Some(pr_below_6))
        .unwrap();
    b.add_flow(PrSource::DecisionNode(2), PrDestination::Final, None).unwrap();

    let mut pr = b
        .build(PrData {
            counter_1: 0,
            log: Vec::new(),
        })
        .unwrap();
    pr.check().unwrap();

    pr.start();
    pr.execute();

    assert_eq!(pr.user_data().log, vec!["N2", "N3", "N2", "N3", "N2"]);
    assert_eq!(pr.user_data().counter_1, 6);
    assert_eq!(pr.current_node(), 0);
    assert_eq!(pr.exec_count(), 1);
}

#[test]
fn pr_check_detects_unreachable_action_node() {
    // Two action nodes declared, but only one is ever a flow destination.
    fn noop(_d: &mut PrData) {}

    let mut b = PrBuilder::new(2, 0, 2, 1, 1).unwrap();
    b.set_initial_flow(PrDestination::ActionNode(1), None).unwrap();
    b.add_action_node(1, Some(noop)).unwrap();
    b.add_action_node(2, Some(noop)).unwrap();
    b.add_flow(PrSource::ActionNode(1), PrDestination::Final, None).unwrap();
    b.add_flow(PrSource::ActionNode(2), PrDestination::Final, None).unwrap();
    let mut pr = b
        .build(PrData {
            counter_1: 0,
            log: Vec::new(),
        })
        .unwrap();

    assert_eq!(pr.check(), Err(ErrorCode::Unreachable));
}
