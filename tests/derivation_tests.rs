//! Derivation tests: a base descriptor's topology is shared by a derived
//! descriptor whose own action/guard tables can be selectively overridden,
//! for both the SM and PR engines.

#![cfg(feature = "alloc")]

use flight_models::pr::PrDescriptor;
use flight_models::pr::{PrBuilder, PrDestination, PrSource};
use flight_models::sm::SmDescriptor;
use flight_models::sm::{Destination, SmBuilder, Source};
use flight_models::ErrorCode;

struct SmData {
    counter_1: i32,
}

fn sm_incr(d: &mut SmData) {
    d.counter_1 += 1;
}

fn sm_incr_by_5(d: &mut SmData) {
    d.counter_1 += 5;
}

fn sm_always(_d: &SmData) -> bool {
    true
}

fn build_sm_base() -> SmDescriptor<SmData> {
    let mut b = SmBuilder::new(1, 0, 1, 2, 2).unwrap();
    b.set_initial_transition(Destination::State(1), None).unwrap();
    b.add_proper_state(1, Some(sm_incr), None, None, 1, None).unwrap();
    b.add_transition(Source::State(1), Destination::Final, 0, None, Some(sm_always))
        .unwrap();
    let mut sm = b.build(SmData { counter_1: 0 }).unwrap();
    sm.check().unwrap();
    sm
}

#[test]
fn sm_derived_override_action_does_not_affect_base() {
    let mut base = build_sm_base();
    base.start();
    assert_eq!(base.user_data().counter_1, 1);

    let mut derived = SmDescriptor::create_derived(&base, SmData { counter_1: 0 });
    assert!(derived.is_derived());
    assert!(!base.is_derived());
    derived.override_action(sm_incr, sm_incr_by_5).unwrap();

    derived.start();
    assert_eq!(derived.user_data().counter_1, 5);

    // The base's own table is untouched by the derived override.
    let mut base2 = build_sm_base();
    base2.start();
    assert_eq!(base2.user_data().counter_1, 1);
}

#[test]
fn sm_override_on_fresh_descriptor_is_rejected() {
    let mut base = build_sm_base();
    assert_eq!(
        base.override_action(sm_incr, sm_incr_by_5),
        Err(ErrorCode::NotDerived)
    );
}

#[test]
fn sm_override_unknown_action_is_rejected() {
    fn unrelated(_d: &mut SmData) {}
    let base = build_sm_base();
    let mut derived = SmDescriptor::create_derived(&base, SmData { counter_1: 0 });
    assert_eq!(
        derived.override_action(unrelated, sm_incr_by_5),
        Err(ErrorCode::UndefAction)
    );
}

fn sm_slot0(_d: &mut SmData) {}

fn sm_slot0_guard(_d: &SmData) -> bool {
    true
}

#[test]
fn sm_create_derived_with_tables_rejects_wrong_action_count() {
    let base = build_sm_base();
    let result = SmDescriptor::create_derived_with_tables(
        &base,
        vec![sm_slot0],
        vec![sm_slot0_guard, sm_always],
        SmData { counter_1: 0 },
    );
    assert_eq!(result.err(), Some(ErrorCode::WrongNOfActions));
}

#[test]
fn sm_create_derived_with_tables_rejects_wrong_guard_count() {
    let base = build_sm_base();
    let result = SmDescriptor::create_derived_with_tables(
        &base,
        vec![sm_slot0, sm_incr],
        vec![sm_slot0_guard],
        SmData { counter_1: 0 },
    );
    assert_eq!(result.err(), Some(ErrorCode::WrongNOfGuards));
}

#[test]
fn sm_create_derived_with_tables_accepts_matching_sizes() {
    let base = build_sm_base();
    // Same slot layout the base's own builder produced: index 0 unused by
    // this topology, index 1 is the callback `entry_action`/the guarded
    // transition actually reference.
    let mut derived = SmDescriptor::create_derived_with_tables(
        &base,
        vec![sm_slot0, sm_incr],
        vec![sm_slot0_guard, sm_always],
        SmData { counter_1: 0 },
    )
    .unwrap();
    assert!(derived.is_derived());
    derived.override_action(sm_incr, sm_incr_by_5).unwrap();
    derived.start();
    assert_eq!(derived.user_data().counter_1, 5);
}

struct PrData {
    counter_1: i32,
}

fn pr_incr(d: &mut PrData) {
    d.counter_1 += 1;
}

fn pr_incr_by_3(d: &mut PrData) {
    d.counter_1 += 3;
}

fn pr_below_3(d: &PrData) -> bool {
    d.counter_1 < 3
}

fn pr_below_9(d: &PrData) -> bool {
    d.counter_1 < 9
}

fn build_pr_base() -> PrDescriptor<PrData> {
    let mut b = PrBuilder::new(2, 1, 4, 2, 2).unwrap();
    b.set_initial_flow(PrDestination::ActionNode(1), None).unwrap();
    b.add_action_node(1, Some(pr_incr)).unwrap();
    b.add_action_node(2, Some(pr_incr)).unwrap();
    b.add_decision_node(1, 2).unwrap();
    b.add_flow(PrSource::ActionNode(1), PrDestination::ActionNode(2), None).unwrap();
    b.add_flow(PrSource::ActionNode(2), PrDestination::DecisionNode(1), None).unwrap();
    b.add_flow(PrSource::DecisionNode(1), PrDestination::ActionNode(1), Some(pr_below_3))
        .unwrap();
    b.add_flow(PrSource::DecisionNode(1), PrDestination::Final, None).unwrap();
    let mut pr = b.build(PrData { counter_1: 0 }).unwrap();
    pr.check().unwrap();
    pr
}

#[test]
fn pr_derived_overrides_action_and_guard_together() {
    let mut base = build_pr_base();
    base.run();
    assert_eq!(base.user_data().counter_1, 4);

    let mut derived = PrDescriptor::create_derived(&base, PrData { counter_1: 0 });
    assert!(derived.is_derived());
    derived.override_action(pr_incr, pr_incr_by_3).unwrap();
    derived.override_guard(pr_below_3, pr_below_9).unwrap();

    derived.run();
    assert_eq!(derived.user_data().counter_1, 12);
    assert_eq!(derived.current_node(), 0);
}

fn pr_slot0(_d: &mut PrData) {}

fn pr_slot0_guard(_d: &PrData) -> bool {
    true
}

#[test]
fn pr_create_derived_with_tables_rejects_wrong_action_count() {
    let base = build_pr_base();
    let result = PrDescriptor::create_derived_with_tables(
        &base,
        vec![pr_slot0],
        vec![pr_slot0_guard, pr_below_3],
        PrData { counter_1: 0 },
    );
    assert_eq!(result.err(), Some(ErrorCode::WrongNOfActions));
}

#[test]
fn pr_create_derived_with_tables_rejects_wrong_guard_count() {
    let base = build_pr_base();
    let result = PrDescriptor::create_derived_with_tables(
        &base,
        vec![pr_slot0, pr_incr],
        vec![pr_slot0_guard],
        PrData { counter_1: 0 },
    );
    assert_eq!(result.err(), Some(ErrorCode::WrongNOfGuards));
}

#[test]
fn pr_override_unknown_guard_is_rejected() {
    fn unrelated(_d: &PrData) -> bool {
        true
    }
    fn replacement(_d: &PrData) -> bool {
        false
    }
    let base = build_pr_base();
    let mut derived = PrDescriptor::create_derived(&base, PrData { counter_1: 0 });
    assert_eq!(
        derived.override_guard(unrelated, replacement),
        Err(ErrorCode::UndefGuard)
    );
}
