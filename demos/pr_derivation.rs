//! Derivation: a second descriptor reuses the base's topology and
//! overrides one action and one guard, without touching the base.

use flight_models::pr::{PrBuilder, PrDescriptor, PrDestination, PrSource};

struct Data {
    counter_1: i32,
}

fn incr(d: &mut Data) {
    d.counter_1 += 1;
}

fn incr_by_3(d: &mut Data) {
    d.counter_1 += 3;
}

fn below_3(d: &Data) -> bool {
    d.counter_1 < 3
}

fn below_9(d: &Data) -> bool {
    d.counter_1 < 9
}

fn main() {
    #[cfg(feature = "logging")]
    env_logger::init();

    let mut b = PrBuilder::new(2, 1, 4, 2, 2).expect("builder sizes");
    b.set_initial_flow(PrDestination::ActionNode(1), None)
        .expect("initial flow");
    b.add_action_node(1, Some(incr)).expect("N1");
    b.add_action_node(2, Some(incr)).expect("N2");
    b.add_decision_node(1, 2).expect("D1");
    b.add_flow(PrSource::ActionNode(1), PrDestination::ActionNode(2), None)
        .expect("N1 -> N2");
    b.add_flow(PrSource::ActionNode(2), PrDestination::DecisionNode(1), None)
        .expect("N2 -> D1");
    b.add_flow(PrSource::DecisionNode(1), PrDestination::ActionNode(1), Some(below_3))
        .expect("D1 -> N1 (loop)");
    b.add_flow(PrSource::DecisionNode(1), PrDestination::Final, None)
        .expect("D1 -> FPN");

    let mut base = b.build(Data { counter_1: 0 }).expect("build base");
    base.check().expect("base structurally sound");
    base.run();
    println!("base: counter_1 = {}", base.user_data().counter_1);
    assert_eq!(base.user_data().counter_1, 4);

    let mut derived = PrDescriptor::create_derived(&base, Data { counter_1: 0 });
    assert!(derived.is_derived());
    derived.override_action(incr, incr_by_3).expect("override action");
    derived.override_guard(below_3, below_9).expect("override guard");
    derived.run();
    println!("derived: counter_1 = {}", derived.user_data().counter_1);
    assert_eq!(derived.user_data().counter_1, 12);
    assert_eq!(derived.current_node(), 0);
}
