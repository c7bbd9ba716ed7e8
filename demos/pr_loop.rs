//! A procedure with a loop through a decision node: one `execute` call
//! sweeps through several action-node visits before landing on Final.

use flight_models::pr::{PrBuilder, PrDestination, PrSource};

struct Data {
    counter_1: i32,
}

fn incr(d: &mut Data) {
    d.counter_1 += 1;
}

fn below_threshold(d: &Data) -> bool {
    d.counter_1 < 5
}

fn main() {
    #[cfg(feature = "logging")]
    env_logger::init();

    // N1 -> N2 -> D1 -> (loop back to N1, or Final once counter_1 >= 5).
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
    b.add_flow(PrSource::DecisionNode(1), PrDestination::ActionNode(1), Some(below_threshold))
        .expect("D1 -> N1 (loop)");
    b.add_flow(PrSource::DecisionNode(1), PrDestination::Final, None)
        .expect("D1 -> FPN");

    let mut pr = b.build(Data { counter_1: 0 }).expect("build");
    pr.check().expect("structurally sound");

    pr.start();
    pr.execute();
    println!(
        "counter_1 = {}, current_node = {}, exec_count = {}",
        pr.user_data().counter_1,
        pr.current_node(),
        pr.exec_count()
    );
    assert_eq!(pr.user_data().counter_1, 6);
    assert_eq!(pr.current_node(), 0);
    assert_eq!(pr.exec_count(), 1);
}
