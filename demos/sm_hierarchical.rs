//! A host SM with a choice pseudo-state and an SM embedded in one of its
//! proper states: the embedded SM is started/stopped alongside its host
//! state and receives every `execute` trigger the host does.

use flight_models::sm::{Destination, SmBuilder, SmLike, Source};

struct ChildData {
    ticks: i32,
}

fn tick(d: &mut ChildData) {
    d.ticks += 1;
}

fn build_child() -> Box<dyn SmLike> {
    let mut cb = SmBuilder::new(1, 0, 1, 2, 1).expect("child builder sizes");
    cb.set_initial_transition(Destination::State(1), None)
        .expect("child initial");
    cb.add_proper_state(1, None, Some(tick), None, 1, None)
        .expect("child state");
    // Trigger 99 never arrives from the host, so the child never leaves
    // its one state; every host `execute` just re-runs its do action.
    cb.add_transition(Source::State(1), Destination::Final, 99, None, None)
        .expect("child transition");
    let child = cb.build(ChildData { ticks: 0 }).expect("child build");
    Box::new(child)
}

struct HostData {
    counter_1: i32,
}

fn incr(d: &mut HostData) {
    d.counter_1 += 1;
}

fn ready_for_s2(d: &HostData) -> bool {
    d.counter_1 >= 3
}

fn main() {
    #[cfg(feature = "logging")]
    env_logger::init();

    // 2 proper states (S1, S2), 1 choice (C1).
    let mut b = SmBuilder::new(2, 1, 3, 2, 2).expect("builder sizes");
    b.set_initial_transition(Destination::State(1), None)
        .expect("initial");
    b.add_proper_state(1, None, Some(incr), None, 1, Some(build_child()))
        .expect("S1");
    b.add_proper_state(2, None, None, None, 0, None).expect("S2");
    b.add_choice_state(1, 2).expect("C1");
    b.add_transition(Source::State(1), Destination::Choice(1), 1, None, None)
        .expect("S1 -> C1");
    b.add_transition(Source::Choice(1), Destination::State(2), 0, None, Some(ready_for_s2))
        .expect("C1 -> S2");
    b.add_transition(Source::Choice(1), Destination::Final, 0, None, None)
        .expect("C1 -> FPS");

    let mut sm = b.build(HostData { counter_1: 0 }).expect("build");
    sm.check().expect("structurally sound");

    sm.start();
    for _ in 0..2 {
        sm.execute(7); // unrelated trigger: just re-runs S1's do action
    }
    println!("counter_1 before choice = {}", sm.user_data().counter_1);

    sm.execute(1); // matches S1 -> C1; resolves to S2 once counter_1 >= 3
    println!("current_state after choice = {}", sm.current_state());
    assert_eq!(sm.current_state(), 2);
}
