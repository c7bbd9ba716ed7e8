//! A one-state SM: entry/do/exit actions and a guarded transition to the
//! Final Pseudo-State.

use flight_models::sm::{Destination, SmBuilder, Source};

struct Data {
    counter_1: i32,
    flag_1: bool,
}

fn incr1(d: &mut Data) {
    d.counter_1 += 1;
}

fn incr1_by_2(d: &mut Data) {
    d.counter_1 += 2;
}

fn incr1_by_4(d: &mut Data) {
    d.counter_1 += 4;
}

fn flag_1(d: &Data) -> bool {
    d.flag_1
}

fn main() {
    #[cfg(feature = "logging")]
    env_logger::init();

    let mut b = SmBuilder::new(1, 0, 1, 4, 2).expect("builder sizes are valid");
    b.set_initial_transition(Destination::State(1), None)
        .expect("initial transition");
    b.add_proper_state(1, Some(incr1), Some(incr1_by_2), Some(incr1_by_4), 1, None)
        .expect("state S1");
    b.add_transition(Source::State(1), Destination::Final, 0, Some(incr1), Some(flag_1))
        .expect("transition S1 -> FPS");

    let mut sm = b.build(Data {
        counter_1: 0,
        flag_1: false,
    }).expect("build");
    sm.check().expect("structurally sound");

    sm.start();
    println!("after start: counter_1 = {}", sm.user_data().counter_1);

    sm.execute(0);
    println!("after execute (flag_1=false): counter_1 = {}", sm.user_data().counter_1);

    sm.user_data_mut().flag_1 = true;
    sm.execute(0);
    println!(
        "after execute (flag_1=true): counter_1 = {}, current_state = {}",
        sm.user_data().counter_1,
        sm.current_state()
    );

    assert_eq!(sm.user_data().counter_1, 10);
    assert_eq!(sm.exec_count(), 2);
    assert_eq!(sm.current_state(), 0);
}
