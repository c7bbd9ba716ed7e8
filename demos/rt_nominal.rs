//! Default container: every callback is the dummy (hooks no-op, predicates
//! `true`), so a single `notify` drives the functional behaviour straight
//! to completion.

use flight_models::rt::{ContainerState, RtAttributes, RtCallbacks, RtContainer};

struct Data;

fn main() {
    #[cfg(feature = "logging")]
    env_logger::init();

    let mut rt = RtContainer::new(Data, RtCallbacks::default(), RtAttributes::default());
    rt.init().expect("init");
    rt.start().expect("start");

    rt.notify();
    rt.wait_for_termination().expect("join");

    println!("state = {:?}", rt.container_state());
    assert_eq!(rt.container_state(), ContainerState::Stopped);
    assert_eq!(rt.last_err_code(), None);
}
