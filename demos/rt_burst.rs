//! Five `notify` calls arrive back to back while `execFuncBehaviour` is
//! still busy with the first activation pass; the container coalesces
//! them into whatever passes the worker can actually get to before
//! `stop` asks it to wind down.

use std::thread;
use std::time::Duration;

use flight_models::rt::{ContainerState, RtAttributes, RtCallbacks, RtContainer};

struct Data {
    passes: u32,
}

fn never_finish(d: &mut Data) -> bool {
    d.passes += 1;
    thread::sleep(Duration::from_millis(1));
    false
}

fn main() {
    #[cfg(feature = "logging")]
    env_logger::init();

    let callbacks = RtCallbacks {
        exec_func_behaviour: never_finish,
        ..RtCallbacks::default()
    };
    let mut rt = RtContainer::new(Data { passes: 0 }, callbacks, RtAttributes::default());
    rt.init().expect("init");
    rt.start().expect("start");

    for _ in 0..5 {
        rt.notify();
    }
    thread::sleep(Duration::from_millis(10));
    rt.stop();
    rt.wait_for_termination().expect("join");

    let passes = rt.user_data().expect("reclaimed").passes;
    println!("state = {:?}, passes = {}", rt.container_state(), passes);
    assert_eq!(rt.container_state(), ContainerState::Stopped);
    assert_eq!(rt.last_err_code(), None);
    assert!(passes >= 1);
}
