//! Integration tests for the real-time container: lifecycle transitions,
//! notification coalescing, and user-data hand-back on termination.

#![cfg(feature = "std")]

use std::thread;
use std::time::Duration;

use flight_models::rt::{ContainerState, RtAttributes, RtCallbacks, RtContainer};

struct Counter {
    ticks: u32,
}

fn finish_immediately(c: &mut Counter) -> bool {
    c.ticks += 1;
    true
}

#[test]
fn fresh_container_is_uninitialised() {
    let rt = RtContainer::new(Counter { ticks: 0 }, RtCallbacks::default(), RtAttributes::default());
    assert_eq!(rt.container_state(), ContainerState::Uninitialised);
}

#[test]
fn init_moves_to_stopped() {
    let mut rt = RtContainer::new(Counter { ticks: 0 }, RtCallbacks::default(), RtAttributes::default());
    rt.init().unwrap();
    assert_eq!(rt.container_state(), ContainerState::Stopped);
}

#[test]
fn nominal_notify_and_wait_reaches_stopped_with_no_error() {
    let callbacks = RtCallbacks {
        exec_func_behaviour: finish_immediately,
        ..RtCallbacks::default()
    };
    let mut rt = RtContainer::new(Counter { ticks: 0 }, callbacks, RtAttributes::default());
    rt.init().unwrap();
    rt.start().unwrap();
    assert_eq!(rt.container_state(), ContainerState::Started);

    rt.notify();
    rt.wait_for_termination().unwrap();

    assert_eq!(rt.container_state(), ContainerState::Stopped);
    assert_eq!(rt.last_err_code(), None);
    assert_eq!(rt.user_data().unwrap().ticks, 1);
}

fn never_finish(_c: &mut Counter) -> bool {
    thread::sleep(Duration::from_millis(1));
    false
}

#[test]
fn burst_of_five_notifications_is_coalesced_and_stops_cleanly() {
    let callbacks = RtCallbacks {
        exec_func_behaviour: never_finish,
        ..RtCallbacks::default()
    };
    let mut rt = RtContainer::new(Counter { ticks: 0 }, callbacks, RtAttributes::default());
    rt.init().unwrap();
    rt.start().unwrap();

    for _ in 0..5 {
        rt.notify();
    }
    thread::sleep(Duration::from_millis(10));
    rt.stop();
    rt.wait_for_termination().unwrap();

    assert_eq!(rt.container_state(), ContainerState::Stopped);
    assert_eq!(rt.last_err_code(), None);
}

#[test]
fn shutdown_requires_worker_joined_and_stopped() {
    let mut rt = RtContainer::new(Counter { ticks: 0 }, RtCallbacks::default(), RtAttributes::default());
    rt.init().unwrap();
    rt.start().unwrap();
    // Worker still running: shutdown must refuse.
    assert!(rt.shutdown().is_err());

    rt.notify();
    rt.wait_for_termination().unwrap();
    rt.shutdown().unwrap();
    assert_eq!(rt.container_state(), ContainerState::Uninitialised);
}

#[test]
fn reset_clears_notif_counter_without_touching_thread_primitives() {
    let mut rt = RtContainer::new(Counter { ticks: 0 }, RtCallbacks::default(), RtAttributes::default());
    rt.init().unwrap();
    rt.reset().unwrap();
    assert_eq!(rt.container_state(), ContainerState::Stopped);
    assert_eq!(rt.notif_counter(), 0);
}

#[test]
fn custom_thread_attributes_are_accepted() {
    let attrs = RtAttributes {
        thread_name: Some("rt-worker".into()),
        stack_size: Some(64 * 1024),
    };
    let callbacks = RtCallbacks {
        exec_func_behaviour: finish_immediately,
        ..RtCallbacks::default()
    };
    let mut rt = RtContainer::new(Counter { ticks: 0 }, callbacks, attrs);
    rt.init().unwrap();
    rt.start().unwrap();
    rt.notify();
    rt.wait_for_termination().unwrap();
    assert_eq!(rt.container_state(), ContainerState::Stopped);
}
