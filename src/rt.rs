//! Real-Time Container: a notification side (mutex-protected counter,
//! signalable) and a worker thread running an activation loop, wired
//! together by eight user callbacks.
//!
//! Requires `std` — there is no useful no-std rendition of an OS thread.
//!
//! The notification side and the activation side are modelled as two
//! independent short procedures, exactly as the container's own
//! vocabulary (`notifPrStarted`, `activPrStarted`) describes them. The
//! functional behaviour's data (`U`) is owned exclusively by the
//! Activation Thread for as long as the container is Started and is
//! handed back to the caller on `wait_for_termination` — this is the one
//! adaptation from the literal design: rather than share `U` behind the
//! container mutex (which would force `execFuncBehaviour` to run locked,
//! or require an unsynchronised read from two threads), ownership moves
//! with the thread. The notification callbacks therefore take no user
//! data; they only ever decide *whether* to signal, never touch the
//! functional behaviour's state.

use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};

use crate::error::ErrorCode;
use crate::log_debug;

/// A notification-side callback with no arguments: `initializeNotifPr` /
/// `finalizeNotifPr`.
pub type NotifHook = fn();
/// `implementNotifLogic`: returns `true` to actually notify.
pub type NotifPredicate = fn() -> bool;
/// An activation-side callback over the functional behaviour's data:
/// `initializeActivPr` / `finalizeActivPr` / `setUpNotification`.
pub type ActivHook<U> = fn(&mut U);
/// `implementActivLogic` / `execFuncBehaviour`: returns `true` to run
/// (resp. `true` when the functional behaviour is over).
pub type ActivPredicate<U> = fn(&mut U) -> bool;

fn dummy_notif_hook() {}
fn dummy_notif_predicate() -> bool {
    true
}
fn dummy_activ_hook<U>(_user: &mut U) {}
fn dummy_activ_predicate<U>(_user: &mut U) -> bool {
    true
}

/// The eight callbacks a container is built with. Defaults are all dummy:
/// hooks no-op, predicates return `true` (so a default-built container
/// notifies on every `notify()` call and its functional behaviour is
/// considered "over" on the very first activation pass).
pub struct RtCallbacks<U> {
    pub initialize_notif_pr: NotifHook,
    pub finalize_notif_pr: NotifHook,
    pub implement_notif_logic: NotifPredicate,
    pub initialize_activ_pr: ActivHook<U>,
    pub finalize_activ_pr: ActivHook<U>,
    pub set_up_notification: ActivHook<U>,
    pub implement_activ_logic: ActivPredicate<U>,
    pub exec_func_behaviour: ActivPredicate<U>,
}

impl<U> Clone for RtCallbacks<U> {
    fn clone(&self) -> Self {
        RtCallbacks {
            initialize_notif_pr: self.initialize_notif_pr,
            finalize_notif_pr: self.finalize_notif_pr,
            implement_notif_logic: self.implement_notif_logic,
            initialize_activ_pr: self.initialize_activ_pr,
            finalize_activ_pr: self.finalize_activ_pr,
            set_up_notification: self.set_up_notification,
            implement_activ_logic: self.implement_activ_logic,
            exec_func_behaviour: self.exec_func_behaviour,
        }
    }
}

impl<U> Copy for RtCallbacks<U> {}

impl<U> Default for RtCallbacks<U> {
    fn default() -> Self {
        RtCallbacks {
            initialize_notif_pr: dummy_notif_hook,
            finalize_notif_pr: dummy_notif_hook,
            implement_notif_logic: dummy_notif_predicate,
            initialize_activ_pr: dummy_activ_hook,
            finalize_activ_pr: dummy_activ_hook,
            set_up_notification: dummy_activ_hook,
            implement_activ_logic: dummy_activ_predicate,
            exec_func_behaviour: dummy_activ_predicate,
        }
    }
}

/// Thread and stack-size hints for the Activation Thread. `None` leaves
/// the platform default.
#[derive(Debug, Clone, Default)]
pub struct RtAttributes {
    pub thread_name: Option<String>,
    pub stack_size: Option<usize>,
}

/// Container lifecycle state, plus one terminal variant per primitive
/// that can fail during `init`/`start`/`shutdown`. Under the
/// `std::sync`/`std::thread` backend, mutex and condvar primitives are
/// infallible to construct and only the thread-spawn and join steps can
/// actually produce one of these — the rest are carried for parity with
/// targets where those primitives are fallible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerState {
    Uninitialised,
    Stopped,
    Started,
    MutexInitErr(i32),
    MutexDestroyErr(i32),
    MutexLockErr(i32),
    MutexUnlockErr(i32),
    CondInitErr(i32),
    CondDestroyErr(i32),
    CondSignalErr(i32),
    CondWaitErr(i32),
    ThreadCreateErr(i32),
    JoinErr(i32),
    AttrInitErr(i32),
    AttrDestroyErr(i32),
    /// A container method was called in the wrong lifecycle phase.
    ConfigErr,
}

struct Core {
    state: ContainerState,
    notif_cnt: u64,
    notif_pr_started: bool,
    activ_pr_started: bool,
}

/// Runs the Notification Procedure once under the caller's already-held
/// lock on `core`. Returns whether it asked to signal the worker.
fn notification_pass<U>(core: &mut Core, callbacks: &RtCallbacks<U>) -> bool {
    if !core.notif_pr_started {
        return false;
    }
    if !core.activ_pr_started {
        (callbacks.finalize_notif_pr)();
        core.notif_pr_started = false;
        return false;
    }
    if (callbacks.implement_notif_logic)() {
        core.notif_cnt += 1;
        return true;
    }
    false
}

/// Runs the Activation Procedure once, unlocked except for the brief
/// peeks at `state`/`activ_pr_started`. Returns whether the functional
/// behaviour (and so the activation side) is now over.
fn activation_pass<U>(shared: &(Mutex<Core>, Condvar), callbacks: &RtCallbacks<U>, user: &mut U) -> bool {
    let stopped = shared.0.lock().expect("container mutex poisoned").state == ContainerState::Stopped;
    if stopped {
        (callbacks.finalize_activ_pr)(user);
        shared.0.lock().expect("container mutex poisoned").activ_pr_started = false;
        return true;
    }
    let run = (callbacks.implement_activ_logic)(user);
    if run && (callbacks.exec_func_behaviour)(user) {
        (callbacks.finalize_activ_pr)(user);
        shared.0.lock().expect("container mutex poisoned").activ_pr_started = false;
        return true;
    }
    (callbacks.set_up_notification)(user);
    false
}

fn run_notification_pass_locked<U>(shared: &(Mutex<Core>, Condvar), callbacks: &RtCallbacks<U>) {
    let mut guard = shared.0.lock().expect("container mutex poisoned");
    if notification_pass(&mut guard, callbacks) {
        shared.1.notify_one();
    }
}

fn activation_thread<U>(shared: Arc<(Mutex<Core>, Condvar)>, callbacks: RtCallbacks<U>, mut user: U) -> U {
    loop {
        {
            let mut guard = shared.0.lock().expect("container mutex poisoned");
            while guard.notif_cnt == 0 {
                guard = shared.1.wait(guard).expect("container mutex poisoned");
            }
            guard.notif_cnt -= 1;
        }
        let terminated = activation_pass(&shared, &callbacks, &mut user);
        if terminated {
            shared.0.lock().expect("container mutex poisoned").state = ContainerState::Stopped;
            run_notification_pass_locked(&shared, &callbacks);
            break;
        }
        let stopped_externally = shared.0.lock().expect("container mutex poisoned").state == ContainerState::Stopped;
        if stopped_externally {
            activation_pass(&shared, &callbacks, &mut user);
            run_notification_pass_locked(&shared, &callbacks);
            break;
        }
    }
    user
}

/// A Real-Time Container wrapping functional behaviour `U` in a
/// notification/activation loop.
pub struct RtContainer<U> {
    shared: Arc<(Mutex<Core>, Condvar)>,
    callbacks: RtCallbacks<U>,
    attrs: RtAttributes,
    user_data: Option<U>,
    worker: Option<JoinHandle<U>>,
}

impl<U: Send + 'static> RtContainer<U> {
    /// Creates an Uninitialised container. Call [`Self::init`] before
    /// [`Self::start`].
    pub fn new(user_data: U, callbacks: RtCallbacks<U>, attrs: RtAttributes) -> Self {
        RtContainer {
            shared: Arc::new((
                Mutex::new(Core {
                    state: ContainerState::Uninitialised,
                    notif_cnt: 0,
                    notif_pr_started: false,
                    activ_pr_started: false,
                }),
                Condvar::new(),
            )),
            callbacks,
            attrs,
            user_data: Some(user_data),
            worker: None,
        }
    }

    /// Uninitialised → Stopped. Allocates the mutex and condition
    /// variable (under `std`, this cannot fail).
    pub fn init(&mut self) -> Result<(), ErrorCode> {
        let mut guard = self.shared.0.lock().map_err(|_| ErrorCode::ConfigErr)?;
        if guard.state != ContainerState::Uninitialised {
            return Err(ErrorCode::ConfigErr);
        }
        guard.state = ContainerState::Stopped;
        Ok(())
    }

    /// Clears a terminal error state (or re-arms an already-Stopped
    /// container) back to a clean Stopped state, without touching the
    /// thread primitives.
    pub fn reset(&mut self) -> Result<(), ErrorCode> {
        if self.worker.is_some() {
            return Err(ErrorCode::ConfigErr);
        }
        let mut guard = self.shared.0.lock().map_err(|_| ErrorCode::ConfigErr)?;
        guard.state = ContainerState::Stopped;
        guard.notif_cnt = 0;
        guard.notif_pr_started = false;
        guard.activ_pr_started = false;
        Ok(())
    }

    /// Current container state.
    pub fn container_state(&self) -> ContainerState {
        self.shared.0.lock().expect("container mutex poisoned").state
    }

    /// Current notification counter.
    pub fn notif_counter(&self) -> u64 {
        self.shared.0.lock().expect("container mutex poisoned").notif_cnt
    }

    /// The raw failing-primitive code, if `container_state` is a
    /// terminal error variant.
    pub fn last_err_code(&self) -> Option<i32> {
        match self.container_state() {
            ContainerState::MutexInitErr(c)
            | ContainerState::MutexDestroyErr(c)
            | ContainerState::MutexLockErr(c)
            | ContainerState::MutexUnlockErr(c)
            | ContainerState::CondInitErr(c)
            | ContainerState::CondDestroyErr(c)
            | ContainerState::CondSignalErr(c)
            | ContainerState::CondWaitErr(c)
            | ContainerState::ThreadCreateErr(c)
            | ContainerState::JoinErr(c)
            | ContainerState::AttrInitErr(c)
            | ContainerState::AttrDestroyErr(c) => Some(c),
            _ => None,
        }
    }

    /// Shared reference to the functional behaviour's data. Only
    /// meaningful while the container is not Started: the Activation
    /// Thread owns `U` for the duration of a run.
    pub fn user_data(&self) -> Option<&U> {
        self.user_data.as_ref()
    }

    /// Mutable reference to the functional behaviour's data, subject to
    /// the same availability as [`Self::user_data`].
    pub fn user_data_mut(&mut self) -> Option<&mut U> {
        self.user_data.as_mut()
    }

    /// If Stopped: sets both latches, runs `initializeNotifPr`,
    /// `initializeActivPr`, `setUpNotification`, resets the notification
    /// counter, and spawns the Activation Thread. No-op otherwise.
    pub fn start(&mut self) -> Result<(), ErrorCode> {
        {
            let mut guard = self.shared.0.lock().map_err(|_| ErrorCode::ConfigErr)?;
            if guard.state != ContainerState::Stopped {
                return Ok(());
            }
            guard.notif_pr_started = true;
            guard.activ_pr_started = true;
        }
        log_debug!("rt container start");
        (self.callbacks.initialize_notif_pr)();
        let mut user_data = self.user_data.take().ok_or(ErrorCode::ConfigErr)?;
        (self.callbacks.initialize_activ_pr)(&mut user_data);
        (self.callbacks.set_up_notification)(&mut user_data);

        let shared = Arc::clone(&self.shared);
        let callbacks = self.callbacks;
        let mut builder = thread::Builder::new();
        if let Some(name) = &self.attrs.thread_name {
            builder = builder.name(name.clone());
        }
        if let Some(stack_size) = self.attrs.stack_size {
            builder = builder.stack_size(stack_size);
        }
        match builder.spawn(move || activation_thread(shared, callbacks, user_data)) {
            Ok(handle) => {
                let mut guard = self.shared.0.lock().map_err(|_| ErrorCode::ConfigErr)?;
                guard.state = ContainerState::Started;
                guard.notif_cnt = 0;
                self.worker = Some(handle);
                Ok(())
            }
            Err(e) => {
                let mut guard = self.shared.0.lock().map_err(|_| ErrorCode::ConfigErr)?;
                let raw = e.raw_os_error().unwrap_or(-1);
                guard.state = ContainerState::ThreadCreateErr(raw);
                Err(ErrorCode::ConfigErr)
            }
        }
    }

    /// Runs the Notification Procedure once under the container mutex.
    pub fn notify(&self) {
        let mut guard = self.shared.0.lock().expect("container mutex poisoned");
        if notification_pass(&mut guard, &self.callbacks) {
            self.shared.1.notify_one();
        }
    }

    /// If Started: flips state to Stopped and wakes the worker so it can
    /// run its final activation/notification pass. No-op otherwise.
    pub fn stop(&self) {
        let mut guard = self.shared.0.lock().expect("container mutex poisoned");
        if guard.state != ContainerState::Started {
            return;
        }
        log_debug!("rt container stop");
        guard.state = ContainerState::Stopped;
        guard.notif_cnt += 1;
        self.shared.1.notify_one();
    }

    /// Joins the Activation Thread, reclaiming `U` for
    /// [`Self::user_data`]/[`Self::user_data_mut`].
    pub fn wait_for_termination(&mut self) -> Result<(), ErrorCode> {
        let Some(handle) = self.worker.take() else {
            return Ok(());
        };
        match handle.join() {
            Ok(user_data) => {
                self.user_data = Some(user_data);
                Ok(())
            }
            Err(_) => {
                let mut guard = self.shared.0.lock().map_err(|_| ErrorCode::ConfigErr)?;
                guard.state = ContainerState::JoinErr(-1);
                Err(ErrorCode::ConfigErr)
            }
        }
    }

    /// Stopped, worker joined → Uninitialised. Fails with
    /// [`ErrorCode::ConfigErr`] if the worker hasn't been joined yet or
    /// the container isn't Stopped.
    pub fn shutdown(&mut self) -> Result<(), ErrorCode> {
        if self.worker.is_some() {
            return Err(ErrorCode::ConfigErr);
        }
        let mut guard = self.shared.0.lock().map_err(|_| ErrorCode::ConfigErr)?;
        if guard.state != ContainerState::Stopped {
            return Err(ErrorCode::ConfigErr);
        }
        guard.state = ContainerState::Uninitialised;
        guard.notif_cnt = 0;
        guard.notif_pr_started = false;
        guard.activ_pr_started = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct Counter {
        ticks: u32,
    }

    fn finish_immediately(c: &mut Counter) -> bool {
        c.ticks += 1;
        true
    }

    #[test]
    fn nominal_run_reaches_stopped_with_no_error() {
        let callbacks = RtCallbacks {
            exec_func_behaviour: finish_immediately,
            ..RtCallbacks::default()
        };
        let mut rt = RtContainer::new(Counter { ticks: 0 }, callbacks, RtAttributes::default());
        rt.init().unwrap();
        rt.start().unwrap();
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
    fn burst_of_notifications_is_coalesced() {
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
}
