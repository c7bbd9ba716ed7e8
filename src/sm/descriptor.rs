//! Execution engine for the SM descriptor: the extension (action/guard
//! tables, embedded-SM table, runtime counters, user data) paired with a
//! shared topology reference, and the `start`/`execute`/`stop`/`check`
//! state machine that walks it.

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::error::ErrorCode;
use crate::sm::embedded::SmLike;
use crate::sm::topology::{Destination, SmBase, SmTopology, Transition};
use crate::{log_debug, log_trace, log_warn};

/// An SM action callback: reads and writes the application's own user
/// data. The engine never dereferences anything beyond this reference —
/// the user-data pointer of the original C-flavored design is, in this
/// crate, simply `U`.
pub type Action<U> = fn(&mut U);

/// An SM guard callback: a predicate over the application's user data,
/// consulted before taking a transition or resolving a choice.
pub type Guard<U> = fn(&U) -> bool;

pub(crate) fn dummy_action<U>(_user: &mut U) {}

pub(crate) fn dummy_guard<U>(_user: &U) -> bool {
    true
}

/// The overridable part of a descriptor: callback tables, the
/// embedded-SM table, runtime position and counters, the sticky error
/// code, and the user data. Derived descriptors own one of these each;
/// fresh descriptors own one paired with a freshly-allocated topology.
pub struct SmExt<U> {
    pub(crate) actions: Vec<Action<U>>,
    pub(crate) guards: Vec<Guard<U>>,
    pub(crate) embedded: Vec<Option<Box<dyn SmLike>>>,
    pub(crate) current_state: i32,
    pub(crate) started: bool,
    pub(crate) sm_exec_cnt: u64,
    pub(crate) state_exec_cnt: u64,
    pub(crate) error_code: Option<ErrorCode>,
    /// Number of transitions in the base topology at creation time; `0`
    /// marks this extension as belonging to a derived descriptor.
    pub(crate) trans_cnt: usize,
    pub(crate) user_data: U,
}

/// A state machine descriptor: a topology reference (`B`, shared across
/// derivatives) plus an owned extension.
///
/// `B` defaults to `Arc<SmBase>`, the heap-backed "Dynamic-creation
/// module" storage; `static_sm!` (see [`crate::static_macros`]) produces
/// descriptors with `B = &'static` some generated topology struct instead,
/// reusing every method below unchanged.
pub struct SmDescriptor<U, B: SmTopology = Arc<SmBase>> {
    pub(crate) base: B,
    pub(crate) ext: SmExt<U>,
}

impl<U, B: SmTopology> SmDescriptor<U, B> {
    /// Creates a derived descriptor sharing `parent`'s topology. The new
    /// extension's action/guard tables start as copies of the parent's;
    /// its embedded-SM table starts empty regardless of the parent's.
    pub fn create_derived(parent: &Self, user_data: U) -> Self
    where
        B: Clone,
    {
        let n_embedded = parent.ext.embedded.len();
        SmDescriptor {
            base: parent.base.clone(),
            ext: SmExt {
                actions: parent.ext.actions.clone(),
                guards: parent.ext.guards.clone(),
                embedded: (0..n_embedded).map(|_| None).collect(),
                current_state: 0,
                started: false,
                sm_exec_cnt: 0,
                state_exec_cnt: 0,
                error_code: None,
                trans_cnt: 0,
                user_data,
            },
        }
    }

    /// `true` once `trans_cnt == 0`, i.e. this extension was produced by
    /// [`Self::create_derived`] rather than a builder.
    pub fn is_derived(&self) -> bool {
        self.ext.trans_cnt == 0
    }

    /// Creates a derived descriptor from caller-supplied action/guard
    /// tables instead of cloning the parent's. Validates both tables
    /// against the sizes the parent's topology was built against, since
    /// `override_action`/`override_guard` assume every slot the topology
    /// can index into is present.
    pub fn create_derived_with_tables(
        parent: &Self,
        actions: Vec<Action<U>>,
        guards: Vec<Guard<U>>,
        user_data: U,
    ) -> Result<Self, ErrorCode>
    where
        B: Clone,
    {
        if actions.len() != parent.base.n_actions() {
            return Err(ErrorCode::WrongNOfActions);
        }
        if guards.len() != parent.base.n_guards() {
            return Err(ErrorCode::WrongNOfGuards);
        }
        let n_embedded = parent.ext.embedded.len();
        Ok(SmDescriptor {
            base: parent.base.clone(),
            ext: SmExt {
                actions,
                guards,
                embedded: (0..n_embedded).map(|_| None).collect(),
                current_state: 0,
                started: false,
                sm_exec_cnt: 0,
                state_exec_cnt: 0,
                error_code: None,
                trans_cnt: 0,
                user_data,
            },
        })
    }

    /// Replaces one callback in the action table with another, by
    /// function-pointer identity. Only valid on a derived descriptor.
    pub fn override_action(&mut self, old: Action<U>, new: Action<U>) -> Result<(), ErrorCode> {
        if !self.is_derived() {
            return Err(ErrorCode::NotDerived);
        }
        let idx = self
            .ext
            .actions
            .iter()
            .position(|a| *a == old)
            .ok_or(ErrorCode::UndefAction)?;
        self.ext.actions[idx] = new;
        Ok(())
    }

    /// Replaces one callback in the guard table with another, by
    /// function-pointer identity. Only valid on a derived descriptor;
    /// slot 0 (the dummy always-true guard) can never be overridden.
    pub fn override_guard(&mut self, old: Guard<U>, new: Guard<U>) -> Result<(), ErrorCode> {
        if !self.is_derived() {
            return Err(ErrorCode::NotDerived);
        }
        let idx = self
            .ext
            .guards
            .iter()
            .position(|g| *g == old)
            .ok_or(ErrorCode::UndefGuard)?;
        if idx == 0 {
            return Err(ErrorCode::UndefGuard);
        }
        self.ext.guards[idx] = new;
        Ok(())
    }

    /// Attaches an embedded SM to proper state `state_id`. Only valid on
    /// a derived descriptor, and only while that state's embedded slot is
    /// still empty.
    pub fn embed(&mut self, state_id: u32, sm: Box<dyn SmLike>) -> Result<(), ErrorCode> {
        if !self.is_derived() {
            return Err(ErrorCode::NotDerived);
        }
        let idx = state_id
            .checked_sub(1)
            .ok_or(ErrorCode::IllegalNodeId)? as usize;
        let slot = self.ext.embedded.get_mut(idx).ok_or(ErrorCode::IllegalNodeId)?;
        if slot.is_some() {
            return Err(ErrorCode::DuplicateNodeId);
        }
        *slot = Some(sm);
        Ok(())
    }

    /// Current proper-state id, or `0` if stopped / at the Final
    /// Pseudo-State.
    pub fn current_state(&self) -> i32 {
        self.ext.current_state
    }

    /// Whether the descriptor is in the Started state.
    pub fn is_started(&self) -> bool {
        self.ext.started
    }

    /// The sticky error code, if any call has set one.
    pub fn error_code(&self) -> Option<ErrorCode> {
        self.ext.error_code
    }

    /// `execute` invocations since the last `start`.
    pub fn exec_count(&self) -> u64 {
        self.ext.sm_exec_cnt
    }

    /// `execute` invocations that did not leave the current state, reset
    /// on every state entry.
    pub fn state_exec_count(&self) -> u64 {
        self.ext.state_exec_cnt
    }

    /// Shared reference to the application's user data.
    pub fn user_data(&self) -> &U {
        &self.ext.user_data
    }

    /// Mutable reference to the application's user data.
    pub fn user_data_mut(&mut self) -> &mut U {
        &mut self.ext.user_data
    }

    fn run_action(&mut self, idx: usize) {
        let f = self.ext.actions[idx];
        f(&mut self.ext.user_data);
    }

    fn eval_guard(&self, idx: usize) -> bool {
        let f = self.ext.guards[idx];
        f(&self.ext.user_data)
    }

    /// Scans `choice`'s outgoing transitions in declaration order and
    /// follows the first with a true guard, running that transition's
    /// action and chaining through further choices. Returns `None` (with
    /// `error_code` set to [`ErrorCode::TransErr`] and bookkeeping rolled
    /// back to `fallback`) on a cycle or on exhausting all guards false.
    fn resolve_choice(&mut self, start: u32, fallback: (i32, bool)) -> Option<Destination> {
        let mut visited: Vec<u32> = Vec::new();
        let mut current = start;
        loop {
            if visited.contains(&current) {
                log_warn!("choice {} revisited within one resolution", current);
                self.ext.error_code = Some(ErrorCode::TransErr);
                self.ext.current_state = fallback.0;
                self.ext.started = fallback.1;
                return None;
            }
            visited.push(current);
            let choice = *self.base.choice_state(current).expect("checked topology");
            let candidates = self
                .base
                .out_transitions(choice.out_trans_index, choice.out_trans_count)
                .to_vec();
            let found = candidates.iter().find(|t| self.eval_guard(t.guard));
            let Some(t) = found else {
                log_warn!("choice {} has no true guard", current);
                self.ext.error_code = Some(ErrorCode::TransErr);
                self.ext.current_state = fallback.0;
                self.ext.started = fallback.1;
                return None;
            };
            self.run_action(t.action);
            match t.destination() {
                Destination::Choice(next) => current = next,
                other => return Some(other),
            }
        }
    }

    /// Enters `dest`: resolves choices, then (for a proper state) runs
    /// entry then do, then recursively starts the embedded SM.
    fn enter(&mut self, dest: Destination, fallback: (i32, bool)) {
        match dest {
            Destination::Final => {
                log_trace!("entering Final Pseudo-State");
                self.ext.current_state = 0;
                self.ext.started = false;
            }
            Destination::Choice(k) => {
                if let Some(resolved) = self.resolve_choice(k, fallback) {
                    self.enter(resolved, fallback);
                }
            }
            Destination::State(k) => {
                log_trace!("entering state {}", k);
                self.ext.current_state = k as i32;
                self.ext.started = true;
                self.ext.state_exec_cnt = 0;
                let state = *self.base.proper_state(k).expect("checked topology");
                self.run_action(state.entry_action);
                self.run_action(state.do_action);
                if let Some(embedded) = self.ext.embedded[(k - 1) as usize].as_mut() {
                    embedded.start();
                }
            }
        }
    }

    /// If Stopped, takes the initial transition: runs its action, enters
    /// the destination (resolving choices immediately if it targets one).
    /// No-op if already started.
    pub fn start(&mut self) {
        if self.ext.started {
            return;
        }
        log_debug!("start");
        self.ext.sm_exec_cnt = 0;
        self.ext.state_exec_cnt = 0;
        self.ext.error_code = None;
        let initial = self.base.initial_transition();
        self.run_action(initial.action);
        self.enter(initial.destination(), (0, false));
    }

    /// Scans the current state's outgoing transitions in declaration
    /// order for the first whose trigger matches `t` and whose guard is
    /// true. If found: exits (embedded SM, then host's exit action), runs
    /// the transition's action, and enters the destination. If not
    /// found: runs the current state's do action and forwards `t` to the
    /// embedded SM, if any. No-op if not started.
    pub fn execute(&mut self, t: i32) {
        if !self.ext.started {
            return;
        }
        self.ext.sm_exec_cnt += 1;
        let k = self.ext.current_state as u32;
        let state = *self.base.proper_state(k).expect("started implies valid state");
        let out = self
            .base
            .out_transitions(state.out_trans_index, state.out_trans_count);
        let found: Option<Transition> = out
            .iter()
            .find(|tr| tr.trigger == t && self.eval_guard(tr.guard))
            .copied();
        match found {
            None => {
                self.ext.state_exec_cnt += 1;
                self.run_action(state.do_action);
                if let Some(embedded) = self.ext.embedded[(k - 1) as usize].as_mut() {
                    embedded.execute(t);
                }
            }
            Some(tr) => {
                if let Some(embedded) = self.ext.embedded[(k - 1) as usize].as_mut() {
                    if embedded.is_started() {
                        embedded.stop();
                    }
                }
                self.run_action(state.exit_action);
                self.run_action(tr.action);
                self.enter(tr.destination(), (k as i32, true));
            }
        }
    }

    /// If Started: runs exit actions bottom-up (embedded SM, then the
    /// host's exit action) and stops. No-op if already stopped.
    pub fn stop(&mut self) {
        if !self.ext.started {
            return;
        }
        log_debug!("stop");
        let k = self.ext.current_state as u32;
        if k > 0 {
            if let Some(state) = self.base.proper_state(k) {
                let state = *state;
                if let Some(embedded) = self.ext.embedded[(k - 1) as usize].as_mut() {
                    if embedded.is_started() {
                        embedded.stop();
                    }
                }
                self.run_action(state.exit_action);
            }
        }
        self.ext.started = false;
        self.ext.current_state = 0;
    }

    /// Structural validation: every transition slot configured, every
    /// destination in range, every state/choice reachable from the
    /// initial transition, and every embedded SM's own `check` passing.
    pub fn check(&mut self) -> Result<(), ErrorCode> {
        if self.ext.error_code.is_some() {
            return Err(ErrorCode::ConfigErr);
        }
        let result = self.check_inner();
        if let Err(e) = result {
            self.ext.error_code = Some(e);
        }
        result
    }

    fn check_inner(&mut self) -> Result<(), ErrorCode> {
        for t in self.base.transitions() {
            if !t.is_configured() {
                return Err(ErrorCode::NullTransition);
            }
            match t.destination() {
                Destination::Final => {}
                Destination::State(k) => {
                    if self.base.proper_state(k).is_none() {
                        return Err(ErrorCode::IllegalDestination);
                    }
                }
                Destination::Choice(k) => {
                    if self.base.choice_state(k).is_none() {
                        return Err(ErrorCode::IllegalDestination);
                    }
                }
            }
        }

        let n_proper = self.base.proper_states().len();
        let n_choice = self.base.choice_states().len();
        let mut seen_states = alloc::vec![false; n_proper];
        let mut seen_choices = alloc::vec![false; n_choice];
        let mut stack: Vec<Destination> = Vec::new();
        stack.push(self.base.initial_transition().destination());
        while let Some(d) = stack.pop() {
            match d {
                Destination::Final => {}
                Destination::State(k) => {
                    let idx = (k - 1) as usize;
                    if idx >= seen_states.len() || seen_states[idx] {
                        continue;
                    }
                    seen_states[idx] = true;
                    let st = *self.base.proper_state(k).expect("checked above");
                    for t in self.base.out_transitions(st.out_trans_index, st.out_trans_count) {
                        stack.push(t.destination());
                    }
                }
                Destination::Choice(k) => {
                    let idx = (k - 1) as usize;
                    if idx >= seen_choices.len() || seen_choices[idx] {
                        continue;
                    }
                    seen_choices[idx] = true;
                    let ch = *self.base.choice_state(k).expect("checked above");
                    for t in self.base.out_transitions(ch.out_trans_index, ch.out_trans_count) {
                        stack.push(t.destination());
                    }
                }
            }
        }
        if seen_states.iter().any(|seen| !seen) || seen_choices.iter().any(|seen| !seen) {
            return Err(ErrorCode::Unreachable);
        }

        for embedded in self.ext.embedded.iter_mut().flatten() {
            embedded.check()?;
        }
        Ok(())
    }
}

impl<U: 'static, B: SmTopology + 'static> SmLike for SmDescriptor<U, B> {
    fn start(&mut self) {
        self.start();
    }
    fn execute(&mut self, trigger: i32) {
        self.execute(trigger);
    }
    fn stop(&mut self) {
        self.stop();
    }
    fn is_started(&self) -> bool {
        self.is_started()
    }
    fn check(&mut self) -> Result<(), ErrorCode> {
        self.check()
    }
}
