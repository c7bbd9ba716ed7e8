//! Execution engine for the PR descriptor: the extension (action/guard
//! tables, runtime counters, user data) paired with a shared topology
//! reference, and the `start`/`execute`/`run`/`stop`/`check` state
//! machine that walks it.
//!
//! The defining difference from an SM's `execute`: there is no trigger.
//! A single call sweeps forward through as many action nodes as the
//! chain of guards allows, stopping only at a false guard, the Final
//! node, or a decision node with no true guard.

use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::error::ErrorCode;
use crate::pr::topology::{Flow, PrDestination, PrTopology, ProcBase};
use crate::{log_debug, log_trace, log_warn};

/// A PR action callback: reads and writes the application's own user
/// data, exactly like [`crate::sm::Action`].
pub type Action<U> = fn(&mut U);

/// A PR guard callback: a predicate over the application's user data.
pub type Guard<U> = fn(&U) -> bool;

pub(crate) fn dummy_action<U>(_user: &mut U) {}

pub(crate) fn dummy_guard<U>(_user: &U) -> bool {
    true
}

/// The overridable part of a descriptor: callback tables, runtime
/// position and counters, the sticky error code, and the user data.
pub struct PrExt<U> {
    pub(crate) actions: Vec<Action<U>>,
    pub(crate) guards: Vec<Guard<U>>,
    /// `0` = Stopped, `-1` = at the Initial Pseudo-Node, `+k` = at action
    /// node `k`.
    pub(crate) cur_node: i32,
    pub(crate) proc_exec_cnt: u64,
    pub(crate) node_exec_cnt: u64,
    pub(crate) error_code: Option<ErrorCode>,
    /// Number of flows in the base topology at creation time; `0` marks
    /// this extension as belonging to a derived descriptor.
    pub(crate) flow_cnt: usize,
    pub(crate) user_data: U,
}

/// A procedure descriptor: a topology reference (`B`, shared across
/// derivatives) plus an owned extension.
pub struct PrDescriptor<U, B: PrTopology = Arc<ProcBase>> {
    pub(crate) base: B,
    pub(crate) ext: PrExt<U>,
}

impl<U, B: PrTopology> PrDescriptor<U, B> {
    /// Creates a derived descriptor sharing `parent`'s topology. The new
    /// extension's action/guard tables start as copies of the parent's.
    pub fn create_derived(parent: &Self, user_data: U) -> Self
    where
        B: Clone,
    {
        PrDescriptor {
            base: parent.base.clone(),
            ext: PrExt {
                actions: parent.ext.actions.clone(),
                guards: parent.ext.guards.clone(),
                cur_node: 0,
                proc_exec_cnt: 0,
                node_exec_cnt: 0,
                error_code: None,
                flow_cnt: 0,
                user_data,
            },
        }
    }

    /// `true` once `flow_cnt == 0`, i.e. this extension was produced by
    /// [`Self::create_derived`] rather than a builder.
    pub fn is_derived(&self) -> bool {
        self.ext.flow_cnt == 0
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
        Ok(PrDescriptor {
            base: parent.base.clone(),
            ext: PrExt {
                actions,
                guards,
                cur_node: 0,
                proc_exec_cnt: 0,
                node_exec_cnt: 0,
                error_code: None,
                flow_cnt: 0,
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

    /// Current action-node id, `0` if stopped, or a negative sentinel
    /// (`-1`) while Started-but-not-yet-advanced at the Initial node.
    pub fn current_node(&self) -> i32 {
        self.ext.cur_node
    }

    /// Whether the descriptor is in the Started state.
    pub fn is_started(&self) -> bool {
        self.ext.cur_node != 0
    }

    /// The sticky error code, if any call has set one.
    pub fn error_code(&self) -> Option<ErrorCode> {
        self.ext.error_code
    }

    /// `execute` invocations since the last `start`.
    pub fn exec_count(&self) -> u64 {
        self.ext.proc_exec_cnt
    }

    /// `execute` invocations that did not leave the current node, reset
    /// on every node entry.
    pub fn node_exec_count(&self) -> u64 {
        self.ext.node_exec_cnt
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

    fn outgoing_flow(&self) -> Flow {
        match self.ext.cur_node {
            -1 => self.base.initial_flow(),
            k if k > 0 => {
                let node = self.base.action_node(k as u32).expect("checked topology");
                self.base.flows()[node.out_flow as usize]
            }
            _ => unreachable!("outgoing_flow called while stopped"),
        }
    }

    /// Scans `decision`'s outgoing flows in declaration order and returns
    /// the destination of the first with a true guard, chaining through
    /// further decision nodes. Returns `None` (with `error_code` set to
    /// [`ErrorCode::FlowErr`]) on a cycle or on exhausting all guards
    /// false; the caller leaves `cur_node` untouched, which is exactly
    /// "the action node the procedure occupied on entry" since `cur_node`
    /// is only updated once a destination action node is actually
    /// entered.
    fn resolve_decisions(&mut self, start: u32) -> Option<PrDestination> {
        let mut visited: Vec<u32> = Vec::new();
        let mut current = start;
        loop {
            if visited.contains(&current) {
                log_warn!("decision node {} revisited within one sweep", current);
                self.ext.error_code = Some(ErrorCode::FlowErr);
                return None;
            }
            visited.push(current);
            let node = *self.base.decision_node(current).expect("checked topology");
            let candidates = self
                .base
                .out_flows(node.out_flow_index, node.out_flow_count)
                .to_vec();
            let found = candidates.iter().find(|f| self.eval_guard(f.guard));
            let Some(f) = found else {
                log_warn!("decision node {} has no true guard", current);
                self.ext.error_code = Some(ErrorCode::FlowErr);
                return None;
            };
            match f.destination() {
                PrDestination::DecisionNode(next) => current = next,
                other => return Some(other),
            }
        }
    }

    /// If Stopped, moves to the Initial Pseudo-Node without evaluating
    /// its outgoing guard — that happens on the first `execute`. No-op if
    /// already started.
    pub fn start(&mut self) {
        if self.is_started() {
            return;
        }
        log_debug!("start");
        self.ext.proc_exec_cnt = 0;
        self.ext.node_exec_cnt = 0;
        self.ext.error_code = None;
        self.ext.cur_node = -1;
    }

    /// Runs a single sweep: repeatedly evaluates the current position's
    /// outgoing guard and, while true, advances — through action nodes
    /// (running each one's action) and decision nodes (resolved via
    /// [`Self::resolve_decisions`]) — until the guard is false, the Final
    /// node is reached, or a decision node fails to resolve. No-op if not
    /// started.
    pub fn execute(&mut self) {
        if !self.is_started() {
            return;
        }
        self.ext.proc_exec_cnt += 1;
        let mut advanced = false;
        loop {
            let flow = self.outgoing_flow();
            if !self.eval_guard(flow.guard) {
                break;
            }
            let dest = match flow.destination() {
                PrDestination::DecisionNode(d) => match self.resolve_decisions(d) {
                    Some(dest) => dest,
                    None => return,
                },
                other => other,
            };
            match dest {
                PrDestination::Final => {
                    log_trace!("entering Final Pseudo-Node");
                    self.ext.cur_node = 0;
                    break;
                }
                PrDestination::ActionNode(m) => {
                    log_trace!("entering action node {}", m);
                    self.ext.cur_node = m as i32;
                    self.ext.node_exec_cnt = 0;
                    advanced = true;
                    let node = *self.base.action_node(m).expect("checked topology");
                    self.run_action(node.action);
                }
                PrDestination::DecisionNode(_) => unreachable!("resolved above"),
            }
        }
        if !advanced {
            self.ext.node_exec_cnt += 1;
        }
    }

    /// If Started, stops immediately, discarding position. No-op if
    /// already stopped.
    pub fn stop(&mut self) {
        if !self.is_started() {
            return;
        }
        log_debug!("stop");
        self.ext.cur_node = 0;
    }

    /// `start`, then a single `execute`, then `stop` — running a
    /// procedure to completion in one shot.
    pub fn run(&mut self) {
        self.start();
        self.execute();
        self.stop();
    }

    /// Structural validation: every flow slot configured, every
    /// destination in range, and every node reachable from the initial
    /// flow.
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
        for f in self.base.flows() {
            if !f.is_configured() {
                return Err(ErrorCode::NullTransition);
            }
            match f.destination() {
                PrDestination::Final => {}
                PrDestination::ActionNode(k) => {
                    if self.base.action_node(k).is_none() {
                        return Err(ErrorCode::IllegalDestination);
                    }
                }
                PrDestination::DecisionNode(k) => {
                    if self.base.decision_node(k).is_none() {
                        return Err(ErrorCode::IllegalDestination);
                    }
                }
            }
        }
        if !self.base.initial_flow().is_configured() {
            return Err(ErrorCode::NullTransition);
        }

        let n_action = self.base.action_nodes().len();
        let n_decision = self.base.decision_nodes().len();
        let mut seen_actions = alloc::vec![false; n_action];
        let mut seen_decisions = alloc::vec![false; n_decision];
        let mut stack: Vec<PrDestination> = Vec::new();
        stack.push(self.base.initial_flow().destination());
        while let Some(d) = stack.pop() {
            match d {
                PrDestination::Final => {}
                PrDestination::ActionNode(k) => {
                    let idx = (k - 1) as usize;
                    if idx >= seen_actions.len() || seen_actions[idx] {
                        continue;
                    }
                    seen_actions[idx] = true;
                    let node = *self.base.action_node(k).expect("checked above");
                    stack.push(self.base.flows()[node.out_flow as usize].destination());
                }
                PrDestination::DecisionNode(k) => {
                    let idx = (k - 1) as usize;
                    if idx >= seen_decisions.len() || seen_decisions[idx] {
                        continue;
                    }
                    seen_decisions[idx] = true;
                    let node = *self.base.decision_node(k).expect("checked above");
                    for f in self.base.out_flows(node.out_flow_index, node.out_flow_count) {
                        stack.push(f.destination());
                    }
                }
            }
        }
        if seen_actions.iter().any(|seen| !seen) || seen_decisions.iter().any(|seen| !seen) {
            return Err(ErrorCode::Unreachable);
        }
        Ok(())
    }
}
