//! Fresh (non-derived) construction of a dynamic [`ProcBase`] plus the
//! initial extension that goes with it. Mirrors [`crate::sm::SmBuilder`]
//! closely; the differences are exactly the ones the data model calls for
//! (flows carry no action, action nodes reserve exactly one outgoing flow).

use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;

use crate::error::ErrorCode;
use crate::pr::descriptor::{dummy_action, dummy_guard, Action, Guard, PrDescriptor, PrExt};
use crate::pr::topology::{ActionNode, DecisionNode, Flow, PrDestination, PrSource, ProcBase};

/// Builds a fresh [`PrDescriptor`] by declarative configuration calls.
pub struct PrBuilder<U> {
    n_action: usize,
    n_decision: usize,
    n_flows: usize,
    next_range_start: u32,
    action_nodes: Vec<Option<ActionNode>>,
    decision_nodes: Vec<Option<DecisionNode>>,
    flows: Vec<Flow>,
    fill_cursor: Vec<u32>,
    initial: Option<Flow>,
    actions: Vec<Action<U>>,
    guards: Vec<Guard<U>>,
}

impl<U> PrBuilder<U> {
    /// Starts a fresh builder. `n_flows` counts only the ordinary flows
    /// (the reserved initial flow is tracked separately). Slot 0 of both
    /// callback tables is pre-populated with the dummy no-op action /
    /// always-true guard.
    pub fn new(
        n_action_nodes: usize,
        n_decision_nodes: usize,
        n_flows: usize,
        n_actions: usize,
        n_guards: usize,
    ) -> Result<Self, ErrorCode> {
        if n_action_nodes == 0 || n_flows == 0 || n_actions == 0 || n_guards == 0 {
            return Err(ErrorCode::IllegalSize);
        }
        Ok(PrBuilder {
            n_action: n_action_nodes,
            n_decision: n_decision_nodes,
            n_flows,
            next_range_start: 0,
            action_nodes: vec![None; n_action_nodes],
            decision_nodes: vec![None; n_decision_nodes],
            flows: vec![Flow::UNCONFIGURED; n_flows],
            fill_cursor: vec![0; n_action_nodes + n_decision_nodes],
            initial: None,
            actions: vec![dummy_action as Action<U>; n_actions],
            guards: vec![dummy_guard as Guard<U>; n_guards],
        })
    }

    fn register_action(&mut self, action: Option<Action<U>>) -> Result<usize, ErrorCode> {
        let Some(action) = action else {
            return Ok(0);
        };
        if let Some(idx) = self.actions.iter().position(|a| *a == action) {
            return Ok(idx);
        }
        let idx = self
            .actions
            .iter()
            .position(|a| *a == dummy_action as Action<U>)
            .filter(|&i| i != 0)
            .ok_or(ErrorCode::TooManyActions)?;
        self.actions[idx] = action;
        Ok(idx)
    }

    fn register_guard(&mut self, guard: Option<Guard<U>>) -> Result<usize, ErrorCode> {
        let Some(guard) = guard else {
            return Ok(0);
        };
        if let Some(idx) = self.guards.iter().position(|g| *g == guard) {
            return Ok(idx);
        }
        let idx = self
            .guards
            .iter()
            .position(|g| *g == dummy_guard as Guard<U>)
            .filter(|&i| i != 0)
            .ok_or(ErrorCode::TooManyGuards)?;
        self.guards[idx] = guard;
        Ok(idx)
    }

    fn reserve_range(&mut self, count: u32) -> Result<u32, ErrorCode> {
        let start = self.next_range_start;
        let end = start.checked_add(count).ok_or(ErrorCode::IllegalSize)?;
        if end as usize > self.n_flows {
            return Err(ErrorCode::IllegalSize);
        }
        self.next_range_start = end;
        Ok(start)
    }

    /// Configures the reserved initial flow (flow index 0, the one
    /// leaving the Initial Pseudo-Node). Evaluated on the first `execute`
    /// after `start`, not on `start` itself.
    pub fn set_initial_flow(
        &mut self,
        destination: PrDestination,
        guard: Option<Guard<U>>,
    ) -> Result<(), ErrorCode> {
        let guard = self.register_guard(guard)?;
        self.initial = Some(Flow {
            destination: destination.encode(),
            guard,
        });
        Ok(())
    }

    /// Adds action node `id` (`1..=n_action_nodes`), reserving its single
    /// outgoing flow slot.
    pub fn add_action_node(&mut self, id: u32, action: Option<Action<U>>) -> Result<(), ErrorCode> {
        if id == 0 || id as usize > self.n_action {
            return Err(ErrorCode::IllegalNodeId);
        }
        let slot = &mut self.action_nodes[(id - 1) as usize];
        if slot.is_some() {
            return Err(ErrorCode::DuplicateNodeId);
        }
        let action = self.register_action(action)?;
        let range_start = self.reserve_range(1)?;
        *slot = Some(ActionNode {
            out_flow: range_start,
            action,
        });
        self.fill_cursor[(id - 1) as usize] = 0;
        Ok(())
    }

    /// Adds decision node `id` (`1..=n_decision_nodes`). Requires at
    /// least two outgoing flows.
    pub fn add_decision_node(&mut self, id: u32, n_out_flows: u32) -> Result<(), ErrorCode> {
        if id == 0 || id as usize > self.n_decision {
            return Err(ErrorCode::IllegalNodeId);
        }
        if n_out_flows < 2 {
            return Err(ErrorCode::IllegalOutFlowCount);
        }
        let slot = &mut self.decision_nodes[(id - 1) as usize];
        if slot.is_some() {
            return Err(ErrorCode::DuplicateNodeId);
        }
        let range_start = self.reserve_range(n_out_flows)?;
        *slot = Some(DecisionNode {
            out_flow_index: range_start,
            out_flow_count: n_out_flows,
        });
        self.fill_cursor[self.n_action + (id - 1) as usize] = 0;
        Ok(())
    }

    fn source_range(&self, source: PrSource) -> Result<(u32, u32, usize), ErrorCode> {
        match source {
            PrSource::Initial => Err(ErrorCode::IllegalSource),
            PrSource::ActionNode(id) => {
                let node = self.action_nodes[(id.checked_sub(1).ok_or(ErrorCode::IllegalSource)?) as usize]
                    .as_ref()
                    .ok_or(ErrorCode::IllegalSource)?;
                Ok((node.out_flow, 1, (id - 1) as usize))
            }
            PrSource::DecisionNode(id) => {
                let node = self.decision_nodes[(id.checked_sub(1).ok_or(ErrorCode::IllegalSource)?) as usize]
                    .as_ref()
                    .ok_or(ErrorCode::IllegalSource)?;
                Ok((
                    node.out_flow_index,
                    node.out_flow_count,
                    self.n_action + (id - 1) as usize,
                ))
            }
        }
    }

    /// Adds a flow out of `source`, landing it in the next free slot of
    /// that source's reserved range.
    pub fn add_flow(
        &mut self,
        source: PrSource,
        destination: PrDestination,
        guard: Option<Guard<U>>,
    ) -> Result<(), ErrorCode> {
        let (range_start, range_count, cursor_slot) = self.source_range(source)?;
        let cursor = self.fill_cursor[cursor_slot];
        if cursor >= range_count {
            return Err(ErrorCode::TooManyTransitions);
        }
        let guard = self.register_guard(guard)?;
        let index = (range_start + cursor) as usize;
        self.flows[index] = Flow {
            destination: destination.encode(),
            guard,
        };
        self.fill_cursor[cursor_slot] = cursor + 1;
        Ok(())
    }

    /// Finishes configuration and produces a `Stopped` descriptor with no
    /// user data set yet. Call [`PrDescriptor::check`] before `start`.
    pub fn build(self, user_data: U) -> Result<PrDescriptor<U>, ErrorCode> {
        let initial = self.initial.ok_or(ErrorCode::NullTransition)?;
        let action_nodes: Vec<ActionNode> = self
            .action_nodes
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or(ErrorCode::NullState)?;
        let decision_nodes: Vec<DecisionNode> = self
            .decision_nodes
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or(ErrorCode::NullState)?;
        let base = Arc::new(ProcBase {
            action_nodes,
            decision_nodes,
            flows: self.flows,
            initial,
            n_actions: self.actions.len(),
            n_guards: self.guards.len(),
        });
        let ext = PrExt {
            actions: self.actions,
            guards: self.guards,
            cur_node: 0,
            proc_exec_cnt: 0,
            node_exec_cnt: 0,
            error_code: None,
            flow_cnt: base.flows.len(),
            user_data,
        };
        Ok(PrDescriptor { base, ext })
    }
}
