//! Topology: the derivable, structurally-shared part of a procedure.
//!
//! Same indexed-array philosophy as [`crate::sm::topology`]: nodes and
//! flows live in parallel arrays addressed by small integer indices, not a
//! pointer graph, so sharing across derived descriptors is a cheap
//! [`Arc`](alloc::sync::Arc) clone and validation is a linear scan.

use alloc::vec::Vec;

/// A control-flow destination: Final, an action node, or a decision node,
/// encoded the same way as [`crate::sm::Destination`] (`0` = Final, `+k` =
/// action node `k`, `-k` = decision node `k`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrDestination {
    Final,
    ActionNode(u32),
    DecisionNode(u32),
}

impl PrDestination {
    /// Encodes into the signed wire representation a [`Flow`] stores.
    /// Public so `static_pr!`-generated topologies can build `Flow`
    /// literals without reaching into crate-private fields.
    pub const fn encode(self) -> i32 {
        match self {
            PrDestination::Final => 0,
            PrDestination::ActionNode(k) => k as i32,
            PrDestination::DecisionNode(k) => -(k as i32),
        }
    }

    pub(crate) fn decode(raw: i32) -> PrDestination {
        if raw == 0 {
            PrDestination::Final
        } else if raw > 0 {
            PrDestination::ActionNode(raw as u32)
        } else {
            PrDestination::DecisionNode((-raw) as u32)
        }
    }
}

/// A control-flow source: the Initial node, an action node, or a decision
/// node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrSource {
    Initial,
    ActionNode(u32),
    DecisionNode(u32),
}

/// Topology record for one action node: a single outgoing flow and the
/// action to run whenever the node is entered.
#[derive(Debug, Clone, Copy)]
pub struct ActionNode {
    pub(crate) out_flow: u32,
    pub(crate) action: usize,
}

impl ActionNode {
    /// Builds an action-node topology record directly from slot indices.
    /// Meant for `static_pr!`-generated tables.
    pub const fn new(out_flow: u32, action: usize) -> Self {
        ActionNode { out_flow, action }
    }
}

/// Topology record for one decision node: a range of at least two
/// outgoing flows, scanned in declaration order when resolving.
#[derive(Debug, Clone, Copy)]
pub struct DecisionNode {
    pub(crate) out_flow_index: u32,
    pub(crate) out_flow_count: u32,
}

impl DecisionNode {
    /// Builds a decision-node topology record directly from slot indices.
    pub const fn new(out_flow_index: u32, out_flow_count: u32) -> Self {
        DecisionNode {
            out_flow_index,
            out_flow_count,
        }
    }
}

/// A single control flow. Unlike an SM transition, a PR flow carries no
/// action and no trigger — only a destination and a guard.
#[derive(Debug, Clone, Copy)]
pub struct Flow {
    pub(crate) destination: i32,
    pub(crate) guard: i32,
}

impl Flow {
    pub(crate) const UNCONFIGURED: Flow = Flow {
        destination: 0,
        guard: -1,
    };

    /// Builds a flow topology record directly from its encoded fields.
    /// Meant for `static_pr!`-generated tables.
    pub const fn new(destination: i32, guard: i32) -> Self {
        Flow { destination, guard }
    }

    pub fn destination(&self) -> PrDestination {
        PrDestination::decode(self.destination)
    }

    pub(crate) fn is_configured(&self) -> bool {
        self.guard >= 0
    }
}

/// Read-only view over a procedure's topology, implemented once for the
/// heap-backed [`ProcBase`] and once per `static_pr!`-generated struct.
pub trait PrTopology {
    fn action_nodes(&self) -> &[ActionNode];
    fn decision_nodes(&self) -> &[DecisionNode];
    fn flows(&self) -> &[Flow];
    fn initial_flow(&self) -> Flow;
    fn n_actions(&self) -> usize;
    fn n_guards(&self) -> usize;

    fn action_node(&self, id: u32) -> Option<&ActionNode> {
        if id == 0 {
            return None;
        }
        self.action_nodes().get((id - 1) as usize)
    }

    fn decision_node(&self, id: u32) -> Option<&DecisionNode> {
        if id == 0 {
            return None;
        }
        self.decision_nodes().get((id - 1) as usize)
    }

    fn out_flows(&self, index: u32, count: u32) -> &[Flow] {
        &self.flows()[index as usize..(index + count) as usize]
    }
}

impl<T: PrTopology + ?Sized> PrTopology for &T {
    fn action_nodes(&self) -> &[ActionNode] {
        (**self).action_nodes()
    }
    fn decision_nodes(&self) -> &[DecisionNode] {
        (**self).decision_nodes()
    }
    fn flows(&self) -> &[Flow] {
        (**self).flows()
    }
    fn initial_flow(&self) -> Flow {
        (**self).initial_flow()
    }
    fn n_actions(&self) -> usize {
        (**self).n_actions()
    }
    fn n_guards(&self) -> usize {
        (**self).n_guards()
    }
}

impl<T: PrTopology + ?Sized> PrTopology for alloc::sync::Arc<T> {
    fn action_nodes(&self) -> &[ActionNode] {
        (**self).action_nodes()
    }
    fn decision_nodes(&self) -> &[DecisionNode] {
        (**self).decision_nodes()
    }
    fn flows(&self) -> &[Flow] {
        (**self).flows()
    }
    fn initial_flow(&self) -> Flow {
        (**self).initial_flow()
    }
    fn n_actions(&self) -> usize {
        (**self).n_actions()
    }
    fn n_guards(&self) -> usize {
        (**self).n_guards()
    }
}

/// Heap-backed topology produced by [`crate::pr::PrBuilder`].
pub struct ProcBase {
    pub(crate) action_nodes: Vec<ActionNode>,
    pub(crate) decision_nodes: Vec<DecisionNode>,
    pub(crate) flows: Vec<Flow>,
    pub(crate) initial: Flow,
    pub(crate) n_actions: usize,
    pub(crate) n_guards: usize,
}

impl PrTopology for ProcBase {
    fn action_nodes(&self) -> &[ActionNode] {
        &self.action_nodes
    }
    fn decision_nodes(&self) -> &[DecisionNode] {
        &self.decision_nodes
    }
    fn flows(&self) -> &[Flow] {
        &self.flows
    }
    fn initial_flow(&self) -> Flow {
        self.initial
    }
    fn n_actions(&self) -> usize {
        self.n_actions
    }
    fn n_guards(&self) -> usize {
        self.n_guards
    }
}
