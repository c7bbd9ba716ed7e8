//! Topology: the derivable, structurally-shared part of a state machine.
//!
//! Stored as parallel arrays of small integer-indexed records rather than a
//! pointer graph, so that it is trivial to share across derived descriptors
//! (one [`Arc`](alloc::sync::Arc) per base, many extensions), trivial to
//! validate (`check` walks arrays, not live pointers), and trivial to lay
//! out statically for `no_std` targets (see [`crate::static_macros`]).

use alloc::vec::Vec;

/// A transition/flow destination: Final Pseudo-State, a proper state, or a
/// choice pseudo-state, encoded as the signed integer the wire format in
/// `Transition::destination` actually uses (`0` = FPS, `+k` = state `k`,
/// `-k` = choice `k`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// The Final Pseudo-State.
    Final,
    /// Proper state `k`, `k >= 1`.
    State(u32),
    /// Choice pseudo-state `k`, `k >= 1`.
    Choice(u32),
}

impl Destination {
    /// Encodes into the signed wire representation a [`Transition`] stores
    /// (`0` = FPS, `+k` = state `k`, `-k` = choice `k`). Public so
    /// `static_sm!`-generated topologies can build `Transition` literals
    /// without reaching into crate-private fields.
    pub const fn encode(self) -> i32 {
        match self {
            Destination::Final => 0,
            Destination::State(k) => k as i32,
            Destination::Choice(k) => -(k as i32),
        }
    }

    pub(crate) fn decode(raw: i32) -> Destination {
        if raw == 0 {
            Destination::Final
        } else if raw > 0 {
            Destination::State(raw as u32)
        } else {
            Destination::Choice((-raw) as u32)
        }
    }
}

/// A transition/flow source: the Initial Pseudo-State, a proper state, or a
/// choice pseudo-state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// The Initial Pseudo-State — only the single reserved initial
    /// transition may originate here.
    Initial,
    /// Proper state `k`, `k >= 1`.
    State(u32),
    /// Choice pseudo-state `k`, `k >= 1`.
    Choice(u32),
}

/// Topology record for one proper state.
///
/// `entry_action`/`do_action`/`exit_action` are *slot indices* into the
/// extension's action table, not function pointers — this is what lets an
/// override on a derived descriptor change every use of a callback with a
/// single table write.
#[derive(Debug, Clone, Copy)]
pub struct ProperState {
    pub(crate) out_trans_index: u32,
    pub(crate) out_trans_count: u32,
    pub(crate) entry_action: usize,
    pub(crate) do_action: usize,
    pub(crate) exit_action: usize,
}

impl ProperState {
    /// Builds a proper-state topology record directly from slot indices.
    /// Meant for `static_sm!`-generated tables, where the layout is
    /// worked out by hand instead of by [`crate::sm::SmBuilder`].
    pub const fn new(
        out_trans_index: u32,
        out_trans_count: u32,
        entry_action: usize,
        do_action: usize,
        exit_action: usize,
    ) -> Self {
        ProperState {
            out_trans_index,
            out_trans_count,
            entry_action,
            do_action,
            exit_action,
        }
    }
}

/// Topology record for one choice pseudo-state. Choice states carry no
/// actions, only an outgoing-transition range.
#[derive(Debug, Clone, Copy)]
pub struct ChoiceState {
    pub(crate) out_trans_index: u32,
    pub(crate) out_trans_count: u32,
}

impl ChoiceState {
    /// Builds a choice-state topology record directly from slot indices.
    pub const fn new(out_trans_index: u32, out_trans_count: u32) -> Self {
        ChoiceState {
            out_trans_index,
            out_trans_count,
        }
    }
}

/// A single transition, stored at a fixed slot within its source's
/// contiguous outgoing-transition range.
///
/// `guard` is `-1` until `add_transition` configures the slot; `check`
/// reports [`crate::ErrorCode::NullTransition`] for any slot still at `-1`.
#[derive(Debug, Clone, Copy)]
pub struct Transition {
    pub(crate) destination: i32,
    pub(crate) trigger: i32,
    pub(crate) action: usize,
    pub(crate) guard: i32,
}

impl Transition {
    pub(crate) const UNCONFIGURED: Transition = Transition {
        destination: 0,
        trigger: 0,
        action: 0,
        guard: -1,
    };

    /// Builds a transition topology record directly from its encoded
    /// fields. Meant for `static_sm!`-generated tables.
    pub const fn new(destination: i32, trigger: i32, action: usize, guard: i32) -> Self {
        Transition {
            destination,
            trigger,
            action,
            guard,
        }
    }

    /// The transition/flow's destination.
    pub fn destination(&self) -> Destination {
        Destination::decode(self.destination)
    }

    /// The trigger id this transition matches (SM only; meaningless for PR
    /// flows, which carry `-1`).
    pub fn trigger(&self) -> i32 {
        self.trigger
    }

    pub(crate) fn is_configured(&self) -> bool {
        self.guard >= 0
    }
}

/// Read-only view over a state machine's topology.
///
/// Implemented once for the heap-backed [`SmBase`] (dynamic creation) and
/// once per `static_sm!`-generated struct (static creation); the execution
/// engine in [`crate::sm::descriptor`] is written entirely against this
/// trait so the two storage strategies share one algorithm.
pub trait SmTopology {
    /// Proper states, indexed `0..n_proper_states` for state ids `1..=n`.
    fn proper_states(&self) -> &[ProperState];
    /// Choice states, indexed `0..n_choice_states` for choice ids `1..=m`.
    fn choice_states(&self) -> &[ChoiceState];
    /// All transitions other than the initial one, laid out as contiguous
    /// per-source ranges.
    fn transitions(&self) -> &[Transition];
    /// The reserved transition out of the Initial Pseudo-State.
    fn initial_transition(&self) -> Transition;
    /// Size of the action table this topology was configured against.
    fn n_actions(&self) -> usize;
    /// Size of the guard table this topology was configured against.
    fn n_guards(&self) -> usize;

    fn proper_state(&self, id: u32) -> Option<&ProperState> {
        if id == 0 {
            return None;
        }
        self.proper_states().get((id - 1) as usize)
    }

    fn choice_state(&self, id: u32) -> Option<&ChoiceState> {
        if id == 0 {
            return None;
        }
        self.choice_states().get((id - 1) as usize)
    }

    fn out_transitions(&self, index: u32, count: u32) -> &[Transition] {
        &self.transitions()[index as usize..(index + count) as usize]
    }
}

impl<T: SmTopology + ?Sized> SmTopology for &T {
    fn proper_states(&self) -> &[ProperState] {
        (**self).proper_states()
    }
    fn choice_states(&self) -> &[ChoiceState] {
        (**self).choice_states()
    }
    fn transitions(&self) -> &[Transition] {
        (**self).transitions()
    }
    fn initial_transition(&self) -> Transition {
        (**self).initial_transition()
    }
    fn n_actions(&self) -> usize {
        (**self).n_actions()
    }
    fn n_guards(&self) -> usize {
        (**self).n_guards()
    }
}

impl<T: SmTopology + ?Sized> SmTopology for alloc::sync::Arc<T> {
    fn proper_states(&self) -> &[ProperState] {
        (**self).proper_states()
    }
    fn choice_states(&self) -> &[ChoiceState] {
        (**self).choice_states()
    }
    fn transitions(&self) -> &[Transition] {
        (**self).transitions()
    }
    fn initial_transition(&self) -> Transition {
        (**self).initial_transition()
    }
    fn n_actions(&self) -> usize {
        (**self).n_actions()
    }
    fn n_guards(&self) -> usize {
        (**self).n_guards()
    }
}

/// Heap-backed topology produced by [`crate::sm::SmBuilder`] — the
/// "Dynamic-creation module" storage strategy.
pub struct SmBase {
    pub(crate) proper_states: Vec<ProperState>,
    pub(crate) choice_states: Vec<ChoiceState>,
    pub(crate) transitions: Vec<Transition>,
    pub(crate) initial: Transition,
    pub(crate) n_actions: usize,
    pub(crate) n_guards: usize,
}

impl SmTopology for SmBase {
    fn proper_states(&self) -> &[ProperState] {
        &self.proper_states
    }
    fn choice_states(&self) -> &[ChoiceState] {
        &self.choice_states
    }
    fn transitions(&self) -> &[Transition] {
        &self.transitions
    }
    fn initial_transition(&self) -> Transition {
        self.initial
    }
    fn n_actions(&self) -> usize {
        self.n_actions
    }
    fn n_guards(&self) -> usize {
        self.n_guards
    }
}
