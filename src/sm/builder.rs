//! Fresh (non-derived) construction of a dynamic [`SmBase`] plus the
//! initial extension that goes with it.

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;

use crate::error::ErrorCode;
use crate::sm::descriptor::{dummy_action, dummy_guard, Action, Guard, SmDescriptor, SmExt};
use crate::sm::embedded::SmLike;
use crate::sm::topology::{ChoiceState, Destination, ProperState, SmBase, Source, Transition};

/// Builds a fresh [`SmDescriptor`] by declarative configuration calls.
///
/// The "fresh" half of construction, as opposed to "derived" construction
/// ([`SmDescriptor::create_derived`]): a fresh SM allocates its own
/// topology and a fully-populated extension; a derived SM shares the
/// fresh SM's topology and starts its extension as a copy of the
/// parent's tables.
pub struct SmBuilder<U> {
    n_proper: usize,
    n_choice: usize,
    n_transitions: usize,
    next_range_start: u32,
    proper_states: Vec<Option<ProperState>>,
    choice_states: Vec<Option<ChoiceState>>,
    transitions: Vec<Transition>,
    fill_cursor: Vec<u32>,
    initial: Option<Transition>,
    actions: Vec<Action<U>>,
    guards: Vec<Guard<U>>,
    embedded: Vec<Option<Box<dyn SmLike>>>,
}

impl<U> SmBuilder<U> {
    /// Starts a fresh builder. `n_transitions` counts only the ordinary
    /// transitions (the reserved initial transition is tracked separately).
    /// Slot 0 of both tables is pre-populated with the dummy no-op
    /// action / always-true guard.
    pub fn new(
        n_proper_states: usize,
        n_choice_states: usize,
        n_transitions: usize,
        n_actions: usize,
        n_guards: usize,
    ) -> Result<Self, ErrorCode> {
        if n_proper_states == 0 || n_transitions == 0 || n_actions == 0 || n_guards == 0 {
            return Err(ErrorCode::IllegalSize);
        }
        Ok(SmBuilder {
            n_proper: n_proper_states,
            n_choice: n_choice_states,
            n_transitions,
            next_range_start: 0,
            proper_states: vec![None; n_proper_states],
            choice_states: vec![None; n_choice_states],
            transitions: vec![Transition::UNCONFIGURED; n_transitions],
            fill_cursor: vec![0; n_proper_states + n_choice_states],
            initial: None,
            actions: vec![dummy_action as Action<U>; n_actions],
            guards: vec![dummy_guard as Guard<U>; n_guards],
            embedded: (0..n_proper_states).map(|_| None).collect(),
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
        let end = start
            .checked_add(count)
            .ok_or(ErrorCode::IllegalSize)?;
        if end as usize > self.n_transitions {
            return Err(ErrorCode::IllegalSize);
        }
        self.next_range_start = end;
        Ok(start)
    }

    /// Configures the reserved initial transition (transition 0, the one
    /// leaving the Initial Pseudo-State). No trigger, no guard: it always
    /// fires once on `start`.
    pub fn set_initial_transition(
        &mut self,
        destination: Destination,
        action: Option<Action<U>>,
    ) -> Result<(), ErrorCode> {
        let action = self.register_action(action)?;
        self.initial = Some(Transition {
            destination: destination.encode(),
            trigger: -1,
            action,
            guard: 0,
        });
        Ok(())
    }

    /// Adds proper state `id` (`1..=n_proper_states`), reserving
    /// `n_out_trans` contiguous slots in the transition array for its
    /// outgoing transitions. `embedded`, if supplied, is started and
    /// stopped alongside `id` from the very first `start`/`stop` — unlike
    /// [`SmDescriptor::embed`], which only attaches to an already-built
    /// derived descriptor.
    pub fn add_proper_state(
        &mut self,
        id: u32,
        entry: Option<Action<U>>,
        do_action: Option<Action<U>>,
        exit: Option<Action<U>>,
        n_out_trans: u32,
        embedded: Option<Box<dyn SmLike>>,
    ) -> Result<(), ErrorCode> {
        if id == 0 || id as usize > self.n_proper {
            return Err(ErrorCode::IllegalNodeId);
        }
        let slot = &mut self.proper_states[(id - 1) as usize];
        if slot.is_some() {
            return Err(ErrorCode::DuplicateNodeId);
        }
        let entry = self.register_action(entry)?;
        let do_action = self.register_action(do_action)?;
        let exit = self.register_action(exit)?;
        let range_start = self.reserve_range(n_out_trans)?;
        self.proper_states[(id - 1) as usize] = Some(ProperState {
            out_trans_index: range_start,
            out_trans_count: n_out_trans,
            entry_action: entry,
            do_action,
            exit_action: exit,
        });
        self.fill_cursor[(id - 1) as usize] = 0;
        self.embedded[(id - 1) as usize] = embedded;
        Ok(())
    }

    /// Adds choice state `id` (`1..=n_choice_states`). Requires at least
    /// two outgoing transitions, since a choice with fewer can never make
    /// a meaningful decision.
    pub fn add_choice_state(&mut self, id: u32, n_out_trans: u32) -> Result<(), ErrorCode> {
        if id == 0 || id as usize > self.n_choice {
            return Err(ErrorCode::IllegalNodeId);
        }
        if n_out_trans < 2 {
            return Err(ErrorCode::IllegalOutFlowCount);
        }
        let slot = &mut self.choice_states[(id - 1) as usize];
        if slot.is_some() {
            return Err(ErrorCode::DuplicateNodeId);
        }
        let range_start = self.reserve_range(n_out_trans)?;
        self.choice_states[(id - 1) as usize] = Some(ChoiceState {
            out_trans_index: range_start,
            out_trans_count: n_out_trans,
        });
        self.fill_cursor[self.n_proper + (id - 1) as usize] = 0;
        Ok(())
    }

    fn source_range(&self, source: Source) -> Result<(u32, u32, usize), ErrorCode> {
        match source {
            Source::Initial => Err(ErrorCode::IllegalSource),
            Source::State(id) => {
                let state = self.proper_states[(id.checked_sub(1).ok_or(ErrorCode::IllegalSource)?) as usize]
                    .as_ref()
                    .ok_or(ErrorCode::IllegalSource)?;
                Ok((state.out_trans_index, state.out_trans_count, (id - 1) as usize))
            }
            Source::Choice(id) => {
                let choice = self.choice_states[(id.checked_sub(1).ok_or(ErrorCode::IllegalSource)?) as usize]
                    .as_ref()
                    .ok_or(ErrorCode::IllegalSource)?;
                Ok((
                    choice.out_trans_index,
                    choice.out_trans_count,
                    self.n_proper + (id - 1) as usize,
                ))
            }
        }
    }

    /// Adds a transition out of `source`, landing it in the next free slot
    /// of that source's reserved range (declaration order is preserved,
    /// which is what tie-breaking among same-trigger or same-choice
    /// transitions relies on).
    pub fn add_transition(
        &mut self,
        source: Source,
        destination: Destination,
        trigger: i32,
        action: Option<Action<U>>,
        guard: Option<Guard<U>>,
    ) -> Result<(), ErrorCode> {
        let (range_start, range_count, cursor_slot) = self.source_range(source)?;
        let cursor = self.fill_cursor[cursor_slot];
        if cursor >= range_count {
            return Err(ErrorCode::TooManyTransitions);
        }
        let action = self.register_action(action)?;
        let guard = self.register_guard(guard)?;
        let index = (range_start + cursor) as usize;
        self.transitions[index] = Transition {
            destination: destination.encode(),
            trigger,
            action,
            guard,
        };
        self.fill_cursor[cursor_slot] = cursor + 1;
        Ok(())
    }

    /// Finishes configuration and produces a `Stopped` descriptor with no
    /// user data set yet. Call [`SmDescriptor::check`] before `start`.
    pub fn build(self, user_data: U) -> Result<SmDescriptor<U>, ErrorCode> {
        let initial = self.initial.ok_or(ErrorCode::NullTransition)?;
        let embedded = self.embedded;
        let proper_states: Vec<ProperState> = self
            .proper_states
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or(ErrorCode::NullState)?;
        let choice_states: Vec<ChoiceState> = self
            .choice_states
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or(ErrorCode::NullState)?;
        let base = Arc::new(SmBase {
            proper_states,
            choice_states,
            transitions: self.transitions,
            initial,
            n_actions: self.actions.len(),
            n_guards: self.guards.len(),
        });
        let ext = SmExt {
            actions: self.actions,
            guards: self.guards,
            embedded,
            current_state: 0,
            started: false,
            sm_exec_cnt: 0,
            state_exec_cnt: 0,
            error_code: None,
            trans_cnt: base.transitions.len(),
            user_data,
        };
        Ok(SmDescriptor { base, ext })
    }
}
