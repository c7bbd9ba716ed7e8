//! Const, array-backed topology storage for `no_std`/no-alloc targets —
//! the "Static-creation module" companion to the heap-backed builders.
//!
//! [`crate::sm::SmTopology`] and [`crate::pr::PrTopology`] are blanket-
//! implemented for shared references, so a topology that lives in
//! `'static` arrays works as a descriptor's `B` type parameter exactly as
//! well as `Arc<SmBase>`/`Arc<ProcBase>` does — the execution engine
//! doesn't know the difference. These macros just save the boilerplate
//! of writing that impl by hand; nothing here validates anything at
//! runtime (`check()` still does that, the same as for a dynamic
//! descriptor).

/// Declares a unit struct and a `SmTopology` impl over caller-supplied
/// const arrays.
///
/// ```
/// use flight_models::sm::{ChoiceState, ProperState, SmBuilder, Transition};
/// use flight_models::static_sm;
///
/// static_sm! {
///     struct OneStateTopology;
///     proper_states: [ProperState; 1] = [ProperState::new(0, 1, 0, 0, 0)],
///     choice_states: [ChoiceState; 0] = [],
///     transitions: [Transition; 1] = [Transition::new(0, 0, 0, 0)],
///     initial: Transition = Transition::new(1, -1, 0, 0),
///     n_actions: 1,
///     n_guards: 1,
/// }
///
/// let _topo = OneStateTopology;
/// let _ = SmBuilder::<()>::new(1, 0, 1, 1, 1); // dynamic module still available alongside
/// ```
#[macro_export]
macro_rules! static_sm {
    (
        struct $name:ident;
        proper_states: [ProperState; $np:expr] = $proper:expr,
        choice_states: [ChoiceState; $nc:expr] = $choice:expr,
        transitions: [Transition; $nt:expr] = $trans:expr,
        initial: Transition = $initial:expr,
        n_actions: $na:expr,
        n_guards: $ng:expr $(,)?
    ) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name;

        impl $name {
            const PROPER_STATES: [$crate::sm::ProperState; $np] = $proper;
            const CHOICE_STATES: [$crate::sm::ChoiceState; $nc] = $choice;
            const TRANSITIONS: [$crate::sm::Transition; $nt] = $trans;
            const INITIAL: $crate::sm::Transition = $initial;
        }

        impl $crate::sm::SmTopology for $name {
            fn proper_states(&self) -> &[$crate::sm::ProperState] {
                &Self::PROPER_STATES
            }
            fn choice_states(&self) -> &[$crate::sm::ChoiceState] {
                &Self::CHOICE_STATES
            }
            fn transitions(&self) -> &[$crate::sm::Transition] {
                &Self::TRANSITIONS
            }
            fn initial_transition(&self) -> $crate::sm::Transition {
                Self::INITIAL
            }
            fn n_actions(&self) -> usize {
                $na
            }
            fn n_guards(&self) -> usize {
                $ng
            }
        }
    };
}

/// Declares a unit struct and a `PrTopology` impl over caller-supplied
/// const arrays. See [`static_sm!`] for the storage rationale.
///
/// ```
/// use flight_models::pr::{ActionNode, DecisionNode, Flow};
/// use flight_models::static_pr;
///
/// static_pr! {
///     struct OneNodeTopology;
///     action_nodes: [ActionNode; 1] = [ActionNode::new(0, 0)],
///     decision_nodes: [DecisionNode; 0] = [],
///     flows: [Flow; 1] = [Flow::new(0, 0)],
///     initial: Flow = Flow::new(1, 0),
///     n_actions: 1,
///     n_guards: 1,
/// }
///
/// let _topo = OneNodeTopology;
/// ```
#[macro_export]
macro_rules! static_pr {
    (
        struct $name:ident;
        action_nodes: [ActionNode; $na_count:expr] = $action_nodes:expr,
        decision_nodes: [DecisionNode; $nd:expr] = $decision_nodes:expr,
        flows: [Flow; $nf:expr] = $flows:expr,
        initial: Flow = $initial:expr,
        n_actions: $na:expr,
        n_guards: $ng:expr $(,)?
    ) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name;

        impl $name {
            const ACTION_NODES: [$crate::pr::ActionNode; $na_count] = $action_nodes;
            const DECISION_NODES: [$crate::pr::DecisionNode; $nd] = $decision_nodes;
            const FLOWS: [$crate::pr::Flow; $nf] = $flows;
            const INITIAL: $crate::pr::Flow = $initial;
        }

        impl $crate::pr::PrTopology for $name {
            fn action_nodes(&self) -> &[$crate::pr::ActionNode] {
                &Self::ACTION_NODES
            }
            fn decision_nodes(&self) -> &[$crate::pr::DecisionNode] {
                &Self::DECISION_NODES
            }
            fn flows(&self) -> &[$crate::pr::Flow] {
                &Self::FLOWS
            }
            fn initial_flow(&self) -> $crate::pr::Flow {
                Self::INITIAL
            }
            fn n_actions(&self) -> usize {
                $na
            }
            fn n_guards(&self) -> usize {
                $ng
            }
        }
    };
}
