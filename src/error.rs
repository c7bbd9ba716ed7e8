//! Shared error-code vocabulary for the SM and PR engines.
//!
//! Both engines never panic on a bad call from an application: every
//! failure is recorded as an [`ErrorCode`] on the descriptor and the
//! offending operation is aborted, leaving the descriptor internally
//! consistent. Once set, an error code is sticky: the caller must reset
//! the descriptor (re-check it, or for RT `shutdown` + re-create) before
//! further calls have defined behaviour.

use core::fmt;

/// A sticky error code recorded on a state-machine or procedure descriptor.
///
/// Grouped by the phase that produces it: creation, configuration (wiring),
/// structural check, and runtime. RT container failures are represented
/// separately by [`crate::rt::ContainerState`], since they map onto terminal
/// states of the container rather than onto a single sticky field.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // --- creation ---
    /// Allocation failed while creating a dynamic descriptor.
    OutOfMemory,
    /// A size parameter passed to `create`/`create_derived` is illegal
    /// (zero proper states, zero action/guard slots, etc).
    IllegalSize,

    // --- configuration (wiring) ---
    /// A node id is zero, out of the declared range, or otherwise illegal.
    IllegalNodeId,
    /// A node id was already configured.
    DuplicateNodeId,
    /// A transition/flow names a source that was never declared.
    IllegalSource,
    /// A choice/decision node was declared with fewer than two outgoing
    /// transitions/flows.
    IllegalOutFlowCount,
    /// A source's reserved transition/flow range is already full.
    TooManyTransitions,
    /// The action table has no free slot left for a new callback.
    TooManyActions,
    /// The guard table has no free slot left for a new callback.
    TooManyGuards,
    /// A required callback argument was left unset where the descriptor
    /// does not allow resolving it to the dummy callback.
    NullCallback,
    /// `override_action`/`override_guard`/`embed` was called on a fresh
    /// (non-derived) descriptor.
    NotDerived,
    /// `override_action` was asked to replace a callback not present in
    /// the action table.
    UndefAction,
    /// `override_guard` was asked to replace a callback not present in
    /// the guard table, or targeted the reserved dummy-guard slot.
    UndefGuard,
    /// A derived descriptor's action table length does not match its base.
    WrongNOfActions,
    /// A derived descriptor's guard table length does not match its base.
    WrongNOfGuards,

    // --- structural check ---
    /// A declared proper/choice state or action/decision node was never
    /// configured.
    NullState,
    /// A declared transition/flow slot was never configured.
    NullTransition,
    /// A transition/flow destination is out of the valid range.
    IllegalDestination,
    /// A state/node is not reachable from the initial transition/flow.
    Unreachable,
    /// `check` was run on a descriptor that already carries a prior error.
    ConfigErr,

    // --- runtime ---
    /// SM choice resolution found no true guard, or a cycle revisited the
    /// same choice twice within one resolution.
    TransErr,
    /// PR decision-node resolution found no true outgoing guard.
    FlowErr,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ErrorCode::OutOfMemory => "allocation failed while creating descriptor",
            ErrorCode::IllegalSize => "illegal size parameter",
            ErrorCode::IllegalNodeId => "illegal node id",
            ErrorCode::DuplicateNodeId => "node id already configured",
            ErrorCode::IllegalSource => "undeclared transition/flow source",
            ErrorCode::IllegalOutFlowCount => "choice/decision node needs at least two out-flows",
            ErrorCode::TooManyTransitions => "source's reserved transition/flow range is full",
            ErrorCode::TooManyActions => "action table is full",
            ErrorCode::TooManyGuards => "guard table is full",
            ErrorCode::NullCallback => "required callback left unset",
            ErrorCode::NotDerived => "override/embed attempted on a non-derived descriptor",
            ErrorCode::UndefAction => "override target not present in action table",
            ErrorCode::UndefGuard => "override target not present in guard table, or is the dummy slot",
            ErrorCode::WrongNOfActions => "derived action table length does not match base",
            ErrorCode::WrongNOfGuards => "derived guard table length does not match base",
            ErrorCode::NullState => "declared state/node was never configured",
            ErrorCode::NullTransition => "declared transition/flow was never configured",
            ErrorCode::IllegalDestination => "transition/flow destination out of range",
            ErrorCode::Unreachable => "state/node not reachable from the initial transition/flow",
            ErrorCode::ConfigErr => "check run on a descriptor already carrying an error",
            ErrorCode::TransErr => "choice resolution found no true guard, or cycled",
            ErrorCode::FlowErr => "decision node resolution found no true guard",
        };
        f.write_str(msg)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ErrorCode {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_non_empty_for_every_variant() {
        let codes = [
            ErrorCode::OutOfMemory,
            ErrorCode::IllegalSize,
            ErrorCode::IllegalNodeId,
            ErrorCode::DuplicateNodeId,
            ErrorCode::IllegalSource,
            ErrorCode::IllegalOutFlowCount,
            ErrorCode::TooManyTransitions,
            ErrorCode::TooManyActions,
            ErrorCode::TooManyGuards,
            ErrorCode::NullCallback,
            ErrorCode::NotDerived,
            ErrorCode::UndefAction,
            ErrorCode::UndefGuard,
            ErrorCode::WrongNOfActions,
            ErrorCode::WrongNOfGuards,
            ErrorCode::NullState,
            ErrorCode::NullTransition,
            ErrorCode::IllegalDestination,
            ErrorCode::Unreachable,
            ErrorCode::ConfigErr,
            ErrorCode::TransErr,
            ErrorCode::FlowErr,
        ];
        for code in codes {
            assert!(!code.to_string().is_empty());
        }
    }
}
