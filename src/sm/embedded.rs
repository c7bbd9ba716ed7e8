//! Trait object boundary for embedding one SM inside a proper state of
//! another. Kept separate from [`crate::sm::descriptor::SmDescriptor`] so
//! that an embedded SM's user-data type need not match its host's.

/// Anything that behaves like an SM descriptor well enough to be embedded
/// in a proper state: started alongside the host state, driven by the same
/// trigger on every `execute`, and stopped before the host leaves.
pub trait SmLike {
    /// Runs `start` on the embedded SM.
    fn start(&mut self);
    /// Runs `execute(trigger)` on the embedded SM.
    fn execute(&mut self, trigger: i32);
    /// Runs `stop` on the embedded SM.
    fn stop(&mut self);
    /// Whether the embedded SM is currently started.
    fn is_started(&self) -> bool;
    /// Runs structural `check` on the embedded SM, recursively.
    fn check(&mut self) -> Result<(), crate::error::ErrorCode>;
}
