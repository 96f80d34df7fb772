/// whether the applier may create trip patterns at runtime for added or
/// re-routed trips that fit no scheduled pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PatternSynthesisPolicy {
    /// synthesize a pattern scoped to the trip and service date.
    #[default]
    Synthesize,
    /// reject the record; useful for feeds whose added trips are noise.
    Reject,
}
