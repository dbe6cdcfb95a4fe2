/// A programmatic navigation request that could not be satisfied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    /// The sequence ends before `target`; `reached` is the last index the walk got to.
    #[error("index {target} is unreachable, the sequence stops at {reached}")]
    IndexUnreachable { target: usize, reached: usize },
    #[error("the sequence has no items")]
    EmptySequence,
}
