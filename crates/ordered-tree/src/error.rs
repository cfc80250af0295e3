use thiserror::Error;

/// Failures surfaced by tree operations.
///
/// A missing key is not an error for `find`/`erase`; those return the end
/// cursor or a zero count. Only the checked accessors report
/// [`TreeError::OutOfRange`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("key not found")]
    OutOfRange,
    #[error("node allocation failed ({live} live nodes, limit {limit:?})")]
    AllocationFailure { live: usize, limit: Option<usize> },
}

/// A broken structural invariant, as reported by `verify()`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("head sentinel is not black")]
    HeadNotBlack,
    #[error("root node {node} is not black")]
    RootNotBlack { node: u32 },
    #[error("root node {node} is not parented by the head sentinel")]
    RootDetached { node: u32 },
    #[error("broken parent link on child {child} of node {node}")]
    BrokenParentLink { node: u32, child: u32 },
    #[error("red node {node} has a red child")]
    RedRed { node: u32 },
    #[error("black height mismatch at node {node}: left {left}, right {right}")]
    BlackHeight { node: u32, left: usize, right: usize },
    #[error("in-order sequence is not strictly increasing at node {node}")]
    Order { node: u32 },
    #[error("size counter is {recorded}, traversal found {counted}")]
    SizeMismatch { recorded: usize, counted: usize },
    #[error("head min/max links are stale")]
    StaleBounds,
    #[error("node {node} is linked but holds no value")]
    VacantLinked { node: u32 },
}
