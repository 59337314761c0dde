use crate::search::statistics::Statistics;

/// Outcome of propagating a space to fixpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpaceStatus {
    /// The space is unsatisfiable.
    Failed,
    /// Every decision has been made; the space is a solution.
    Solved,
    /// The space must branch; a description of the choice is pending.
    Branch,
}

/// An immutable description of a branching choice.
///
/// A description defines `alternatives() >= 1` children of a branch node,
/// numbered `0..alternatives()`. It can be discarded without committing any
/// of them.
pub trait BranchDesc: std::fmt::Debug {
    /// The number of alternatives this choice offers. Always at least 1.
    fn alternatives(&self) -> u32;
}

/// The state of a constraint problem at one node of the search tree.
///
/// This is the "frontend" contract the search engine consumes: the engine
/// never looks inside a space, it only drives it through the
/// propagate/branch/commit cycle. Implementations provide propagation and
/// branching; the engine provides exploration, recomputation and work
/// distribution.
///
/// A space is owned by exactly one entity at a time (a worker, the solution
/// queue, or the caller); `clone_space` is how ownership forks.
pub trait Space: std::fmt::Debug + Send + Sized + 'static {
    /// The branching description this space emits at `Branch` nodes.
    type Branch: BranchDesc + Send + 'static;

    /// Propagates the space to fixpoint and reports the outcome.
    ///
    /// Propagation effort may be recorded into `stats` (the engine folds it
    /// into the owning worker's counters). After `Branch` is returned, a
    /// branching description is pending and may be taken with
    /// [`description`](Space::description).
    fn status(&mut self, stats: &mut Statistics) -> SpaceStatus;

    /// Takes the pending branching description.
    ///
    /// Only meaningful after [`status`](Space::status) returned
    /// [`SpaceStatus::Branch`]; the call consumes the pending branching.
    fn description(&mut self) -> Self::Branch;

    /// Returns an independent copy of this space.
    ///
    /// When `share` is false the copy must not share internal state with the
    /// original; the engine uses unshared copies for solutions handed across
    /// threads to the caller.
    fn clone_space(&self, share: bool) -> Self;

    /// Realises alternative `alt` of the choice described by `desc`.
    ///
    /// Committing records the decision; it does not propagate. `alt` is
    /// always below `desc.alternatives()`.
    fn commit(&mut self, desc: &Self::Branch, alt: u32);
}
