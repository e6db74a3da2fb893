mod assignments;
pub(crate) mod interval_domain;
pub(crate) mod notifications;
mod propagator_queue;
mod state;
#[cfg(test)]
pub(crate) mod test_solver;
mod trailed;
pub(crate) mod variables;

pub use assignments::Assignments;
pub(crate) use propagator_queue::PropagatorQueue;
pub use state::PropagatorHandle;
pub(crate) use state::State;
pub(crate) use trailed::TrailedInteger;
pub(crate) use trailed::TrailedValues;

/// The largest magnitude any bound of an interval may take.
///
/// Leaves room for sums and differences of bounds to be computed without overflow.
pub const HORIZON: i32 = i32::MAX / 4;

/// Signals that a domain became empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyDomain;
