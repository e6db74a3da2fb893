//! Propagators for cumulative resources, of which the level changes by the heights of the
//! activities which execute.
//!
//! The [`GeneralizedCumulativePropagator`] generalizes the classical cumulative constraint in three
//! ways: activities can be optional, heights can be variable and negative, and the level is bounded
//! from below as well as from above. Its reasoning is based on a time-table, see
//! [`timeline`] for how the profile is constructed.
//!
//! The [`GeneralizedCumulativeChecker`] verifies the same relation on fixed activities only, and is
//! used to validate the filtering.
mod activity;
mod checker;
mod generalized_cumulative;
mod options;
pub(crate) mod timeline;

pub use activity::Activity;
pub use checker::check_fixed;
pub use checker::FixedActivity;
pub(crate) use checker::GeneralizedCumulativeChecker;
pub(crate) use generalized_cumulative::GeneralizedCumulativeConstructor;
pub(crate) use generalized_cumulative::GeneralizedCumulativePropagator;
pub(crate) use generalized_cumulative::UNBOUNDED_MAX_CAPACITY;
pub(crate) use generalized_cumulative::UNBOUNDED_MIN_CAPACITY;
pub use options::GeneralizedCumulativeOptions;
