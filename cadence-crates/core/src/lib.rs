//! # Cadence
//! Cadence is the propagation core of a constraint programming solver for resource-constrained
//! scheduling. It provides the global constraints which prune the domains of interval variables
//! sharing renewable resources:
//! - [`constraints::no_overlap`] for unary (disjunctive) resources, filtered with Theta-tree based
//!   overload checking, detectable precedences and not-last reasoning;
//! - [`constraints::generalized_cumulative`] for cumulative resources with optional activities,
//!   variable (and possibly negative) heights and both a minimum and a maximum capacity;
//! - [`cumul_function::CumulFunction`], an algebra of resource usage expressions which is flattened
//!   into the activities consumed by the cumulative constraint.
//!
//! # Example
//! ```
//! # use cadence_core::Solver;
//! # use cadence_core::constraints;
//! # use cadence_core::constraints::Constraint;
//! let mut solver = Solver::default();
//!
//! let x = solver.new_fixed_interval(0, 5);
//! let y = solver.new_interval(0, 15, 5, 5, false);
//!
//! constraints::no_overlap([x, y])
//!     .post(&mut solver)
//!     .expect("no root-level conflict");
//!
//! assert_eq!(solver.start_min(y), 5);
//! ```
pub(crate) mod basic_types;
pub(crate) mod containers;
pub(crate) mod engine;
pub(crate) mod math;
pub(crate) mod propagators;

#[doc(hidden)]
pub mod cadence_asserts;

pub mod constraints;
pub mod cumul_function;
pub mod propagation;

// The API module is private; its contents are exported from the crate root so that users write
// `use cadence_core::Solver;`.
mod api;

pub use api::*;

pub use crate::basic_types::ArgumentError;
pub use crate::basic_types::ConstraintOperationError;
pub use crate::basic_types::Inconsistency;
pub use crate::basic_types::PropagationStatusCP;
pub use crate::basic_types::PropagatorConflict;
pub use crate::engine::EmptyDomain;
pub use crate::engine::HORIZON;

pub mod variables {
    //! The variable types which can be constrained.
    pub use crate::engine::variables::AffineView;
    pub use crate::engine::variables::DomainId;
    pub use crate::engine::variables::IntegerVariable;
    pub use crate::engine::variables::IntervalVariable;
    pub use crate::engine::variables::Literal;
    pub use crate::engine::variables::Presence;
    pub use crate::engine::variables::TransformableVariable;

    #[doc(hidden)]
    pub use crate::engine::Assignments;
    #[doc(hidden)]
    pub use crate::engine::notifications::Watchers;
}

pub mod checking {
    //! Validation of fixed schedules, independent of the propagators.
    pub use crate::propagators::check_fixed;
    pub use crate::propagators::FixedActivity;
}

pub mod options {
    //! Options which influence the behaviour of the propagators.
    pub use crate::propagators::GeneralizedCumulativeOptions;
    pub use crate::propagators::NoOverlapOptions;
    pub use crate::propagators::NoOverlapPropagationMethod;
}

#[cfg(test)]
pub(crate) use crate::engine::test_solver::TestSolver;
