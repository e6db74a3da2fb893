//! Defines the constraints which can be added to the [`Solver`].
//!
//! A constraint is a relation over variables. In the solver, constraints are enforced through
//! propagators, and therefore constraints can be viewed as a collection of propagators.
//!
//! # Example
//! ```
//! # use cadence_core::constraints;
//! # use cadence_core::constraints::Constraint;
//! # use cadence_core::cumul_function::CumulFunction;
//! # use cadence_core::Solver;
//! let mut solver = Solver::default();
//!
//! let a = solver.new_interval(0, 10, 4, 4, false);
//! let b = solver.new_interval(0, 10, 4, 4, false);
//! let usage = CumulFunction::pulse_fixed(&mut solver, a, 2)
//!     + CumulFunction::pulse_fixed(&mut solver, b, 2);
//!
//! constraints::le(usage, 3)
//!     .post(&mut solver)
//!     .expect("the intervals can be sequenced");
//! ```
mod cumulative;
mod no_overlap;

pub use cumulative::*;
pub use no_overlap::*;

use crate::propagation::PropagatorConstructor;
use crate::ConstraintOperationError;
use crate::Solver;

/// A [`Constraint`] is a relation over variables. It disqualifies certain partial assignments of
/// making it into a solution of the problem.
pub trait Constraint {
    /// Add the [`Constraint`] to the [`Solver`].
    ///
    /// This method returns a [`ConstraintOperationError`] if the addition of the [`Constraint`] led
    /// to a root-level conflict, or if it was built from invalid arguments.
    fn post(self, solver: &mut Solver) -> Result<(), ConstraintOperationError>;
}

impl<Constructor> Constraint for Constructor
where
    Constructor: PropagatorConstructor,
{
    fn post(self, solver: &mut Solver) -> Result<(), ConstraintOperationError> {
        solver.add_propagator(self).map(|_| ())
    }
}

impl<C: Constraint> Constraint for Vec<C> {
    fn post(self, solver: &mut Solver) -> Result<(), ConstraintOperationError> {
        self.into_iter().try_for_each(|c| c.post(solver))
    }
}
