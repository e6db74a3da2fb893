use thiserror::Error;

use super::ArgumentError;

/// Errors related to adding constraints to the [`Solver`](crate::Solver).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintOperationError {
    #[error("Adding the propagator failed because the solver is in an infeasible state")]
    InfeasibleState,
    #[error("Adding the propagator led to a root-level conflict")]
    InfeasiblePropagator,
    #[error("The constraint could not be built: {0}")]
    InvalidArgument(#[from] ArgumentError),
}
