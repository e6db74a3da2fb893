use itertools::Itertools;
use log::warn;

use super::Constraint;
use crate::engine::variables::IntervalVariable;
use crate::engine::variables::Literal;
use crate::propagators::NoOverlapBinaryPropagator;
use crate::propagators::NoOverlapGlobalConstructor;
use crate::propagators::NoOverlapOptions;
use crate::propagators::NoOverlapPropagationMethod;
use crate::ConstraintOperationError;
use crate::Solver;

/// Creates the no-overlap (unary resource) [`Constraint`]: no two present intervals execute at
/// the same time.
///
/// For every pair of intervals a literal is created which states whether the first interval
/// executes before the second; these are available through [`NoOverlap::post_with_handle`]. By
/// default the pairwise reasoning is complemented by a global propagator based on overload
/// checking, detectable precedences and not-last reasoning, see [`no_overlap_with_options`].
///
/// # Example
/// ```
/// # use cadence_core::constraints;
/// # use cadence_core::Solver;
/// let mut solver = Solver::default();
///
/// let a = solver.new_interval(0, 10, 3, 3, false);
/// let b = solver.new_interval(0, 10, 3, 3, false);
/// let c = solver.new_interval(0, 10, 3, 3, false);
///
/// let handle = constraints::no_overlap([a, b, c])
///     .post_with_handle(&mut solver)
///     .expect("the intervals can be sequenced");
///
/// assert_eq!(3, handle.precedence_vars().len());
/// ```
pub fn no_overlap(intervals: impl IntoIterator<Item = IntervalVariable>) -> NoOverlap {
    no_overlap_with_options(intervals, NoOverlapOptions::default())
}

/// Creates the no-overlap [`Constraint`] with the provided [`NoOverlapOptions`].
pub fn no_overlap_with_options(
    intervals: impl IntoIterator<Item = IntervalVariable>,
    options: NoOverlapOptions,
) -> NoOverlap {
    NoOverlap {
        intervals: intervals.into_iter().collect(),
        options,
    }
}

#[derive(Debug, Clone)]
pub struct NoOverlap {
    intervals: Vec<IntervalVariable>,
    options: NoOverlapOptions,
}

/// The literals created when posting a [`NoOverlap`].
#[derive(Debug, Clone, Default)]
pub struct NoOverlapHandle {
    precedence_vars: Vec<Literal>,
}

impl NoOverlapHandle {
    /// For every pair `(i, j)` with `i < j`, in lexicographic order, the literal which is true if
    /// and only if interval `i` ends before interval `j` starts.
    pub fn precedence_vars(&self) -> &[Literal] {
        &self.precedence_vars
    }
}

impl NoOverlap {
    /// Posts the constraint, and returns the precedence literals it created.
    pub fn post_with_handle(
        self,
        solver: &mut Solver,
    ) -> Result<NoOverlapHandle, ConstraintOperationError> {
        if self.intervals.len() < 2 {
            warn!(
                "No-overlap over {} interval(s) does not constrain anything",
                self.intervals.len()
            );
            return Ok(NoOverlapHandle::default());
        }

        let mut handle = NoOverlapHandle::default();
        for (&a, &b) in self.intervals.iter().tuple_combinations() {
            let before = solver.new_literal();
            handle.precedence_vars.push(before);

            let _ = solver.add_propagator(NoOverlapBinaryPropagator::new(a, b, before))?;
        }

        if self.options.propagation_method == NoOverlapPropagationMethod::DecompositionWithGlobal {
            let _ = solver.add_propagator(NoOverlapGlobalConstructor::new(self.intervals))?;
        }

        Ok(handle)
    }
}

impl Constraint for NoOverlap {
    fn post(self, solver: &mut Solver) -> Result<(), ConstraintOperationError> {
        self.post_with_handle(solver).map(|_| ())
    }
}
