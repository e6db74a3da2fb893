use log::debug;

use crate::basic_types::ConstraintOperationError;
use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatusCP;
use crate::cadence_assert_simple;
use crate::constraints::Constraint;
use crate::engine::interval_domain::IntervalUpdate;
use crate::engine::variables::DomainId;
use crate::engine::variables::IntegerVariable;
use crate::engine::variables::IntervalVariable;
use crate::engine::variables::Literal;
use crate::engine::variables::Presence;
use crate::engine::Assignments;
use crate::engine::EmptyDomain;
use crate::engine::PropagatorHandle;
use crate::engine::State;
use crate::engine::HORIZON;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagators::IntervalSynchronisationPropagator;
use crate::propagators::SynchronisedPoint;

/// The main interaction point which allows the creation of variables, the addition of constraints
/// and the exploration of the search space by making decisions and backtracking.
///
/// Every decision (e.g. [`Solver::set_start_min`]) is propagated to a fixpoint immediately. A
/// decision made after [`Solver::new_checkpoint`] is undone by [`Solver::synchronise`]; a failure
/// at the root, i.e. before any checkpoint was created, makes the solver infeasible for good.
///
/// # Creating Variables
/// ```rust
/// # use cadence_core::Solver;
/// let mut solver = Solver::default();
///
/// // An integer variable with a domain in the range [0, 10]
/// let x = solver.new_bounded_integer(0, 10);
///
/// // An interval which starts in [0, 20] and has a length in [3, 5]
/// let task = solver.new_interval(0, 20, 3, 5, false);
///
/// // An optional interval of length 4, which may or may not be part of the solution
/// let optional_task = solver.new_interval(0, 20, 4, 4, true);
///
/// // A literal, the `before` of two intervals for example
/// let before = solver.new_literal();
/// ```
#[derive(Debug, Default)]
pub struct Solver {
    state: State,
    is_infeasible: bool,
}

/// Functions to create variables.
impl Solver {
    /// Create a new integer variable with the given bounds.
    pub fn new_bounded_integer(&mut self, lower_bound: i32, upper_bound: i32) -> DomainId {
        cadence_assert_simple!(
            lower_bound <= upper_bound,
            "the domain [{lower_bound}, {upper_bound}] is empty"
        );
        self.state.assignments.grow(lower_bound, upper_bound)
    }

    /// Create a fresh propositional variable and return the literal with positive polarity.
    pub fn new_literal(&mut self) -> Literal {
        Literal::new(self.state.assignments.grow(0, 1))
    }

    /// Create a new interval with `start ∈ [start_min, start_max]` and
    /// `length ∈ [length_min, length_max]`, which is optional if `optional` holds and present
    /// otherwise.
    ///
    /// The bounds are clipped to `[-HORIZON, HORIZON]`.
    pub fn new_interval(
        &mut self,
        start_min: i32,
        start_max: i32,
        length_min: i32,
        length_max: i32,
        optional: bool,
    ) -> IntervalVariable {
        cadence_assert_simple!(
            start_min <= start_max && 0 <= length_min && length_min <= length_max,
            "the interval with start [{start_min}, {start_max}] and length [{length_min}, {length_max}] is empty"
        );

        let presence = if optional {
            Presence::Optional
        } else {
            Presence::Present
        };

        let start = (clip(start_min), clip(start_max));
        let length = (
            length_min.clamp(0, 2 * HORIZON),
            length_max.clamp(0, 2 * HORIZON),
        );
        let end = (
            clip(start.0.saturating_add(length.0)),
            clip(start.1.saturating_add(length.1)),
        );

        self.state
            .assignments
            .grow_interval(start, end, length, presence)
    }

    /// Create a present interval with the given start and length.
    pub fn new_fixed_interval(&mut self, start: i32, length: i32) -> IntervalVariable {
        self.new_interval(start, start, length, length, false)
    }

    /// Creates an interval which starts at the start or the end of `source` and ends at the
    /// horizon, and which is present exactly when `source` is.
    pub(crate) fn new_synchronised_interval(
        &mut self,
        source: IntervalVariable,
        point: SynchronisedPoint,
    ) -> Result<IntervalVariable, ConstraintOperationError> {
        let presence = self.presence(source);
        let interval = self.state.assignments.grow_interval(
            (-HORIZON, HORIZON),
            (HORIZON, HORIZON),
            (0, 2 * HORIZON),
            presence,
        );

        let _ = self.add_propagator(IntervalSynchronisationPropagator::new(
            source, interval, point,
        ))?;

        Ok(interval)
    }
}

/// Methods to retrieve the current domains.
impl Solver {
    pub fn lower_bound(&self, variable: &impl IntegerVariable) -> i32 {
        variable.lower_bound(&self.state.assignments)
    }

    pub fn upper_bound(&self, variable: &impl IntegerVariable) -> i32 {
        variable.upper_bound(&self.state.assignments)
    }

    /// The value of the literal, or [`None`] if it is unassigned.
    pub fn get_literal_value(&self, literal: Literal) -> Option<bool> {
        if literal.is_true(&self.state.assignments) {
            Some(true)
        } else if literal.is_false(&self.state.assignments) {
            Some(false)
        } else {
            None
        }
    }

    pub fn start_min(&self, interval: IntervalVariable) -> i32 {
        self.state.assignments.interval(interval).start_min
    }

    pub fn start_max(&self, interval: IntervalVariable) -> i32 {
        self.state.assignments.interval(interval).start_max
    }

    pub fn end_min(&self, interval: IntervalVariable) -> i32 {
        self.state.assignments.interval(interval).end_min
    }

    pub fn end_max(&self, interval: IntervalVariable) -> i32 {
        self.state.assignments.interval(interval).end_max
    }

    pub fn length_min(&self, interval: IntervalVariable) -> i32 {
        self.state.assignments.interval(interval).length_min
    }

    pub fn length_max(&self, interval: IntervalVariable) -> i32 {
        self.state.assignments.interval(interval).length_max
    }

    pub fn presence(&self, interval: IntervalVariable) -> Presence {
        self.state.assignments.interval(interval).presence
    }

    /// Whether a root-level conflict was found; once infeasible, the solver rejects every
    /// further operation.
    pub fn is_infeasible(&self) -> bool {
        self.is_infeasible
    }
}

/// Decisions, which are propagated to a fixpoint immediately.
impl Solver {
    pub fn set_lower_bound(
        &mut self,
        variable: &impl IntegerVariable,
        value: i32,
    ) -> PropagationStatusCP {
        self.decide(|assignments| variable.set_lower_bound(assignments, value))
    }

    pub fn set_upper_bound(
        &mut self,
        variable: &impl IntegerVariable,
        value: i32,
    ) -> PropagationStatusCP {
        self.decide(|assignments| variable.set_upper_bound(assignments, value))
    }

    pub fn set_literal(&mut self, literal: Literal, value: bool) -> PropagationStatusCP {
        self.decide(|assignments| literal.assign(assignments, value))
    }

    pub fn set_start_min(&mut self, interval: IntervalVariable, value: i32) -> PropagationStatusCP {
        self.update_interval(interval, IntervalUpdate::StartMin(value))
    }

    pub fn set_start_max(&mut self, interval: IntervalVariable, value: i32) -> PropagationStatusCP {
        self.update_interval(interval, IntervalUpdate::StartMax(value))
    }

    pub fn set_end_min(&mut self, interval: IntervalVariable, value: i32) -> PropagationStatusCP {
        self.update_interval(interval, IntervalUpdate::EndMin(value))
    }

    pub fn set_end_max(&mut self, interval: IntervalVariable, value: i32) -> PropagationStatusCP {
        self.update_interval(interval, IntervalUpdate::EndMax(value))
    }

    pub fn set_length_min(
        &mut self,
        interval: IntervalVariable,
        value: i32,
    ) -> PropagationStatusCP {
        self.update_interval(interval, IntervalUpdate::LengthMin(value))
    }

    pub fn set_length_max(
        &mut self,
        interval: IntervalVariable,
        value: i32,
    ) -> PropagationStatusCP {
        self.update_interval(interval, IntervalUpdate::LengthMax(value))
    }

    /// Makes the interval present; fails if it is absent.
    pub fn set_present(&mut self, interval: IntervalVariable) -> PropagationStatusCP {
        self.update_interval(interval, IntervalUpdate::Present)
    }

    /// Makes the interval absent; fails if it is present.
    pub fn set_absent(&mut self, interval: IntervalVariable) -> PropagationStatusCP {
        self.update_interval(interval, IntervalUpdate::Absent)
    }

    fn update_interval(
        &mut self,
        interval: IntervalVariable,
        update: IntervalUpdate,
    ) -> PropagationStatusCP {
        self.decide(|assignments| assignments.update_interval(interval, update))
    }

    fn decide(
        &mut self,
        decision: impl FnOnce(&mut Assignments) -> Result<(), EmptyDomain>,
    ) -> PropagationStatusCP {
        if self.is_infeasible {
            return Err(Inconsistency::EmptyDomain);
        }

        let result = decision(&mut self.state.assignments)
            .map_err(Inconsistency::from)
            .and_then(|_| self.state.propagate());

        if result.is_err() {
            let _ = self.state.assignments.drain_events();
            self.mark_infeasible_at_root();
        }

        result
    }

    /// Propagates the changes which have not been propagated yet.
    pub fn propagate(&mut self) -> PropagationStatusCP {
        if self.is_infeasible {
            return Err(Inconsistency::EmptyDomain);
        }

        let result = self.state.propagate();
        if result.is_err() {
            self.mark_infeasible_at_root();
        }
        result
    }

    fn mark_infeasible_at_root(&mut self) {
        if self.state.get_checkpoint() == 0 {
            debug!("Conflict at the root; the solver is infeasible");
            self.is_infeasible = true;
        }
    }
}

/// Checkpoints and backtracking.
impl Solver {
    /// The number of checkpoints which have been created and not been undone.
    pub fn get_checkpoint(&self) -> usize {
        self.state.get_checkpoint()
    }

    pub fn new_checkpoint(&mut self) {
        self.state.new_checkpoint();
    }

    /// Undoes every decision, and every propagation, made since `checkpoint` was created.
    ///
    /// Panics if `checkpoint` is not smaller than the current checkpoint.
    pub fn synchronise(&mut self, checkpoint: usize) {
        self.state.synchronise(checkpoint);
    }
}

/// Functions for adding constraints and propagators.
impl Solver {
    /// Post the constraint; equivalent to `constraint.post(self)`.
    pub fn add_constraint(
        &mut self,
        constraint: impl Constraint,
    ) -> Result<(), ConstraintOperationError> {
        constraint.post(self)
    }

    /// Post a new propagator to the solver, and propagate to a fixpoint.
    ///
    /// If the solver is already infeasible this returns [`ConstraintOperationError::InfeasibleState`]
    /// without adding the propagator. If the propagation fails,
    /// [`ConstraintOperationError::InfeasiblePropagator`] is returned; at the root this makes the
    /// solver infeasible.
    pub fn add_propagator<Constructor>(
        &mut self,
        constructor: Constructor,
    ) -> Result<PropagatorHandle<Constructor::PropagatorImpl>, ConstraintOperationError>
    where
        Constructor: PropagatorConstructor,
    {
        if self.is_infeasible {
            return Err(ConstraintOperationError::InfeasibleState);
        }

        let (handle, status) = self.state.add_propagator(constructor);
        match status {
            Ok(()) => Ok(handle),
            Err(_) => {
                self.mark_infeasible_at_root();
                Err(ConstraintOperationError::InfeasiblePropagator)
            }
        }
    }

    pub fn get_propagator<P: Propagator>(&self, handle: PropagatorHandle<P>) -> Option<&P> {
        self.state.get_propagator(handle)
    }
}

fn clip(value: i32) -> i32 {
    value.clamp(-HORIZON, HORIZON)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intervals_are_clipped_to_the_horizon() {
        let mut solver = Solver::default();
        let interval = solver.new_interval(i32::MIN, i32::MAX, 0, 10, false);

        assert_eq!(-HORIZON, solver.start_min(interval));
        assert_eq!(HORIZON, solver.end_max(interval));
        assert_eq!(HORIZON, solver.start_max(interval));
    }

    #[test]
    fn root_failure_makes_the_solver_infeasible() {
        let mut solver = Solver::default();
        let x = solver.new_bounded_integer(0, 5);

        assert!(solver.set_lower_bound(&x, 6).is_err());
        assert!(solver.is_infeasible());
        assert!(solver.set_upper_bound(&x, 3).is_err());
    }

    #[test]
    fn failure_after_a_checkpoint_is_undone() {
        let mut solver = Solver::default();
        let interval = solver.new_interval(0, 10, 2, 2, false);

        solver.new_checkpoint();
        assert!(solver.set_absent(interval).is_err());
        assert!(!solver.is_infeasible());

        solver.synchronise(0);
        assert_eq!(Presence::Present, solver.presence(interval));
        assert!(solver.set_start_min(interval, 4).is_ok());
        assert_eq!(6, solver.end_min(interval));
    }

    #[test]
    fn literals_report_their_value() {
        let mut solver = Solver::default();
        let literal = solver.new_literal();

        assert_eq!(None, solver.get_literal_value(literal));
        solver.set_literal(!literal, true).expect("unassigned");
        assert_eq!(Some(false), solver.get_literal_value(literal));
    }
}
