//! This module exposes helpers that aid testing of propagators. The [`TestSolver`] allows
//! setting up specific scenarios under which to test the various operations of a propagator.
use super::State;
use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatusCP;
use crate::engine::interval_domain::IntervalUpdate;
use crate::engine::variables::DomainId;
use crate::engine::variables::IntegerVariable;
use crate::engine::variables::IntervalVariable;
use crate::engine::variables::Literal;
use crate::engine::variables::Presence;
use crate::engine::Assignments;
use crate::engine::EmptyDomain;
use crate::engine::PropagatorHandle;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorId;
use crate::propagation::ReadDomains;

/// A container for variables and propagators, which can be used to test propagators.
#[derive(Debug, Default)]
pub(crate) struct TestSolver {
    pub(crate) state: State,
}

impl TestSolver {
    pub(crate) fn new_variable(&mut self, lb: i32, ub: i32) -> DomainId {
        self.state.assignments.grow(lb, ub)
    }

    pub(crate) fn new_literal(&mut self) -> Literal {
        let domain_id = self.new_variable(0, 1);
        Literal::new(domain_id)
    }

    /// Creates an interval with `start ∈ [start.0, start.1]` and `length ∈ [length.0, length.1]`.
    pub(crate) fn new_interval(
        &mut self,
        start: (i32, i32),
        length: (i32, i32),
        presence: Presence,
    ) -> IntervalVariable {
        self.state.assignments.grow_interval(
            start,
            (start.0 + length.0, start.1 + length.1),
            length,
            presence,
        )
    }

    pub(crate) fn new_fixed_interval(&mut self, start: i32, length: i32) -> IntervalVariable {
        self.new_interval((start, start), (length, length), Presence::Present)
    }

    /// Adds the propagator and propagates all propagators to a fixpoint.
    pub(crate) fn new_propagator<Constructor>(
        &mut self,
        constructor: Constructor,
    ) -> Result<PropagatorId, Inconsistency>
    where
        Constructor: PropagatorConstructor,
    {
        self.new_propagator_with_handle(constructor)
            .map(|handle| handle.propagator_id())
    }

    pub(crate) fn new_propagator_with_handle<Constructor>(
        &mut self,
        constructor: Constructor,
    ) -> Result<PropagatorHandle<Constructor::PropagatorImpl>, Inconsistency>
    where
        Constructor: PropagatorConstructor,
    {
        let (handle, status) = self.state.add_propagator(constructor);
        status.map(|_| handle)
    }

    pub(crate) fn get_propagator<P: Propagator>(&self, handle: PropagatorHandle<P>) -> &P {
        self.state
            .get_propagator(handle)
            .expect("handle refers to a propagator of this solver")
    }

    /// Propagates `propagator` once, without running any other propagator.
    pub(crate) fn propagate(&mut self, propagator: PropagatorId) -> PropagationStatusCP {
        self.state.propagate_propagator(propagator)
    }

    /// Propagates every propagator affected by the changes since the last propagation.
    pub(crate) fn propagate_until_fixed_point(&mut self) -> PropagationStatusCP {
        self.state.propagate()
    }

    pub(crate) fn num_trail_entries(&self) -> usize {
        self.state.assignments.num_trail_entries()
    }

    pub(crate) fn is_propagator_active(&self, propagator: PropagatorId) -> bool {
        self.state.is_propagator_active(propagator)
    }

    pub(crate) fn lower_bound<Var: IntegerVariable>(&self, var: Var) -> i32 {
        var.lower_bound(&self.state.assignments)
    }

    pub(crate) fn upper_bound<Var: IntegerVariable>(&self, var: Var) -> i32 {
        var.upper_bound(&self.state.assignments)
    }

    pub(crate) fn assert_bounds<Var: IntegerVariable>(&self, var: Var, lb: i32, ub: i32) {
        let actual_lb = self.lower_bound(var.clone());
        let actual_ub = self.upper_bound(var.clone());

        assert_eq!(
            (lb, ub),
            (actual_lb, actual_ub),
            "The expected bounds [{lb}..{ub}] did not match the actual bounds [{actual_lb}..{actual_ub}] of {var:?}"
        );
    }

    pub(crate) fn set_lower_bound<Var: IntegerVariable>(
        &mut self,
        var: &Var,
        value: i32,
    ) -> Result<(), EmptyDomain> {
        var.set_lower_bound(&mut self.state.assignments, value)
    }

    pub(crate) fn set_upper_bound<Var: IntegerVariable>(
        &mut self,
        var: &Var,
        value: i32,
    ) -> Result<(), EmptyDomain> {
        var.set_upper_bound(&mut self.state.assignments, value)
    }

    pub(crate) fn assign_literal(
        &mut self,
        literal: Literal,
        value: bool,
    ) -> Result<(), EmptyDomain> {
        literal.assign(&mut self.state.assignments, value)
    }

    pub(crate) fn is_literal_true(&self, literal: Literal) -> bool {
        literal.is_true(&self.state.assignments)
    }

    pub(crate) fn is_literal_false(&self, literal: Literal) -> bool {
        literal.is_false(&self.state.assignments)
    }

    pub(crate) fn update_interval(
        &mut self,
        interval: IntervalVariable,
        update: IntervalUpdate,
    ) -> Result<(), EmptyDomain> {
        self.state.assignments.update_interval(interval, update)
    }

    pub(crate) fn start_min(&self, interval: IntervalVariable) -> i32 {
        self.state.assignments.interval(interval).start_min
    }

    pub(crate) fn start_max(&self, interval: IntervalVariable) -> i32 {
        self.state.assignments.interval(interval).start_max
    }

    pub(crate) fn end_min(&self, interval: IntervalVariable) -> i32 {
        self.state.assignments.interval(interval).end_min
    }

    pub(crate) fn end_max(&self, interval: IntervalVariable) -> i32 {
        self.state.assignments.interval(interval).end_max
    }

    pub(crate) fn length_max(&self, interval: IntervalVariable) -> i32 {
        self.state.assignments.interval(interval).length_max
    }

    pub(crate) fn presence(&self, interval: IntervalVariable) -> Presence {
        self.state.assignments.interval(interval).presence
    }

    pub(crate) fn new_checkpoint(&mut self) {
        self.state.new_checkpoint();
    }

    pub(crate) fn synchronise(&mut self, checkpoint: usize) {
        self.state.synchronise(checkpoint);
    }
}

impl ReadDomains for TestSolver {
    fn assignments(&self) -> &Assignments {
        &self.state.assignments
    }
}
