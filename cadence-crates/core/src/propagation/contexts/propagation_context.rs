use super::ReadDomains;
use crate::engine::interval_domain::IntervalUpdate;
use crate::engine::variables::IntegerVariable;
use crate::engine::variables::IntervalVariable;
use crate::engine::variables::Literal;
use crate::engine::Assignments;
use crate::engine::EmptyDomain;
use crate::engine::TrailedInteger;
use crate::engine::TrailedValues;
use crate::propagation::PropagatorId;

/// Provides information about the state of the solver to a propagator, and allows it to tighten
/// domains and its own reversible state.
#[derive(Debug)]
pub struct PropagationContext<'a> {
    assignments: &'a mut Assignments,
    trailed_values: &'a mut TrailedValues,
    propagator_id: PropagatorId,
    activity_flag: TrailedInteger,
}

impl<'a> PropagationContext<'a> {
    pub(crate) fn new(
        assignments: &'a mut Assignments,
        trailed_values: &'a mut TrailedValues,
        propagator_id: PropagatorId,
        activity_flag: TrailedInteger,
    ) -> Self {
        PropagationContext {
            assignments,
            trailed_values,
            propagator_id,
            activity_flag,
        }
    }

    pub fn propagator_id(&self) -> PropagatorId {
        self.propagator_id
    }

    pub fn set_lower_bound<Var: IntegerVariable>(
        &mut self,
        var: &Var,
        value: i32,
    ) -> Result<(), EmptyDomain> {
        var.set_lower_bound(self.assignments, value)
    }

    pub fn set_upper_bound<Var: IntegerVariable>(
        &mut self,
        var: &Var,
        value: i32,
    ) -> Result<(), EmptyDomain> {
        var.set_upper_bound(self.assignments, value)
    }

    pub fn assign_literal(&mut self, literal: &Literal, value: bool) -> Result<(), EmptyDomain> {
        literal.assign(self.assignments, value)
    }

    pub fn set_start_min(
        &mut self,
        interval: IntervalVariable,
        value: i32,
    ) -> Result<(), EmptyDomain> {
        self.assignments
            .update_interval(interval, IntervalUpdate::StartMin(value))
    }

    pub fn set_start_max(
        &mut self,
        interval: IntervalVariable,
        value: i32,
    ) -> Result<(), EmptyDomain> {
        self.assignments
            .update_interval(interval, IntervalUpdate::StartMax(value))
    }

    pub fn set_end_min(
        &mut self,
        interval: IntervalVariable,
        value: i32,
    ) -> Result<(), EmptyDomain> {
        self.assignments
            .update_interval(interval, IntervalUpdate::EndMin(value))
    }

    pub fn set_end_max(
        &mut self,
        interval: IntervalVariable,
        value: i32,
    ) -> Result<(), EmptyDomain> {
        self.assignments
            .update_interval(interval, IntervalUpdate::EndMax(value))
    }

    pub fn set_length_min(
        &mut self,
        interval: IntervalVariable,
        value: i32,
    ) -> Result<(), EmptyDomain> {
        self.assignments
            .update_interval(interval, IntervalUpdate::LengthMin(value))
    }

    pub fn set_length_max(
        &mut self,
        interval: IntervalVariable,
        value: i32,
    ) -> Result<(), EmptyDomain> {
        self.assignments
            .update_interval(interval, IntervalUpdate::LengthMax(value))
    }

    /// Makes the interval present; fails if it is absent.
    pub fn set_present(&mut self, interval: IntervalVariable) -> Result<(), EmptyDomain> {
        self.assignments
            .update_interval(interval, IntervalUpdate::Present)
    }

    /// Makes the interval absent; fails if it is present.
    pub fn set_absent(&mut self, interval: IntervalVariable) -> Result<(), EmptyDomain> {
        self.assignments
            .update_interval(interval, IntervalUpdate::Absent)
    }

    /// Deactivating a propagator makes the solver skip it until a backtrack undoes the
    /// deactivation.
    pub fn set_active(&mut self, active: bool) {
        self.trailed_values
            .assign(self.activity_flag, i64::from(active));
    }

    pub fn is_active(&self) -> bool {
        self.trailed_values.read(self.activity_flag) != 0
    }

    pub(crate) fn value(&self, trailed_integer: TrailedInteger) -> i64 {
        self.trailed_values.read(trailed_integer)
    }

    pub(crate) fn assign(&mut self, trailed_integer: TrailedInteger, value: i64) {
        self.trailed_values.assign(trailed_integer, value)
    }

    pub(crate) fn trailed_values(&self) -> &TrailedValues {
        self.trailed_values
    }

    pub(crate) fn trailed_values_mut(&mut self) -> &mut TrailedValues {
        self.trailed_values
    }
}

impl ReadDomains for PropagationContext<'_> {
    fn assignments(&self) -> &Assignments {
        self.assignments
    }
}
