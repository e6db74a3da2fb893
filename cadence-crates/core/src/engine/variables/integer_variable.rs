use std::fmt::Debug;

use enumset::EnumSet;

use super::TransformableVariable;
use crate::engine::notifications::DomainEvent;
use crate::engine::notifications::Watchers;
use crate::engine::Assignments;
use crate::engine::EmptyDomain;

/// A trait specifying the required behaviour of an integer variable such as retrieving a
/// lower-bound ([`IntegerVariable::lower_bound`]).
pub trait IntegerVariable:
    Clone + Debug + 'static + TransformableVariable<Self::AffineView>
{
    type AffineView: IntegerVariable;

    /// Get the lower bound of the variable.
    fn lower_bound(&self, assignments: &Assignments) -> i32;

    /// Get the upper bound of the variable.
    fn upper_bound(&self, assignments: &Assignments) -> i32;

    /// Remove all values below `value` from the domain.
    fn set_lower_bound(&self, assignments: &mut Assignments, value: i32)
        -> Result<(), EmptyDomain>;

    /// Remove all values above `value` from the domain.
    fn set_upper_bound(&self, assignments: &mut Assignments, value: i32)
        -> Result<(), EmptyDomain>;

    /// Register a watch for this variable on the given domain events.
    fn watch_all(&self, watchers: &mut Watchers<'_>, events: EnumSet<DomainEvent>);
}
