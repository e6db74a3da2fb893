use super::Propagator;
use super::PropagatorId;
use super::ReadDomains;
use crate::containers::TrailedSparseSet;
use crate::engine::notifications::Watchers;
use crate::engine::Assignments;
use crate::engine::State;
use crate::engine::TrailedInteger;
use crate::engine::variables::IntegerVariable;
use crate::engine::variables::IntervalVariable;
use crate::propagation::DomainEvents;

/// A propagator constructor creates a fully initialized instance of a [`Propagator`].
///
/// The constructor is responsible for indicating on which events the propagator should be
/// enqueued, and for allocating the reversible state of the propagator. After construction the
/// propagator is propagated once by the solver, which takes the role of posting the constraint.
pub trait PropagatorConstructor {
    /// The propagator that is produced by this constructor.
    type PropagatorImpl: Propagator;

    /// Create the propagator instance from `Self`.
    fn create(self, context: PropagatorConstructorContext) -> Self::PropagatorImpl;
}

/// [`PropagatorConstructorContext`] is used when [`Propagator`]s are initialised after creation.
///
/// It can be used to register to domain changes, to read the initial domains and to allocate
/// reversible state.
#[derive(Debug)]
pub struct PropagatorConstructorContext<'a> {
    state: &'a mut State,
    propagator_id: PropagatorId,
}

impl PropagatorConstructorContext<'_> {
    pub(crate) fn new(
        propagator_id: PropagatorId,
        state: &mut State,
    ) -> PropagatorConstructorContext<'_> {
        PropagatorConstructorContext {
            state,
            propagator_id,
        }
    }

    /// Subscribes the propagator to the given [`DomainEvents`] of an integer variable or literal.
    ///
    /// Whenever one of the events happens, the propagator is enqueued.
    pub fn register(&mut self, var: impl IntegerVariable, domain_events: DomainEvents) {
        let mut watchers = Watchers::new(self.propagator_id, &mut self.state.watch_lists);
        var.watch_all(&mut watchers, domain_events.get_events());
    }

    /// Subscribes the propagator to the given [`DomainEvents`] of an interval variable.
    pub fn register_interval(&mut self, interval: IntervalVariable, domain_events: DomainEvents) {
        let mut watchers = Watchers::new(self.propagator_id, &mut self.state.watch_lists);
        watchers.watch_interval(interval, domain_events.get_events());
    }

    pub(crate) fn new_trailed_integer(&mut self, initial_value: i64) -> TrailedInteger {
        self.state.trailed_values.grow(initial_value)
    }

    /// Creates a reversible set containing `0..n`.
    pub(crate) fn new_sparse_set(&mut self, n: usize) -> TrailedSparseSet {
        TrailedSparseSet::new(n, &mut self.state.trailed_values)
    }

    pub fn propagator_id(&self) -> PropagatorId {
        self.propagator_id
    }
}

impl ReadDomains for PropagatorConstructorContext<'_> {
    fn assignments(&self) -> &Assignments {
        &self.state.assignments
    }
}
