use std::marker::PhantomData;

use log::debug;

use crate::basic_types::PropagationStatusCP;
use crate::cadence_assert_simple;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;
use crate::engine::notifications::WatchLists;
use crate::engine::Assignments;
use crate::engine::PropagatorQueue;
use crate::engine::TrailedInteger;
use crate::engine::TrailedValues;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::PropagationContext;
use crate::propagation::PropagatorId;

/// The domains, the reversible state and the propagators of a solver, together with the fixpoint
/// loop which runs the propagators.
#[derive(Default)]
pub(crate) struct State {
    pub(crate) assignments: Assignments,
    pub(crate) trailed_values: TrailedValues,
    pub(crate) watch_lists: WatchLists,
    propagators: KeyedVec<PropagatorId, Box<dyn Propagator>>,
    /// Non-zero while the corresponding propagator is active.
    activity_flags: KeyedVec<PropagatorId, TrailedInteger>,
    propagator_queue: PropagatorQueue,
}

impl std::fmt::Debug for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("State")
            .field("assignments", &self.assignments)
            .field("num_propagators", &self.propagators.len())
            .field("checkpoint", &self.get_checkpoint())
            .finish()
    }
}

/// A typed handle to a propagator which has been added to a [`State`].
#[derive(Debug)]
pub struct PropagatorHandle<P> {
    id: PropagatorId,
    propagator: PhantomData<P>,
}

impl<P> PropagatorHandle<P> {
    pub fn propagator_id(&self) -> PropagatorId {
        self.id
    }
}

impl<P> Clone for PropagatorHandle<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for PropagatorHandle<P> {}

impl State {
    /// Creates the propagator and propagates until a fixpoint is reached.
    ///
    /// The propagator is kept even if the propagation fails, so that backtracking to an earlier
    /// checkpoint makes it take part in propagation again.
    pub(crate) fn add_propagator<Constructor>(
        &mut self,
        constructor: Constructor,
    ) -> (
        PropagatorHandle<Constructor::PropagatorImpl>,
        PropagationStatusCP,
    )
    where
        Constructor: PropagatorConstructor,
    {
        let propagator_id = PropagatorId::create_from_index(self.propagators.len());
        let activity_flag = self.trailed_values.grow(1);

        let context = PropagatorConstructorContext::new(propagator_id, self);
        let propagator = constructor.create(context);

        let priority = propagator.priority();
        let pushed_id = self.propagators.push(Box::new(propagator));
        let _ = self.activity_flags.push(activity_flag);
        cadence_assert_simple!(pushed_id == propagator_id);

        self.propagator_queue
            .enqueue_propagator(propagator_id, priority);

        let handle = PropagatorHandle {
            id: propagator_id,
            propagator: PhantomData,
        };
        (handle, self.propagate())
    }

    pub(crate) fn get_propagator<P: Propagator>(&self, handle: PropagatorHandle<P>) -> Option<&P> {
        self.propagators
            .get(handle.id)
            .and_then(|propagator| propagator.downcast_ref::<P>())
    }

    pub(crate) fn is_propagator_active(&self, propagator_id: PropagatorId) -> bool {
        self.trailed_values.read(self.activity_flags[propagator_id]) != 0
    }

    /// Runs the enqueued propagators, and those enqueued by their domain changes, until no
    /// propagator is left or a propagator reports an inconsistency.
    pub(crate) fn propagate(&mut self) -> PropagationStatusCP {
        loop {
            self.enqueue_watchers();

            let Some(propagator_id) = self.propagator_queue.pop() else {
                return Ok(());
            };

            if !self.is_propagator_active(propagator_id) {
                continue;
            }

            let context = PropagationContext::new(
                &mut self.assignments,
                &mut self.trailed_values,
                propagator_id,
                self.activity_flags[propagator_id],
            );
            let propagator = &mut self.propagators[propagator_id];

            if let Err(inconsistency) = propagator.propagate(context) {
                debug!(
                    "{} ({propagator_id}) failed: {inconsistency:?}",
                    propagator.name()
                );
                self.propagator_queue.clear();
                let _ = self.assignments.drain_events();
                return Err(inconsistency);
            }
        }
    }

    /// Runs a single propagator once, regardless of whether it is active or enqueued.
    #[cfg(test)]
    pub(crate) fn propagate_propagator(
        &mut self,
        propagator_id: PropagatorId,
    ) -> PropagationStatusCP {
        let context = PropagationContext::new(
            &mut self.assignments,
            &mut self.trailed_values,
            propagator_id,
            self.activity_flags[propagator_id],
        );
        self.propagators[propagator_id].propagate(context)
    }

    fn enqueue_watchers(&mut self) {
        let events = self.assignments.drain_events().collect::<Vec<_>>();
        for (watched, event) in events {
            for &propagator_id in self.watch_lists.get_affected_propagators(event, watched) {
                let priority = self.propagators[propagator_id].priority();
                self.propagator_queue
                    .enqueue_propagator(propagator_id, priority);
            }
        }
    }

    pub(crate) fn get_checkpoint(&self) -> usize {
        self.assignments.get_checkpoint()
    }

    pub(crate) fn new_checkpoint(&mut self) {
        self.assignments.new_checkpoint();
        self.trailed_values.new_checkpoint();
    }

    /// Undoes every change made since `checkpoint` was created.
    pub(crate) fn synchronise(&mut self, checkpoint: usize) {
        cadence_assert_simple!(checkpoint < self.get_checkpoint());

        self.assignments.synchronise(checkpoint);
        self.trailed_values.synchronise(checkpoint);
        self.propagator_queue.clear();
    }
}
