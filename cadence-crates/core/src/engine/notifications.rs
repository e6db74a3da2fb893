use enumset::enum_set;
use enumset::EnumSet;
use enumset::EnumSetType;

use crate::containers::KeyedVec;
use crate::engine::variables::DomainId;
use crate::engine::variables::IntervalVariable;
use crate::propagation::PropagatorId;

/// A change to a domain which propagators may subscribe to.
///
/// For interval variables, [`DomainEvent::LowerBound`] covers any of its minima (start, end or
/// length) increasing and [`DomainEvent::UpperBound`] any of its maxima decreasing.
#[derive(Debug, EnumSetType)]
pub enum DomainEvent {
    /// The domain became a single value.
    Assign,
    LowerBound,
    UpperBound,
    /// An optional interval became present or absent.
    Presence,
}

/// The set of [`DomainEvent`]s a propagator registers for.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DomainEvents {
    events: EnumSet<DomainEvent>,
}

impl DomainEvents {
    /// Both lower and upper bound tightening.
    pub const BOUNDS: DomainEvents = DomainEvents::new(enum_set!(
        DomainEvent::LowerBound | DomainEvent::UpperBound
    ));
    pub const LOWER_BOUND: DomainEvents = DomainEvents::new(enum_set!(DomainEvent::LowerBound));
    pub const UPPER_BOUND: DomainEvents = DomainEvents::new(enum_set!(DomainEvent::UpperBound));
    /// Only assigning the domain to a single value; for literals this is the only event of
    /// interest.
    pub const ASSIGN: DomainEvents = DomainEvents::new(enum_set!(DomainEvent::Assign));
    pub const PRESENCE: DomainEvents = DomainEvents::new(enum_set!(DomainEvent::Presence));
    /// Bound tightening as well as changes to the presence of an interval.
    pub const ANY_INTERVAL: DomainEvents = DomainEvents::new(enum_set!(
        DomainEvent::LowerBound | DomainEvent::UpperBound | DomainEvent::Presence
    ));

    pub(crate) const fn new(events: EnumSet<DomainEvent>) -> DomainEvents {
        DomainEvents { events }
    }

    pub(crate) fn get_events(&self) -> EnumSet<DomainEvent> {
        self.events
    }
}

/// The entity on which a [`DomainEvent`] happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Watched {
    Integer(DomainId),
    Interval(IntervalVariable),
}

#[derive(Default, Debug, Clone)]
struct Watcher {
    assign_watchers: Vec<PropagatorId>,
    lower_bound_watchers: Vec<PropagatorId>,
    upper_bound_watchers: Vec<PropagatorId>,
    presence_watchers: Vec<PropagatorId>,
}

impl Watcher {
    fn for_event(&self, event: DomainEvent) -> &[PropagatorId] {
        match event {
            DomainEvent::Assign => &self.assign_watchers,
            DomainEvent::LowerBound => &self.lower_bound_watchers,
            DomainEvent::UpperBound => &self.upper_bound_watchers,
            DomainEvent::Presence => &self.presence_watchers,
        }
    }

    fn watch(&mut self, propagator_id: PropagatorId, events: EnumSet<DomainEvent>) {
        for event in events {
            let event_watchers = match event {
                DomainEvent::Assign => &mut self.assign_watchers,
                DomainEvent::LowerBound => &mut self.lower_bound_watchers,
                DomainEvent::UpperBound => &mut self.upper_bound_watchers,
                DomainEvent::Presence => &mut self.presence_watchers,
            };

            if !event_watchers.contains(&propagator_id) {
                event_watchers.push(propagator_id);
            }
        }
    }
}

/// For every variable, the propagators which should be enqueued when one of its domain events
/// happens.
#[derive(Default, Debug, Clone)]
pub(crate) struct WatchLists {
    integers: KeyedVec<DomainId, Watcher>,
    intervals: KeyedVec<IntervalVariable, Watcher>,
}

impl WatchLists {
    pub(crate) fn get_affected_propagators(
        &self,
        event: DomainEvent,
        watched: Watched,
    ) -> &[PropagatorId] {
        let watcher = match watched {
            Watched::Integer(domain) => self.integers.get(domain),
            Watched::Interval(interval) => self.intervals.get(interval),
        };

        watcher.map(|watcher| watcher.for_event(event)).unwrap_or(&[])
    }
}

/// Registers watches on behalf of a single propagator.
#[derive(Debug)]
pub struct Watchers<'a> {
    propagator_id: PropagatorId,
    watch_lists: &'a mut WatchLists,
}

impl<'a> Watchers<'a> {
    pub(crate) fn new(propagator_id: PropagatorId, watch_lists: &'a mut WatchLists) -> Self {
        Watchers {
            propagator_id,
            watch_lists,
        }
    }

    pub(crate) fn watch_all(&mut self, domain: DomainId, events: EnumSet<DomainEvent>) {
        self.watch_lists
            .integers
            .accomodate(domain, Watcher::default());
        self.watch_lists.integers[domain].watch(self.propagator_id, events);
    }

    pub(crate) fn watch_interval(
        &mut self,
        interval: IntervalVariable,
        events: EnumSet<DomainEvent>,
    ) {
        self.watch_lists
            .intervals
            .accomodate(interval, Watcher::default());
        self.watch_lists.intervals[interval].watch(self.propagator_id, events);
    }
}
