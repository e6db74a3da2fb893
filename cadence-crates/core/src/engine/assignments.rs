use crate::basic_types::Trail;
use crate::cadence_assert_moderate;
use crate::cadence_assert_simple;
use crate::containers::KeyedVec;
use crate::engine::interval_domain::IntervalDomain;
use crate::engine::interval_domain::IntervalUpdate;
use crate::engine::notifications::DomainEvent;
use crate::engine::notifications::Watched;
use crate::engine::variables::DomainId;
use crate::engine::variables::IntervalVariable;
use crate::engine::variables::Presence;
use crate::engine::EmptyDomain;

/// The bounds of every integer and interval variable, together with the trail which undoes their
/// changes.
#[derive(Debug, Clone, Default)]
pub struct Assignments {
    integers: KeyedVec<DomainId, IntegerDomain>,
    intervals: KeyedVec<IntervalVariable, IntervalDomain>,
    trail: Trail<DomainChange>,
    /// Events which have not yet been processed by the state.
    events: Vec<(Watched, DomainEvent)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct IntegerDomain {
    lower_bound: i32,
    upper_bound: i32,
}

/// The value a domain had before it was changed.
#[derive(Debug, Clone, Copy)]
enum DomainChange {
    Integer(DomainId, IntegerDomain),
    Interval(IntervalVariable, IntervalDomain),
}

impl Assignments {
    pub(crate) fn grow(&mut self, lower_bound: i32, upper_bound: i32) -> DomainId {
        self.integers.push(IntegerDomain {
            lower_bound,
            upper_bound,
        })
    }

    pub(crate) fn get_lower_bound(&self, domain_id: DomainId) -> i32 {
        self.integers[domain_id].lower_bound
    }

    pub(crate) fn get_upper_bound(&self, domain_id: DomainId) -> i32 {
        self.integers[domain_id].upper_bound
    }

    pub(crate) fn tighten_lower_bound(
        &mut self,
        domain_id: DomainId,
        new_lower_bound: i32,
    ) -> Result<(), EmptyDomain> {
        let domain = self.integers[domain_id];
        if new_lower_bound <= domain.lower_bound {
            return Ok(());
        }
        if new_lower_bound > domain.upper_bound {
            return Err(EmptyDomain);
        }

        self.trail.push(DomainChange::Integer(domain_id, domain));
        self.integers[domain_id].lower_bound = new_lower_bound;

        let watched = Watched::Integer(domain_id);
        self.events.push((watched, DomainEvent::LowerBound));
        if new_lower_bound == domain.upper_bound {
            self.events.push((watched, DomainEvent::Assign));
        }

        Ok(())
    }

    pub(crate) fn tighten_upper_bound(
        &mut self,
        domain_id: DomainId,
        new_upper_bound: i32,
    ) -> Result<(), EmptyDomain> {
        let domain = self.integers[domain_id];
        if new_upper_bound >= domain.upper_bound {
            return Ok(());
        }
        if new_upper_bound < domain.lower_bound {
            return Err(EmptyDomain);
        }

        self.trail.push(DomainChange::Integer(domain_id, domain));
        self.integers[domain_id].upper_bound = new_upper_bound;

        let watched = Watched::Integer(domain_id);
        self.events.push((watched, DomainEvent::UpperBound));
        if new_upper_bound == domain.lower_bound {
            self.events.push((watched, DomainEvent::Assign));
        }

        Ok(())
    }

    /// Creates a new interval, which is made bound consistent; the bounds should admit a value.
    pub(crate) fn grow_interval(
        &mut self,
        start: (i32, i32),
        end: (i32, i32),
        length: (i32, i32),
        presence: Presence,
    ) -> IntervalVariable {
        let mut domain = IntervalDomain {
            start_min: start.0,
            start_max: start.1,
            end_min: end.0,
            end_max: end.1,
            length_min: length.0,
            length_max: length.1,
            presence,
        };

        let is_consistent = domain.make_consistent();
        cadence_assert_simple!(is_consistent, "the bounds of an interval should admit a value");

        self.intervals.push(domain)
    }

    pub(crate) fn interval(&self, interval: IntervalVariable) -> &IntervalDomain {
        &self.intervals[interval]
    }

    /// Applies `update` to the interval.
    ///
    /// An update which leaves an optional interval without support makes it absent, whereas for a
    /// present interval it is an [`EmptyDomain`]. Bound updates on absent intervals are ignored.
    pub(crate) fn update_interval(
        &mut self,
        interval: IntervalVariable,
        update: IntervalUpdate,
    ) -> Result<(), EmptyDomain> {
        let old = self.intervals[interval];

        let new = match (old.presence, update) {
            (Presence::Absent, IntervalUpdate::Present) => return Err(EmptyDomain),
            (Presence::Absent, _) => return Ok(()),
            (Presence::Present, IntervalUpdate::Absent) => return Err(EmptyDomain),
            (_, IntervalUpdate::Absent) => IntervalDomain {
                presence: Presence::Absent,
                ..old
            },
            (_, IntervalUpdate::Present) => IntervalDomain {
                presence: Presence::Present,
                ..old
            },
            (presence, bound_update) => {
                let mut new = old;
                new.apply_bound(bound_update);
                if new.make_consistent() {
                    new
                } else if presence == Presence::Optional {
                    IntervalDomain {
                        presence: Presence::Absent,
                        ..old
                    }
                } else {
                    return Err(EmptyDomain);
                }
            }
        };

        if new == old {
            return Ok(());
        }

        self.trail.push(DomainChange::Interval(interval, old));
        self.intervals[interval] = new;
        self.record_interval_events(interval, &old, &new);

        Ok(())
    }

    fn record_interval_events(
        &mut self,
        interval: IntervalVariable,
        old: &IntervalDomain,
        new: &IntervalDomain,
    ) {
        let watched = Watched::Interval(interval);

        if old.presence != new.presence {
            self.events.push((watched, DomainEvent::Presence));
        }
        if new.presence == Presence::Absent {
            return;
        }

        if new.start_min > old.start_min
            || new.end_min > old.end_min
            || new.length_min > old.length_min
        {
            self.events.push((watched, DomainEvent::LowerBound));
        }
        if new.start_max < old.start_max
            || new.end_max < old.end_max
            || new.length_max < old.length_max
        {
            self.events.push((watched, DomainEvent::UpperBound));
        }
        if new.is_fixed() && !old.is_fixed() {
            self.events.push((watched, DomainEvent::Assign));
        }
    }

    pub(crate) fn drain_events(&mut self) -> std::vec::Drain<'_, (Watched, DomainEvent)> {
        self.events.drain(..)
    }

    /// The number of domain changes which can currently be undone.
    pub(crate) fn num_trail_entries(&self) -> usize {
        self.trail.len()
    }

    pub(crate) fn get_checkpoint(&self) -> usize {
        self.trail.get_checkpoint()
    }

    pub(crate) fn new_checkpoint(&mut self) {
        self.trail.new_checkpoint()
    }

    pub(crate) fn synchronise(&mut self, new_checkpoint: usize) {
        cadence_assert_moderate!(new_checkpoint < self.trail.get_checkpoint());

        self.events.clear();
        for change in self.trail.synchronise(new_checkpoint) {
            match change {
                DomainChange::Integer(domain_id, domain) => self.integers[domain_id] = domain,
                DomainChange::Interval(interval, domain) => self.intervals[interval] = domain,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn optional_task(assignments: &mut Assignments) -> IntervalVariable {
        assignments.grow_interval((0, 10), (0, 20), (5, 5), Presence::Optional)
    }

    #[test]
    fn tightening_integers_reports_events() {
        let mut assignments = Assignments::default();
        let x = assignments.grow(0, 5);

        assignments.tighten_lower_bound(x, 5).expect("non-empty");

        let events = assignments.drain_events().collect::<Vec<_>>();
        assert_eq!(
            vec![
                (Watched::Integer(x), DomainEvent::LowerBound),
                (Watched::Integer(x), DomainEvent::Assign)
            ],
            events
        );
        assert_eq!(Err(EmptyDomain), assignments.tighten_upper_bound(x, 4));
    }

    #[test]
    fn emptying_an_optional_interval_makes_it_absent() {
        let mut assignments = Assignments::default();
        let interval = optional_task(&mut assignments);

        assignments
            .update_interval(interval, IntervalUpdate::StartMin(11))
            .expect("optional intervals do not fail");

        let domain = assignments.interval(interval);
        assert_eq!(Presence::Absent, domain.presence);
        assert_eq!(0, domain.start_min);
    }

    #[test]
    fn emptying_a_present_interval_fails() {
        let mut assignments = Assignments::default();
        let interval = optional_task(&mut assignments);

        assignments
            .update_interval(interval, IntervalUpdate::Present)
            .expect("can become present");

        assert_eq!(
            Err(EmptyDomain),
            assignments.update_interval(interval, IntervalUpdate::EndMax(4))
        );
        assert_eq!(
            Err(EmptyDomain),
            assignments.update_interval(interval, IntervalUpdate::Absent)
        );
    }

    #[test]
    fn absent_intervals_ignore_bound_updates() {
        let mut assignments = Assignments::default();
        let interval = optional_task(&mut assignments);

        assignments
            .update_interval(interval, IntervalUpdate::Absent)
            .expect("can become absent");
        assignments
            .update_interval(interval, IntervalUpdate::StartMin(3))
            .expect("ignored");

        assert_eq!(0, assignments.interval(interval).start_min);
        assert_eq!(
            Err(EmptyDomain),
            assignments.update_interval(interval, IntervalUpdate::Present)
        );
    }

    #[test]
    fn synchronising_restores_interval_bounds() {
        let mut assignments = Assignments::default();
        let interval = optional_task(&mut assignments);

        assignments.new_checkpoint();
        assignments
            .update_interval(interval, IntervalUpdate::StartMin(4))
            .expect("non-empty");
        assignments
            .update_interval(interval, IntervalUpdate::Present)
            .expect("non-empty");
        assert_eq!(9, assignments.interval(interval).end_min);

        assignments.synchronise(0);

        let domain = assignments.interval(interval);
        assert_eq!(0, domain.start_min);
        assert_eq!(5, domain.end_min);
        assert_eq!(Presence::Optional, domain.presence);
    }
}
