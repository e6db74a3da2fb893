use log::trace;

use super::no_overlap_left_to_right::NoOverlapLeftToRight;
use super::no_overlap_left_to_right::Outcome;
use crate::basic_types::PropagationStatusCP;
use crate::basic_types::PropagatorConflict;
use crate::containers::TrailedSparseSet;
use crate::engine::variables::IntervalVariable;
use crate::engine::EmptyDomain;
use crate::math::to_bound;
use crate::propagation::DomainEvents;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;

/// The latest end given to optional intervals, so that they cannot push any other interval.
const OPTIONAL_END_MAX: i64 = i64::MAX / 4;

#[derive(Clone, Debug)]
pub(crate) struct NoOverlapGlobalConstructor {
    intervals: Box<[IntervalVariable]>,
}

impl NoOverlapGlobalConstructor {
    pub(crate) fn new(intervals: impl Into<Box<[IntervalVariable]>>) -> Self {
        NoOverlapGlobalConstructor {
            intervals: intervals.into(),
        }
    }
}

impl PropagatorConstructor for NoOverlapGlobalConstructor {
    type PropagatorImpl = NoOverlapGlobalPropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        for &interval in self.intervals.iter() {
            context.register_interval(interval, DomainEvents::ANY_INTERVAL);
        }

        let active = context.new_sparse_set(self.intervals.len());

        NoOverlapGlobalPropagator {
            intervals: self.intervals,
            active,
            filter: NoOverlapLeftToRight::default(),
            indices: vec![],
            is_optional: vec![],
            start_min: vec![],
            duration: vec![],
            end_max: vec![],
        }
    }
}

/// Filters a set of intervals which may not overlap with [`NoOverlapLeftToRight`], once on the
/// timeline itself and once on the mirrored timeline.
///
/// Absent intervals are removed from a reversible set of active intervals. Optional intervals
/// take part with an unbounded latest end: they are pushed by the present intervals, and become
/// absent when pushed beyond their own bounds, but they never push other intervals.
#[derive(Clone, Debug)]
pub(crate) struct NoOverlapGlobalPropagator {
    intervals: Box<[IntervalVariable]>,
    active: TrailedSparseSet,
    filter: NoOverlapLeftToRight,

    /// The interval of each task handed to the filter
    indices: Vec<usize>,
    is_optional: Vec<bool>,
    start_min: Vec<i64>,
    duration: Vec<i64>,
    end_max: Vec<i64>,
}

impl NoOverlapGlobalPropagator {
    #[cfg(test)]
    pub(crate) fn num_active(&self, context: &crate::engine::TrailedValues) -> usize {
        self.active.len(context)
    }

    fn remove_absent_intervals(&mut self, context: &mut PropagationContext) {
        for position in (0..self.active.len(context.trailed_values())).rev() {
            let index = self.active.get(position);
            if context.is_absent(self.intervals[index]) {
                self.active
                    .remove_at(position, context.trailed_values_mut());
            }
        }
    }

    fn snapshot(&mut self, context: &PropagationContext, timeline: Timeline) {
        self.indices.clear();
        self.is_optional.clear();
        self.start_min.clear();
        self.duration.clear();
        self.end_max.clear();

        for index in self.active.iter(context.trailed_values()) {
            let interval = self.intervals[index];
            // Made absent by the pass on the other timeline.
            if context.is_absent(interval) {
                continue;
            }

            let is_optional = context.is_optional(interval);
            let (earliest_start, latest_end) = timeline.bounds(context, interval);

            self.indices.push(index);
            self.is_optional.push(is_optional);
            self.start_min.push(earliest_start);
            self.duration.push(i64::from(context.length_min(interval)));
            self.end_max.push(if is_optional {
                OPTIONAL_END_MAX
            } else {
                latest_end
            });
        }
    }

    /// Runs the filter on the given timeline and applies the tightened bounds.
    fn filter_on(
        &mut self,
        context: &mut PropagationContext,
        timeline: Timeline,
    ) -> PropagationStatusCP {
        self.snapshot(context, timeline);

        let n = self.indices.len();
        let original_start_min = self.start_min.clone();
        let original_end_max = self.end_max.clone();

        match self
            .filter
            .filter(&mut self.start_min, &self.duration, &mut self.end_max, n)
        {
            Outcome::NoChange => return Ok(()),
            Outcome::Inconsistency => {
                return Err(PropagatorConflict {
                    propagator: "NoOverlapGlobal",
                }
                .into())
            }
            Outcome::Change => {}
        }

        for task in 0..n {
            let interval = self.intervals[self.indices[task]];

            if self.start_min[task] > original_start_min[task] {
                if self.is_optional[task]
                    && self.start_min[task] > timeline.latest_start(context, interval)
                {
                    trace!("{interval} cannot be scheduled on the resource and becomes absent");
                    context.set_absent(interval)?;
                    continue;
                }
                timeline.tighten_earliest_start(context, interval, self.start_min[task])?;
            }

            if !self.is_optional[task] && self.end_max[task] < original_end_max[task] {
                timeline.tighten_latest_end(context, interval, self.end_max[task])?;
            }
        }

        Ok(())
    }
}

impl Propagator for NoOverlapGlobalPropagator {
    fn name(&self) -> &str {
        "NoOverlapGlobal"
    }

    fn priority(&self) -> Priority {
        Priority::Low
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatusCP {
        self.remove_absent_intervals(&mut context);

        if self.active.len(context.trailed_values()) < 2 {
            context.set_active(false);
            return Ok(());
        }

        self.filter_on(&mut context, Timeline::Forward)?;
        self.filter_on(&mut context, Timeline::Mirrored)
    }
}

/// The direction in which the filter reads the timeline.
///
/// On the mirrored timeline the time points are negated, so the earliest start becomes
/// `-end_max` and the latest end becomes `-start_min`; filtering it from left to right amounts to
/// filtering the original timeline from right to left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Timeline {
    Forward,
    Mirrored,
}

impl Timeline {
    /// The earliest start and latest end of the interval on this timeline.
    fn bounds(self, context: &PropagationContext, interval: IntervalVariable) -> (i64, i64) {
        let start_min = context.start_min(interval) as i64;
        let end_max = context.end_max(interval) as i64;

        match self {
            Timeline::Forward => (start_min, end_max),
            Timeline::Mirrored => (-end_max, -start_min),
        }
    }

    fn latest_start(self, context: &PropagationContext, interval: IntervalVariable) -> i64 {
        match self {
            Timeline::Forward => context.start_max(interval) as i64,
            Timeline::Mirrored => -(context.end_min(interval) as i64),
        }
    }

    fn tighten_earliest_start(
        self,
        context: &mut PropagationContext,
        interval: IntervalVariable,
        value: i64,
    ) -> Result<(), EmptyDomain> {
        match self {
            Timeline::Forward => context.set_start_min(interval, to_bound(value)),
            Timeline::Mirrored => context.set_end_max(interval, to_bound(-value)),
        }
    }

    fn tighten_latest_end(
        self,
        context: &mut PropagationContext,
        interval: IntervalVariable,
        value: i64,
    ) -> Result<(), EmptyDomain> {
        match self {
            Timeline::Forward => context.set_end_max(interval, to_bound(value)),
            Timeline::Mirrored => context.set_start_min(interval, to_bound(-value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::interval_domain::IntervalUpdate;
    use crate::engine::variables::Presence;
    use crate::TestSolver;

    #[test]
    fn forward_pass_pushes_start() {
        let mut solver = TestSolver::default();
        let x = solver.new_fixed_interval(0, 5);
        let y = solver.new_interval((0, 10), (5, 5), Presence::Present);

        let _ = solver
            .new_propagator(NoOverlapGlobalConstructor::new(vec![x, y]))
            .expect("no empty domains");

        assert_eq!(5, solver.start_min(y));
    }

    #[test]
    fn mirrored_pass_lowers_end() {
        let mut solver = TestSolver::default();
        let x = solver.new_fixed_interval(10, 5);
        let y = solver.new_interval((0, 10), (5, 5), Presence::Present);

        let _ = solver
            .new_propagator(NoOverlapGlobalConstructor::new(vec![x, y]))
            .expect("no empty domains");

        assert_eq!(5, solver.start_max(y));
        assert_eq!(10, solver.end_max(y));
    }

    #[test]
    fn optional_interval_is_pushed_out_and_becomes_absent() {
        let mut solver = TestSolver::default();
        let x = solver.new_fixed_interval(0, 10);
        let y = solver.new_interval((2, 6), (3, 3), Presence::Optional);

        let _ = solver
            .new_propagator(NoOverlapGlobalConstructor::new(vec![x, y]))
            .expect("no empty domains");

        assert_eq!(Presence::Absent, solver.presence(y));
    }

    #[test]
    fn optional_interval_does_not_push_present_ones() {
        let mut solver = TestSolver::default();
        let x = solver.new_interval((0, 0), (5, 5), Presence::Optional);
        let y = solver.new_interval((0, 10), (5, 5), Presence::Present);

        let _ = solver
            .new_propagator(NoOverlapGlobalConstructor::new(vec![x, y]))
            .expect("no empty domains");

        assert_eq!(0, solver.start_min(y));
        assert_eq!(Presence::Optional, solver.presence(x));
    }

    #[test]
    fn overload_is_a_conflict() {
        let mut solver = TestSolver::default();
        let intervals = (0..3)
            .map(|_| solver.new_interval((0, 4), (3, 3), Presence::Present))
            .collect::<Vec<_>>();

        let result = solver.new_propagator(NoOverlapGlobalConstructor::new(intervals));

        assert!(result.is_err());
    }

    #[test]
    fn absent_intervals_leave_the_active_set_until_backtrack() {
        let mut solver = TestSolver::default();
        let x = solver.new_interval((0, 20), (5, 5), Presence::Optional);
        let y = solver.new_interval((0, 20), (5, 5), Presence::Present);
        let z = solver.new_interval((0, 20), (5, 5), Presence::Present);

        let handle = solver
            .new_propagator_with_handle(NoOverlapGlobalConstructor::new(vec![x, y, z]))
            .expect("no empty domains");

        solver.new_checkpoint();
        solver
            .update_interval(x, IntervalUpdate::Absent)
            .expect("optional");
        solver
            .propagate_until_fixed_point()
            .expect("no empty domains");

        let trailed_values = &solver.state.trailed_values;
        assert_eq!(
            2,
            solver
                .get_propagator(handle)
                .num_active(trailed_values)
        );

        solver.synchronise(0);
        let trailed_values = &solver.state.trailed_values;
        assert_eq!(
            3,
            solver
                .get_propagator(handle)
                .num_active(trailed_values)
        );
    }

    #[test]
    fn propagating_twice_changes_nothing() {
        let mut solver = TestSolver::default();
        let a = solver.new_interval((0, 6), (4, 4), Presence::Present);
        let b = solver.new_interval((1, 3), (3, 3), Presence::Present);
        let c = solver.new_interval((0, 20), (2, 2), Presence::Optional);

        let propagator = solver
            .new_propagator(NoOverlapGlobalConstructor::new(vec![a, b, c]))
            .expect("no empty domains");

        let num_entries = solver.num_trail_entries();
        solver.propagate(propagator).expect("no empty domains");

        assert_eq!(num_entries, solver.num_trail_entries());
    }
}
