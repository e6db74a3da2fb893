use std::cmp::max;
use std::cmp::min;

use super::Activity;
use crate::basic_types::PropagationStatusCP;
use crate::basic_types::PropagatorConflict;
use crate::engine::variables::IntegerVariable;
use crate::propagation::DomainEvents;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;

/// A present activity with a fixed start, end and height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedActivity {
    pub start: i64,
    pub end: i64,
    pub height: i64,
}

/// Returns whether the level stays within `[min_capacity, max_capacity]` at every point in time at
/// which at least one of the activities executes.
///
/// The level is computed for every single time point between the earliest start and the latest
/// end, so the check takes time proportional to that range.
pub fn check_fixed(activities: &[FixedActivity], min_capacity: i64, max_capacity: i64) -> bool {
    let executing = || activities.iter().filter(|activity| activity.start < activity.end);

    let (first, last) = executing().fold((i64::MAX, i64::MIN), |(first, last), activity| {
        (min(first, activity.start), max(last, activity.end))
    });
    if first >= last {
        return true;
    }

    let num_time_points = (last - first) as usize;
    let mut levels = vec![0_i64; num_time_points];
    let mut num_executing = vec![0_usize; num_time_points];

    for activity in executing() {
        for time in activity.start..activity.end {
            let index = (time - first) as usize;
            levels[index] += activity.height;
            num_executing[index] += 1;
        }
    }

    levels
        .iter()
        .zip(&num_executing)
        .all(|(&level, &count)| count == 0 || (min_capacity <= level && level <= max_capacity))
}

/// Propagator which only checks the generalized cumulative once all of its activities are fixed.
///
/// It never tightens a domain; it serves as an independent oracle for
/// [`GeneralizedCumulativePropagator`](super::GeneralizedCumulativePropagator).
#[derive(Clone, Debug)]
pub(crate) struct GeneralizedCumulativeChecker<Var> {
    activities: Box<[Activity<Var>]>,
    min_capacity: i64,
    max_capacity: i64,
}

impl<Var: IntegerVariable> GeneralizedCumulativeChecker<Var> {
    pub(crate) fn new(
        activities: impl Into<Box<[Activity<Var>]>>,
        min_capacity: i64,
        max_capacity: i64,
    ) -> Self {
        GeneralizedCumulativeChecker {
            activities: activities.into(),
            min_capacity,
            max_capacity,
        }
    }
}

impl<Var: IntegerVariable> PropagatorConstructor for GeneralizedCumulativeChecker<Var> {
    type PropagatorImpl = Self;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        for activity in self.activities.iter() {
            context.register_interval(activity.interval(), DomainEvents::ANY_INTERVAL);
            context.register(activity.height().clone(), DomainEvents::BOUNDS);
        }

        self
    }
}

impl<Var: IntegerVariable> Propagator for GeneralizedCumulativeChecker<Var> {
    fn name(&self) -> &str {
        "GeneralizedCumulativeChecker"
    }

    fn propagate(&mut self, context: PropagationContext) -> PropagationStatusCP {
        if !self
            .activities
            .iter()
            .all(|activity| activity.is_fixed(&context))
        {
            return Ok(());
        }

        let fixed = self
            .activities
            .iter()
            .filter(|activity| activity.is_present(&context))
            .map(|activity| FixedActivity {
                start: i64::from(context.start_min(activity.interval())),
                end: i64::from(context.end_min(activity.interval())),
                height: i64::from(context.lower_bound(activity.height())),
            })
            .collect::<Vec<_>>();

        if check_fixed(&fixed, self.min_capacity, self.max_capacity) {
            Ok(())
        } else {
            Err(PropagatorConflict {
                propagator: "GeneralizedCumulativeChecker",
            }
            .into())
        }
    }
}
