use std::cmp::max;
use std::cmp::min;

use log::debug;
use log::trace;

use super::timeline::ActivityBounds;
use super::timeline::Load;
use super::timeline::Profile;
use super::Activity;
use super::GeneralizedCumulativeOptions;
use crate::basic_types::PropagationStatusCP;
use crate::basic_types::PropagatorConflict;
use crate::cadence_assert_extreme;
use crate::containers::TrailedSparseSet;
use crate::engine::variables::IntegerVariable;
use crate::engine::EmptyDomain;
use crate::engine::TrailedInteger;
use crate::math::to_bound;
use crate::propagation::DomainEvents;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;

/// The minimum capacity of a resource without a lower bound on its level.
pub(crate) const UNBOUNDED_MIN_CAPACITY: i64 = i64::MIN / 4;
/// The maximum capacity of a resource without an upper bound on its level.
pub(crate) const UNBOUNDED_MAX_CAPACITY: i64 = i64::MAX / 4;

#[derive(Clone, Debug)]
pub(crate) struct GeneralizedCumulativeConstructor<Var> {
    activities: Box<[Activity<Var>]>,
    min_capacity: i64,
    max_capacity: i64,
    options: GeneralizedCumulativeOptions,
}

impl<Var: IntegerVariable> GeneralizedCumulativeConstructor<Var> {
    /// Creates the propagator for `min_capacity <= level(t) <= max_capacity` at every `t` at
    /// which some present activity executes. Use [`UNBOUNDED_MIN_CAPACITY`] and
    /// [`UNBOUNDED_MAX_CAPACITY`] for a side without a bound.
    pub(crate) fn new(
        activities: impl Into<Box<[Activity<Var>]>>,
        min_capacity: i64,
        max_capacity: i64,
        options: GeneralizedCumulativeOptions,
    ) -> Self {
        GeneralizedCumulativeConstructor {
            activities: activities.into(),
            min_capacity,
            max_capacity,
            options,
        }
    }
}

impl<Var: IntegerVariable> PropagatorConstructor for GeneralizedCumulativeConstructor<Var> {
    type PropagatorImpl = GeneralizedCumulativePropagator<Var>;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        for activity in self.activities.iter() {
            context.register_interval(activity.interval(), DomainEvents::ANY_INTERVAL);
            context.register(activity.height().clone(), DomainEvents::BOUNDS);
        }

        let active = context.new_sparse_set(self.activities.len());
        let min_start = context.new_trailed_integer(i64::MIN);
        let max_end = context.new_trailed_integer(i64::MAX);

        GeneralizedCumulativePropagator {
            activities: self.activities,
            min_capacity: self.min_capacity,
            max_capacity: self.max_capacity,
            options: self.options,
            active,
            min_start,
            max_end,
            indices: vec![],
            bounds: vec![],
            profile: Profile::default(),
        }
    }
}

/// Time-table propagator for a resource whose level must stay within
/// `[min_capacity, max_capacity]` wherever a present activity executes.
///
/// Activities may be optional and may have variable, and possibly negative, heights. Every
/// propagation builds a [`Profile`] from the current bounds, fails if the profile shows that the
/// level leaves the capacity window at a point where some activity certainly executes, and then
/// filters the activities which are not fixed:
/// - the start and end times are pushed past the segments at which the activity cannot execute;
/// - an activity without which the level leaves the window at a point is made present and is
///   forced to cover that point;
/// - the height is tightened on the fixed part of the activity, and for present activities
///   without a fixed part the height and the maximum length are derived from the segments the
///   activity can cover.
///
/// Absent activities, and fixed activities which overlap neither the activities which are not yet
/// fixed nor the fixed activities which do, are removed from a reversible set of active
/// activities.
#[derive(Clone, Debug)]
pub(crate) struct GeneralizedCumulativePropagator<Var> {
    activities: Box<[Activity<Var>]>,
    min_capacity: i64,
    max_capacity: i64,
    options: GeneralizedCumulativeOptions,

    active: TrailedSparseSet,
    /// The start of the span stored by the previous propagation, see `store_span`
    min_start: TrailedInteger,
    /// The end of the span stored by the previous propagation
    max_end: TrailedInteger,

    /// The activity of every captured bound
    indices: Vec<usize>,
    bounds: Vec<ActivityBounds>,
    profile: Profile,
}

/// Properties of the captured activities which decide how much filtering is needed.
#[derive(Debug, Clone, Copy)]
struct Classification {
    all_heights_fixed: bool,
    all_lengths_fixed: bool,
    all_positive: bool,
    all_negative: bool,
}

impl<Var: IntegerVariable> GeneralizedCumulativePropagator<Var> {
    fn has_min_capacity(&self) -> bool {
        self.min_capacity > UNBOUNDED_MIN_CAPACITY
    }

    fn has_max_capacity(&self) -> bool {
        self.max_capacity < UNBOUNDED_MAX_CAPACITY
    }

    #[cfg(test)]
    pub(crate) fn num_active(&self, trailed_values: &crate::engine::TrailedValues) -> usize {
        self.active.len(trailed_values)
    }

    /// Removes the absent activities, and the fixed activities outside the span stored by the
    /// previous propagation.
    fn remove_inactive_activities(&mut self, context: &mut PropagationContext) {
        let min_start = context.value(self.min_start);
        let max_end = context.value(self.max_end);

        for position in (0..self.active.len(context.trailed_values())).rev() {
            let activity = &self.activities[self.active.get(position)];
            let interval = activity.interval();

            let is_outside_span = activity.is_fixed(&*context)
                && (i64::from(context.end_max(interval)) <= min_start
                    || i64::from(context.start_min(interval)) >= max_end);

            if context.is_absent(interval) || is_outside_span {
                self.active
                    .remove_at(position, context.trailed_values_mut());
            }
        }
    }

    fn capture_bounds(&mut self, context: &PropagationContext) -> Classification {
        self.indices.clear();
        self.bounds.clear();

        let mut classification = Classification {
            all_heights_fixed: true,
            all_lengths_fixed: true,
            all_positive: true,
            all_negative: true,
        };

        for index in self.active.iter(context.trailed_values()) {
            let activity = &self.activities[index];
            let interval = activity.interval();

            let bounds = ActivityBounds {
                start_min: i64::from(context.start_min(interval)),
                start_max: i64::from(context.start_max(interval)),
                end_min: i64::from(context.end_min(interval)),
                end_max: i64::from(context.end_max(interval)),
                length_min: i64::from(context.length_min(interval)),
                length_max: i64::from(context.length_max(interval)),
                height_min: i64::from(context.lower_bound(activity.height())),
                height_max: i64::from(context.upper_bound(activity.height())),
                is_present: context.is_present(interval),
                is_fixed: activity.is_fixed(context),
            };

            classification.all_heights_fixed &= bounds.height_min == bounds.height_max;
            classification.all_lengths_fixed &= bounds.length_min == bounds.length_max;
            classification.all_positive &= bounds.height_min >= 0;
            classification.all_negative &= bounds.height_max <= 0;

            self.indices.push(index);
            self.bounds.push(bounds);
        }

        classification
    }

    /// Whether the level cannot leave the capacity window, whatever the activities do.
    fn is_trivially_satisfied(&self, classification: Classification) -> bool {
        let below_max = !self.has_max_capacity()
            || (classification.all_negative && self.max_capacity >= 0);
        let above_min = !self.has_min_capacity()
            || (classification.all_positive && self.min_capacity <= 0);

        below_max && above_min
    }

    /// The load when the activity is left out of the profile at the given segment.
    fn load_without(&self, bounds: &ActivityBounds, segment: usize) -> Load {
        let point = self.profile.point(segment);
        point.load.without(bounds.contribution_at(point.time))
    }

    /// Whether executing the activity during the given segment takes the level outside the
    /// capacity window for every height of the activity.
    fn is_overloaded_with(&self, bounds: &ActivityBounds, segment: usize) -> bool {
        let others = self.load_without(bounds, segment);
        Load {
            min: others.min + bounds.height_min,
            max: others.max + bounds.height_max,
        }
        .violates(self.min_capacity, self.max_capacity)
    }

    fn earliest_feasible_start(&self, bounds: &ActivityBounds) -> i64 {
        let mut start = bounds.start_min;
        let mut segment = self.profile.segment_containing(start);

        while segment < self.profile.num_segments() && start <= bounds.start_max {
            let (segment_start, segment_end) = self.profile.span(segment);
            let covered_until = max(bounds.end_min, start + bounds.length_min);
            if max(segment_start, start) >= covered_until {
                break;
            }

            if self.is_overloaded_with(bounds, segment) {
                // Without a minimum length the activity may start at its earliest end and
                // execute nowhere.
                start = if bounds.length_min > 0 {
                    segment_end
                } else {
                    min(segment_end, bounds.end_min)
                };
            }
            segment += 1;
        }

        start
    }

    fn latest_feasible_end(&self, bounds: &ActivityBounds) -> i64 {
        let mut end = bounds.end_max;
        let mut segment = self.profile.segment_containing(end - 1);

        while end >= bounds.end_min {
            let (segment_start, segment_end) = self.profile.span(segment);
            let covered_from = min(bounds.start_max, end - bounds.length_min);
            if min(segment_end, end) <= covered_from {
                break;
            }

            if self.is_overloaded_with(bounds, segment) {
                end = if bounds.length_min > 0 {
                    segment_start
                } else {
                    max(segment_start, bounds.start_max)
                };
            }

            if segment == 0 {
                break;
            }
            segment -= 1;
        }

        end
    }

    /// Tightens the height of an activity which executes at a point where the other activities
    /// have the given load.
    fn tighten_height(
        &self,
        context: &mut PropagationContext,
        activity: &Activity<Var>,
        others: Load,
    ) -> PropagationStatusCP {
        restrict_height(
            context,
            activity.height(),
            self.min_capacity - others.max,
            self.max_capacity - others.min,
        )
    }

    /// Adjusts the height of the activity on its fixed part, and forces the activity to execute
    /// during the segments which cannot satisfy the capacity window without it.
    fn filter_over_segments(
        &self,
        context: &mut PropagationContext,
        activity: &Activity<Var>,
        bounds: &ActivityBounds,
        adjust_heights: bool,
        detect_mandatory: bool,
    ) -> PropagationStatusCP {
        let interval = activity.interval();
        let mut segment = self.profile.segment_containing(bounds.start_min);

        while segment < self.profile.num_segments() {
            let (segment_start, segment_end) = self.profile.span(segment);
            if segment_start >= bounds.end_max {
                break;
            }

            let point = self.profile.point(segment);
            let others = self.load_without(bounds, segment);

            if bounds.is_mandatory_at(point.time) {
                if adjust_heights {
                    self.tighten_height(context, activity, others)?;
                }
            } else if detect_mandatory
                && point.num_overlapping > 0
                && others.violates(self.min_capacity, self.max_capacity)
            {
                trace!("{interval} is needed during [{segment_start}, {segment_end})");
                context.set_present(interval)?;
                context.set_start_max(interval, to_bound(segment_start))?;
                context.set_end_min(interval, to_bound(segment_end))?;
                self.tighten_height(context, activity, others)?;
            }

            segment += 1;
        }

        Ok(())
    }

    /// For a present activity without a fixed part: the height has to fit at least one segment
    /// it can cover, and the activity cannot be longer than the longest run of consecutive
    /// segments at which it fits.
    fn filter_height_and_length(
        &self,
        context: &mut PropagationContext,
        activity: &Activity<Var>,
        bounds: &ActivityBounds,
    ) -> PropagationStatusCP {
        let interval = activity.interval();
        let window_start = i64::from(context.start_min(interval));
        let window_end = i64::from(context.end_max(interval));
        let height_min = i64::from(context.lower_bound(activity.height()));
        let height_max = i64::from(context.upper_bound(activity.height()));

        if window_start >= window_end {
            return Ok(());
        }

        let mut feasible_heights: Option<Load> = None;
        let mut longest_run = 0;
        let mut run = 0;

        let mut segment = self.profile.segment_containing(window_start);
        while segment < self.profile.num_segments() {
            let (segment_start, segment_end) = self.profile.span(segment);
            if segment_start >= window_end {
                break;
            }

            let others = self.load_without(bounds, segment);
            let allowed = Load {
                min: self.min_capacity - others.max,
                max: self.max_capacity - others.min,
            };

            if allowed.min <= height_max && allowed.max >= height_min {
                feasible_heights = Some(match feasible_heights {
                    None => allowed,
                    Some(heights) => Load {
                        min: min(heights.min, allowed.min),
                        max: max(heights.max, allowed.max),
                    },
                });

                run += min(segment_end, window_end) - max(segment_start, window_start);
                longest_run = max(longest_run, run);
            } else {
                run = 0;
            }

            segment += 1;
        }

        if longest_run < i64::from(context.length_max(interval)) {
            trace!("{interval} fits in at most {longest_run} consecutive time units");
            context.set_length_max(interval, to_bound(longest_run))?;
        }

        if let Some(heights) = feasible_heights {
            restrict_height(context, activity.height(), heights.min, heights.max)?;
        }

        Ok(())
    }

    fn time_table(
        &self,
        context: &mut PropagationContext,
        position: usize,
        simple: bool,
        detect_mandatory: bool,
    ) -> PropagationStatusCP {
        let activity = &self.activities[self.indices[position]];
        let bounds = self.bounds[position];
        let interval = activity.interval();

        if bounds.start_min >= bounds.end_max {
            return Ok(());
        }

        let earliest_start = self.earliest_feasible_start(&bounds);
        if earliest_start > bounds.start_min {
            context.set_start_min(interval, to_bound(earliest_start))?;
        }

        let latest_end = self.latest_feasible_end(&bounds);
        if latest_end < bounds.end_max {
            context.set_end_max(interval, to_bound(latest_end))?;
        }

        if context.is_absent(interval) {
            trace!("{interval} does not fit on the resource and becomes absent");
            return Ok(());
        }

        if !simple || detect_mandatory {
            self.filter_over_segments(context, activity, &bounds, !simple, detect_mandatory)?;
        }

        if !simple
            && context.is_present(interval)
            && !bounds.has_mandatory_part()
            && bounds.length_min > 0
        {
            self.filter_height_and_length(context, activity, &bounds)?;
        }

        Ok(())
    }

    /// Stores the span of the captured activities which were not fixed, widened by the fixed
    /// activities which overlap it until none of the fixed activities outside the span overlaps
    /// an activity inside of it.
    ///
    /// The profile was exact outside this span, and no activity which stays in the active set
    /// can execute there, so the fixed activities which lie outside of it cannot be involved in a
    /// violation later on.
    fn store_span(&self, context: &mut PropagationContext) {
        let (mut min_start, mut max_end) = self
            .bounds
            .iter()
            .filter(|bounds| !bounds.is_fixed)
            .fold((i64::MAX, i64::MIN), |(min_start, max_end), bounds| {
                (min(min_start, bounds.start_min), max(max_end, bounds.end_max))
            });

        let mut is_widened = true;
        while is_widened {
            is_widened = false;
            for bounds in self.bounds.iter().filter(|bounds| bounds.is_fixed) {
                let overlaps_span = bounds.start_min < max_end && bounds.end_max > min_start;
                if overlaps_span && (bounds.start_min < min_start || bounds.end_max > max_end) {
                    min_start = min(min_start, bounds.start_min);
                    max_end = max(max_end, bounds.end_max);
                    is_widened = true;
                }
            }
        }

        cadence_assert_extreme!(self.bounds.iter().all(|bounds| {
            let is_inside = min_start <= bounds.start_min && bounds.end_max <= max_end;
            let is_outside = bounds.end_max <= min_start || bounds.start_min >= max_end;
            is_inside || is_outside
        }));

        context.assign(self.min_start, min_start);
        context.assign(self.max_end, max_end);
    }
}

/// Restricts the height to `[lower, upper]`, applying only the bounds which tighten its domain.
///
/// The applied bounds lie within the current domain, such that they map back onto the variable
/// underneath a view without overflowing.
fn restrict_height<Var: IntegerVariable>(
    context: &mut PropagationContext,
    height: &Var,
    lower: i64,
    upper: i64,
) -> PropagationStatusCP {
    let height_min = i64::from(context.lower_bound(height));
    let height_max = i64::from(context.upper_bound(height));

    if lower > height_max || upper < height_min {
        return Err(EmptyDomain.into());
    }

    if lower > height_min {
        context.set_lower_bound(height, to_bound(lower))?;
    }
    if upper < height_max {
        context.set_upper_bound(height, to_bound(upper))?;
    }

    Ok(())
}

impl<Var: IntegerVariable> Propagator for GeneralizedCumulativePropagator<Var> {
    fn name(&self) -> &str {
        "GeneralizedCumulative"
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatusCP {
        self.remove_inactive_activities(&mut context);

        let classification = self.capture_bounds(&context);
        if self.bounds.is_empty() {
            context.set_active(false);
            return Ok(());
        }

        if self.is_trivially_satisfied(classification) {
            debug!("The capacity of the resource cannot be exceeded; deactivating");
            context.set_active(false);
            return Ok(());
        }

        self.profile.build(&self.bounds);
        if !self
            .profile
            .is_consistent(self.min_capacity, self.max_capacity)
        {
            return Err(PropagatorConflict {
                propagator: "GeneralizedCumulative",
            }
            .into());
        }

        if self.bounds.iter().all(|bounds| bounds.is_fixed) {
            context.set_active(false);
            return Ok(());
        }

        let simple = !self.options.height_and_length_filtering
            || (classification.all_heights_fixed
                && classification.all_lengths_fixed
                && classification.all_positive
                && !self.has_min_capacity());
        let detect_mandatory = self.options.mandatory_part_detection
            && (self.has_min_capacity() || !classification.all_positive);

        for position in 0..self.bounds.len() {
            if self.bounds[position].is_fixed {
                continue;
            }
            self.time_table(&mut context, position, simple, detect_mandatory)?;
        }

        self.store_span(&mut context);

        Ok(())
    }
}
