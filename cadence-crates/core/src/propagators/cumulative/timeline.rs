//! The resource profile built at the start of every propagation of the generalized cumulative.
//!
//! Every activity contributes an interval of possible heights to the load at each time point:
//! - within its fixed part `[start_max, end_min)`, provided it is present, it certainly executes
//!   and contributes `[height_min, height_max]`;
//! - elsewhere within `[start_min, end_max)` it may or may not execute and so contributes
//!   `[min(0, height_min), max(0, height_max)]`;
//! - outside `[start_min, end_max)` it contributes nothing.
//!
//! The [`Profile`] sums these contributions into a sequence of [`TimePoint`]s. Between two
//! consecutive time points the contributions of all activities are constant, which allows the
//! propagator to reason per segment rather than per time unit.

use std::cmp::max;
use std::cmp::min;

use crate::cadence_assert_advanced;
use crate::cadence_assert_moderate;

/// The bounds of an activity, captured when the profile is built.
///
/// All values are widened to 64 bits so that sums over many heights, and differences with the
/// capacity, cannot overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ActivityBounds {
    pub(crate) start_min: i64,
    pub(crate) start_max: i64,
    pub(crate) end_min: i64,
    pub(crate) end_max: i64,
    pub(crate) length_min: i64,
    pub(crate) length_max: i64,
    pub(crate) height_min: i64,
    pub(crate) height_max: i64,
    pub(crate) is_present: bool,
    pub(crate) is_fixed: bool,
}

impl ActivityBounds {
    /// Whether the activity is present and certainly executes during `[start_max, end_min)`.
    pub(crate) fn has_mandatory_part(&self) -> bool {
        self.is_present && self.start_max < self.end_min
    }

    pub(crate) fn is_mandatory_at(&self, time: i64) -> bool {
        self.has_mandatory_part() && self.start_max <= time && time < self.end_min
    }

    fn possible_contribution(&self) -> Load {
        Load {
            min: min(0, self.height_min),
            max: max(0, self.height_max),
        }
    }

    fn mandatory_contribution(&self) -> Load {
        Load {
            min: self.height_min,
            max: self.height_max,
        }
    }

    /// The contribution of the activity to the load at `time`.
    pub(crate) fn contribution_at(&self, time: i64) -> Load {
        if self.is_mandatory_at(time) {
            self.mandatory_contribution()
        } else if self.start_min <= time && time < self.end_max {
            self.possible_contribution()
        } else {
            Load::default()
        }
    }
}

/// A range of resource levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Load {
    pub(crate) min: i64,
    pub(crate) max: i64,
}

impl Load {
    /// Whether no level in the range lies within `[min_capacity, max_capacity]`.
    pub(crate) fn violates(&self, min_capacity: i64, max_capacity: i64) -> bool {
        self.min > max_capacity || self.max < min_capacity
    }

    /// The range without the given contribution.
    pub(crate) fn without(&self, contribution: Load) -> Load {
        Load {
            min: self.min - contribution.min,
            max: self.max - contribution.max,
        }
    }
}

/// The load from `time` up to the next time point of the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TimePoint {
    pub(crate) time: i64,
    pub(crate) load: Load,
    /// The number of activities which certainly execute at `time`.
    pub(crate) num_overlapping: usize,
}

#[derive(Debug, Clone, Copy)]
struct Event {
    time: i64,
    delta: Load,
    overlap: isize,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Profile {
    points: Vec<TimePoint>,
    events: Vec<Event>,
}

impl Profile {
    /// Rebuilds the profile from the given activities.
    pub(crate) fn build<'a>(&mut self, activities: impl IntoIterator<Item = &'a ActivityBounds>) {
        self.points.clear();
        self.events.clear();

        for activity in activities {
            if activity.start_min >= activity.end_max {
                continue;
            }

            let possible = activity.possible_contribution();
            self.push_event(activity.start_min, possible, 0);
            self.push_event(activity.end_max, negate(possible), 0);

            if activity.has_mandatory_part() {
                let extra = activity.mandatory_contribution().without(possible);
                self.push_event(activity.start_max, extra, 1);
                self.push_event(activity.end_min, negate(extra), -1);
            }
        }

        self.events.sort_unstable_by_key(|event| event.time);

        let mut load = Load::default();
        let mut num_overlapping: isize = 0;
        let mut index = 0;
        while index < self.events.len() {
            let time = self.events[index].time;
            while index < self.events.len() && self.events[index].time == time {
                let event = self.events[index];
                load.min += event.delta.min;
                load.max += event.delta.max;
                num_overlapping += event.overlap;
                index += 1;
            }

            cadence_assert_moderate!(num_overlapping >= 0);
            self.points.push(TimePoint {
                time,
                load,
                num_overlapping: num_overlapping as usize,
            });
        }

        cadence_assert_advanced!(self.points.last().map_or(true, |point| {
            point.num_overlapping == 0 && point.load.min == 0 && point.load.max == 0
        }));
    }

    fn push_event(&mut self, time: i64, delta: Load, overlap: isize) {
        self.events.push(Event {
            time,
            delta,
            overlap,
        });
    }

    /// The number of segments; segment `k` spans `[points[k].time, points[k + 1].time)`.
    pub(crate) fn num_segments(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    pub(crate) fn point(&self, segment: usize) -> &TimePoint {
        &self.points[segment]
    }

    /// The time span `[start, end)` of the given segment.
    pub(crate) fn span(&self, segment: usize) -> (i64, i64) {
        (self.points[segment].time, self.points[segment + 1].time)
    }

    /// The segment containing `time`, which should lie between the first and the last time point.
    pub(crate) fn segment_containing(&self, time: i64) -> usize {
        cadence_assert_moderate!(self.points.first().is_some_and(|point| point.time <= time));
        self.points
            .partition_point(|point| point.time <= time)
            .saturating_sub(1)
    }

    /// Whether at every time point at which some activity certainly executes, the load may lie
    /// within the capacity bounds.
    pub(crate) fn is_consistent(&self, min_capacity: i64, max_capacity: i64) -> bool {
        self.points.iter().all(|point| {
            point.num_overlapping == 0 || !point.load.violates(min_capacity, max_capacity)
        })
    }
}

fn negate(load: Load) -> Load {
    Load {
        min: -load.min,
        max: -load.max,
    }
}
