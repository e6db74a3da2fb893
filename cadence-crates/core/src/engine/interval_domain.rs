use crate::engine::variables::Presence;

/// The bounds of an interval variable.
///
/// The domain is kept bound consistent with `start + length = end`; an update which leaves no
/// support is reported by [`IntervalDomain::make_consistent`] returning `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct IntervalDomain {
    pub(crate) start_min: i32,
    pub(crate) start_max: i32,
    pub(crate) end_min: i32,
    pub(crate) end_max: i32,
    pub(crate) length_min: i32,
    pub(crate) length_max: i32,
    pub(crate) presence: Presence,
}

/// A single tightening of an [`IntervalDomain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IntervalUpdate {
    StartMin(i32),
    StartMax(i32),
    EndMin(i32),
    EndMax(i32),
    LengthMin(i32),
    LengthMax(i32),
    Present,
    Absent,
}

impl IntervalDomain {
    pub(crate) fn apply_bound(&mut self, update: IntervalUpdate) {
        match update {
            IntervalUpdate::StartMin(value) => self.start_min = self.start_min.max(value),
            IntervalUpdate::StartMax(value) => self.start_max = self.start_max.min(value),
            IntervalUpdate::EndMin(value) => self.end_min = self.end_min.max(value),
            IntervalUpdate::EndMax(value) => self.end_max = self.end_max.min(value),
            IntervalUpdate::LengthMin(value) => self.length_min = self.length_min.max(value),
            IntervalUpdate::LengthMax(value) => self.length_max = self.length_max.min(value),
            IntervalUpdate::Present | IntervalUpdate::Absent => {}
        }
    }

    /// Tightens the bounds until they are consistent with `start + length = end`.
    ///
    /// Returns `false` if the bounds admit no value.
    pub(crate) fn make_consistent(&mut self) -> bool {
        loop {
            if self.is_empty() {
                return false;
            }

            let before = *self;

            let (start_min, start_max) = (self.start_min as i64, self.start_max as i64);
            let (end_min, end_max) = (self.end_min as i64, self.end_max as i64);
            let (length_min, length_max) = (self.length_min as i64, self.length_max as i64);

            self.start_min = start_min.max(end_min - length_max) as i32;
            self.start_max = start_max.min(end_max - length_min) as i32;
            self.end_min = end_min.max(start_min + length_min) as i32;
            self.end_max = end_max.min(start_max + length_max) as i32;
            self.length_min = length_min.max(end_min - start_max) as i32;
            self.length_max = length_max.min(end_max - start_min) as i32;

            if *self == before {
                return true;
            }
        }
    }

    fn is_empty(&self) -> bool {
        self.start_min > self.start_max
            || self.end_min > self.end_max
            || self.length_min > self.length_max
    }

    pub(crate) fn is_fixed(&self) -> bool {
        self.presence == Presence::Absent
            || (self.start_min == self.start_max && self.end_min == self.end_max)
    }
}
