use crate::engine::variables::IntegerVariable;
use crate::engine::variables::IntervalVariable;
use crate::propagation::ReadDomains;

/// An interval which changes the level of a cumulative resource by `height` while it executes.
///
/// The height is a signed amount: an activity with a negative height releases the resource
/// (for example the end of a producer) rather than consuming it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Activity<Var> {
    interval: IntervalVariable,
    height: Var,
}

impl<Var: IntegerVariable> Activity<Var> {
    pub fn new(interval: IntervalVariable, height: Var) -> Self {
        Activity { interval, height }
    }

    pub fn interval(&self) -> IntervalVariable {
        self.interval
    }

    pub fn height(&self) -> &Var {
        &self.height
    }

    /// Whether the activity certainly executes during `[start_max, end_min)` if it is present.
    pub fn has_fixed_part(&self, domains: &impl ReadDomains) -> bool {
        domains.start_max(self.interval) < domains.end_min(self.interval)
    }

    pub fn is_present(&self, domains: &impl ReadDomains) -> bool {
        domains.is_present(self.interval)
    }

    /// An activity is fixed when it is absent, or when it is present with a fixed start, end and
    /// height.
    pub fn is_fixed(&self, domains: &impl ReadDomains) -> bool {
        domains.is_absent(self.interval)
            || (domains.is_present(self.interval)
                && domains.is_interval_fixed(self.interval)
                && domains.is_fixed(&self.height))
    }
}
