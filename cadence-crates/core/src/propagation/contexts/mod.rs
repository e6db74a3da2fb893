mod propagation_context;

pub use propagation_context::PropagationContext;

use crate::engine::variables::IntegerVariable;
use crate::engine::variables::IntervalVariable;
use crate::engine::variables::Literal;
use crate::engine::variables::Presence;
use crate::engine::Assignments;

/// Read access to the current domains.
pub trait ReadDomains {
    #[doc(hidden)]
    fn assignments(&self) -> &Assignments;

    fn lower_bound<Var: IntegerVariable>(&self, var: &Var) -> i32 {
        var.lower_bound(self.assignments())
    }

    fn upper_bound<Var: IntegerVariable>(&self, var: &Var) -> i32 {
        var.upper_bound(self.assignments())
    }

    fn is_fixed<Var: IntegerVariable>(&self, var: &Var) -> bool {
        self.lower_bound(var) == self.upper_bound(var)
    }

    fn is_literal_true(&self, literal: &Literal) -> bool {
        literal.is_true(self.assignments())
    }

    fn is_literal_false(&self, literal: &Literal) -> bool {
        literal.is_false(self.assignments())
    }

    fn is_literal_fixed(&self, literal: &Literal) -> bool {
        self.is_fixed(literal)
    }

    fn start_min(&self, interval: IntervalVariable) -> i32 {
        self.assignments().interval(interval).start_min
    }

    fn start_max(&self, interval: IntervalVariable) -> i32 {
        self.assignments().interval(interval).start_max
    }

    fn end_min(&self, interval: IntervalVariable) -> i32 {
        self.assignments().interval(interval).end_min
    }

    fn end_max(&self, interval: IntervalVariable) -> i32 {
        self.assignments().interval(interval).end_max
    }

    fn length_min(&self, interval: IntervalVariable) -> i32 {
        self.assignments().interval(interval).length_min
    }

    fn length_max(&self, interval: IntervalVariable) -> i32 {
        self.assignments().interval(interval).length_max
    }

    fn presence(&self, interval: IntervalVariable) -> Presence {
        self.assignments().interval(interval).presence
    }

    fn is_present(&self, interval: IntervalVariable) -> bool {
        self.presence(interval) == Presence::Present
    }

    fn is_absent(&self, interval: IntervalVariable) -> bool {
        self.presence(interval) == Presence::Absent
    }

    fn is_optional(&self, interval: IntervalVariable) -> bool {
        self.presence(interval) == Presence::Optional
    }

    /// Whether the interval is absent, or present or optional with a fixed start and end.
    fn is_interval_fixed(&self, interval: IntervalVariable) -> bool {
        self.assignments().interval(interval).is_fixed()
    }
}
