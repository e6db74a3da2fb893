use crate::basic_types::PropagationStatusCP;
use crate::engine::variables::IntervalVariable;
use crate::engine::variables::Literal;
use crate::propagation::DomainEvents;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;

/// Propagator for two intervals which may not overlap, with a literal `before` which is true if
/// and only if `a` ends before `b` starts (when both are present).
///
/// When both intervals are present the order is deduced from their bounds; once the order is
/// known the bounds are tightened accordingly. The propagator deactivates itself when one of the
/// intervals is absent.
#[derive(Clone, Debug)]
pub(crate) struct NoOverlapBinaryPropagator {
    a: IntervalVariable,
    b: IntervalVariable,
    before: Literal,
}

impl NoOverlapBinaryPropagator {
    pub(crate) fn new(a: IntervalVariable, b: IntervalVariable, before: Literal) -> Self {
        NoOverlapBinaryPropagator { a, b, before }
    }
}

impl PropagatorConstructor for NoOverlapBinaryPropagator {
    type PropagatorImpl = Self;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        context.register_interval(self.a, DomainEvents::ANY_INTERVAL);
        context.register_interval(self.b, DomainEvents::ANY_INTERVAL);
        context.register(self.before, DomainEvents::ASSIGN);

        self
    }
}

impl Propagator for NoOverlapBinaryPropagator {
    fn name(&self) -> &str {
        "NoOverlapBinary"
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatusCP {
        if context.is_absent(self.a) || context.is_absent(self.b) {
            context.set_active(false);
            return Ok(());
        }

        if context.is_present(self.a) && context.is_present(self.b) {
            if context.end_min(self.a) > context.start_max(self.b) {
                context.assign_literal(&self.before, false)?;
            } else if context.end_min(self.b) > context.start_max(self.a) {
                context.assign_literal(&self.before, true)?;
            }
        }

        if context.is_literal_true(&self.before) {
            enforce_precedence(&mut context, self.a, self.b)?;
        } else if context.is_literal_false(&self.before) {
            enforce_precedence(&mut context, self.b, self.a)?;
        }

        if context.is_interval_fixed(self.a)
            && context.is_interval_fixed(self.b)
            && context.is_literal_fixed(&self.before)
        {
            context.set_active(false);
        }

        Ok(())
    }
}

/// Tightens the bounds such that `first` ends before `second` starts.
///
/// An interval only pushes the other one if it is certainly present.
fn enforce_precedence(
    context: &mut PropagationContext,
    first: IntervalVariable,
    second: IntervalVariable,
) -> PropagationStatusCP {
    if context.is_present(first) {
        context.set_start_min(second, context.end_min(first))?;
    }
    if context.is_present(second) {
        context.set_end_max(first, context.start_max(second))?;
    }
    Ok(())
}
