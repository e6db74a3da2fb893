use crate::basic_types::PropagationStatusCP;
use crate::engine::variables::IntervalVariable;
use crate::propagation::DomainEvents;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;

/// The time point of the source interval at which the synchronised interval starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SynchronisedPoint {
    Start,
    End,
}

/// Propagator for `present(target) = present(source)` and `start(target) = point(source)`, where
/// the point is either the start or the end of the source.
///
/// This turns a step of a cumulative function, which happens at a single point in time, into an
/// interval which executes from that point onwards.
#[derive(Clone, Debug)]
pub(crate) struct IntervalSynchronisationPropagator {
    source: IntervalVariable,
    target: IntervalVariable,
    point: SynchronisedPoint,
}

impl IntervalSynchronisationPropagator {
    pub(crate) fn new(
        source: IntervalVariable,
        target: IntervalVariable,
        point: SynchronisedPoint,
    ) -> Self {
        IntervalSynchronisationPropagator {
            source,
            target,
            point,
        }
    }

    fn source_bounds(&self, context: &PropagationContext) -> (i32, i32) {
        match self.point {
            SynchronisedPoint::Start => (
                context.start_min(self.source),
                context.start_max(self.source),
            ),
            SynchronisedPoint::End => (context.end_min(self.source), context.end_max(self.source)),
        }
    }

    fn synchronise_presence(&self, context: &mut PropagationContext) -> PropagationStatusCP {
        for (from, to) in [(self.source, self.target), (self.target, self.source)] {
            if context.is_present(from) {
                context.set_present(to)?;
            } else if context.is_absent(from) {
                context.set_absent(to)?;
            }
        }

        Ok(())
    }
}

impl PropagatorConstructor for IntervalSynchronisationPropagator {
    type PropagatorImpl = Self;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        context.register_interval(self.source, DomainEvents::ANY_INTERVAL);
        context.register_interval(self.target, DomainEvents::ANY_INTERVAL);

        self
    }
}

impl Propagator for IntervalSynchronisationPropagator {
    fn name(&self) -> &str {
        "IntervalSynchronisation"
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatusCP {
        self.synchronise_presence(&mut context)?;

        if context.is_absent(self.source) {
            context.set_active(false);
            return Ok(());
        }

        let (point_min, point_max) = self.source_bounds(&context);
        context.set_start_min(self.target, point_min)?;
        context.set_start_max(self.target, point_max)?;

        let target_min = context.start_min(self.target);
        let target_max = context.start_max(self.target);
        match self.point {
            SynchronisedPoint::Start => {
                context.set_start_min(self.source, target_min)?;
                context.set_start_max(self.source, target_max)?;
            }
            SynchronisedPoint::End => {
                context.set_end_min(self.source, target_min)?;
                context.set_end_max(self.source, target_max)?;
            }
        }

        // An update which emptied the domain of an optional interval made it absent.
        self.synchronise_presence(&mut context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::interval_domain::IntervalUpdate;
    use crate::engine::variables::Presence;
    use crate::engine::HORIZON;
    use crate::TestSolver;

    fn step_interval(solver: &mut TestSolver, presence: Presence) -> IntervalVariable {
        solver.new_interval((-HORIZON, HORIZON), (0, 2 * HORIZON), presence)
    }

    #[test]
    fn target_starts_at_the_end_of_the_source() {
        let mut solver = TestSolver::default();
        let source = solver.new_interval((0, 10), (3, 3), Presence::Present);
        let target = step_interval(&mut solver, Presence::Optional);

        let _ = solver
            .new_propagator(IntervalSynchronisationPropagator::new(
                source,
                target,
                SynchronisedPoint::End,
            ))
            .expect("no empty domains");

        assert_eq!(Presence::Present, solver.presence(target));
        assert_eq!(3, solver.start_min(target));
        assert_eq!(13, solver.start_max(target));
    }

    #[test]
    fn target_bounds_restrict_the_source() {
        let mut solver = TestSolver::default();
        let source = solver.new_interval((0, 10), (3, 3), Presence::Optional);
        let target = step_interval(&mut solver, Presence::Optional);

        let _ = solver
            .new_propagator(IntervalSynchronisationPropagator::new(
                source,
                target,
                SynchronisedPoint::Start,
            ))
            .expect("no empty domains");

        solver
            .update_interval(target, IntervalUpdate::StartMin(4))
            .expect("non-empty");
        solver
            .propagate_until_fixed_point()
            .expect("no empty domains");

        assert_eq!(4, solver.start_min(source));
        assert_eq!(Presence::Optional, solver.presence(source));
    }

    #[test]
    fn absence_is_shared() {
        let mut solver = TestSolver::default();
        let source = solver.new_interval((0, 10), (3, 3), Presence::Optional);
        let target = step_interval(&mut solver, Presence::Optional);

        let propagator = solver
            .new_propagator(IntervalSynchronisationPropagator::new(
                source,
                target,
                SynchronisedPoint::Start,
            ))
            .expect("no empty domains");

        solver
            .update_interval(target, IntervalUpdate::Absent)
            .expect("optional");
        solver
            .propagate_until_fixed_point()
            .expect("no empty domains");

        assert_eq!(Presence::Absent, solver.presence(source));
        assert!(!solver.is_propagator_active(propagator));
    }
}
