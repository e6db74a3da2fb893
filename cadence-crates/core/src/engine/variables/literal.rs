use std::ops::Not;

use enumset::EnumSet;

use super::AffineView;
use super::DomainId;
use super::IntegerVariable;
use super::TransformableVariable;
use crate::engine::notifications::DomainEvent;
use crate::engine::notifications::Watchers;
use crate::engine::Assignments;
use crate::engine::EmptyDomain;

/// A Boolean variable, represented as a 0-1 view on an integer domain.
///
/// The negation of a literal is the view `1 - x` on the same domain, so a literal and its negation
/// never need to be synchronised.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Literal {
    integer_variable: AffineView<DomainId>,
}

impl Literal {
    pub(crate) fn new(domain_id: DomainId) -> Literal {
        Literal {
            integer_variable: domain_id.into(),
        }
    }

    pub(crate) fn is_true(&self, assignments: &Assignments) -> bool {
        self.lower_bound(assignments) == 1
    }

    pub(crate) fn is_false(&self, assignments: &Assignments) -> bool {
        self.upper_bound(assignments) == 0
    }

    pub(crate) fn assign(
        &self,
        assignments: &mut Assignments,
        value: bool,
    ) -> Result<(), EmptyDomain> {
        if value {
            self.set_lower_bound(assignments, 1)
        } else {
            self.set_upper_bound(assignments, 0)
        }
    }
}

impl Not for Literal {
    type Output = Literal;

    fn not(self) -> Self::Output {
        Literal {
            integer_variable: self.integer_variable.scaled(-1).offset(1),
        }
    }
}

impl IntegerVariable for Literal {
    type AffineView = AffineView<Self>;

    fn lower_bound(&self, assignments: &Assignments) -> i32 {
        self.integer_variable.lower_bound(assignments)
    }

    fn upper_bound(&self, assignments: &Assignments) -> i32 {
        self.integer_variable.upper_bound(assignments)
    }

    fn set_lower_bound(
        &self,
        assignments: &mut Assignments,
        value: i32,
    ) -> Result<(), EmptyDomain> {
        self.integer_variable.set_lower_bound(assignments, value)
    }

    fn set_upper_bound(
        &self,
        assignments: &mut Assignments,
        value: i32,
    ) -> Result<(), EmptyDomain> {
        self.integer_variable.set_upper_bound(assignments, value)
    }

    fn watch_all(&self, watchers: &mut Watchers<'_>, events: EnumSet<DomainEvent>) {
        self.integer_variable.watch_all(watchers, events)
    }
}

impl TransformableVariable<AffineView<Literal>> for Literal {
    fn scaled(&self, scale: i32) -> AffineView<Literal> {
        AffineView::new(*self, scale, 0)
    }

    fn offset(&self, offset: i32) -> AffineView<Literal> {
        AffineView::new(*self, 1, offset)
    }
}

#[cfg(test)]
mod tests {
    use crate::TestSolver;

    #[test]
    fn negation_observes_the_same_domain() {
        let mut solver = TestSolver::default();
        let literal = solver.new_literal();

        solver.assign_literal(!literal, true).expect("non-empty");

        assert!(solver.is_literal_false(literal));
        assert!(solver.is_literal_true(!literal));
        assert!(solver.is_literal_false(!!literal));
    }
}
