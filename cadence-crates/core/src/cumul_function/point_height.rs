use std::cmp::max;
use std::cmp::min;

use crate::engine::variables::AffineView;
use crate::engine::variables::DomainId;
use crate::engine::variables::IntervalVariable;
use crate::engine::variables::Presence;
use crate::Solver;

/// The value of a [`CumulFunction`](super::CumulFunction) at the start or end of one of its
/// intervals: a sum of terms `height * presence(interval)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointHeight {
    terms: Vec<(AffineView<DomainId>, IntervalVariable)>,
}

impl PointHeight {
    pub(super) fn push(&mut self, height: AffineView<DomainId>, interval: IntervalVariable) {
        self.terms.push((height, interval));
    }

    pub fn terms(&self) -> &[(AffineView<DomainId>, IntervalVariable)] {
        &self.terms
    }

    /// The range of values the height can take under the current domains.
    pub fn bounds(&self, solver: &Solver) -> (i64, i64) {
        self.terms
            .iter()
            .map(|(height, interval)| {
                let lower_bound = i64::from(solver.lower_bound(height));
                let upper_bound = i64::from(solver.upper_bound(height));

                match solver.presence(*interval) {
                    Presence::Present => (lower_bound, upper_bound),
                    Presence::Absent => (0, 0),
                    Presence::Optional => (min(0, lower_bound), max(0, upper_bound)),
                }
            })
            .fold((0, 0), |(total_min, total_max), (term_min, term_max)| {
                (total_min + term_min, total_max + term_max)
            })
    }
}
