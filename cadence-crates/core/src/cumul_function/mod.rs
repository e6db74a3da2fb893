//! Expressions describing how the level of a cumulative resource evolves over time.
//!
//! A [`CumulFunction`] is built from elementary functions:
//! - [`CumulFunction::flat`], which is zero everywhere;
//! - [`CumulFunction::pulse`], which is `height` while an interval executes and zero elsewhere;
//! - [`CumulFunction::step_at_start`] and [`CumulFunction::step_at_end`], which are zero before
//!   the start (or end) of an interval and `height` from that point onwards;
//!
//! and combined with [`CumulFunction::plus`], [`CumulFunction::minus`] and
//! [`CumulFunction::sum`], or the `+`, `-` and unary `-` operators. The function only changes the
//! level while the intervals it refers to are present.
//!
//! To constrain the level, the function is flattened into [`Activity`]s which are handed to the
//! generalized cumulative propagator, see [`crate::constraints::le`] and friends.
//!
//! # Example
//! ```
//! # use cadence_core::Solver;
//! # use cadence_core::cumul_function::CumulFunction;
//! let mut solver = Solver::default();
//!
//! let a = solver.new_interval(0, 10, 4, 4, false);
//! let b = solver.new_interval(0, 10, 2, 2, true);
//!
//! let usage = CumulFunction::pulse_fixed(&mut solver, a, 3)
//!     + CumulFunction::pulse_fixed(&mut solver, b, 2);
//!
//! assert_eq!(2, usage.flatten(true).len());
//! ```
mod point_height;

use std::ops::Add;
use std::ops::Neg;
use std::ops::Sub;

pub use point_height::PointHeight;

use crate::basic_types::ArgumentError;
use crate::basic_types::ConstraintOperationError;
use crate::engine::variables::AffineView;
use crate::engine::variables::DomainId;
use crate::engine::variables::IntervalVariable;
use crate::engine::variables::TransformableVariable;
use crate::propagators::Activity;
use crate::propagators::SynchronisedPoint;
use crate::Solver;

/// The activities produced by flattening a [`CumulFunction`].
pub type CumulActivity = Activity<AffineView<DomainId>>;

#[derive(Debug, Clone)]
pub struct CumulFunction {
    expression: Expression,
}

#[derive(Debug, Clone)]
enum Expression {
    Flat,
    Pulse {
        interval: IntervalVariable,
        height: DomainId,
    },
    Step {
        source: IntervalVariable,
        point: SynchronisedPoint,
        /// Starts at the step of `source` and executes until the horizon.
        dummy: IntervalVariable,
        height: DomainId,
    },
    Plus(Box<Expression>, Box<Expression>),
    Minus(Box<Expression>, Box<Expression>),
    Sum(Vec<Expression>),
}

impl CumulFunction {
    /// The function which is zero everywhere.
    pub fn flat() -> Self {
        CumulFunction {
            expression: Expression::Flat,
        }
    }

    /// The function which is `height` while `interval` executes.
    pub fn pulse(interval: IntervalVariable, height: DomainId) -> Self {
        CumulFunction {
            expression: Expression::Pulse { interval, height },
        }
    }

    /// A pulse with a height in `[height_min, height_max]`; the height variable is created in the
    /// solver.
    pub fn pulse_with_bounds(
        solver: &mut Solver,
        interval: IntervalVariable,
        height_min: i32,
        height_max: i32,
    ) -> Self {
        let height = solver.new_bounded_integer(height_min, height_max);
        CumulFunction::pulse(interval, height)
    }

    pub fn pulse_fixed(solver: &mut Solver, interval: IntervalVariable, height: i32) -> Self {
        CumulFunction::pulse_with_bounds(solver, interval, height, height)
    }

    /// The function which becomes `height` at the start of `interval`.
    ///
    /// The step is modelled by an interval which starts together with `interval` and executes
    /// until [`HORIZON`](crate::HORIZON); creating it posts the propagator which keeps the two
    /// synchronised.
    pub fn step_at_start(
        solver: &mut Solver,
        interval: IntervalVariable,
        height: DomainId,
    ) -> Result<Self, ConstraintOperationError> {
        CumulFunction::step(solver, interval, SynchronisedPoint::Start, height)
    }

    /// The function which becomes `height` at the end of `interval`.
    pub fn step_at_end(
        solver: &mut Solver,
        interval: IntervalVariable,
        height: DomainId,
    ) -> Result<Self, ConstraintOperationError> {
        CumulFunction::step(solver, interval, SynchronisedPoint::End, height)
    }

    fn step(
        solver: &mut Solver,
        source: IntervalVariable,
        point: SynchronisedPoint,
        height: DomainId,
    ) -> Result<Self, ConstraintOperationError> {
        let dummy = solver.new_synchronised_interval(source, point)?;

        Ok(CumulFunction {
            expression: Expression::Step {
                source,
                point,
                dummy,
                height,
            },
        })
    }

    pub fn plus(self, other: CumulFunction) -> Self {
        CumulFunction {
            expression: Expression::Plus(Box::new(self.expression), Box::new(other.expression)),
        }
    }

    pub fn minus(self, other: CumulFunction) -> Self {
        CumulFunction {
            expression: Expression::Minus(Box::new(self.expression), Box::new(other.expression)),
        }
    }

    pub fn sum(functions: impl IntoIterator<Item = CumulFunction>) -> Self {
        CumulFunction {
            expression: Expression::Sum(
                functions
                    .into_iter()
                    .map(|function| function.expression)
                    .collect(),
            ),
        }
    }

    /// The elementary activities of the function, with their heights negated if `positive` is
    /// false.
    pub fn flatten(&self, positive: bool) -> Vec<CumulActivity> {
        let mut activities = Vec::new();
        self.expression.flatten(positive, &mut activities);
        activities
    }

    /// The contribution of the function at the start of `interval`.
    ///
    /// Fails if `interval` does not occur in the function.
    pub fn height_at_start(
        &self,
        interval: IntervalVariable,
    ) -> Result<PointHeight, ArgumentError> {
        self.height_at(interval, SynchronisedPoint::Start)
    }

    /// The contribution of the function at the end of `interval`.
    ///
    /// Fails if `interval` does not occur in the function.
    pub fn height_at_end(&self, interval: IntervalVariable) -> Result<PointHeight, ArgumentError> {
        self.height_at(interval, SynchronisedPoint::End)
    }

    fn height_at(
        &self,
        interval: IntervalVariable,
        at: SynchronisedPoint,
    ) -> Result<PointHeight, ArgumentError> {
        if !self.expression.has_in_scope(interval) {
            return Err(ArgumentError::IntervalNotInScope);
        }

        let mut height = PointHeight::default();
        self.expression.height_at(interval, at, true, &mut height);
        Ok(height)
    }
}

impl Expression {
    fn flatten(&self, positive: bool, activities: &mut Vec<CumulActivity>) {
        match self {
            Expression::Flat => {}
            Expression::Pulse { interval, height } => {
                activities.push(Activity::new(*interval, signed(*height, positive)))
            }
            Expression::Step { dummy, height, .. } => {
                activities.push(Activity::new(*dummy, signed(*height, positive)))
            }
            Expression::Plus(left, right) => {
                left.flatten(positive, activities);
                right.flatten(positive, activities);
            }
            Expression::Minus(left, right) => {
                left.flatten(positive, activities);
                right.flatten(!positive, activities);
            }
            Expression::Sum(children) => children
                .iter()
                .for_each(|child| child.flatten(positive, activities)),
        }
    }

    fn has_in_scope(&self, interval: IntervalVariable) -> bool {
        match self {
            Expression::Flat => false,
            Expression::Pulse { interval: own, .. } => *own == interval,
            Expression::Step { source, .. } => *source == interval,
            Expression::Plus(left, right) | Expression::Minus(left, right) => {
                left.has_in_scope(interval) || right.has_in_scope(interval)
            }
            Expression::Sum(children) => children.iter().any(|child| child.has_in_scope(interval)),
        }
    }

    fn height_at(
        &self,
        interval: IntervalVariable,
        at: SynchronisedPoint,
        positive: bool,
        height: &mut PointHeight,
    ) {
        match self {
            Expression::Flat => {}
            Expression::Pulse {
                interval: own,
                height: amount,
            } => {
                if *own == interval {
                    height.push(signed(*amount, positive), interval);
                }
            }
            Expression::Step {
                source,
                point,
                height: amount,
                ..
            } => {
                // A step at the end has not happened yet at the start.
                let has_happened =
                    *point == SynchronisedPoint::Start || at == SynchronisedPoint::End;
                if *source == interval && has_happened {
                    height.push(signed(*amount, positive), interval);
                }
            }
            Expression::Plus(left, right) => {
                left.height_at(interval, at, positive, height);
                right.height_at(interval, at, positive, height);
            }
            Expression::Minus(left, right) => {
                left.height_at(interval, at, positive, height);
                right.height_at(interval, at, !positive, height);
            }
            Expression::Sum(children) => children
                .iter()
                .for_each(|child| child.height_at(interval, at, positive, height)),
        }
    }
}

fn signed(height: DomainId, positive: bool) -> AffineView<DomainId> {
    height.scaled(if positive { 1 } else { -1 })
}

impl Add for CumulFunction {
    type Output = CumulFunction;

    fn add(self, rhs: CumulFunction) -> Self::Output {
        self.plus(rhs)
    }
}

impl Sub for CumulFunction {
    type Output = CumulFunction;

    fn sub(self, rhs: CumulFunction) -> Self::Output {
        self.minus(rhs)
    }
}

impl Neg for CumulFunction {
    type Output = CumulFunction;

    fn neg(self) -> Self::Output {
        CumulFunction::flat().minus(self)
    }
}
