use log::debug;

use super::Constraint;
use crate::basic_types::ArgumentError;
use crate::cumul_function::CumulFunction;
use crate::engine::variables::AffineView;
use crate::engine::variables::IntegerVariable;
use crate::engine::variables::IntervalVariable;
use crate::propagators::GeneralizedCumulativeChecker;
use crate::propagators::GeneralizedCumulativeConstructor;
use crate::propagators::GeneralizedCumulativeOptions;
use crate::propagators::UNBOUNDED_MAX_CAPACITY;
use crate::propagators::UNBOUNDED_MIN_CAPACITY;
use crate::ConstraintOperationError;
use crate::Solver;

pub use crate::propagators::Activity;

/// Creates the generalized cumulative [`Constraint`].
///
/// At every point in time at which at least one present activity executes, the sum of the heights
/// of the executing activities should lie within `[min_capacity, max_capacity]`; a bound of
/// [`None`] leaves that side unconstrained. Heights may be negative and activities may be
/// optional. Points in time at which no present activity executes are not constrained.
///
/// The filtering is based on time-table reasoning: the profile of certain and possible
/// contributions is used to tighten the start and end times of the activities, to force optional
/// activities to be present when the minimum capacity can otherwise not be reached, and to tighten
/// heights and maximum lengths. See [`generalized_cumulative_with_options`] to configure it.
///
/// Posting fails with [`ArgumentError::InvalidCapacityBounds`] if `min_capacity > max_capacity`,
/// and with [`ArgumentError::NegativeCapacity`] if `max_capacity` is negative.
///
/// # Example
/// ```
/// # use cadence_core::constraints;
/// # use cadence_core::constraints::Activity;
/// # use cadence_core::constraints::Constraint;
/// # use cadence_core::Solver;
/// let mut solver = Solver::default();
///
/// let a = solver.new_fixed_interval(0, 4);
/// let b = solver.new_interval(0, 10, 2, 2, false);
/// let height = solver.new_bounded_integer(2, 2);
///
/// constraints::generalized_cumulative(
///     [Activity::new(a, height), Activity::new(b, height)],
///     None,
///     Some(3),
/// )
/// .post(&mut solver)
/// .expect("b can start after a");
///
/// assert_eq!(4, solver.start_min(b));
/// ```
pub fn generalized_cumulative<Var: IntegerVariable>(
    activities: impl IntoIterator<Item = Activity<Var>>,
    min_capacity: Option<i64>,
    max_capacity: Option<i64>,
) -> GeneralizedCumulative<Var> {
    generalized_cumulative_with_options(
        activities,
        min_capacity,
        max_capacity,
        GeneralizedCumulativeOptions::default(),
    )
}

/// Creates the generalized cumulative [`Constraint`] with the provided
/// [`GeneralizedCumulativeOptions`].
pub fn generalized_cumulative_with_options<Var: IntegerVariable>(
    activities: impl IntoIterator<Item = Activity<Var>>,
    min_capacity: Option<i64>,
    max_capacity: Option<i64>,
    options: GeneralizedCumulativeOptions,
) -> GeneralizedCumulative<Var> {
    GeneralizedCumulative {
        activities: activities.into_iter().collect(),
        min_capacity,
        max_capacity,
        options,
        with_checker: false,
    }
}

#[derive(Debug, Clone)]
pub struct GeneralizedCumulative<Var> {
    activities: Vec<Activity<Var>>,
    min_capacity: Option<i64>,
    max_capacity: Option<i64>,
    options: GeneralizedCumulativeOptions,
    with_checker: bool,
}

impl<Var: IntegerVariable> GeneralizedCumulative<Var> {
    /// Additionally posts a propagator which validates the relation by brute force once every
    /// activity is fixed.
    ///
    /// The validation visits every time point covered by the activities, so it is only suited
    /// for activities over a short range.
    pub fn with_checker(mut self) -> Self {
        self.with_checker = true;
        self
    }
}

impl<Var: IntegerVariable> Constraint for GeneralizedCumulative<Var> {
    fn post(self, solver: &mut Solver) -> Result<(), ConstraintOperationError> {
        let (min_capacity, max_capacity) = capacity_bounds(self.min_capacity, self.max_capacity)?;

        if self.with_checker {
            let _ = solver.add_propagator(GeneralizedCumulativeChecker::new(
                self.activities.clone(),
                min_capacity,
                max_capacity,
            ))?;
        }

        let _ = solver.add_propagator(GeneralizedCumulativeConstructor::new(
            self.activities,
            min_capacity,
            max_capacity,
            self.options,
        ))?;

        Ok(())
    }
}

fn capacity_bounds(
    min_capacity: Option<i64>,
    max_capacity: Option<i64>,
) -> Result<(i64, i64), ArgumentError> {
    if let (Some(min), Some(max)) = (min_capacity, max_capacity) {
        if min > max {
            return Err(ArgumentError::InvalidCapacityBounds { min, max });
        }
    }

    if let Some(max) = max_capacity.filter(|&max| max < 0) {
        return Err(ArgumentError::NegativeCapacity(max));
    }

    Ok((
        min_capacity.map_or(UNBOUNDED_MIN_CAPACITY, |min| min.max(UNBOUNDED_MIN_CAPACITY)),
        max_capacity.map_or(UNBOUNDED_MAX_CAPACITY, |max| max.min(UNBOUNDED_MAX_CAPACITY)),
    ))
}

/// `function <= max_capacity` wherever one of its present activities executes.
pub fn le(function: CumulFunction, max_capacity: i64) -> CumulFunctionConstraint {
    CumulFunctionConstraint::new(function, None, None, Some(max_capacity))
}

/// `function >= min_capacity` wherever one of its present activities executes.
pub fn ge(function: CumulFunction, min_capacity: i64) -> CumulFunctionConstraint {
    CumulFunctionConstraint::new(function, None, Some(min_capacity), None)
}

/// `min_capacity <= function <= max_capacity` while `interval` executes.
///
/// The window is an activity of height zero over `interval`, so the bounds also apply wherever a
/// present activity of the function executes, and nothing is enforced while `interval` is
/// absent.
pub fn always_in(
    function: CumulFunction,
    interval: IntervalVariable,
    min_capacity: i64,
    max_capacity: i64,
) -> CumulFunctionConstraint {
    CumulFunctionConstraint::new(
        function,
        Some(Window::Interval(interval)),
        Some(min_capacity),
        Some(max_capacity),
    )
}

/// `min_capacity <= function <= max_capacity` during `[from, to)`.
///
/// As for [`always_in`], the bounds also apply wherever a present activity of the function
/// executes. Posting fails with [`ArgumentError::EmptyWindow`] if `from >= to`.
pub fn always_in_range(
    function: CumulFunction,
    from: i32,
    to: i32,
    min_capacity: i64,
    max_capacity: i64,
) -> CumulFunctionConstraint {
    CumulFunctionConstraint::new(
        function,
        Some(Window::Range { from, to }),
        Some(min_capacity),
        Some(max_capacity),
    )
}

/// A bound on the level of a [`CumulFunction`], enforced by the generalized cumulative
/// propagator over its flattened activities.
#[derive(Debug, Clone)]
pub struct CumulFunctionConstraint {
    function: CumulFunction,
    window: Option<Window>,
    min_capacity: Option<i64>,
    max_capacity: Option<i64>,
    options: GeneralizedCumulativeOptions,
}

#[derive(Debug, Clone, Copy)]
enum Window {
    Interval(IntervalVariable),
    Range { from: i32, to: i32 },
}

impl CumulFunctionConstraint {
    fn new(
        function: CumulFunction,
        window: Option<Window>,
        min_capacity: Option<i64>,
        max_capacity: Option<i64>,
    ) -> Self {
        CumulFunctionConstraint {
            function,
            window,
            min_capacity,
            max_capacity,
            options: GeneralizedCumulativeOptions::default(),
        }
    }

    pub fn with_options(mut self, options: GeneralizedCumulativeOptions) -> Self {
        self.options = options;
        self
    }
}

impl Constraint for CumulFunctionConstraint {
    fn post(self, solver: &mut Solver) -> Result<(), ConstraintOperationError> {
        let mut activities = self.function.flatten(true);

        if let Some(window) = self.window {
            let interval = match window {
                Window::Interval(interval) => interval,
                Window::Range { from, to } => {
                    if from >= to {
                        return Err(ArgumentError::EmptyWindow { from, to }.into());
                    }
                    solver.new_fixed_interval(from, to - from)
                }
            };

            let zero = solver.new_bounded_integer(0, 0);
            activities.push(Activity::new(interval, AffineView::from(zero)));
        }

        if activities.is_empty() {
            debug!("The cumulative function has no activities; nothing is posted");
            return Ok(());
        }

        generalized_cumulative_with_options(
            activities,
            self.min_capacity,
            self.max_capacity,
            self.options,
        )
        .post(solver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variables::Presence;

    #[test]
    fn inverted_capacity_bounds_are_rejected() {
        let mut solver = Solver::default();
        let interval = solver.new_fixed_interval(0, 2);
        let height = solver.new_bounded_integer(1, 1);

        let result = generalized_cumulative([Activity::new(interval, height)], Some(3), Some(2))
            .post(&mut solver);

        assert_eq!(
            Err(ConstraintOperationError::InvalidArgument(
                ArgumentError::InvalidCapacityBounds { min: 3, max: 2 }
            )),
            result
        );
        assert!(!solver.is_infeasible());
    }

    #[test]
    fn negative_capacity_is_rejected() {
        let mut solver = Solver::default();
        let interval = solver.new_fixed_interval(0, 2);
        let height = solver.new_bounded_integer(1, 1);

        let result = generalized_cumulative([Activity::new(interval, height)], None, Some(-1))
            .post(&mut solver);

        assert_eq!(
            Err(ConstraintOperationError::InvalidArgument(
                ArgumentError::NegativeCapacity(-1)
            )),
            result
        );
    }

    #[test]
    fn le_pushes_an_activity_past_the_overload() {
        let mut solver = Solver::default();
        let a = solver.new_fixed_interval(0, 4);
        let b = solver.new_interval(0, 10, 3, 3, false);

        let function = CumulFunction::pulse_fixed(&mut solver, a, 2)
            + CumulFunction::pulse_fixed(&mut solver, b, 2);
        le(function, 3).post(&mut solver).expect("feasible");

        assert_eq!(4, solver.start_min(b));
    }

    #[test]
    fn ge_forces_an_optional_activity_to_be_present() {
        let mut solver = Solver::default();
        let a = solver.new_fixed_interval(0, 4);
        let b = solver.new_interval(0, 0, 4, 4, true);

        let function = CumulFunction::pulse_fixed(&mut solver, a, 1)
            + CumulFunction::pulse_fixed(&mut solver, b, 1);
        ge(function, 2).post(&mut solver).expect("b can fill the gap");

        assert_eq!(Presence::Present, solver.presence(b));
    }

    #[test]
    fn always_in_range_requires_the_window_to_be_covered() {
        let mut solver = Solver::default();
        let a = solver.new_interval(0, 10, 3, 3, false);

        let function = CumulFunction::pulse_fixed(&mut solver, a, 1);
        always_in_range(function, 4, 6, 1, 1)
            .post(&mut solver)
            .expect("a can cover the window");

        // `a` has to cover [4, 6) entirely.
        assert_eq!(3, solver.start_min(a));
        assert_eq!(4, solver.start_max(a));
    }

    #[test]
    fn empty_window_is_rejected() {
        let mut solver = Solver::default();
        let a = solver.new_interval(0, 10, 3, 3, false);

        let function = CumulFunction::pulse_fixed(&mut solver, a, 1);
        let result = always_in_range(function, 6, 6, 0, 1).post(&mut solver);

        assert_eq!(
            Err(ConstraintOperationError::InvalidArgument(
                ArgumentError::EmptyWindow { from: 6, to: 6 }
            )),
            result
        );
    }
}
