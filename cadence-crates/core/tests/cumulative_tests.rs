mod helpers;

use cadence_core::checking::check_fixed;
use cadence_core::checking::FixedActivity;
use cadence_core::constraints;
use cadence_core::constraints::Activity;
use cadence_core::constraints::Constraint;
use cadence_core::cumul_function::CumulFunction;
use cadence_core::options::GeneralizedCumulativeOptions;
use cadence_core::variables::DomainId;
use cadence_core::variables::IntervalVariable;
use cadence_core::variables::Presence;
use cadence_core::ConstraintOperationError;
use cadence_core::Solver;
use helpers::fixed_activities;
use helpers::for_each_combination;
use helpers::init_logging;
use helpers::num_combinations;
use helpers::try_placements;
use helpers::Placement;
use rand::rngs::SmallRng;
use rand::Rng;
use rand::SeedableRng;

fn fixed_activity(solver: &mut Solver, start: i32, end: i32, height: i32) -> Activity<DomainId> {
    let interval = solver.new_fixed_interval(start, end - start);
    let height = solver.new_bounded_integer(height, height);
    Activity::new(interval, height)
}

#[test]
fn overloaded_fixed_parts_fail_when_posting() {
    init_logging();
    let mut solver = Solver::default();
    let activities = [(0, 4, 2), (1, 5, 2), (2, 6, 1), (3, 7, 1)]
        .into_iter()
        .map(|(start, end, height)| fixed_activity(&mut solver, start, end, height))
        .collect::<Vec<_>>();

    let result = constraints::generalized_cumulative(activities, None, Some(3)).post(&mut solver);

    assert_eq!(Err(ConstraintOperationError::InfeasiblePropagator), result);
    assert!(solver.is_infeasible());
}

#[test]
fn fixed_schedules_agree_with_the_checker() {
    init_logging();
    let schedules: [&[(i32, i32, i32)]; 3] = [
        &[(0, 3, 2), (3, 5, 3), (4, 8, -1)],
        &[(0, 3, 2), (2, 5, 2)],
        &[(0, 2, 1), (5, 6, 1), (5, 7, 1)],
    ];

    for schedule in schedules {
        let expected = check_fixed(
            &schedule
                .iter()
                .map(|&(start, end, height)| FixedActivity {
                    start: i64::from(start),
                    end: i64::from(end),
                    height: i64::from(height),
                })
                .collect::<Vec<_>>(),
            1,
            3,
        );

        let mut solver = Solver::default();
        let activities = schedule
            .iter()
            .map(|&(start, end, height)| fixed_activity(&mut solver, start, end, height))
            .collect::<Vec<_>>();
        let bounds = activities
            .iter()
            .map(|activity| {
                (
                    solver.start_min(activity.interval()),
                    solver.end_max(activity.interval()),
                )
            })
            .collect::<Vec<_>>();

        let result = constraints::generalized_cumulative(activities.clone(), Some(1), Some(3))
            .with_checker()
            .post(&mut solver);

        assert_eq!(expected, result.is_ok(), "disagreement on {schedule:?}");
        for (activity, bound) in activities.iter().zip(bounds) {
            assert_eq!(
                bound,
                (
                    solver.start_min(activity.interval()),
                    solver.end_max(activity.interval())
                )
            );
        }
    }
}

#[test]
fn the_level_of_a_reservoir_stays_non_negative() {
    init_logging();
    let mut solver = Solver::default();
    let produce = solver.new_fixed_interval(0, 3);
    let consume = solver.new_interval(0, 10, 1, 1, false);
    let amount = solver.new_bounded_integer(2, 2);

    let level = CumulFunction::step_at_end(&mut solver, produce, amount).expect("no conflict")
        - CumulFunction::step_at_start(&mut solver, consume, amount).expect("no conflict");

    constraints::ge(level, 0)
        .post(&mut solver)
        .expect("the consumer can wait for the producer");

    assert_eq!(3, solver.start_min(consume));
}

#[test]
fn minimum_level_forces_optional_activities_in() {
    init_logging();
    let mut solver = Solver::default();
    let base = solver.new_fixed_interval(2, 4);
    let extra = solver.new_interval(2, 2, 4, 4, true);

    let level = CumulFunction::pulse_fixed(&mut solver, base, 1)
        + CumulFunction::pulse_fixed(&mut solver, extra, 1);

    constraints::always_in_range(level.clone(), 2, 6, 1, 2)
        .post(&mut solver)
        .expect("feasible without the extra activity");
    assert_eq!(Presence::Optional, solver.presence(extra));

    constraints::always_in_range(level, 2, 6, 2, 2)
        .post(&mut solver)
        .expect("feasible with the extra activity");
    assert_eq!(Presence::Present, solver.presence(extra));
}

#[test]
fn disabling_mandatory_detection_keeps_optional_activities_open() {
    init_logging();
    let mut solver = Solver::default();
    let base = solver.new_fixed_interval(0, 4);
    let extra = solver.new_interval(0, 0, 4, 4, true);

    let level = CumulFunction::pulse_fixed(&mut solver, base, 1)
        + CumulFunction::pulse_fixed(&mut solver, extra, 1);

    constraints::ge(level, 2)
        .with_options(GeneralizedCumulativeOptions::new(false, true))
        .post(&mut solver)
        .expect("the extra activity is not yet excluded");

    assert_eq!(Presence::Optional, solver.presence(extra));
    assert!(solver.set_absent(extra).is_err());
}

#[test]
fn backtracking_restores_the_profile() {
    init_logging();
    let mut solver = Solver::default();
    let a = solver.new_interval(0, 10, 4, 4, false);
    let b = solver.new_interval(0, 10, 4, 4, false);

    let level = CumulFunction::pulse_fixed(&mut solver, a, 2)
        + CumulFunction::pulse_fixed(&mut solver, b, 2);
    constraints::le(level, 3).post(&mut solver).expect("feasible");

    solver.new_checkpoint();
    solver.set_start_max(a, 1).expect("b can follow a");
    assert_eq!(4, solver.start_min(b));

    solver.new_checkpoint();
    solver.set_start_max(b, 5).expect("b can start at 4");
    assert!(solver.set_start_min(a, 2).is_err());

    solver.synchronise(1);
    assert_eq!(4, solver.start_min(b));
    assert_eq!(10, solver.start_max(b));

    solver.synchronise(0);
    assert_eq!(0, solver.start_min(b));
    assert!(!solver.is_infeasible());
}

#[test]
fn compensating_fixed_activity_before_the_open_ones_is_kept() {
    init_logging();
    let mut solver = Solver::default();
    let a = fixed_activity(&mut solver, 0, 2, -1);
    let b = fixed_activity(&mut solver, 0, 1, 2);
    let c = solver.new_interval(1, 1, 1, 3, false);
    let height = solver.new_bounded_integer(2, 2);

    constraints::generalized_cumulative(
        [a, b, Activity::new(c, height)],
        Some(0),
        Some(2),
    )
    .post(&mut solver)
    .expect("feasible");

    solver.new_checkpoint();
    solver
        .set_length_max(c, 1)
        .expect("the level is 1 everywhere once c is fixed");
    assert_eq!(2, solver.end_max(c));
}

/// The bounds of one activity of a random instance.
#[derive(Debug, Clone, Copy)]
struct ActivityDomain {
    start_min: i32,
    length_min: i32,
    length_max: i32,
}

struct Instance {
    intervals: Vec<IntervalVariable>,
    heights: Vec<DomainId>,
    domains: Vec<ActivityDomain>,
    choices: Vec<Vec<Placement>>,
    min_capacity: Option<i64>,
    max_capacity: Option<i64>,
}

fn random_instance(solver: &mut Solver, rng: &mut SmallRng) -> Instance {
    let num_activities = rng.gen_range(2..=4);

    let mut instance = Instance {
        intervals: vec![],
        heights: vec![],
        domains: vec![],
        choices: vec![],
        min_capacity: rng.gen_bool(0.5).then(|| rng.gen_range(-1..=1)),
        max_capacity: Some(rng.gen_range(1..=3)),
    };

    for _ in 0..num_activities {
        let start_min = rng.gen_range(0..3);
        let start_max = start_min + rng.gen_range(0..3);
        let length_min = rng.gen_range(1..=2);
        let length_max = length_min + rng.gen_range(0..=1);
        let height_min = rng.gen_range(-2..=2);
        let height_max = height_min + rng.gen_range(0..=1);
        let optional = rng.gen_bool(0.4);

        instance.intervals.push(solver.new_interval(
            start_min, start_max, length_min, length_max, optional,
        ));
        instance
            .heights
            .push(solver.new_bounded_integer(height_min, height_max));
        instance.domains.push(ActivityDomain {
            start_min,
            length_min,
            length_max,
        });

        let mut placements = Vec::new();
        for start in start_min..=start_max {
            for length in length_min..=length_max {
                for height in height_min..=height_max {
                    placements.push(Placement {
                        start,
                        length,
                        height,
                        is_present: true,
                    });
                }
            }
        }
        if optional {
            placements.push(Placement {
                start: start_min,
                length: length_min,
                height: height_min,
                is_present: false,
            });
        }
        instance.choices.push(placements);
    }

    instance
}

/// Checks that exactly the feasible combinations of `choices` are accepted by the solver.
fn assert_agreement(solver: &mut Solver, instance: &Instance, choices: &[Vec<Placement>]) {
    let min_capacity = instance.min_capacity.unwrap_or(i64::MIN);
    let max_capacity = instance.max_capacity.unwrap_or(i64::MAX);

    for_each_combination(choices, &mut |placements| {
        let is_feasible = check_fixed(&fixed_activities(placements), min_capacity, max_capacity);
        let is_accepted =
            try_placements(solver, &instance.intervals, &instance.heights, placements);
        assert_eq!(
            is_feasible,
            is_accepted,
            "disagreement on {placements:?} with capacity [{:?}, {:?}] at checkpoint {}",
            instance.min_capacity,
            instance.max_capacity,
            solver.get_checkpoint(),
        );
    });
}

fn has_feasible_combination(instance: &Instance, choices: &[Vec<Placement>]) -> bool {
    let min_capacity = instance.min_capacity.unwrap_or(i64::MIN);
    let max_capacity = instance.max_capacity.unwrap_or(i64::MAX);

    let mut is_found = false;
    for_each_combination(choices, &mut |placements| {
        is_found |= check_fixed(&fixed_activities(placements), min_capacity, max_capacity);
    });
    is_found
}

#[test]
fn propagation_agrees_with_the_checker_on_random_instances() {
    init_logging();
    let mut rng = SmallRng::seed_from_u64(7);

    let mut num_instances = 0;
    while num_instances < 150 {
        let mut solver = Solver::default();
        let instance = random_instance(&mut solver, &mut rng);
        if num_combinations(&instance.choices) > 1000 {
            continue;
        }
        num_instances += 1;

        let activities = instance
            .intervals
            .iter()
            .zip(&instance.heights)
            .map(|(&interval, &height)| Activity::new(interval, height))
            .collect::<Vec<_>>();

        let posted = constraints::generalized_cumulative(
            activities,
            instance.min_capacity,
            instance.max_capacity,
        )
        .post(&mut solver);
        if posted.is_err() {
            assert!(
                !has_feasible_combination(&instance, &instance.choices),
                "a feasible instance was rejected"
            );
            continue;
        }

        assert_agreement(&mut solver, &instance, &instance.choices);

        // Tighten one activity, and check the propagation which follows on the remaining
        // combinations.
        let index = rng.gen_range(0..instance.intervals.len());
        let interval = instance.intervals[index];
        let domain = instance.domains[index];

        solver.new_checkpoint();
        let fixes_length = domain.length_min < domain.length_max;
        let tightened = if fixes_length {
            solver.set_length_max(interval, domain.length_min)
        } else {
            solver.set_start_max(interval, domain.start_min)
        };

        let mut choices = instance.choices.clone();
        choices[index].retain(|placement| {
            !placement.is_present
                || (fixes_length && placement.length == domain.length_min)
                || (!fixes_length && placement.start == domain.start_min)
        });

        if tightened.is_err() {
            assert!(
                !has_feasible_combination(&instance, &choices),
                "a feasible tightening was rejected"
            );
        } else {
            assert_agreement(&mut solver, &instance, &choices);
        }

        solver.synchronise(0);
        assert!(!solver.is_infeasible());
    }
}
