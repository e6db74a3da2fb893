mod helpers;

use cadence_core::constraints;
use cadence_core::constraints::Constraint;
use cadence_core::options::NoOverlapOptions;
use cadence_core::options::NoOverlapPropagationMethod;
use cadence_core::variables::IntervalVariable;
use cadence_core::variables::Presence;
use cadence_core::ConstraintOperationError;
use cadence_core::Solver;
use helpers::for_each_combination;
use helpers::init_logging;
use helpers::try_placements;
use helpers::Placement;
use rand::rngs::SmallRng;
use rand::Rng;
use rand::SeedableRng;

#[test]
fn fixed_interval_pushes_the_other_one() {
    init_logging();
    let mut solver = Solver::default();
    let x = solver.new_fixed_interval(0, 5);
    let y = solver.new_interval(0, 10, 5, 5, false);

    constraints::no_overlap([x, y])
        .post(&mut solver)
        .expect("y can start at 5");

    assert_eq!(5, solver.start_min(y));
    assert_eq!(10, solver.start_max(y));
}

#[test]
fn detectable_precedences_need_the_global_propagator() {
    init_logging();

    let start_min_of_last = |method| {
        let mut solver = Solver::default();
        let a = solver.new_interval(0, 2, 2, 2, false);
        let b = solver.new_interval(0, 2, 2, 2, false);
        let c = solver.new_interval(3, 10, 2, 2, false);

        constraints::no_overlap_with_options([a, b, c], NoOverlapOptions::new(method))
            .post(&mut solver)
            .expect("c can start at 4");

        solver.start_min(c)
    };

    assert_eq!(3, start_min_of_last(NoOverlapPropagationMethod::Decomposition));
    assert_eq!(
        4,
        start_min_of_last(NoOverlapPropagationMethod::DecompositionWithGlobal)
    );
}

#[test]
fn optional_interval_without_room_becomes_absent() {
    init_logging();
    let mut solver = Solver::default();
    let a = solver.new_fixed_interval(0, 10);
    let b = solver.new_interval(2, 6, 3, 3, true);

    constraints::no_overlap([a, b])
        .post(&mut solver)
        .expect("b can be left out");

    assert_eq!(Presence::Absent, solver.presence(b));
}

#[test]
fn decisions_are_undone_when_backtracking() {
    init_logging();
    let mut solver = Solver::default();
    let a = solver.new_interval(0, 10, 4, 4, false);
    let b = solver.new_interval(0, 10, 4, 4, false);

    constraints::no_overlap([a, b])
        .post(&mut solver)
        .expect("feasible");

    solver.new_checkpoint();
    solver.set_start_max(a, 2).expect("b can follow a");
    assert_eq!(4, solver.start_min(b));

    solver.new_checkpoint();
    assert!(solver.set_start_max(b, 3).is_err());

    solver.synchronise(1);
    assert_eq!(4, solver.start_min(b));

    solver.synchronise(0);
    assert_eq!(0, solver.start_min(b));
    assert_eq!(10, solver.start_max(a));
    assert!(!solver.is_infeasible());
}

#[test]
fn posting_an_overloaded_resource_fails() {
    init_logging();
    let mut solver = Solver::default();
    let intervals = (0..3)
        .map(|_| solver.new_interval(0, 3, 2, 2, false))
        .collect::<Vec<_>>();

    assert_eq!(
        Err(ConstraintOperationError::InfeasiblePropagator),
        constraints::no_overlap(intervals).post(&mut solver)
    );
    assert!(solver.is_infeasible());
}

fn overlaps(placements: &[Placement]) -> bool {
    (0..placements.len()).any(|i| {
        (i + 1..placements.len()).any(|j| {
            let (a, b) = (placements[i], placements[j]);
            a.is_present
                && b.is_present
                && a.start < b.start + b.length
                && b.start < a.start + a.length
        })
    })
}

#[test]
fn propagation_agrees_with_enumeration() {
    init_logging();
    let mut rng = SmallRng::seed_from_u64(42);

    for _ in 0..40 {
        let mut solver = Solver::default();
        let num_intervals = rng.gen_range(2..=4);

        let mut intervals: Vec<IntervalVariable> = Vec::new();
        let mut choices = Vec::new();
        for _ in 0..num_intervals {
            let start_min = rng.gen_range(0..4);
            let start_max = start_min + rng.gen_range(0..4);
            let length = rng.gen_range(1..=3);
            let optional = rng.gen_bool(0.3);

            intervals.push(solver.new_interval(start_min, start_max, length, length, optional));

            let mut placements = (start_min..=start_max)
                .map(|start| Placement {
                    start,
                    length,
                    height: 0,
                    is_present: true,
                })
                .collect::<Vec<_>>();
            if optional {
                placements.push(Placement {
                    start: start_min,
                    length,
                    height: 0,
                    is_present: false,
                });
            }
            choices.push(placements);
        }

        let mut num_feasible = 0;
        for_each_combination(&choices, &mut |placements| {
            if !overlaps(placements) {
                num_feasible += 1;
            }
        });

        if constraints::no_overlap(intervals.clone())
            .post(&mut solver)
            .is_err()
        {
            assert_eq!(0, num_feasible, "a feasible instance was rejected");
            continue;
        }

        for_each_combination(&choices, &mut |placements| {
            let is_feasible = !overlaps(placements);
            let is_accepted = try_placements(&mut solver, &intervals, &[], placements);
            assert_eq!(is_feasible, is_accepted, "disagreement on {placements:?}");
        });
    }
}
