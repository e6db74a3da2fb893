#![allow(dead_code, reason = "not every test binary uses every helper")]

use cadence_core::checking::FixedActivity;
use cadence_core::variables::DomainId;
use cadence_core::variables::IntervalVariable;
use cadence_core::Solver;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// The placement of one interval in a candidate solution.
#[derive(Debug, Clone, Copy)]
pub struct Placement {
    pub start: i32,
    pub length: i32,
    pub height: i32,
    pub is_present: bool,
}

/// Makes the decisions which fix every interval to its placement; returns whether all of them
/// propagated without a conflict.
///
/// A checkpoint is created before the first decision and undone afterwards, which restores the
/// solver to the checkpoint it was at.
pub fn try_placements(
    solver: &mut Solver,
    intervals: &[IntervalVariable],
    heights: &[DomainId],
    placements: &[Placement],
) -> bool {
    let checkpoint = solver.get_checkpoint();
    solver.new_checkpoint();

    let is_consistent = intervals
        .iter()
        .zip(placements)
        .enumerate()
        .all(|(index, (&interval, placement))| {
            if !placement.is_present {
                return solver.set_absent(interval).is_ok();
            }

            solver.set_present(interval).is_ok()
                && solver.set_start_min(interval, placement.start).is_ok()
                && solver.set_start_max(interval, placement.start).is_ok()
                && solver.set_length_min(interval, placement.length).is_ok()
                && solver.set_length_max(interval, placement.length).is_ok()
                && heights.get(index).map_or(true, |height| {
                    solver.set_lower_bound(height, placement.height).is_ok()
                        && solver.set_upper_bound(height, placement.height).is_ok()
                })
        });

    solver.synchronise(checkpoint);
    is_consistent
}

/// The present activities of a candidate solution.
pub fn fixed_activities(placements: &[Placement]) -> Vec<FixedActivity> {
    placements
        .iter()
        .filter(|placement| placement.is_present)
        .map(|placement| FixedActivity {
            start: i64::from(placement.start),
            end: i64::from(placement.start + placement.length),
            height: i64::from(placement.height),
        })
        .collect()
}

/// The number of combinations [`for_each_combination`] visits.
pub fn num_combinations(choices: &[Vec<Placement>]) -> usize {
    choices.iter().map(Vec::len).product()
}

/// Calls `on_placements` with every combination of the given choices per interval.
pub fn for_each_combination(
    choices: &[Vec<Placement>],
    on_placements: &mut impl FnMut(&[Placement]),
) {
    fn recurse(
        choices: &[Vec<Placement>],
        current: &mut Vec<Placement>,
        on_placements: &mut impl FnMut(&[Placement]),
    ) {
        if current.len() == choices.len() {
            on_placements(current);
            return;
        }

        for &placement in &choices[current.len()] {
            current.push(placement);
            recurse(choices, current, on_placements);
            let _ = current.pop();
        }
    }

    recurse(choices, &mut Vec::new(), on_placements);
}
