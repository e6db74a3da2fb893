//! Filtering of a unary resource from left to right, i.e. tightening earliest start times and
//! latest end times by reasoning on the tasks which have to be scheduled before a task.
//!
//! The rules are overload checking, detectable precedences and not-last, all based on the
//! [`ThetaTree`] of \[1\]. They operate on plain 64-bit bounds, which allows the same filter to
//! be applied to a mirrored timeline to obtain the right-to-left counterparts.
//!
//! # Bibliography
//! \[1\] P. Vilím, ‘Filtering algorithms for the unary resource constraint’, Archives of Control
//! Sciences, vol. 18, no. 2, pp. 159–202, 2008.

use super::theta_tree::ThetaTree;

/// The result of [`NoOverlapLeftToRight::filter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    NoChange,
    Change,
    Inconsistency,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct NoOverlapLeftToRight {
    theta_tree: ThetaTree,

    start_min: Vec<i64>,
    start_max: Vec<i64>,
    end_min: Vec<i64>,
    end_max: Vec<i64>,
    duration: Vec<i64>,

    new_start_min: Vec<i64>,
    new_end_max: Vec<i64>,

    /// Tasks sorted by earliest start
    perm_est: Vec<usize>,
    /// `rank_est[perm_est[i]] == i`
    rank_est: Vec<usize>,
    /// Tasks sorted by earliest completion
    perm_ect: Vec<usize>,
    /// Tasks sorted by latest start
    perm_lst: Vec<usize>,
    /// Tasks sorted by latest completion
    perm_lct: Vec<usize>,

    inserted: Vec<bool>,
}

impl NoOverlapLeftToRight {
    /// Applies overload checking, detectable precedences and not-last to the first `n` tasks until
    /// none of them changes a bound.
    ///
    /// On [`Outcome::Change`] the tightened bounds are written back into `start_min` and
    /// `end_max`; `start_min` only increases and `end_max` only decreases. On the other outcomes
    /// the arrays are left untouched.
    pub(crate) fn filter(
        &mut self,
        start_min: &mut [i64],
        duration: &[i64],
        end_max: &mut [i64],
        n: usize,
    ) -> Outcome {
        self.load(&start_min[..n], &duration[..n], &end_max[..n]);

        let mut changed = false;
        loop {
            self.update();
            if !self.overload_check() {
                return Outcome::Inconsistency;
            }

            let detected_precedence = self.detectable_precedence();
            if detected_precedence {
                self.update();
            }
            let not_last = self.not_last();

            if !detected_precedence && !not_last {
                break;
            }
            changed = true;
        }

        if !changed {
            return Outcome::NoChange;
        }

        start_min[..n].copy_from_slice(&self.start_min);
        end_max[..n].copy_from_slice(&self.end_max);
        Outcome::Change
    }

    fn load(&mut self, start_min: &[i64], duration: &[i64], end_max: &[i64]) {
        let n = start_min.len();

        self.start_min.clear();
        self.start_min.extend_from_slice(start_min);
        self.duration.clear();
        self.duration.extend_from_slice(duration);
        self.end_max.clear();
        self.end_max.extend_from_slice(end_max);

        for array in [
            &mut self.start_max,
            &mut self.end_min,
            &mut self.new_start_min,
            &mut self.new_end_max,
        ] {
            array.clear();
            array.resize(n, 0);
        }

        for permutation in [
            &mut self.perm_est,
            &mut self.rank_est,
            &mut self.perm_ect,
            &mut self.perm_lst,
            &mut self.perm_lct,
        ] {
            permutation.clear();
            permutation.extend(0..n);
        }

        self.inserted.clear();
        self.inserted.resize(n, false);
        self.theta_tree.reset(n);
    }

    /// Recomputes the derived bounds and the orderings from `start_min` and `end_max`.
    fn update(&mut self) {
        let n = self.start_min.len();
        for task in 0..n {
            self.start_max[task] = self.end_max[task] - self.duration[task];
            self.end_min[task] = self.start_min[task] + self.duration[task];
        }

        let start_min = &self.start_min;
        self.perm_est.sort_by_key(|&task| start_min[task]);
        for (rank, &task) in self.perm_est.iter().enumerate() {
            self.rank_est[task] = rank;
        }

        let end_min = &self.end_min;
        self.perm_ect.sort_by_key(|&task| end_min[task]);
        let start_max = &self.start_max;
        self.perm_lst.sort_by_key(|&task| start_max[task]);
        let end_max = &self.end_max;
        self.perm_lct.sort_by_key(|&task| end_max[task]);
    }

    /// Returns `false` if some set of tasks cannot be completed before the latest end of the
    /// last of them.
    fn overload_check(&mut self) -> bool {
        self.theta_tree.reset(self.start_min.len());

        for &task in &self.perm_lct {
            self.theta_tree.insert(
                self.rank_est[task],
                self.end_min[task],
                self.duration[task],
            );
            if self.theta_tree.ect() > self.end_max[task] {
                return false;
            }
        }

        true
    }

    /// A task `j` which has to start before task `i` can complete (`start_max[j] < end_min[i]`)
    /// precedes `i`, so `i` cannot start before the ECT of all such tasks.
    ///
    /// Returns whether a start time was tightened.
    fn detectable_precedence(&mut self) -> bool {
        let n = self.start_min.len();
        self.theta_tree.reset(n);
        self.inserted.iter_mut().for_each(|inserted| *inserted = false);

        let mut next = 0;
        for &task in &self.perm_ect {
            while next < n && self.end_min[task] > self.start_max[self.perm_lst[next]] {
                let other = self.perm_lst[next];
                self.theta_tree
                    .insert(self.rank_est[other], self.end_min[other], self.duration[other]);
                self.inserted[other] = true;
                next += 1;
            }

            let ect_without_task = if self.inserted[task] {
                self.theta_tree.remove(self.rank_est[task]);
                let ect = self.theta_tree.ect();
                self.theta_tree.insert(
                    self.rank_est[task],
                    self.end_min[task],
                    self.duration[task],
                );
                ect
            } else {
                self.theta_tree.ect()
            };

            self.new_start_min[task] = self.start_min[task].max(ect_without_task);
        }

        let mut changed = false;
        for task in 0..n {
            if self.new_start_min[task] > self.start_min[task] {
                self.start_min[task] = self.new_start_min[task];
                changed = true;
            }
        }
        changed
    }

    /// If the tasks which have to start before task `i` completes (`start_max[j] < end_max[i]`)
    /// cannot all be completed before `start_max[i]`, then `i` is not the last of them and has to
    /// end before the latest start of the last of them.
    ///
    /// Returns whether a latest end was tightened.
    fn not_last(&mut self) -> bool {
        let n = self.start_min.len();
        self.theta_tree.reset(n);
        self.inserted.iter_mut().for_each(|inserted| *inserted = false);
        self.new_end_max.copy_from_slice(&self.end_max);

        let mut next = 0;
        let mut last_inserted = None;
        for &task in &self.perm_lct {
            while next < n && self.end_max[task] > self.start_max[self.perm_lst[next]] {
                let other = self.perm_lst[next];
                self.theta_tree
                    .insert(self.rank_est[other], self.end_min[other], self.duration[other]);
                self.inserted[other] = true;
                last_inserted = Some(other);
                next += 1;
            }

            if self.inserted[task] {
                self.theta_tree.remove(self.rank_est[task]);
            }
            if let Some(last) = last_inserted {
                if self.theta_tree.ect() > self.start_max[task] {
                    self.new_end_max[task] = self.new_end_max[task].min(self.start_max[last]);
                }
            }
            if self.inserted[task] {
                self.theta_tree.insert(
                    self.rank_est[task],
                    self.end_min[task],
                    self.duration[task],
                );
            }
        }

        let mut changed = false;
        for task in 0..n {
            if self.new_end_max[task] < self.end_max[task] {
                self.end_max[task] = self.new_end_max[task];
                changed = true;
            }
        }
        changed
    }
}
