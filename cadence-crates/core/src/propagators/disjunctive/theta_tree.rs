use std::cmp::max;

use crate::cadence_assert_simple;

// A node in the [`ThetaTree`] which keeps track of the ECT and the sum of durations of the tasks
// in its subtree
#[derive(Debug, Clone, Copy)]
struct Node {
    ect: i64,
    sum_of_durations: i64,
}

impl Node {
    fn empty() -> Self {
        Self {
            ect: i64::MIN,
            sum_of_durations: 0,
        }
    }
}

/// A structure for efficiently calculating the earliest completion time (ECT) of a set of tasks.
///
/// The implementation is based on \[1\]. It is a complete binary tree in which the leaves
/// represent the tasks, ordered by earliest start time; the position of a task is given by its
/// rank in that order. An inner node stores the ECT and total duration of the inserted tasks in
/// its subtree, which combine as `ect = max(ect_right, ect_left + duration_right)`.
///
/// # Bibliography
/// \[1\] P. Vilím, ‘Filtering algorithms for the unary resource constraint’, Archives of Control
/// Sciences, vol. 18, no. 2, pp. 159–202, 2008.
#[derive(Debug, Clone, Default)]
pub(crate) struct ThetaTree {
    nodes: Vec<Node>,
    /// The index of the first leaf in `nodes`
    first_leaf: usize,
}

impl ThetaTree {
    /// Removes all tasks and prepares the tree for tasks with ranks in `0..num_tasks`.
    pub(crate) fn reset(&mut self, num_tasks: usize) {
        let mut number_of_leaves = 1;
        while number_of_leaves < num_tasks {
            number_of_leaves <<= 1;
        }

        self.nodes.clear();
        self.nodes.resize(2 * number_of_leaves - 1, Node::empty());
        self.first_leaf = number_of_leaves - 1;
    }

    /// Adds the task with the given rank in earliest start order.
    pub(crate) fn insert(&mut self, rank: usize, ect: i64, duration: i64) {
        let position = self.first_leaf + rank;
        cadence_assert_simple!(position < self.nodes.len());

        self.nodes[position] = Node {
            ect,
            sum_of_durations: duration,
        };
        self.upheap(position)
    }

    pub(crate) fn remove(&mut self, rank: usize) {
        let position = self.first_leaf + rank;
        cadence_assert_simple!(position < self.nodes.len());

        self.nodes[position] = Node::empty();
        self.upheap(position)
    }

    /// Returns the earliest completion time of the inserted tasks, or `i64::MIN` if there are
    /// none.
    pub(crate) fn ect(&self) -> i64 {
        cadence_assert_simple!(!self.nodes.is_empty());
        self.nodes[0].ect
    }

    /// Calculate the new values for the ancestors of the provided index
    fn upheap(&mut self, mut index: usize) {
        while index != 0 {
            let parent = (index - 1) / 2;
            let left = self.nodes[2 * parent + 1];
            let right = self.nodes[2 * parent + 2];

            self.nodes[parent] = Node {
                ect: max(right.ect, left.ect.saturating_add(right.sum_of_durations)),
                sum_of_durations: left.sum_of_durations + right.sum_of_durations,
            };

            index = parent;
        }
    }
}
