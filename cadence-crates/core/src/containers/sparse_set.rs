//! A reversible sparse set over the indices `0..n`.
//!
//! The set guarantees that the first `size` entries of `elements` are the members; removing a
//! member swaps it behind the boundary and decrements `size`. Since `size` lives in a
//! [`TrailedInteger`], restoring it on backtrack brings back exactly the elements removed since the
//! checkpoint, without any further bookkeeping.

use crate::cadence_assert_moderate;
use crate::cadence_assert_simple;
use crate::engine::TrailedInteger;
use crate::engine::TrailedValues;

#[derive(Debug, Clone)]
pub(crate) struct TrailedSparseSet {
    elements: Vec<usize>,
    /// `positions[elements[i]] == i` for every `i`
    positions: Vec<usize>,
    size: TrailedInteger,
}

impl TrailedSparseSet {
    /// Creates the set `{0, .., n - 1}`.
    pub(crate) fn new(n: usize, trailed_values: &mut TrailedValues) -> Self {
        TrailedSparseSet {
            elements: (0..n).collect(),
            positions: (0..n).collect(),
            size: trailed_values.grow(n as i64),
        }
    }

    pub(crate) fn len(&self, trailed_values: &TrailedValues) -> usize {
        trailed_values.read(self.size) as usize
    }

    /// Returns the element stored at position `index`, which should be smaller than
    /// [`TrailedSparseSet::len`].
    pub(crate) fn get(&self, index: usize) -> usize {
        self.elements[index]
    }

    pub(crate) fn contains(&self, element: usize, trailed_values: &TrailedValues) -> bool {
        element < self.positions.len() && self.positions[element] < self.len(trailed_values)
    }

    pub(crate) fn iter<'a>(
        &'a self,
        trailed_values: &TrailedValues,
    ) -> impl Iterator<Item = usize> + 'a {
        self.elements[..self.len(trailed_values)].iter().copied()
    }

    /// Removes the element at position `index`.
    ///
    /// The element which was last in the set takes its place; callers removing while iterating
    /// should therefore go over the positions in decreasing order.
    pub(crate) fn remove_at(&mut self, index: usize, trailed_values: &mut TrailedValues) {
        let size = self.len(trailed_values);
        cadence_assert_simple!(index < size);

        let last = size - 1;
        self.swap(index, last);
        trailed_values.assign(self.size, last as i64);

        cadence_assert_moderate!(!self.contains(self.elements[last], trailed_values));
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.elements.swap(i, j);
        self.positions[self.elements[i]] = i;
        self.positions[self.elements[j]] = j;
    }
}
