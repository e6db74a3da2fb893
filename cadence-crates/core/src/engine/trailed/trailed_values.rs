use crate::basic_types::Trail;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;

/// A reversible integer cell stored in [`TrailedValues`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TrailedInteger {
    id: u32,
}

impl StorageKey for TrailedInteger {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        Self { id: index as u32 }
    }
}

#[derive(Debug, Clone, Copy)]
struct OverwrittenValue {
    old_value: i64,
    reference: TrailedInteger,
}

/// Storage for the reversible scalars of propagators; every write is undone when synchronising
/// to an earlier checkpoint.
#[derive(Default, Debug, Clone)]
pub(crate) struct TrailedValues {
    trail: Trail<OverwrittenValue>,
    values: KeyedVec<TrailedInteger, i64>,
}

impl TrailedValues {
    pub(crate) fn grow(&mut self, initial_value: i64) -> TrailedInteger {
        self.values.push(initial_value)
    }

    pub(crate) fn new_checkpoint(&mut self) {
        self.trail.new_checkpoint()
    }

    pub(crate) fn read(&self, trailed_integer: TrailedInteger) -> i64 {
        self.values[trailed_integer]
    }

    pub(crate) fn synchronise(&mut self, new_checkpoint: usize) {
        self.trail
            .synchronise(new_checkpoint)
            .for_each(|entry| self.values[entry.reference] = entry.old_value)
    }

    pub(crate) fn assign(&mut self, trailed_integer: TrailedInteger, value: i64) {
        let old_value = self.values[trailed_integer];
        if old_value == value {
            return;
        }
        self.trail.push(OverwrittenValue {
            old_value,
            reference: trailed_integer,
        });
        self.values[trailed_integer] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::TrailedValues;

    #[test]
    fn span_bounds_are_restored_per_checkpoint() {
        let mut values = TrailedValues::default();
        let min_start = values.grow(i64::MIN);
        let max_end = values.grow(i64::MAX);

        values.new_checkpoint();
        values.assign(min_start, 3);
        values.assign(max_end, 12);
        values.assign(min_start, 5);
        assert_eq!(values.read(min_start), 5);

        values.new_checkpoint();
        values.assign(max_end, 8);
        assert_eq!(values.read(max_end), 8);

        values.synchronise(1);
        assert_eq!(values.read(min_start), 5);
        assert_eq!(values.read(max_end), 12);

        values.synchronise(0);
        assert_eq!(values.read(min_start), i64::MIN);
        assert_eq!(values.read(max_end), i64::MAX);
    }

    #[test]
    fn writing_the_same_value_is_not_trailed() {
        let mut values = TrailedValues::default();
        let trailed_integer = values.grow(4);

        values.new_checkpoint();
        values.assign(trailed_integer, 4);

        assert!(values.trail.is_empty());
    }
}
