use crate::containers::StorageKey;

/// An interval with a start, an end and a length which satisfy `start + length = end`, and which
/// may be optional.
///
/// The bounds of the interval are read and updated through the propagation contexts.
#[derive(Clone, PartialEq, Eq, Copy, Hash, Debug, PartialOrd, Ord)]
pub struct IntervalVariable {
    id: u32,
}

impl StorageKey for IntervalVariable {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        IntervalVariable { id: index as u32 }
    }
}

impl std::fmt::Display for IntervalVariable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "i{}", self.id)
    }
}

/// Whether an interval is part of the solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Presence {
    Present,
    Absent,
    /// Not yet decided.
    Optional,
}

impl Presence {
    /// The 0/1 status of the interval, or `None` when optional.
    pub fn status(self) -> Option<i32> {
        match self {
            Presence::Present => Some(1),
            Presence::Absent => Some(0),
            Presence::Optional => None,
        }
    }
}
