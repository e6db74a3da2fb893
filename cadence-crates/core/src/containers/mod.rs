mod keyed_vec;
mod sparse_set;

pub(crate) use keyed_vec::KeyedVec;
pub(crate) use keyed_vec::StorageKey;
pub(crate) use sparse_set::TrailedSparseSet;
