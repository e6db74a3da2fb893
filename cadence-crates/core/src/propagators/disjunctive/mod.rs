//! Propagators for unary resources, on which intervals may not overlap.
mod no_overlap_binary;
mod no_overlap_global;
mod no_overlap_left_to_right;
mod options;
mod theta_tree;

pub(crate) use no_overlap_binary::NoOverlapBinaryPropagator;
pub(crate) use no_overlap_global::NoOverlapGlobalConstructor;
pub use options::NoOverlapOptions;
pub use options::NoOverlapPropagationMethod;
