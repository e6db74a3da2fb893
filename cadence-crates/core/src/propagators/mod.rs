//! Contains the propagators of the scheduling constraints.
pub(crate) mod cumulative;
pub(crate) mod disjunctive;
mod interval_synchronisation;

pub use cumulative::*;
pub use disjunctive::*;
pub(crate) use interval_synchronisation::*;
