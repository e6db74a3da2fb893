use downcast_rs::impl_downcast;
use downcast_rs::Downcast;

use super::PropagationContext;
use crate::basic_types::PropagationStatusCP;

impl_downcast!(Propagator);

/// All propagators implement the [`Propagator`] trait.
///
/// A propagator reads the current domains through the [`PropagationContext`] and tightens them;
/// a tightening which empties a domain, or a conflict detected by the propagator itself, is
/// reported through the [`PropagationStatusCP`]. All state which must survive a
/// [`Propagator::propagate`] call is either recomputed from the domains or stored in reversible
/// cells, so that the caller can undo a failed propagation by backtracking alone.
pub trait Propagator: Downcast {
    /// Return the name of the propagator, used for logging.
    fn name(&self) -> &str;

    /// Propagate the constraint on the current domains.
    ///
    /// Calling this again without any intervening domain change must not modify any domain.
    fn propagate(&mut self, context: PropagationContext) -> PropagationStatusCP;

    /// Returns the priority of the propagator represented as an integer. Lower values mean higher
    /// priority and the priority determines the order in which propagators will be asked to
    /// propagate. Cheap propagators should run before expensive ones.
    fn priority(&self) -> Priority {
        Priority::VeryLow
    }
}

#[derive(Default, Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Priority {
    High = 0,
    Medium = 1,
    Low = 2,
    #[default]
    VeryLow = 3,
}
