use crate::engine::EmptyDomain;

/// The result of invoking a constraint programming propagator. The propagation can either succeed
/// or identify a conflict. The necessary conditions for the conflict are captured in the error
/// variant, i.e. a [`PropagatorConflict`] or an [`EmptyDomain`].
pub type PropagationStatusCP = Result<(), Inconsistency>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inconsistency {
    /// A bound update made the domain of a variable empty.
    EmptyDomain,
    /// The propagator detected that the current domains admit no solution.
    Conflict(PropagatorConflict),
}

impl From<EmptyDomain> for Inconsistency {
    fn from(_: EmptyDomain) -> Self {
        Inconsistency::EmptyDomain
    }
}

impl From<PropagatorConflict> for Inconsistency {
    fn from(conflict: PropagatorConflict) -> Self {
        Inconsistency::Conflict(conflict)
    }
}

/// A conflict stated by a propagator without touching any domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropagatorConflict {
    /// The name of the propagator which raised the conflict.
    pub propagator: &'static str,
}
