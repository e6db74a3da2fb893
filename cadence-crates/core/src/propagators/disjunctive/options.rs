/// The options of the no-overlap constraint.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOverlapOptions {
    /// Which propagators are posted for the constraint.
    pub propagation_method: NoOverlapPropagationMethod,
}

impl NoOverlapOptions {
    pub fn new(propagation_method: NoOverlapPropagationMethod) -> Self {
        NoOverlapOptions { propagation_method }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum NoOverlapPropagationMethod {
    /// Only the pairwise precedence propagators.
    Decomposition,
    /// The pairwise precedence propagators together with the global propagator, which applies
    /// overload checking, detectable precedences and not-last reasoning in both directions.
    #[default]
    DecompositionWithGlobal,
}
