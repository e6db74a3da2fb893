//! The variables on which the propagators operate.
mod affine_view;
mod domain_id;
mod integer_variable;
mod interval_variable;
mod literal;
mod transformable_variable;

pub use affine_view::AffineView;
pub use domain_id::DomainId;
pub use integer_variable::IntegerVariable;
pub use interval_variable::IntervalVariable;
pub use interval_variable::Presence;
pub use literal::Literal;
pub use transformable_variable::TransformableVariable;
