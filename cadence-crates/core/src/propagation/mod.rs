//! Contains the main building blocks for propagators.
//!
//! A propagator takes the domains of its variables and removes values which cannot be part of
//! any solution of its constraint. It is said to be at fix-point if applying it again removes
//! nothing more. Propagators are not required to be idempotent; the [`State`](crate::Solver)
//! calls a propagator again whenever one of the domains it registered for changes, including
//! changes made by the propagator itself.
//!
//! Each concrete propagator implements [`Propagator`], whose main function
//! [`Propagator::propagate`] performs the domain reduction. It is created by a
//! [`PropagatorConstructor`], which registers the domain events the propagator depends on and
//! allocates its reversible state through the [`PropagatorConstructorContext`].
//!
//! A propagator which can prove that further calls are useless, for example because all of its
//! variables are fixed, may deactivate itself with [`PropagationContext::set_active`]. The flag is
//! reversible; backtracking to a point before the deactivation makes the propagator active again.

mod constructor;
mod contexts;
mod propagator;
mod propagator_id;

pub use constructor::PropagatorConstructor;
pub use constructor::PropagatorConstructorContext;
pub use contexts::PropagationContext;
pub use contexts::ReadDomains;
pub use propagator::Priority;
pub use propagator::Propagator;
pub use propagator_id::PropagatorId;

pub use crate::engine::notifications::DomainEvent;
pub use crate::engine::notifications::DomainEvents;
pub use crate::engine::PropagatorHandle;
