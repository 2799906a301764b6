//! wt-solver: scaling, propagation, and the sequential-modular solve.
//!
//! The solve here is deliberately simple: treatment trains are feed-forward
//! networks, so evaluating blocks in flow order and propagating states along
//! arcs reaches a fixed point in a couple of passes. The solver still checks
//! the scaled residual between passes and fails hard when asked to, because
//! a mis-specified flowsheet must never report success.

pub mod dof;
pub mod error;
pub mod propagate;
pub mod scaling;
pub mod solve;

pub use dof::check_dof;
pub use error::{SolverError, SolverResult};
pub use propagate::propagate_state;
pub use scaling::calculate_scaling_factors;
pub use solve::{solve_with_user_scaling, SolveOptions, SolveReport};
