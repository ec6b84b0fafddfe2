//! VRA Core - VM Resource Arbiter engine
//!
//! Deadlock avoidance for shared, reusable compute resources allocated
//! among a fixed set of virtual machines, via the Banker's Algorithm:
//! - Resource-state model: available/maximum/allocation matrices and
//!   their validation rules, with need derived on demand
//! - Safety engine: does the state admit an order in which every VM can
//!   obtain its full remaining need and finish?
//! - Grant protocol: tentative-apply, safety re-check, commit-or-rollback
//!   for incremental requests
//!
//! The engine is pure and synchronous: it holds no state between calls,
//! performs no I/O, and never blocks. Callers own sequencing and
//! persistence.
//!
//! # Example
//!
//! ```rust
//! use vra_core::ResourceState;
//!
//! # fn example() -> Result<(), vra_core::StateError> {
//! let state = ResourceState::new(
//!     vec![3, 3, 2],
//!     vec![vec![7, 5, 3], vec![3, 2, 2], vec![9, 0, 2], vec![2, 2, 2], vec![4, 3, 3]],
//!     vec![vec![0, 1, 0], vec![2, 0, 0], vec![3, 0, 2], vec![2, 1, 1], vec![0, 0, 2]],
//! )?;
//!
//! let verdict = state.check_safety();
//! assert!(verdict.is_safe);
//!
//! let outcome = state.evaluate_request(1, &[1, 0, 2])?;
//! assert!(outcome.granted);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(unreachable_pub)]

// Core modules
pub mod error;
pub mod request;
pub mod safety;
pub mod state;

// Re-exports for convenience
pub use error::StateError;
pub use request::{DenialReason, RequestOutcome};
pub use safety::SafetyResult;
pub use state::{compute_need, ResourceState};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the arbiter
    pub use crate::{
        compute_need, DenialReason, RequestOutcome, ResourceState, SafetyResult, StateError,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
