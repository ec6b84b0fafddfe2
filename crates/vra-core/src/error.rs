//! Error types for the resource-state core
//!
//! Covers:
//! - Shape mismatches between the matrices a caller supplies
//! - States that violate the allocation-within-maximum invariant
//! - Requests naming a VM the state does not track
//! - Starting states with no safe completion order

/// Errors surfaced by state construction, need derivation, and the
/// request protocol.
///
/// Every variant is caller-recoverable; none aborts the process. Protocol
/// denials (a request that is refused) are not errors - they are returned
/// as structured outcomes, see [`crate::request::DenialReason`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    /// Matrices or vectors with inconsistent dimensions were passed together
    #[error("dimension mismatch for {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Which input had the wrong shape
        what: &'static str,
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// A VM holds more of some resource than its declared maximum
    #[error("allocation exceeds declared maximum for vm {vm}, resource {resource}")]
    AllocationExceedsMaximum {
        /// Offending VM index
        vm: usize,
        /// Offending resource kind index
        resource: usize,
    },

    /// A request named a VM index the state does not track
    #[error("unknown vm {vm} (state tracks {vm_count} vms)")]
    UnknownVm {
        /// Requested VM index
        vm: usize,
        /// Number of VMs in the state
        vm_count: usize,
    },

    /// The current state admits no safe completion order even before any
    /// request is considered
    #[error("no safe completion order exists for the starting state")]
    UnsafeStartingState,
}

impl StateError {
    /// Whether the error indicates malformed input shapes rather than
    /// invalid state content.
    #[inline]
    #[must_use]
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            Self::DimensionMismatch { .. } | Self::UnknownVm { .. }
        )
    }
}
