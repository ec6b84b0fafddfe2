//! Banker's safety algorithm
//!
//! Decides whether a state admits a completion order: some sequence in
//! which every VM can obtain its full remaining need, run to completion,
//! and release everything it holds back into the pool.

use crate::error::StateError;
use crate::state::ResourceState;
use serde::{Deserialize, Serialize};

/// Verdict of a safety check.
///
/// `sequence` is meaningful only when `is_safe` is true; it then lists
/// every VM index exactly once, in the order the check established each
/// could finish. The order is deterministic: when several VMs are
/// eligible at the same working level, the lowest index wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyResult {
    /// Whether a completion order exists
    pub is_safe: bool,
    /// A completion order, empty when unsafe
    pub sequence: Vec<usize>,
}

impl SafetyResult {
    /// The fixed verdict attached to rejected requests. Not a re-check of
    /// any state - callers must not infer system-wide safety from it.
    #[inline]
    #[must_use]
    pub(crate) fn unsafe_sentinel() -> Self {
        Self {
            is_safe: false,
            sequence: Vec::new(),
        }
    }
}

impl ResourceState {
    /// Run the Banker's safety algorithm against this state.
    ///
    /// Operates on a working copy of the available vector; the state is
    /// never mutated, and repeated calls return identical results. Each
    /// outer pass scans VMs in index order and finishes every VM whose
    /// remaining need fits in the working vector, releasing its full
    /// allocation as it goes. A pass that finishes nobody while VMs
    /// remain proves no completion order exists.
    ///
    /// Terminates in `O(P^2 * R)`: every pass but the last finishes at
    /// least one VM.
    #[must_use]
    pub fn check_safety(&self) -> SafetyResult {
        let vms = self.vm_count();
        let kinds = self.resource_kinds();
        let need = self.need();

        let mut work = self.available.clone();
        let mut finished = vec![false; vms];
        let mut sequence = Vec::with_capacity(vms);

        loop {
            let mut progressed = false;
            for vm in 0..vms {
                if finished[vm] {
                    continue;
                }
                let fits = (0..kinds).all(|r| need[vm][r] <= work[r]);
                if fits {
                    for (free, &held) in work.iter_mut().zip(&self.allocation[vm]) {
                        *free += held;
                    }
                    finished[vm] = true;
                    sequence.push(vm);
                    progressed = true;
                }
            }
            if sequence.len() == vms {
                tracing::trace!(?sequence, "state is safe");
                return SafetyResult {
                    is_safe: true,
                    sequence,
                };
            }
            if !progressed {
                tracing::trace!(
                    finished = sequence.len(),
                    vms,
                    "no completion order exists"
                );
                return SafetyResult::unsafe_sentinel();
            }
        }
    }

    /// Safety check as a precondition gate.
    ///
    /// Callers that refuse to accept requests from an already-unsafe
    /// state use this instead of [`ResourceState::check_safety`].
    ///
    /// # Errors
    ///
    /// [`StateError::UnsafeStartingState`] when no completion order
    /// exists.
    pub fn ensure_safe(&self) -> Result<SafetyResult, StateError> {
        let verdict = self.check_safety();
        if verdict.is_safe {
            Ok(verdict)
        } else {
            Err(StateError::UnsafeStartingState)
        }
    }
}
