//! Request evaluation and commit
//!
//! The grant protocol: bounds check, availability check, tentative apply
//! onto a candidate state, full safety re-check, then commit or roll
//! back. A request that is locally satisfiable can still be refused when
//! granting it would leave the system without any completion order.

use crate::error::StateError;
use crate::safety::SafetyResult;
use crate::state::ResourceState;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DenialReason {
    /// The request asks for more of some resource than the VM's remaining
    /// declared need - the VM violated its own stated ceiling
    ExceedsDeclaredMaximum,
    /// Not enough free units right now; the VM must wait. Partial grants
    /// are not supported
    InsufficientAvailability,
    /// The request is satisfiable but the resulting state admits no
    /// completion order
    WouldCauseUnsafeState,
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExceedsDeclaredMaximum => {
                write!(f, "request exceeds the vm's remaining declared need")
            }
            Self::InsufficientAvailability => {
                write!(f, "resources not available, the vm must wait")
            }
            Self::WouldCauseUnsafeState => {
                write!(f, "granting would leave the system in an unsafe state")
            }
        }
    }
}

/// Outcome of one run of the grant protocol.
///
/// `state` is either the committed candidate (on grant) or the original
/// state untouched (on denial) - never a mix. The rejection paths carry
/// the fixed unsafe sentinel in `safety`; only a granted outcome's
/// `safety` describes the returned state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestOutcome {
    /// Whether the request was granted
    pub granted: bool,
    /// Set exactly when the request was refused
    pub denial: Option<DenialReason>,
    /// The state to carry forward
    pub state: ResourceState,
    /// Safety verdict for the returned state (sentinel on denial)
    pub safety: SafetyResult,
}

impl RequestOutcome {
    fn granted(state: ResourceState, safety: SafetyResult) -> Self {
        Self {
            granted: true,
            denial: None,
            state,
            safety,
        }
    }

    fn denied(reason: DenialReason, state: ResourceState) -> Self {
        Self {
            granted: false,
            denial: Some(reason),
            state,
            safety: SafetyResult::unsafe_sentinel(),
        }
    }
}

impl ResourceState {
    /// Evaluate an incremental request from `vm` as one logical
    /// transaction.
    ///
    /// The protocol runs tentative-apply / safety-check /
    /// commit-or-rollback and must not interleave with another request
    /// against the same state; callers own that serialization.
    ///
    /// Denials are data, not errors: the returned outcome carries the
    /// refusal reason and the original state unchanged.
    ///
    /// # Errors
    ///
    /// [`StateError::UnknownVm`] for an out-of-range VM index,
    /// [`StateError::DimensionMismatch`] when the request vector's length
    /// differs from the state's resource-kind count.
    pub fn evaluate_request(
        &self,
        vm: usize,
        request: &[u64],
    ) -> Result<RequestOutcome, StateError> {
        if vm >= self.vm_count() {
            return Err(StateError::UnknownVm {
                vm,
                vm_count: self.vm_count(),
            });
        }
        if request.len() != self.resource_kinds() {
            return Err(StateError::DimensionMismatch {
                what: "request",
                expected: self.resource_kinds(),
                actual: request.len(),
            });
        }

        let need = self.need();
        if request.iter().zip(&need[vm]).any(|(asked, left)| asked > left) {
            tracing::debug!(vm, "request denied: exceeds declared maximum");
            return Ok(RequestOutcome::denied(
                DenialReason::ExceedsDeclaredMaximum,
                self.clone(),
            ));
        }
        if request
            .iter()
            .zip(&self.available)
            .any(|(asked, free)| asked > free)
        {
            tracing::debug!(vm, "request denied: insufficient availability");
            return Ok(RequestOutcome::denied(
                DenialReason::InsufficientAvailability,
                self.clone(),
            ));
        }

        // Tentative apply: only the requesting VM's row moves.
        let mut candidate = self.clone();
        for (r, &asked) in request.iter().enumerate() {
            candidate.available[r] -= asked;
            candidate.allocation[vm][r] += asked;
        }

        let safety = candidate.check_safety();
        if safety.is_safe {
            tracing::debug!(vm, sequence = ?safety.sequence, "request granted");
            Ok(RequestOutcome::granted(candidate, safety))
        } else {
            tracing::debug!(vm, "request denied: candidate state is unsafe");
            Ok(RequestOutcome::denied(
                DenialReason::WouldCauseUnsafeState,
                self.clone(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_state() -> ResourceState {
        ResourceState::new(
            vec![2, 1],
            vec![vec![3, 2], vec![2, 2]],
            vec![vec![1, 0], vec![0, 1]],
        )
        .unwrap()
    }

    #[test]
    fn unknown_vm_is_an_error() {
        let err = small_state().evaluate_request(5, &[0, 0]).unwrap_err();
        assert_eq!(err, StateError::UnknownVm { vm: 5, vm_count: 2 });
    }

    #[test]
    fn wrong_request_length_is_an_error() {
        let err = small_state().evaluate_request(0, &[1]).unwrap_err();
        assert_eq!(
            err,
            StateError::DimensionMismatch {
                what: "request",
                expected: 2,
                actual: 1,
            }
        );
    }

    #[test]
    fn request_beyond_need_is_denied_before_availability() {
        // VM 0 still needs [2, 2]; asking for 3 of resource 0 breaks its
        // own ceiling even though availability would also fail.
        let state = small_state();
        let outcome = state.evaluate_request(0, &[3, 0]).unwrap();
        assert!(!outcome.granted);
        assert_eq!(outcome.denial, Some(DenialReason::ExceedsDeclaredMaximum));
        assert_eq!(outcome.state, state);
        assert!(!outcome.safety.is_safe);
        assert!(outcome.safety.sequence.is_empty());
    }

    #[test]
    fn request_beyond_available_is_denied() {
        // VM 0 may still ask for [2, 2], but only one unit of resource 1
        // is free.
        let state = small_state();
        let outcome = state.evaluate_request(0, &[0, 2]).unwrap();
        assert_eq!(outcome.denial, Some(DenialReason::InsufficientAvailability));
        assert_eq!(outcome.state, state);
    }

    #[test]
    fn unsafe_candidate_is_rolled_back() {
        // Satisfiable, but afterwards neither VM's remaining need fits in
        // what is left free.
        let state = small_state();
        let outcome = state.evaluate_request(0, &[1, 1]).unwrap();
        assert!(!outcome.granted);
        assert_eq!(outcome.denial, Some(DenialReason::WouldCauseUnsafeState));
        assert_eq!(outcome.state, state);
    }

    #[test]
    fn grant_moves_units_into_the_vm_row() {
        let state = small_state();
        let outcome = state.evaluate_request(1, &[0, 1]).unwrap();
        assert!(outcome.granted);
        assert_eq!(outcome.denial, None);
        assert_eq!(outcome.state.available(), &[2, 0]);
        assert_eq!(outcome.state.allocation()[1], vec![0, 2]);
        assert_eq!(outcome.state.allocation()[0], state.allocation()[0]);
        assert_eq!(outcome.safety.sequence, vec![1, 0]);
    }

    #[test]
    fn zero_request_is_granted_and_changes_nothing() {
        let state = small_state();
        let outcome = state.evaluate_request(1, &[0, 0]).unwrap();
        assert!(outcome.granted);
        assert_eq!(outcome.state, state);
    }
}
