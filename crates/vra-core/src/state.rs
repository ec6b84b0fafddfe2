//! Resource-state model
//!
//! Owns the three matrices the safety engine operates on:
//! - `available` - free units of each resource kind
//! - `maximum` - declared per-VM ceiling for each resource kind
//! - `allocation` - units each VM currently holds
//!
//! `need` is always derived (`maximum - allocation`), never stored.

use crate::error::StateError;
use serde::{Deserialize, Serialize};

/// Snapshot of resource availability and per-VM allocation.
///
/// A state is validated once at construction and is immutable afterwards;
/// the request protocol returns a fresh state rather than mutating in
/// place. The dimensions (VM count and resource-kind count) are fixed for
/// the lifetime of a state - changing them means building a new one.
///
/// A state is a single logical resource: callers running the grant
/// protocol from several actors must serialize access themselves. The
/// engine assumes one evaluator per state and provides no internal
/// locking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceState {
    pub(crate) available: Vec<u64>,
    pub(crate) maximum: Vec<Vec<u64>>,
    pub(crate) allocation: Vec<Vec<u64>>,
}

impl ResourceState {
    /// Build a state from caller-supplied matrices.
    ///
    /// The resource-kind count is taken from `available`; the VM count
    /// from `maximum`. Every row of `maximum` and `allocation` must match
    /// those dimensions, and no VM may hold more than its declared
    /// maximum.
    ///
    /// # Errors
    ///
    /// [`StateError::DimensionMismatch`] on inconsistent shapes,
    /// [`StateError::AllocationExceedsMaximum`] when some
    /// `allocation[i][j] > maximum[i][j]`.
    pub fn new(
        available: Vec<u64>,
        maximum: Vec<Vec<u64>>,
        allocation: Vec<Vec<u64>>,
    ) -> Result<Self, StateError> {
        let kinds = available.len();
        if allocation.len() != maximum.len() {
            return Err(StateError::DimensionMismatch {
                what: "allocation rows",
                expected: maximum.len(),
                actual: allocation.len(),
            });
        }
        for row in &maximum {
            if row.len() != kinds {
                return Err(StateError::DimensionMismatch {
                    what: "maximum row",
                    expected: kinds,
                    actual: row.len(),
                });
            }
        }
        for (vm, row) in allocation.iter().enumerate() {
            if row.len() != kinds {
                return Err(StateError::DimensionMismatch {
                    what: "allocation row",
                    expected: kinds,
                    actual: row.len(),
                });
            }
            for (resource, (&held, &ceiling)) in row.iter().zip(&maximum[vm]).enumerate() {
                if held > ceiling {
                    return Err(StateError::AllocationExceedsMaximum { vm, resource });
                }
            }
        }
        Ok(Self {
            available,
            maximum,
            allocation,
        })
    }

    /// Number of VMs tracked by this state.
    #[inline]
    #[must_use]
    pub fn vm_count(&self) -> usize {
        self.maximum.len()
    }

    /// Number of resource kinds tracked by this state.
    #[inline]
    #[must_use]
    pub fn resource_kinds(&self) -> usize {
        self.available.len()
    }

    /// Free units per resource kind.
    #[inline]
    #[must_use]
    pub fn available(&self) -> &[u64] {
        &self.available
    }

    /// Declared per-VM maxima.
    #[inline]
    #[must_use]
    pub fn maximum(&self) -> &[Vec<u64>] {
        &self.maximum
    }

    /// Current per-VM holdings.
    #[inline]
    #[must_use]
    pub fn allocation(&self) -> &[Vec<u64>] {
        &self.allocation
    }

    /// Remaining demand per VM: `maximum - allocation`, elementwise.
    ///
    /// Derived on demand. Construction guarantees allocation never exceeds
    /// maximum, so the subtraction cannot underflow here.
    #[must_use]
    pub fn need(&self) -> Vec<Vec<u64>> {
        self.maximum
            .iter()
            .zip(&self.allocation)
            .map(|(max_row, alloc_row)| {
                max_row
                    .iter()
                    .zip(alloc_row)
                    .map(|(&ceiling, &held)| ceiling - held)
                    .collect()
            })
            .collect()
    }

    /// Total pool per resource kind: free units plus everything allocated.
    ///
    /// Conserved across every grant the request protocol commits.
    #[must_use]
    pub fn total_units(&self) -> Vec<u64> {
        let mut totals = self.available.clone();
        for row in &self.allocation {
            for (total, &held) in totals.iter_mut().zip(row) {
                *total += held;
            }
        }
        totals
    }
}

/// Derive the need matrix from raw maximum/allocation matrices.
///
/// Standalone variant of [`ResourceState::need`] for callers assembling
/// matrices before a state exists. Pure and deterministic.
///
/// # Errors
///
/// [`StateError::DimensionMismatch`] when the matrices disagree on either
/// dimension, [`StateError::AllocationExceedsMaximum`] when any entry
/// would go negative.
pub fn compute_need(
    maximum: &[Vec<u64>],
    allocation: &[Vec<u64>],
) -> Result<Vec<Vec<u64>>, StateError> {
    if allocation.len() != maximum.len() {
        return Err(StateError::DimensionMismatch {
            what: "allocation rows",
            expected: maximum.len(),
            actual: allocation.len(),
        });
    }
    let mut need = Vec::with_capacity(maximum.len());
    for (vm, (max_row, alloc_row)) in maximum.iter().zip(allocation).enumerate() {
        if alloc_row.len() != max_row.len() {
            return Err(StateError::DimensionMismatch {
                what: "allocation row",
                expected: max_row.len(),
                actual: alloc_row.len(),
            });
        }
        let mut row = Vec::with_capacity(max_row.len());
        for (resource, (&ceiling, &held)) in max_row.iter().zip(alloc_row).enumerate() {
            if held > ceiling {
                return Err(StateError::AllocationExceedsMaximum { vm, resource });
            }
            row.push(ceiling - held);
        }
        need.push(row);
    }
    Ok(need)
}
