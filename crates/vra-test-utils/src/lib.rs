//! Testing utilities for the VRA workspace
//!
//! Shared fixtures and state builders.

#![allow(missing_docs)]

use vra_core::ResourceState;

/// The classic five-VM, three-resource instance used throughout the
/// workspace's tests. Safe, with completion order [1, 3, 4, 0, 2].
pub fn textbook_state() -> ResourceState {
    state(
        vec![3, 3, 2],
        vec![
            vec![7, 5, 3],
            vec![3, 2, 2],
            vec![9, 0, 2],
            vec![2, 2, 2],
            vec![4, 3, 3],
        ],
        vec![
            vec![0, 1, 0],
            vec![2, 0, 0],
            vec![3, 0, 2],
            vec![2, 1, 1],
            vec![0, 0, 2],
        ],
    )
}

/// Two VMs each one unit short of their ceiling, with nothing free: no
/// completion order exists.
pub fn starved_state() -> ResourceState {
    state(vec![0], vec![vec![2], vec![2]], vec![vec![1], vec![1]])
}

/// Build a state from literal matrices, panicking on invalid input.
pub fn state(
    available: Vec<u64>,
    maximum: Vec<Vec<u64>>,
    allocation: Vec<Vec<u64>>,
) -> ResourceState {
    ResourceState::new(available, maximum, allocation).expect("fixture state must be valid")
}
