//! Property tests for the state model and grant protocol.

use proptest::prelude::*;
use vra_core::ResourceState;

/// Valid states: allocation clamped under maximum, modest dimensions.
fn arb_state() -> impl Strategy<Value = ResourceState> {
    (1..6usize, 1..4usize)
        .prop_flat_map(|(vms, kinds)| {
            (
                proptest::collection::vec(proptest::collection::vec(0..10u64, kinds), vms),
                proptest::collection::vec(proptest::collection::vec(0..10u64, kinds), vms),
                proptest::collection::vec(0..10u64, kinds),
            )
        })
        .prop_map(|(maximum, raw_allocation, available)| {
            let allocation: Vec<Vec<u64>> = maximum
                .iter()
                .zip(&raw_allocation)
                .map(|(max_row, alloc_row)| {
                    max_row
                        .iter()
                        .zip(alloc_row)
                        .map(|(&ceiling, &held)| held.min(ceiling))
                        .collect()
                })
                .collect();
            ResourceState::new(available, maximum, allocation)
                .expect("generated state must be valid")
        })
}

fn arb_state_and_request() -> impl Strategy<Value = (ResourceState, usize, Vec<u64>)> {
    arb_state().prop_flat_map(|state| {
        let vms = state.vm_count();
        let kinds = state.resource_kinds();
        (
            Just(state),
            0..vms,
            proptest::collection::vec(0..10u64, kinds),
        )
    })
}

proptest! {
    #[test]
    fn prop_need_plus_allocation_equals_maximum(state in arb_state()) {
        let need = state.need();
        for vm in 0..state.vm_count() {
            for r in 0..state.resource_kinds() {
                prop_assert_eq!(
                    need[vm][r] + state.allocation()[vm][r],
                    state.maximum()[vm][r]
                );
            }
        }
    }

    #[test]
    fn prop_safety_check_is_deterministic(state in arb_state()) {
        let first = state.check_safety();
        let second = state.check_safety();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_grants_conserve_and_denials_roll_back(
        (state, vm, request) in arb_state_and_request()
    ) {
        let totals = state.total_units();
        let outcome = state.evaluate_request(vm, &request).unwrap();

        if outcome.granted {
            prop_assert!(outcome.denial.is_none());
            prop_assert_eq!(outcome.state.total_units(), totals);
            prop_assert!(outcome.safety.is_safe);
            prop_assert_eq!(outcome.safety.sequence.len(), state.vm_count());
        } else {
            // All three denial paths hand back the original state and the
            // fixed unsafe sentinel.
            prop_assert!(outcome.denial.is_some());
            prop_assert_eq!(&outcome.state, &state);
            prop_assert!(!outcome.safety.is_safe);
            prop_assert!(outcome.safety.sequence.is_empty());
        }
    }

    #[test]
    fn prop_outcome_state_is_always_reconstructible(
        (state, vm, request) in arb_state_and_request()
    ) {
        let outcome = state.evaluate_request(vm, &request).unwrap();
        let rebuilt = ResourceState::new(
            outcome.state.available().to_vec(),
            outcome.state.maximum().to_vec(),
            outcome.state.allocation().to_vec(),
        );
        prop_assert!(rebuilt.is_ok());
    }
}
