//! Command implementations
//!
//! Thin orchestration over the core engine: load a scenario, run the
//! requested operation, hand the structured result back to `main` for
//! rendering. Kept free of printing so the tests can drive them
//! directly.

use crate::scenario::Scenario;
use anyhow::Context;
use std::path::Path;
use vra_core::{RequestOutcome, SafetyResult};

/// Seed a scenario file with the example instance.
pub fn run_init(out: &Path) -> anyhow::Result<()> {
    Scenario::example()
        .save(out)
        .with_context(|| format!("writing scenario to {}", out.display()))?;
    tracing::info!(path = %out.display(), "seeded example scenario");
    Ok(())
}

/// Load a scenario and run the safety check.
pub fn run_check(scenario: &Path) -> anyhow::Result<SafetyResult> {
    let state = Scenario::load(scenario)
        .with_context(|| format!("loading scenario from {}", scenario.display()))?
        .into_state()?;
    tracing::info!(
        vms = state.vm_count(),
        resources = state.resource_kinds(),
        "running safety check"
    );
    Ok(state.check_safety())
}

/// Load a scenario and run the grant protocol for one request.
///
/// Refuses outright when the starting state is already unsafe; requests
/// are only meaningful against a state that still has a completion
/// order. When the request is granted and `commit` is given, the updated
/// scenario is written there - persistence belongs to the caller, never
/// to the engine.
pub fn run_request(
    scenario: &Path,
    vm: usize,
    amounts: &[u64],
    commit: Option<&Path>,
) -> anyhow::Result<RequestOutcome> {
    let state = Scenario::load(scenario)
        .with_context(|| format!("loading scenario from {}", scenario.display()))?
        .into_state()?;
    state.ensure_safe()?;

    let outcome = state.evaluate_request(vm, amounts)?;
    if outcome.granted {
        if let Some(path) = commit {
            Scenario::from_state(&outcome.state)
                .save(path)
                .with_context(|| format!("committing granted state to {}", path.display()))?;
            tracing::info!(path = %path.display(), "committed granted state");
        }
    }
    Ok(outcome)
}
