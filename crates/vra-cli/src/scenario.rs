//! Scenario files
//!
//! A scenario is the on-disk form of a resource state: declared
//! dimensions plus the three matrices, as JSON. Parsing is strict - the
//! declared counts must match the matrix shapes, and there is no
//! empty-means-zero coercion.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use vra_core::{ResourceState, StateError};

/// Errors raised while loading, validating, or writing scenario files.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    /// Declared dimension disagrees with the matrix shapes
    #[error("declared {what} count {declared} does not match matrix shape {actual}")]
    CountMismatch {
        /// Which dimension disagreed
        what: &'static str,
        /// The count the scenario declared
        declared: usize,
        /// The count the matrices actually have
        actual: usize,
    },

    /// An amount list could not be parsed
    #[error("invalid amount list {text:?}: expected comma-separated non-negative integers")]
    Amount {
        /// The offending input
        text: String,
    },

    /// The matrices fail the core's validation rules
    #[error("invalid resource state: {0}")]
    State(#[from] StateError),

    /// The scenario file could not be read or written
    #[error("scenario file i/o failed: {0}")]
    Io(#[from] std::io::Error),

    /// The scenario file is not valid JSON for this format
    #[error("malformed scenario file: {0}")]
    Json(#[from] serde_json::Error),
}

/// On-disk description of a resource state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Number of VMs
    pub vms: usize,
    /// Number of resource kinds
    pub resources: usize,
    /// Free units per resource kind
    pub available: Vec<u64>,
    /// Declared per-VM maxima
    pub maximum: Vec<Vec<u64>>,
    /// Current per-VM holdings
    pub allocation: Vec<Vec<u64>>,
}

impl Scenario {
    /// The classic five-VM, three-resource instance, matching what the
    /// `init` subcommand seeds.
    #[must_use]
    pub fn example() -> Self {
        Self {
            vms: 5,
            resources: 3,
            available: vec![3, 3, 2],
            maximum: vec![
                vec![7, 5, 3],
                vec![3, 2, 2],
                vec![9, 0, 2],
                vec![2, 2, 2],
                vec![4, 3, 3],
            ],
            allocation: vec![
                vec![0, 1, 0],
                vec![2, 0, 0],
                vec![3, 0, 2],
                vec![2, 1, 1],
                vec![0, 0, 2],
            ],
        }
    }

    /// Read a scenario from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Write the scenario as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), ScenarioError> {
        let mut text = serde_json::to_string_pretty(self)?;
        text.push('\n');
        fs::write(path, text)?;
        Ok(())
    }

    /// Capture a core state back into its on-disk form.
    #[must_use]
    pub fn from_state(state: &ResourceState) -> Self {
        Self {
            vms: state.vm_count(),
            resources: state.resource_kinds(),
            available: state.available().to_vec(),
            maximum: state.maximum().to_vec(),
            allocation: state.allocation().to_vec(),
        }
    }

    /// Validate the scenario into a core [`ResourceState`].
    ///
    /// # Errors
    ///
    /// [`ScenarioError::CountMismatch`] when the declared dimensions
    /// disagree with the matrix shapes, or the core's [`StateError`] when
    /// the matrices themselves are invalid.
    pub fn into_state(self) -> Result<ResourceState, ScenarioError> {
        if self.available.len() != self.resources {
            return Err(ScenarioError::CountMismatch {
                what: "resource",
                declared: self.resources,
                actual: self.available.len(),
            });
        }
        if self.maximum.len() != self.vms {
            return Err(ScenarioError::CountMismatch {
                what: "vm",
                declared: self.vms,
                actual: self.maximum.len(),
            });
        }
        Ok(ResourceState::new(
            self.available,
            self.maximum,
            self.allocation,
        )?)
    }
}

/// Parse a `--amount` list such as `"1,0,2"` into resource units.
pub fn parse_amounts(text: &str) -> Result<Vec<u64>, ScenarioError> {
    text.split(',')
        .map(|part| {
            part.trim().parse::<u64>().map_err(|_| ScenarioError::Amount {
                text: text.to_string(),
            })
        })
        .collect()
}
