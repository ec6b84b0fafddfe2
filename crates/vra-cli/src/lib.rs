//! VRA CLI - scenario files and command front-end for the arbiter
//!
//! The caller-side half of the system: collects matrices from scenario
//! files, invokes the core engine, and renders its structured results.
//! The engine itself never touches a file.

#![warn(unreachable_pub)]

pub mod commands;
pub mod scenario;

pub use scenario::{parse_amounts, Scenario, ScenarioError};
