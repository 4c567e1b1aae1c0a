//! Shared plumbing for the demo binaries: command-line flags, logging,
//! configuration loading and outcome reporting.

pub mod cli;
